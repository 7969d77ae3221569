// Rust BIP47 Implementation
// Written in 2021 by
//  Straylight <https://github.com/straylight-orbit>
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.

//! BIP47 reusable payment codes: the 80 byte payment code record and its `PM8T...` text form,
//! notification key and address derivation, and the blinded notification code a sender embeds
//! in a notification transaction.
//!
//! ```
//! use bip47_paycode::{bitcoin::Network, AddressType, PaymentCode};
//!
//! let code: PaymentCode = "PM8TJTLJbPRGxSbc8EJi42Wrr6QbNSaSSVJ5Y3E4pbCYiTHUskHg13935Ubb7q8tx9GVbh2UuRnBc3WSyJHhUrw8KhprKnn9eDznYGieTzFcwQRya4GA"
//!     .parse()
//!     .unwrap();
//! let address = code
//!     .notification_address(Network::Bitcoin, &AddressType::P2PKH)
//!     .unwrap();
//! assert_eq!(address.to_string(), "1JDdmqFLhpzcUwPeinhJbUPw4Co3aWLyzW");
//! ```
pub extern crate bitcoin;
pub extern crate thiserror;

pub mod blinding;
pub mod code;
mod error;
pub mod notification;

pub use crate::{
    blinding::{
        blind_payment_code, blinding_factor, notification_code, outpoint_bytes, shared_secret,
    },
    code::{PaymentCode, PAYMENT_CODE_BIN_LENGTH},
    error::{Error, Result},
    notification::{AddressType, NotificationKey},
};
