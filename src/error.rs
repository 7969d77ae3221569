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
use bitcoin::{base58, bip32, secp256k1};

use thiserror::Error;

/// Errors produced while decoding payment codes or deriving notification data from them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Wrong version byte {0:#04x}, expected 0x47 ('P')")]
    InvalidVersion(u8),
    #[error("Invalid payment code length {0}, expected 80")]
    InvalidLength(usize),
    #[error("Base58 error: {0}")]
    Checksum(#[from] base58::Error),
    #[error("Key derivation error: {0}")]
    KeyDerivation(#[from] bip32::Error),
    #[error("Shared secret error: {0}")]
    SharedSecret(secp256k1::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
