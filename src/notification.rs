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

//! Notification key and address derivation.

use bitcoin::{
    address::Address,
    bip32::{self, ChainCode, ChildNumber, Xpub},
    secp256k1::{self, Secp256k1},
    CompressedPublicKey, Network, NetworkKind,
};

use crate::{code::PaymentCode, error::Result};

/// Child index of the notification key.
const NOTIFICATION_INDEX: u32 = 0;

/// Represents derivable addresses for a payment code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressType {
    /// Legacy pay-to-pubkey-hash, the notification address kind defined by BIP47.
    P2PKH,
    P2WPKH,
}

/// The extended public key a payment code derives at index 0. Its public key is what a
/// notification transaction pays to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationKey(Xpub);

impl NotificationKey {
    pub fn public_key(&self) -> CompressedPublicKey {
        self.0.to_pub()
    }

    pub fn chain_code(&self) -> ChainCode {
        self.0.chain_code
    }

    pub fn xpub(&self) -> &Xpub {
        &self.0
    }

    /// Formats the notification public key as an address on the given network.
    pub fn address(&self, network: Network, address_type: &AddressType) -> Result<Address> {
        get_address_from_pubkey(&self.public_key(), network, address_type)
    }
}

impl PaymentCode {
    /// Builds the extended public key (`sign‖x`, chain code) this payment code encodes. Fails if
    /// `sign‖x` is not a point on the curve.
    pub fn to_xpub(&self) -> Result<Xpub> {
        let public_key = secp256k1::PublicKey::from_slice(&self.compressed_key())
            .map_err(bip32::Error::Secp256k1)?;

        // payment codes carry no network, derivation metadata is informational only
        Ok(Xpub {
            network: NetworkKind::Main,
            depth: 3,
            parent_fingerprint: bip32::Fingerprint::default(),
            child_number: ChildNumber::Normal { index: 0 },
            public_key,
            chain_code: ChainCode::from(*self.chain_code()),
        })
    }

    /// Derives the notification key, i.e. the non-hardened child at index 0.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(code = %self), err)
    )]
    pub fn notification_key(&self) -> Result<NotificationKey> {
        let secp = Secp256k1::verification_only();
        let child_number = ChildNumber::from_normal_idx(NOTIFICATION_INDEX)?;
        let child = self.to_xpub()?.ckd_pub(&secp, child_number)?;

        Ok(NotificationKey(child))
    }

    /// Derives the notification pubkey belonging to this payment code. This is exposed in case the
    /// consumer needs the notification pubkey for any reason, such as for manual blinding operations.
    /// Under normal circumstances, it is sufficient to use `notification_address`.
    pub fn notification_pubkey(&self) -> Result<CompressedPublicKey> {
        Ok(self.notification_key()?.public_key())
    }

    /// Derives the notification address belonging to this payment code.
    pub fn notification_address(
        &self,
        network: Network,
        address_type: &AddressType,
    ) -> Result<Address> {
        self.notification_key()?.address(network, address_type)
    }
}

/// Retrieves address from given compressed public key
fn get_address_from_pubkey(
    pk: &CompressedPublicKey,
    network: Network,
    address_type: &AddressType,
) -> Result<Address> {
    match address_type {
        AddressType::P2PKH => Ok(Address::p2pkh(pk, network)),
        AddressType::P2WPKH => Ok(Address::p2wpkh(pk, network)),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bitcoin::{address::Address, Network};

    use super::AddressType;
    use crate::{Error, PaymentCode};

    const ALICE_PAYMENT_CODE: &str = "PM8TJTLJbPRGxSbc8EJi42Wrr6QbNSaSSVJ5Y3E4pbCYiTHUskHg13935Ubb7q8tx9GVbh2UuRnBc3WSyJHhUrw8KhprKnn9eDznYGieTzFcwQRya4GA";
    const ALICE_NOTIFICATION_ADDRESS: &str = "1JDdmqFLhpzcUwPeinhJbUPw4Co3aWLyzW";
    const ALICE_A0: &str = "0353883a146a23f988e0f381a9507cbdb3e3130cd81b3ce26daf2af088724ce683";

    const BOB_PAYMENT_CODE: &str = "PM8TJS2JxQ5ztXUpBBRnpTbcUXbUHy2T1abfrb3KkAAtMEGNbey4oumH7Hc578WgQJhPjBxteQ5GHHToTYHE3A1w6p7tU6KSoFmWBVbFGjKPisZDbP97";
    const BOB_NOTIFICATION_ADDRESS: &str = "1ChvUUvht2hUQufHBXF8NgLhW8SwE2ecGV";
    const BOB_B0: &str = "024ce8e3b04ea205ff49f529950616c3db615b1e37753858cc60c1ce64d17e2ad8";

    #[test]
    fn test_notification_address() {
        let alice = PaymentCode::from_wif(ALICE_PAYMENT_CODE).unwrap();
        let alice_expected = Address::from_str(ALICE_NOTIFICATION_ADDRESS)
            .unwrap()
            .assume_checked();
        assert_eq!(
            alice
                .notification_address(Network::Bitcoin, &AddressType::P2PKH)
                .unwrap(),
            alice_expected
        );

        let bob = PaymentCode::from_wif(BOB_PAYMENT_CODE).unwrap();
        let bob_expected = Address::from_str(BOB_NOTIFICATION_ADDRESS)
            .unwrap()
            .assume_checked();
        assert_eq!(
            bob.notification_address(Network::Bitcoin, &AddressType::P2PKH)
                .unwrap(),
            bob_expected
        );
    }

    #[test]
    fn test_notification_pubkey() {
        let alice = PaymentCode::from_wif(ALICE_PAYMENT_CODE).unwrap();
        let bob = PaymentCode::from_wif(BOB_PAYMENT_CODE).unwrap();

        assert_eq!(alice.notification_pubkey().unwrap().to_string(), ALICE_A0);
        assert_eq!(bob.notification_pubkey().unwrap().to_string(), BOB_B0);
    }

    #[test]
    fn test_notification_key_is_deterministic() {
        let bob = PaymentCode::from_wif(BOB_PAYMENT_CODE).unwrap();
        let first = bob.notification_key().unwrap();
        let second = bob.notification_key().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.xpub().depth, 4);
        assert_ne!(first.chain_code().as_bytes(), bob.chain_code());
        assert_eq!(
            first.address(Network::Bitcoin, &AddressType::P2PKH).unwrap(),
            bob.notification_address(Network::Bitcoin, &AddressType::P2PKH)
                .unwrap()
        );
    }

    #[test]
    fn test_notification_address_networks() {
        let alice = PaymentCode::from_wif(ALICE_PAYMENT_CODE).unwrap();

        let testnet = alice
            .notification_address(Network::Testnet, &AddressType::P2PKH)
            .unwrap();
        assert!(testnet.to_string().starts_with('m') || testnet.to_string().starts_with('n'));

        let segwit = alice
            .notification_address(Network::Bitcoin, &AddressType::P2WPKH)
            .unwrap();
        assert!(segwit.to_string().starts_with("bc1q"));
    }

    #[test]
    fn test_invalid_point() {
        // not a valid sign byte
        let bad_sign = PaymentCode::new(0x01, 0x00, 0x05, [0x01; 32], [0x02; 32], [0; 13]);
        assert!(matches!(
            bad_sign.notification_key(),
            Err(Error::KeyDerivation(_))
        ));

        // x beyond the field size
        let bad_x = PaymentCode::new(0x01, 0x00, 0x02, [0xff; 32], [0x02; 32], [0; 13]);
        assert!(matches!(
            bad_x.notification_address(Network::Bitcoin, &AddressType::P2PKH),
            Err(Error::KeyDerivation(_))
        ));
    }
}
