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

//! Binary and Base58Check encoding of payment codes.

use std::{fmt, str::FromStr};

use bitcoin::base58;

use crate::error::{Error, Result};

/// Length of a binary payment code.
pub const PAYMENT_CODE_BIN_LENGTH: usize = 80;

/// Base58Check version byte of a textual payment code ('P').
pub const LETTER_P: u8 = 0x47;

/// A BIP47 payment code, kept as the six fixed-width fields of its 80 byte serialization.
///
/// Decoding only checks the outer Base58Check prefix and the payload length. The inner version,
/// feature and sign bytes are carried as read so that re-encoding is always lossless.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaymentCode {
    version: u8,
    features: u8,
    sign: u8,
    x: [u8; 32],
    chain_code: [u8; 32],
    data: [u8; 13],
}

impl PaymentCode {
    /// Constructs a payment code from its individual fields.
    pub fn new(
        version: u8,
        features: u8,
        sign: u8,
        x: [u8; 32],
        chain_code: [u8; 32],
        data: [u8; 13],
    ) -> Self {
        Self {
            version,
            features,
            sign,
            x,
            chain_code,
            data,
        }
    }

    /// Parses a Base58Check payment code (`PM8T...`).
    #[cfg_attr(feature = "tracing", tracing::instrument(err))]
    pub fn from_wif(payment_code: &str) -> Result<Self> {
        let decoded = base58::decode_check(payment_code)?;
        let (&prefix, payload) = decoded.split_first().ok_or(Error::InvalidLength(0))?;

        if prefix != LETTER_P {
            return Err(Error::InvalidVersion(prefix));
        }

        PaymentCode::try_from(payload)
    }

    /// Slices an 80 byte payment code into its fields. No field is validated.
    pub fn from_bytes(bytes: &[u8; PAYMENT_CODE_BIN_LENGTH]) -> Self {
        let mut x = [0_u8; 32];
        let mut chain_code = [0_u8; 32];
        let mut data = [0_u8; 13];
        x.copy_from_slice(&bytes[3..35]);
        chain_code.copy_from_slice(&bytes[35..67]);
        data.copy_from_slice(&bytes[67..80]);

        Self {
            version: bytes[0],
            features: bytes[1],
            sign: bytes[2],
            x,
            chain_code,
            data,
        }
    }

    /// Interprets the payment code as an 80 byte long array.
    pub fn to_bytes(&self) -> [u8; PAYMENT_CODE_BIN_LENGTH] {
        let mut payment_code = [0_u8; PAYMENT_CODE_BIN_LENGTH];

        payment_code[0] = self.version;
        payment_code[1] = self.features;
        payment_code[2] = self.sign;
        payment_code[3..35].copy_from_slice(&self.x);
        payment_code[35..67].copy_from_slice(&self.chain_code);
        payment_code[67..80].copy_from_slice(&self.data);

        payment_code
    }

    /// The inner version byte. Version 1 is the only one defined for this layout.
    pub fn version(&self) -> u8 {
        self.version
    }

    /// Feature bit flags, not interpreted here.
    pub fn features(&self) -> u8 {
        self.features
    }

    /// Parity byte of the public key's y-coordinate (`0x02` or `0x03` for a valid code).
    pub fn sign(&self) -> u8 {
        self.sign
    }

    /// The x-coordinate of the public key.
    pub fn x(&self) -> &[u8; 32] {
        &self.x
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    /// Reserved trailing bytes.
    pub fn data(&self) -> &[u8; 13] {
        &self.data
    }

    /// The `sign‖x` public key in compressed SEC form. Whether it is a point on the curve is only
    /// checked once it is used for derivation.
    pub fn compressed_key(&self) -> [u8; 33] {
        let mut key = [0_u8; 33];
        key[0] = self.sign;
        key[1..].copy_from_slice(&self.x);
        key
    }
}

impl TryFrom<&[u8]> for PaymentCode {
    type Error = Error;

    fn try_from(payment_code: &[u8]) -> Result<Self> {
        let bytes = <&[u8; PAYMENT_CODE_BIN_LENGTH]>::try_from(payment_code)
            .map_err(|_| Error::InvalidLength(payment_code.len()))?;

        Ok(PaymentCode::from_bytes(bytes))
    }
}

impl From<[u8; PAYMENT_CODE_BIN_LENGTH]> for PaymentCode {
    fn from(bytes: [u8; PAYMENT_CODE_BIN_LENGTH]) -> Self {
        PaymentCode::from_bytes(&bytes)
    }
}

impl FromStr for PaymentCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PaymentCode::from_wif(s)
    }
}

impl fmt::Display for PaymentCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut extended = [0_u8; 1 + PAYMENT_CODE_BIN_LENGTH];

        extended[0] = LETTER_P;
        extended[1..].copy_from_slice(&self.to_bytes());
        base58::encode_check_to_fmt(f, &extended)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for PaymentCode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for PaymentCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = <String as serde::Deserialize>::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
