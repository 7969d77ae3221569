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

//! Blinding of the sender's payment code carried by a notification transaction.
//!
//! Sender and recipient compute the same 64 byte mask from opposite halves of an ECDH exchange:
//! the sender uses the private key of the designated input and the recipient's notification
//! pubkey, the recipient uses its notification private key and the designated input's pubkey.
//! Only the x-coordinate and chain code (offsets 3 to 66) are masked. The sign byte stays in
//! the clear, which not every BIP47 implementation agrees on.

use std::ops::Range;

use bitcoin::{
    hashes::{hmac::HmacEngine, sha512, Hash, HashEngine, Hmac},
    secp256k1::{self, Secp256k1},
    CompressedPublicKey, OutPoint, PrivateKey,
};
use zeroize::Zeroizing;

use crate::{
    code::{PaymentCode, PAYMENT_CODE_BIN_LENGTH},
    error::{Error, Result},
};

/// Byte range of a binary payment code that gets masked.
pub const BLINDED_RANGE: Range<usize> = 3..67;

/// Calculates the x-coordinate of `sk·pk`. Both sides of the exchange arrive at the same value.
pub fn shared_secret(sk: &PrivateKey, pk: &CompressedPublicKey) -> Result<Zeroizing<[u8; 32]>> {
    let sk_scalar = secp256k1::Scalar::from(sk.inner);
    let point = pk
        .0
        .mul_tweak(&Secp256k1::verification_only(), &sk_scalar)
        .map_err(Error::SharedSecret)?;
    let serialized = Zeroizing::new(point.serialize());

    let mut x = Zeroizing::new([0_u8; 32]);
    x.copy_from_slice(&serialized[1..]);
    Ok(x)
}

/// Calculates a blinding factor: HMAC-SHA512 keyed by the serialized outpoint over the shared
/// secret. The operation is symmetrical, therefore the key combination can be:
/// 1. designated private key, notification public key
/// 2. notification private key, designated public key
pub fn blinding_factor(
    sk: &PrivateKey,
    pk: &CompressedPublicKey,
    outpoint: &[u8],
) -> Result<Zeroizing<[u8; 64]>> {
    let secret = shared_secret(sk, pk)?;

    let mut hmac = HmacEngine::<sha512::Hash>::new(outpoint);
    hmac.input(&secret[..]);
    let hash = Hmac::<sha512::Hash>::from_engine(hmac);

    Ok(Zeroizing::new(hash.to_byte_array()))
}

/// Blinds (or unblinds) a binary payment code in place using a byte mask.
pub fn blind_payment_code(bytes: &mut [u8; PAYMENT_CODE_BIN_LENGTH], mask: &[u8; 64]) {
    bytes[BLINDED_RANGE]
        .iter_mut()
        .zip(mask.iter())
        .for_each(|(a, b)| {
            *a ^= b;
        });
}

/// Serializes an outpoint the way it is fed to the blinding HMAC: txid in internal byte order
/// followed by the little-endian output index.
pub fn outpoint_bytes(outpoint: &OutPoint) -> [u8; 36] {
    let mut encoded = [0_u8; 36];
    encoded[..32].copy_from_slice(&outpoint.txid.to_byte_array());
    encoded[32..].copy_from_slice(&outpoint.vout.to_le_bytes());
    encoded
}

/// Produces the 80 byte notification code to be put in the OP_RETURN output of a notification
/// transaction.
///
/// # Arguments
///
/// * `sender_code` - The payment code being announced.
/// * `recipient_code` - The payment code whose notification pubkey the blinding is made against.
/// * `designated_sk` - Private key of the designated input of the notification transaction.
/// * `outpoint` - The serialized outpoint spent by the designated input (see `outpoint_bytes`).
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        skip_all,
        fields(sender = %sender_code, recipient = %recipient_code, outpoint_len = outpoint.len()),
        err
    )
)]
pub fn notification_code(
    sender_code: &PaymentCode,
    recipient_code: &PaymentCode,
    designated_sk: &PrivateKey,
    outpoint: &[u8],
) -> Result<[u8; PAYMENT_CODE_BIN_LENGTH]> {
    let notification_pk = recipient_code.notification_pubkey()?;
    let mask = blinding_factor(designated_sk, &notification_pk, outpoint)?;

    let mut code = sender_code.to_bytes();
    blind_payment_code(&mut code, &mask);

    Ok(code)
}

impl PaymentCode {
    /// Recovers the sender's payment code from a notification code, as seen from the recipient.
    /// `notification_sk` is the private key behind the recipient's notification pubkey and
    /// `designated_pk` the pubkey exposed by the notification transaction's designated input.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(skip_all, fields(outpoint_len = outpoint.len()), err)
    )]
    pub fn from_notification_code(
        notification_code: &[u8; PAYMENT_CODE_BIN_LENGTH],
        notification_sk: &PrivateKey,
        designated_pk: &CompressedPublicKey,
        outpoint: &[u8],
    ) -> Result<Self> {
        let mask = blinding_factor(notification_sk, designated_pk, outpoint)?;

        let mut code = *notification_code;
        blind_payment_code(&mut code, &mask);

        Ok(PaymentCode::from_bytes(&code))
    }
}
