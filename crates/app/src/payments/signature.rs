//! Provider payment signatures.
//!
//! The provider signs `"{order_id}|{payment_id}"` with HMAC-SHA256 keyed by
//! the merchant's key secret and sends the lowercase hex digest.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn keyed(secret: &str, order_id: &str, payment_id: &str) -> Option<HmacSha256> {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()).ok()?;

    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    Some(mac)
}

/// Hex digest the provider is expected to send for this payment.
#[must_use]
pub fn expected_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    keyed(secret, order_id, payment_id)
        .map(|mac| hex::encode(mac.finalize().into_bytes()))
        .unwrap_or_default()
}

/// Constant-time check of `signature` against the expected digest.
#[must_use]
pub fn verify(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(signature) = hex::decode(signature.trim()) else {
        return false;
    };

    keyed(secret, order_id, payment_id).is_some_and(|mac| mac.verify_slice(&signature).is_ok())
}
