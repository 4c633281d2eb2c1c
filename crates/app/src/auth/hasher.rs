//! Keyed token hashing.

use hmac::{Hmac, Mac, digest::InvalidLength};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Produces and checks HMAC-SHA256 verifiers for API tokens.
#[derive(Clone)]
pub struct TokenHasher {
    keyed: HmacSha256,
}

impl TokenHasher {
    /// Prepare a hasher for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is rejected by the MAC implementation.
    pub fn new(key: impl AsRef<[u8]>) -> Result<Self, InvalidLength> {
        Ok(Self {
            keyed: <HmacSha256 as Mac>::new_from_slice(key.as_ref())?,
        })
    }

    fn mac(&self, input: &[u8]) -> HmacSha256 {
        let mut mac = self.keyed.clone();

        mac.update(input);

        mac
    }

    /// Hex-encoded verifier for `input`.
    #[must_use]
    pub fn hash(&self, input: &[u8]) -> String {
        hex::encode(self.mac(input).finalize().into_bytes())
    }

    /// Constant-time comparison of `input` against a stored verifier.
    #[must_use]
    pub fn verify(&self, input: &[u8], verifier: &str) -> bool {
        let Ok(expected) = hex::decode(verifier) else {
            return false;
        };

        self.mac(input).verify_slice(&expected).is_ok()
    }
}

impl std::fmt::Debug for TokenHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenHasher(**redacted**)")
    }
}
