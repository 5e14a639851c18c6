//! Opaque bearer tokens.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 20;
/// Length of the hex-encoded token.
pub const TOKEN_LEN: usize = TOKEN_BYTES * 2;

/// Bearer token issued after a successful login.
///
/// ## Invariants
/// - Exactly [`TOKEN_LEN`] lower-case hexadecimal characters.
/// - `Debug` prints only the fingerprint.
///
/// # Examples
/// ```
/// use user_api::domain::AuthToken;
///
/// let token = AuthToken::generate();
/// assert_eq!(AuthToken::parse(token.as_str()), Some(token.clone()));
/// assert!(AuthToken::parse("not-a-token").is_none());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct AuthToken(String);

impl AuthToken {
    /// Draw a fresh token from the operating system RNG.
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accept a token presented by a client or read from storage.
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed = raw.len() == TOKEN_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        well_formed.then(|| Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Short digest that identifies the token in logs without revealing it.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(self.0.as_bytes());
        hex::encode(&digest[..6])
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AuthToken").field(&self.fingerprint()).finish()
    }
}
