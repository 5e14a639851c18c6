//! Password secrets and their Argon2id hashes.
//!
//! Plaintext passwords live in zeroizing memory and are only exposed to the
//! hasher. Hashing and verification are CPU bound; callers run them on the
//! blocking pool.

use std::fmt;

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash as PhcString, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use zeroize::Zeroizing;

use super::validation::FieldViolation;

/// Minimum length of a newly chosen password, in characters.
pub const PASSWORD_MIN: usize = 5;
/// Maximum accepted password length, in characters.
pub const PASSWORD_MAX: usize = 1024;

/// Plaintext password supplied by a client.
///
/// ## Invariants
/// - Never empty; whitespace is preserved as typed.
/// - At most [`PASSWORD_MAX`] characters.
/// - The `Debug` output never includes the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate a password the caller is choosing, enforcing the minimum
    /// length.
    ///
    /// # Examples
    /// ```
    /// use user_api::domain::{FieldViolation, Password};
    ///
    /// assert_eq!(
    ///     Password::new_secret("pw").map(|_| ()),
    ///     Err(FieldViolation::TooShort { min: 5 })
    /// );
    /// assert!(Password::new_secret("pass123").is_ok());
    /// ```
    pub fn new_secret(raw: &str) -> Result<Self, FieldViolation> {
        let password = Self::for_login(raw)?;
        if raw.chars().count() < PASSWORD_MIN {
            return Err(FieldViolation::TooShort { min: PASSWORD_MIN });
        }
        Ok(password)
    }

    /// Validate a password presented at login. Only emptiness and the upper
    /// bound are checked so older, shorter passwords still authenticate.
    pub fn for_login(raw: &str) -> Result<Self, FieldViolation> {
        if raw.is_empty() {
            return Err(FieldViolation::Blank);
        }
        if raw.chars().count() > PASSWORD_MAX {
            return Err(FieldViolation::TooLong { max: PASSWORD_MAX });
        }
        Ok(Self(Zeroizing::new(raw.to_owned())))
    }

    /// Plaintext for the hasher.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Failure raised by the password hasher.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    message: String,
}

/// Argon2id PHC string stored in place of the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt.
    pub fn hash(password: &Password) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map(|phc| Self(phc.to_string()))
            .map_err(|err| PasswordHashError {
                message: err.to_string(),
            })
    }

    /// Wrap a PHC string read back from storage.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    /// Check `password` against this hash.
    ///
    /// A stored value that is not a valid PHC string never verifies.
    pub fn verify(&self, password: &Password) -> bool {
        let Ok(parsed) = PhcString::new(&self.0) else {
            tracing::warn!("stored password hash is not a valid PHC string");
            return false;
        };
        Argon2::default()
            .verify_password(password.expose().as_bytes(), &parsed)
            .is_ok()
    }

    /// PHC string for persistence.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
