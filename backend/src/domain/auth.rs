//! Authentication primitives such as login credentials.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use super::password::{Password, PasswordHash};
use super::user::{EmailAddress, UserId};
use super::validation::{FieldErrors, required};

/// Message returned whenever credentials fail to authenticate.
pub const CREDENTIALS_REJECTED: &str = "Unable to authenticate with provided credentials.";

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised exactly like a registered address.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use user_api::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(Some("ada@Example.com"), Some("secret"))
///     .expect("valid credentials");
/// assert_eq!(creds.email().as_ref(), "ada@example.com");
/// assert_eq!(creds.password().expose(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Password,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs, reporting every
    /// failing field.
    pub fn try_from_parts(
        email: Option<&str>,
        password: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = errors.collect("email", required(email).and_then(EmailAddress::new));
        let password = errors.collect("password", required(password).and_then(Password::for_login));

        match (email, password) {
            (Some(email), Some(password)) if errors.is_empty() => Ok(Self { email, password }),
            _ => Err(errors),
        }
    }

    /// Email used to look the account up.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &Password {
        &self.password
    }
}

/// Credential record the user store hands to the authenticator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    user_id: UserId,
    password_hash: PasswordHash,
}

impl StoredCredentials {
    pub fn new(user_id: UserId, password_hash: PasswordHash) -> Self {
        Self {
            user_id,
            password_hash,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::FieldViolation;
    use rstest::rstest;

    #[rstest]
    #[case(None, Some("pw"), "email", FieldViolation::Required)]
    #[case(Some("   "), Some("pw"), "email", FieldViolation::Blank)]
    #[case(Some("not-an-email"), Some("pw"), "email", FieldViolation::InvalidEmail)]
    #[case(Some("ada@example.com"), Some(""), "password", FieldViolation::Blank)]
    #[case(Some("ada@example.com"), None, "password", FieldViolation::Required)]
    fn invalid_credentials(
        #[case] email: Option<&str>,
        #[case] password: Option<&str>,
        #[case] field: &str,
        #[case] expected: FieldViolation,
    ) {
        let errors = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(errors.violations(field), &[expected]);
    }

    #[rstest]
    fn reports_both_fields_together() {
        let errors = LoginCredentials::try_from_parts(None, None).expect_err("both missing");
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "password"]);
    }

    #[rstest]
    #[case("  ada@example.com  ", "secret")]
    #[case("grace@example.org", " spaced out ")]
    fn valid_credentials_keep_password_verbatim(#[case] email: &str, #[case] password: &str) {
        let creds = LoginCredentials::try_from_parts(Some(email), Some(password))
            .expect("valid inputs should succeed");
        assert_eq!(creds.email().as_ref(), email.trim());
        assert_eq!(creds.password().expose(), password);
    }
}
