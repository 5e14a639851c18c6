//! Port abstraction for user persistence adapters and their errors.
//!
//! Adapters own email uniqueness: a conflicting insert or update must surface
//! as [`UserPersistenceError::DuplicateEmail`] rather than a generic query
//! failure.

use async_trait::async_trait;

use crate::domain::{EmailAddress, PasswordHash, StoredCredentials, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the email address.
        DuplicateEmail { email: String } => "email already registered: {email}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user together with their password hash.
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch the credential record for a normalised email address.
    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;

    /// Overwrite the email and name of `user`, replacing the password hash
    /// when one is supplied.
    ///
    /// Returns `false` when no record matched the user's identifier.
    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(UserPersistenceError::connection("refused"), "user repository connection failed: refused")]
    #[case(UserPersistenceError::query("syntax"), "user repository query failed: syntax")]
    #[case(
        UserPersistenceError::duplicate_email("ada@example.com"),
        "email already registered: ada@example.com"
    )]
    fn errors_format_messages(#[case] error: UserPersistenceError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }
}
