//! Port abstraction for bearer token storage.

use async_trait::async_trait;

use crate::domain::{AuthToken, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by token repository adapters.
    pub enum AuthTokenPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
        /// The user already owns a token, or the key is taken.
        DuplicateToken => "token already exists",
    }
}

/// Storage for the single token each user may hold.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Token currently held by `user_id`, if any.
    async fn find_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AuthToken>, AuthTokenPersistenceError>;

    /// Record `token` for `user_id`.
    ///
    /// Fails with [`AuthTokenPersistenceError::DuplicateToken`] when the user
    /// already has a token.
    async fn insert(
        &self,
        user_id: &UserId,
        token: &AuthToken,
    ) -> Result<(), AuthTokenPersistenceError>;

    /// Owner of `token`, if it was issued.
    async fn find_user(
        &self,
        token: &AuthToken,
    ) -> Result<Option<UserId>, AuthTokenPersistenceError>;
}
