//! Driving port for issuing and resolving bearer tokens.

use async_trait::async_trait;

use crate::domain::{AuthToken, Error, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenService: Send + Sync {
    /// Return the user's token, creating it on first use.
    async fn issue(&self, user_id: &UserId) -> Result<AuthToken, Error>;

    /// Resolve a presented token to its owner.
    async fn authenticate_token(&self, token: &AuthToken) -> Result<UserId, Error>;
}
