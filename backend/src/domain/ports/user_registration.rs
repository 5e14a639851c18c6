//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationRequest, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRegistration: Send + Sync {
    /// Create an account; a taken email fails with a field error on `email`.
    async fn register(&self, request: &RegistrationRequest) -> Result<User, Error>;
}
