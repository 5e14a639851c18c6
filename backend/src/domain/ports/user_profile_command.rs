//! Driving port for profile updates.

use async_trait::async_trait;

use crate::domain::{Error, ProfileUpdate, User, UserId};

/// Domain use-case port for changing the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Apply `update` and return the resulting profile.
    async fn update_profile(&self, user_id: &UserId, update: &ProfileUpdate)
    -> Result<User, Error>;
}
