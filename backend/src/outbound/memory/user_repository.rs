//! In-memory `UserRepository`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, StoredCredentials, User, UserId};

use super::lock;

#[derive(Debug, Clone)]
struct StoredUser {
    user: User,
    password_hash: PasswordHash,
}

/// Process-local user store keyed by user id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Uuid, StoredUser>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users.
    ///
    /// # Errors
    ///
    /// [`UserPersistenceError::Query`] when the store lock is poisoned.
    pub fn len(&self) -> Result<usize, UserPersistenceError> {
        lock(&self.users, UserPersistenceError::query).map(|users| users.len())
    }

    /// # Errors
    ///
    /// Same as [`Self::len`].
    pub fn is_empty(&self) -> Result<bool, UserPersistenceError> {
        self.len().map(|count| count == 0)
    }
}

fn email_taken(
    users: &HashMap<Uuid, StoredUser>,
    email: &EmailAddress,
    except: Option<&Uuid>,
) -> bool {
    users
        .iter()
        .any(|(id, stored)| Some(id) != except && stored.user.email() == email)
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut users = lock(&self.users, UserPersistenceError::query)?;
        if email_taken(&users, user.email(), None) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        users.insert(
            *user.id().as_uuid(),
            StoredUser {
                user: user.clone(),
                password_hash: password_hash.clone(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let users = lock(&self.users, UserPersistenceError::query)?;
        Ok(users.get(id.as_uuid()).map(|stored| stored.user.clone()))
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let users = lock(&self.users, UserPersistenceError::query)?;
        Ok(users
            .values()
            .find(|stored| stored.user.email() == email)
            .map(|stored| {
                StoredCredentials::new(stored.user.id().clone(), stored.password_hash.clone())
            }))
    }

    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, UserPersistenceError> {
        let mut users = lock(&self.users, UserPersistenceError::query)?;
        let id = user.id().as_uuid();
        if email_taken(&users, user.email(), Some(id)) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        let Some(stored) = users.get_mut(id) else {
            return Ok(false);
        };
        stored.user = user.clone();
        if let Some(hash) = password_hash {
            stored.password_hash = hash;
        }
        Ok(true)
    }
}
