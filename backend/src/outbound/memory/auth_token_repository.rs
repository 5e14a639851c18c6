//! In-memory `AuthTokenRepository`.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{AuthTokenPersistenceError, AuthTokenRepository};
use crate::domain::{AuthToken, UserId};

use super::lock;

/// Process-local token store, one token per user.
#[derive(Debug, Default)]
pub struct InMemoryAuthTokenRepository {
    tokens: Mutex<HashMap<AuthToken, UserId>>,
}

impl InMemoryAuthTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthTokenRepository for InMemoryAuthTokenRepository {
    async fn find_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AuthToken>, AuthTokenPersistenceError> {
        let tokens = lock(&self.tokens, AuthTokenPersistenceError::query)?;
        Ok(tokens
            .iter()
            .find(|(_, owner)| *owner == user_id)
            .map(|(token, _)| token.clone()))
    }

    async fn insert(
        &self,
        user_id: &UserId,
        token: &AuthToken,
    ) -> Result<(), AuthTokenPersistenceError> {
        let mut tokens = lock(&self.tokens, AuthTokenPersistenceError::query)?;
        if tokens.contains_key(token) || tokens.values().any(|owner| owner == user_id) {
            return Err(AuthTokenPersistenceError::duplicate_token());
        }
        tokens.insert(token.clone(), user_id.clone());
        Ok(())
    }

    async fn find_user(
        &self,
        token: &AuthToken,
    ) -> Result<Option<UserId>, AuthTokenPersistenceError> {
        let tokens = lock(&self.tokens, AuthTokenPersistenceError::query)?;
        Ok(tokens.get(token).cloned())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn one_token_per_user() {
        let repo = InMemoryAuthTokenRepository::new();
        let user_id = UserId::random();
        let first = AuthToken::generate();

        repo.insert(&user_id, &first).await.expect("first token");
        let err = repo
            .insert(&user_id, &AuthToken::generate())
            .await
            .expect_err("second token");
        assert_eq!(err, AuthTokenPersistenceError::DuplicateToken);

        let found = repo.find_for_user(&user_id).await.expect("lookup");
        assert_eq!(found, Some(first.clone()));
        let owner = repo.find_user(&first).await.expect("lookup");
        assert_eq!(owner, Some(user_id));
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_token_has_no_owner() {
        let repo = InMemoryAuthTokenRepository::new();
        let owner = repo.find_user(&AuthToken::generate()).await.expect("lookup");
        assert!(owner.is_none());
    }
}
