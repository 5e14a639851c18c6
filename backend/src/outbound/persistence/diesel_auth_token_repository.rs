//! PostgreSQL-backed `AuthTokenRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;
use uuid::Uuid;

use crate::domain::ports::{AuthTokenPersistenceError, AuthTokenRepository};
use crate::domain::{AuthToken, UserId};

use super::error_mapping::{DieselErrorMapping, map_diesel_error, pool_error_message};
use super::models::NewAuthTokenRow;
use super::pool::{DbPool, PoolError};
use super::schema::auth_tokens;

/// Diesel-backed implementation of the `AuthTokenRepository` port.
///
/// Both the primary key and the `auth_tokens_user_id_key` constraint report
/// conflicts as [`AuthTokenPersistenceError::DuplicateToken`].
#[derive(Clone)]
pub struct DieselAuthTokenRepository {
    pool: DbPool,
}

impl DieselAuthTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AuthTokenPersistenceError {
    AuthTokenPersistenceError::connection(pool_error_message(error))
}

fn map_error(error: diesel::result::Error) -> AuthTokenPersistenceError {
    map_diesel_error(
        error,
        DieselErrorMapping {
            query: AuthTokenPersistenceError::query,
            connection: AuthTokenPersistenceError::connection,
            unique_violation: |_: Option<&str>| AuthTokenPersistenceError::duplicate_token(),
        },
    )
}

#[async_trait]
impl AuthTokenRepository for DieselAuthTokenRepository {
    async fn find_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<AuthToken>, AuthTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let key: Option<String> = auth_tokens::table
            .filter(auth_tokens::user_id.eq(user_id.as_uuid()))
            .select(auth_tokens::key)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        key.map(|key| {
            AuthToken::parse(&key).ok_or_else(|| {
                warn!(user_id = %user_id, "stored token is malformed");
                AuthTokenPersistenceError::query("stored token is malformed")
            })
        })
        .transpose()
    }

    async fn insert(
        &self,
        user_id: &UserId,
        token: &AuthToken,
    ) -> Result<(), AuthTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewAuthTokenRow {
            key: token.as_str(),
            user_id: *user_id.as_uuid(),
        };

        diesel::insert_into(auth_tokens::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_user(
        &self,
        token: &AuthToken,
    ) -> Result<Option<UserId>, AuthTokenPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let owner: Option<Uuid> = auth_tokens::table
            .find(token.as_str())
            .select(auth_tokens::user_id)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        Ok(owner.map(UserId::from_uuid))
    }
}
