//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, PasswordHash, StoredCredentials, User, UserId};

use super::error_mapping::{DieselErrorMapping, map_diesel_error, pool_error_message};
use super::models::{CredentialsRow, NewUserRow, UserChangeset, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
///
/// The `users_email_key` unique constraint is the source of truth for email
/// uniqueness.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(pool_error_message(error))
}

fn map_write_error(error: diesel::result::Error, email: &str) -> UserPersistenceError {
    map_diesel_error(
        error,
        DieselErrorMapping {
            query: UserPersistenceError::query,
            connection: UserPersistenceError::connection,
            unique_violation: |constraint: Option<&str>| {
                if constraint.is_some_and(|name| name != "users_email_key") {
                    warn!(?constraint, "unexpected unique violation on users");
                }
                UserPersistenceError::duplicate_email(email)
            },
        },
    )
}

fn map_read_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        DieselErrorMapping {
            query: UserPersistenceError::query,
            connection: UserPersistenceError::connection,
            unique_violation: |_: Option<&str>| {
                UserPersistenceError::query("unexpected unique violation")
            },
        },
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    User::try_from_parts(row.id, &row.email, &row.name).map_err(|err| {
        warn!(user_id = %row.id, %err, "stored user row failed validation");
        UserPersistenceError::query("stored user record is invalid")
    })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            name: user.name().as_ref(),
            password_hash: password_hash.as_str(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| map_write_error(err, row.email))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .find(id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        row.map(row_to_user).transpose()
    }

    async fn find_credentials_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CredentialsRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;

        Ok(row.map(|row| {
            StoredCredentials::new(
                UserId::from_uuid(row.id),
                PasswordHash::from_stored(row.password_hash),
            )
        }))
    }

    async fn update(
        &self,
        user: &User,
        password_hash: Option<PasswordHash>,
    ) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserChangeset {
            email: user.email().as_ref(),
            name: user.name().as_ref(),
            password_hash: password_hash.as_ref().map(PasswordHash::as_str),
            updated_at: Utc::now(),
        };

        let affected = diesel::update(users::table.find(user.id().as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, changes.email))?;

        Ok(affected > 0)
    }
}
