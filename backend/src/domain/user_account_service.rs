//! User account domain service.
//!
//! Implements every driving port of the account API on top of the user and
//! token repositories. Password hashing runs on the blocking pool so request
//! workers stay responsive.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    AuthTokenPersistenceError, AuthTokenRepository, AuthTokenService, LoginService,
    UserPersistenceError, UserProfileCommand, UserProfileQuery, UserRegistration, UserRepository,
};
use crate::domain::{
    AuthToken, CREDENTIALS_REJECTED, Error, FieldErrors, FieldViolation, LoginCredentials,
    Password, PasswordHash, ProfileUpdate, RegistrationRequest, User, UserId,
};

/// Account service implementing registration, login, tokens and profiles.
#[derive(Clone)]
pub struct UserAccountService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
}

impl<U, T> UserAccountService<U, T> {
    /// Create a new service over the given repositories.
    pub fn new(users: Arc<U>, tokens: Arc<T>) -> Self {
        Self { users, tokens }
    }
}

/// Hash verified when the email is unknown so both paths cost the same.
fn dummy_hash() -> Option<&'static PasswordHash> {
    static DUMMY: OnceLock<Option<PasswordHash>> = OnceLock::new();
    DUMMY
        .get_or_init(|| {
            Password::for_login("not-a-real-account")
                .ok()
                .and_then(|password| PasswordHash::hash(&password).ok())
        })
        .as_ref()
}

async fn run_blocking<F, R>(task: F) -> Result<R, Error>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| Error::internal(format!("password worker failed: {err}")))
}

async fn hash_password(password: &Password) -> Result<PasswordHash, Error> {
    let password = password.clone();
    run_blocking(move || PasswordHash::hash(&password))
        .await?
        .map_err(|err| Error::internal(err.to_string()))
}

fn duplicate_email() -> Error {
    FieldErrors::single(
        "email",
        FieldViolation::Duplicate {
            entity: "user",
            field: "email",
        },
    )
    .into()
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => duplicate_email(),
    }
}

fn map_token_error(error: AuthTokenPersistenceError) -> Error {
    match error {
        AuthTokenPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AuthTokenPersistenceError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
        AuthTokenPersistenceError::DuplicateToken => {
            Error::internal("unexpected token conflict")
        }
    }
}

impl<U, T> UserAccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn load_user(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("user not found"))
    }

    async fn existing_token(&self, user_id: &UserId) -> Result<Option<AuthToken>, Error> {
        self.tokens
            .find_for_user(user_id)
            .await
            .map_err(map_token_error)
    }
}

#[async_trait]
impl<U, T> UserRegistration for UserAccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn register(&self, request: &RegistrationRequest) -> Result<User, Error> {
        let password_hash = hash_password(request.password()).await?;
        let user = User::new(
            UserId::random(),
            request.email().clone(),
            request.name().clone(),
        );

        self.users
            .create(&user, &password_hash)
            .await
            .map_err(map_user_error)?;

        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, T> LoginService for UserAccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?;
        let password = credentials.password().clone();

        let Some(stored) = stored else {
            run_blocking(move || dummy_hash().map(|hash| hash.verify(&password))).await?;
            return Err(Error::unauthorized(CREDENTIALS_REJECTED));
        };

        let hash = stored.password_hash().clone();
        if run_blocking(move || hash.verify(&password)).await? {
            Ok(stored.user_id().clone())
        } else {
            Err(Error::unauthorized(CREDENTIALS_REJECTED))
        }
    }
}

#[async_trait]
impl<U, T> AuthTokenService for UserAccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn issue(&self, user_id: &UserId) -> Result<AuthToken, Error> {
        if let Some(token) = self.existing_token(user_id).await? {
            return Ok(token);
        }

        let token = AuthToken::generate();
        match self.tokens.insert(user_id, &token).await {
            Ok(()) => {
                info!(user_id = %user_id, token = %token.fingerprint(), "token issued");
                Ok(token)
            }
            // A concurrent login created the token first; hand that one out.
            Err(AuthTokenPersistenceError::DuplicateToken) => self
                .existing_token(user_id)
                .await?
                .ok_or_else(|| Error::internal("token conflict without stored token")),
            Err(err) => Err(map_token_error(err)),
        }
    }

    async fn authenticate_token(&self, token: &AuthToken) -> Result<UserId, Error> {
        self.tokens
            .find_user(token)
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("Invalid token."))
    }
}

#[async_trait]
impl<U, T> UserProfileQuery for UserAccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.load_user(user_id).await
    }
}

#[async_trait]
impl<U, T> UserProfileCommand for UserAccountService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn update_profile(
        &self,
        user_id: &UserId,
        update: &ProfileUpdate,
    ) -> Result<User, Error> {
        let current = self.load_user(user_id).await?;
        if update.is_empty() {
            return Ok(current);
        }

        let password_hash = match update.password() {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };
        let password_changed = password_hash.is_some();
        let updated = User::new(
            current.id().clone(),
            update
                .email()
                .cloned()
                .unwrap_or_else(|| current.email().clone()),
            update
                .name()
                .cloned()
                .unwrap_or_else(|| current.name().clone()),
        );

        let matched = self
            .users
            .update(&updated, password_hash)
            .await
            .map_err(map_user_error)?;
        if !matched {
            return Err(Error::not_found("user not found"));
        }

        info!(user_id = %user_id, password_changed, "profile updated");
        Ok(updated)
    }
}

#[cfg(test)]
#[path = "user_account_service_tests.rs"]
mod tests;
