//! In-memory adapters for the account repositories.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! They enforce the same uniqueness rules as the PostgreSQL schema.

mod auth_token_repository;
mod user_repository;

pub use auth_token_repository::InMemoryAuthTokenRepository;
pub use user_repository::InMemoryUserRepository;

use std::sync::{Mutex, MutexGuard};

fn lock<'a, T, E>(
    mutex: &'a Mutex<T>,
    poisoned: impl FnOnce(&'static str) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    mutex
        .lock()
        .map_err(|_| poisoned("in-memory store lock poisoned"))
}
