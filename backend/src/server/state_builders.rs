//! Builds the HTTP state from the configured user store.

use std::sync::Arc;

use tracing::warn;

use user_api::domain::UserAccountService;
use user_api::inbound::http::state::HttpState;
use user_api::outbound::memory::{InMemoryAuthTokenRepository, InMemoryUserRepository};
use user_api::outbound::persistence::{DieselAuthTokenRepository, DieselUserRepository};

use super::ServerConfig;

/// Wire the account service over Diesel repositories when a pool is
/// configured, otherwise over process-local maps.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => HttpState::from_service(Arc::new(UserAccountService::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselAuthTokenRepository::new(pool.clone())),
        ))),
        None => {
            warn!("no database configured; accounts are kept in memory and lost on restart");
            HttpState::from_service(Arc::new(UserAccountService::new(
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryAuthTokenRepository::new()),
            )))
        }
    }
}
