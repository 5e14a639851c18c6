//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthTokenService, LoginService, UserProfileCommand, UserProfileQuery, UserRegistration,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn UserRegistration>,
    pub login: Arc<dyn LoginService>,
    pub tokens: Arc<dyn AuthTokenService>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub profile_command: Arc<dyn UserProfileCommand>,
}

impl HttpState {
    /// Wire every port to a single service implementing all of them.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use user_api::domain::UserAccountService;
    /// use user_api::inbound::http::state::HttpState;
    /// use user_api::outbound::memory::{InMemoryAuthTokenRepository, InMemoryUserRepository};
    ///
    /// let service = UserAccountService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(InMemoryAuthTokenRepository::new()),
    /// );
    /// let _state = HttpState::from_service(Arc::new(service));
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: UserRegistration
            + LoginService
            + AuthTokenService
            + UserProfileQuery
            + UserProfileCommand
            + 'static,
    {
        Self {
            registration: service.clone(),
            login: service.clone(),
            tokens: service.clone(),
            profile: service.clone(),
            profile_command: service,
        }
    }
}
