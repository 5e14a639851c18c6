//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::{App, web};

use crate::domain::ports::{
    MockAuthTokenService, MockLoginService, MockUserProfileCommand, MockUserProfileQuery,
    MockUserRegistration,
};
use crate::domain::{AuthToken, UserId};
use crate::middleware::Trace;

use super::state::HttpState;

/// Driving-port mocks; set expectations, then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub registration: MockUserRegistration,
    pub login: MockLoginService,
    pub tokens: MockAuthTokenService,
    pub profile: MockUserProfileQuery,
    pub profile_command: MockUserProfileCommand,
}

impl MockPorts {
    /// Accept exactly `token` as a credential for `user_id`.
    pub fn authenticate_as(&mut self, token: &AuthToken, user_id: &UserId) {
        let expected = token.clone();
        let owner = user_id.clone();
        self.tokens
            .expect_authenticate_token()
            .withf(move |presented| *presented == expected)
            .returning(move |_| Ok(owner.clone()));
    }

    pub fn into_state(self) -> HttpState {
        HttpState {
            registration: Arc::new(self.registration),
            login: Arc::new(self.login),
            tokens: Arc::new(self.tokens),
            profile: Arc::new(self.profile),
            profile_command: Arc::new(self.profile_command),
        }
    }
}

/// Build an app wired like the server, over the given state.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .configure(super::configure)
        .default_service(web::to(super::not_found))
}
