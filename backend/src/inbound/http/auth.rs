//! Bearer token authentication for HTTP handlers.
//!
//! [`AuthenticatedUser`] resolves the `Authorization` header through the
//! token port, so handlers receive a user id or the request fails with 401
//! before the handler body runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AuthToken, Error, UserId};

use super::state::HttpState;

const NOT_PROVIDED: &str = "Authentication credentials were not provided.";
const INVALID_TOKEN: &str = "Invalid token.";

/// Parse `Token <key>` or `Bearer <key>`.
fn parse_authorization(value: &str) -> Result<AuthToken, Error> {
    let mut parts = value.split_whitespace();
    let scheme = parts.next().ok_or_else(|| Error::unauthorized(NOT_PROVIDED))?;
    if !scheme.eq_ignore_ascii_case("token") && !scheme.eq_ignore_ascii_case("bearer") {
        return Err(Error::unauthorized(NOT_PROVIDED));
    }
    let key = parts
        .next()
        .ok_or_else(|| Error::unauthorized("Invalid token header. No credentials provided."))?;
    if parts.next().is_some() {
        return Err(Error::unauthorized(
            "Invalid token header. Token string should not contain spaces.",
        ));
    }
    AuthToken::parse(key).ok_or_else(|| Error::unauthorized(INVALID_TOKEN))
}

fn token_from_request(req: &HttpRequest) -> Result<AuthToken, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized(NOT_PROVIDED))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized(INVALID_TOKEN))?;
    parse_authorization(value)
}

/// Identity of the caller, resolved from a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    pub fn user_id(&self) -> &UserId {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = token_from_request(req);
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = token?;
            let state =
                state.ok_or_else(|| Error::internal("HTTP state is not configured"))?;
            state
                .tokens
                .authenticate_token(&token)
                .await
                .map(AuthenticatedUser)
        })
    }
}
