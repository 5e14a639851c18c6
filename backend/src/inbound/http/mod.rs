//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::{HttpResponse, error::JsonPayloadError, web};

use crate::domain::Error;

pub use error::ApiResult;

/// JSON extractor configuration mapping body errors to `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let message = match &err {
            JsonPayloadError::ContentType => "Content-Type must be application/json".to_owned(),
            JsonPayloadError::OverflowKnownLength { .. } | JsonPayloadError::Overflow { .. } => {
                "request body is too large".to_owned()
            }
            other => format!("malformed JSON body: {other}"),
        };
        Error::invalid_request(message).into()
    })
}

/// JSON 404 for unknown routes.
pub async fn not_found() -> ApiResult<HttpResponse> {
    Err(Error::not_found("Not found."))
}

/// Register the account API resources with their JSON configuration.
///
/// Pair with `App::default_service(web::to(not_found))` for JSON 404s.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());
    users::configure(cfg);
}
