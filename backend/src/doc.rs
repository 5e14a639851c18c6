//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] collects every HTTP endpoint of the inbound layer together with
//! the request and response bodies they exchange. The document is served by
//! Swagger UI in debug builds and printed by `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::users::{
    CreateUserRequest, TokenRequest, TokenResponse, UpdateProfileRequest, UserResponse,
};

/// Enrich the generated document with the token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "TokenAuth",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` where the key is issued by POST /user/token/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "User account API",
        description = "Registration, token authentication and profile management."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::create_token,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::patch_current_user,
        crate::inbound::http::users::replace_current_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateUserRequest,
        TokenRequest,
        UpdateProfileRequest,
        UserResponse,
        TokenResponse,
        ProbeStatus,
        Error,
        ErrorCode
    )),
    tags(
        (name = "users", description = "Account registration, tokens and profiles"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
