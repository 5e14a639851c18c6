//! Account API handlers.
//!
//! ```text
//! POST  /user/create/ {"email":"ada@example.com","password":"testpass123","name":"Ada"}
//! POST  /user/token/  {"email":"ada@example.com","password":"testpass123"}
//! GET   /user/me/     Authorization: Token <key>
//! PATCH /user/me/     {"name":"Countess"}
//! PUT   /user/me/     {"email":"...","password":"...","name":"..."}
//! ```

use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    CREDENTIALS_REJECTED, Error, ErrorCode, LoginCredentials, ProfileUpdate, RegistrationRequest,
    User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;

/// Registration body for `POST /user/create/`.
///
/// Fields are optional at the wire level so missing values are reported as
/// field errors rather than a generic parse failure.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "testpass123", write_only)]
    pub password: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
}

/// Credentials body for `POST /user/token/`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TokenRequest {
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "testpass123", write_only)]
    pub password: Option<String>,
}

/// Profile body for `PATCH` and `PUT /user/me/`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateProfileRequest {
    pub email: Option<String>,
    #[schema(write_only)]
    pub password: Option<String>,
    pub name: Option<String>,
}

/// Public view of an account. The password is never serialised.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().to_string(),
            name: user.name().to_string(),
        }
    }
}

/// Token issued by `POST /user/token/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct TokenResponse {
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/user/create/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 405, description = "Method not allowed", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let request = RegistrationRequest::try_from_parts(
        payload.email.as_deref(),
        payload.password.as_deref(),
        payload.name.as_deref(),
    )?;
    let user = state.registration.register(&request).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

fn credentials_rejected() -> Error {
    Error::invalid_request(CREDENTIALS_REJECTED).with_details(json!({
        "non_field_errors": [CREDENTIALS_REJECTED],
        "code": "authentication",
    }))
}

/// Exchange email and password for a bearer token.
///
/// Repeated calls return the same token.
#[utoipa::path(
    post,
    path = "/user/token/",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid credentials", body = Error),
        (status = 405, description = "Method not allowed", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "createToken",
    security([])
)]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let payload = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(payload.email.as_deref(), payload.password.as_deref())?;
    let user_id = state
        .login
        .authenticate(&credentials)
        .await
        .map_err(|err| match err.code() {
            ErrorCode::Unauthorized => credentials_rejected(),
            _ => err,
        })?;
    let token = state.tokens.issue(&user_id).await?;
    info!(user_id = %user_id, token = %token.fingerprint(), "token handed out");
    Ok(web::Json(TokenResponse {
        token: token.as_str().to_owned(),
    }))
}

/// Return the authenticated user's profile.
#[utoipa::path(
    get,
    path = "/user/me/",
    responses(
        (status = 200, description = "Current profile", body = UserResponse),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("TokenAuth" = []))
)]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.profile.fetch_profile(caller.user_id()).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

async fn apply_update(
    state: &HttpState,
    caller: &AuthenticatedUser,
    update: ProfileUpdate,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state
        .profile_command
        .update_profile(caller.user_id(), &update)
        .await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// Partially update the authenticated user's profile.
#[utoipa::path(
    patch,
    path = "/user/me/",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["users"],
    operation_id = "patchCurrentUser",
    security(("TokenAuth" = []))
)]
pub async fn patch_current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let payload = payload.into_inner();
    let update = ProfileUpdate::try_partial(
        payload.email.as_deref(),
        payload.password.as_deref(),
        payload.name.as_deref(),
    )?;
    apply_update(&state, &caller, update).await
}

/// Replace the authenticated user's profile; every field is required.
#[utoipa::path(
    put,
    path = "/user/me/",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserResponse),
        (status = 400, description = "Validation failed", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error)
    ),
    tags = ["users"],
    operation_id = "replaceCurrentUser",
    security(("TokenAuth" = []))
)]
pub async fn replace_current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<UpdateProfileRequest>,
) -> ApiResult<web::Json<UserResponse>> {
    let payload = payload.into_inner();
    let update = ProfileUpdate::try_full(
        payload.email.as_deref(),
        payload.password.as_deref(),
        payload.name.as_deref(),
    )?;
    apply_update(&state, &caller, update).await
}

fn method_not_allowed(req: &HttpRequest) -> Error {
    Error::method_not_allowed(format!("Method \"{}\" not allowed.", req.method()))
}

/// Fallback for unsupported methods on public resources.
pub async fn reject_method(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(method_not_allowed(&req))
}

/// Fallback for unsupported methods on `/user/me/`; authentication runs
/// first so anonymous callers see 401.
pub async fn reject_method_authenticated(
    req: HttpRequest,
    _caller: AuthenticatedUser,
) -> ApiResult<HttpResponse> {
    Err(method_not_allowed(&req))
}

/// Register the account resources.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/user/create/")
            .route(web::post().to(create_user))
            .default_service(web::to(reject_method)),
    )
    .service(
        web::resource("/user/token/")
            .route(web::post().to(create_token))
            .default_service(web::to(reject_method)),
    )
    .service(
        web::resource("/user/me/")
            .route(web::get().to(current_user))
            .route(web::patch().to(patch_current_user))
            .route(web::put().to(replace_current_user))
            .default_service(web::to(reject_method_authenticated)),
    );
}
