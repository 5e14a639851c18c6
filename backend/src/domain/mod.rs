//! Domain primitives, ports and the account service.
//!
//! Purpose: Define strongly typed account entities used by the API and
//! persistence layers. Keep types immutable and document invariants in each
//! type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User (alias to `user::User`): account identity, email and name.
//! - UserAccountService: implementation of every driving port.

mod account;
mod auth;
mod auth_token;
pub mod error;
mod password;
pub mod ports;
mod trace_id;
pub mod user;
mod user_account_service;
mod validation;

pub use self::account::{ProfileUpdate, RegistrationRequest};
pub use self::auth::{CREDENTIALS_REJECTED, LoginCredentials, StoredCredentials};
pub use self::auth_token::{AuthToken, TOKEN_LEN};
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::password::{PASSWORD_MAX, PASSWORD_MIN, Password, PasswordHash, PasswordHashError};
pub use self::trace_id::TraceId;
pub use self::user::{DISPLAY_NAME_MAX, DisplayName, EMAIL_MAX, EmailAddress, User, UserId};
pub use self::user_account_service::UserAccountService;
pub use self::validation::{FieldErrors, FieldViolation, required};

