//! Error envelope returned by every account operation.
//!
//! The envelope knows nothing about HTTP; `inbound::http::error` turns it
//! into a status code and JSON body.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::TraceId;

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Failure category shared by every adapter.
///
/// Serialised in snake_case; the HTTP adapter derives the status code from
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed body or failed field validation.
    InvalidRequest,
    /// Missing, malformed or unknown credentials.
    Unauthorized,
    NotFound,
    /// The resource exists but not for this method.
    MethodNotAllowed,
    /// The user store cannot be reached.
    ServiceUnavailable,
    InternalError,
}

impl ErrorCode {
    /// Wire name of the code, as it appears in the `code` field.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! shorthand_constructors {
    ($($name:ident => $code:ident),* $(,)?) => {
        $(
            #[doc = concat!("Shorthand for [`ErrorCode::", stringify!($code), "`].")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )*
    };
}

/// Error payload: a code, a message for humans, and optional structured
/// details such as per-field validation failures.
///
/// The trace identifier of the surrounding request, if any, is recorded at
/// construction.
///
/// # Examples
/// ```
/// use user_api::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::MethodNotAllowed, "Method \"POST\" not allowed.");
/// assert_eq!(err.code().as_str(), "method_not_allowed");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Error {
    #[schema(example = "invalid_request")]
    code: ErrorCode,
    #[schema(example = "validation failed")]
    message: String,
    #[serde(skip_serializing_if = "Option::is_none", alias = "trace_id")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Structured context such as `field_errors` or `non_field_errors`.
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Build an error, recording the trace identifier in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured context such as `field_errors`.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Override the recorded trace identifier.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details.
    ///
    /// ```
    /// use serde_json::json;
    /// use user_api::domain::Error;
    ///
    /// let err = Error::invalid_request("Invalid input.")
    ///     .with_details(json!({ "field_errors": { "name": [] } }));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    shorthand_constructors! {
        invalid_request => InvalidRequest,
        unauthorized => Unauthorized,
        not_found => NotFound,
        method_not_allowed => MethodNotAllowed,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests;
