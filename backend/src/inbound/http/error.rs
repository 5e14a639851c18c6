//! Renders domain errors as JSON HTTP responses.
//!
//! Status codes follow [`ErrorCode`]. Internal failures are logged in full
//! and reach the client only as a generic message with the trace id.
//!
//! Validation failures are also flattened into the body: each failing field
//! maps to its list of messages, and credential failures appear under
//! `non_field_errors`, alongside the `code`/`message` envelope.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::{Map, Value, json};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for handlers that fail with a domain [`Error`].
pub type ApiResult<T> = Result<T, Error>;

/// Scheme advertised in `WWW-Authenticate` on 401 responses.
pub const AUTH_SCHEME: &str = "Token";

const INTERNAL_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Body sent to the client for `error`.
fn public_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    error!(
        code = %error.code(),
        message = error.message(),
        trace_id = ?error.trace_id(),
        "request failed"
    );
    match error.trace_id() {
        Some(id) => Error::internal(INTERNAL_MESSAGE).with_trace_id(id),
        None => Error::internal(INTERNAL_MESSAGE),
    }
}

fn messages_of(violations: &Value) -> Value {
    match violations {
        Value::Array(entries) => entries
            .iter()
            .map(|entry| entry.get("message").cloned().unwrap_or_else(|| entry.clone()))
            .collect(),
        other => other.clone(),
    }
}

/// JSON body for `error`: the envelope plus top-level field and non-field
/// messages lifted out of `details`.
fn response_body(error: &Error) -> Value {
    let view = public_view(error);
    let mut body = match serde_json::to_value(&view) {
        Ok(Value::Object(map)) => map,
        _ => Map::from_iter([
            ("code".to_owned(), json!(view.code())),
            ("message".to_owned(), json!(view.message())),
        ]),
    };
    let Some(details) = view.details() else {
        return Value::Object(body);
    };
    if let Some(Value::Object(fields)) = details.get("field_errors") {
        for (field, violations) in fields {
            body.entry(field.clone())
                .or_insert_with(|| messages_of(violations));
        }
    }
    if let Some(messages) = details.get("non_field_errors") {
        body.entry("non_field_errors")
            .or_insert_with(|| messages.clone());
    }
    Value::Object(body)
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        response.insert_header(ContentType::json());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id));
        }
        if self.code() == ErrorCode::Unauthorized {
            response.insert_header((header::WWW_AUTHENTICATE, AUTH_SCHEME));
        }
        response.json(response_body(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced in handler");
        Self::internal(INTERNAL_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
