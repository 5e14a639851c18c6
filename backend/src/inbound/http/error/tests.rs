//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::method_not_allowed("nope"), StatusCode::METHOD_NOT_ALLOWED)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn json_of(response: HttpResponse) -> serde_json::Value {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("JSON body")
}

async fn body_of(response: HttpResponse) -> Error {
    serde_json::from_value(json_of(response).await).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_trace_id(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "secret": "x" }));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));

    let payload = body_of(response).await;
    assert_eq!(payload.message(), "Internal server error");
    assert!(payload.details().is_none());
    assert_eq!(payload.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::not_found("no such route").with_details(json!({ "path": "/nowhere" }));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());

    let payload = body_of(response).await;
    assert_eq!(payload, error);
}

#[rstest]
#[actix_web::test]
async fn field_errors_are_keyed_by_field_at_top_level() {
    let error = Error::invalid_request("validation failed").with_details(json!({
        "field_errors": {
            "email": [{ "code": "unique", "message": "user with this email already exists." }],
            "password": [{ "code": "min_length", "message": "too short" }]
        }
    }));

    let body = json_of(ResponseError::error_response(&error)).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["message"], "validation failed");
    assert_eq!(body["email"], json!(["user with this email already exists."]));
    assert_eq!(body["password"], json!(["too short"]));
    assert_eq!(body["details"]["field_errors"]["email"][0]["code"], "unique");
}

#[rstest]
#[actix_web::test]
async fn non_field_errors_are_lifted_to_top_level() {
    let error = Error::invalid_request("Unable to authenticate with provided credentials.")
        .with_details(json!({
            "non_field_errors": ["Unable to authenticate with provided credentials."],
            "code": "authentication"
        }));

    let body = json_of(ResponseError::error_response(&error)).await;
    assert_eq!(
        body["non_field_errors"],
        json!(["Unable to authenticate with provided credentials."])
    );
    assert_eq!(body["code"], "invalid_request");
}

#[rstest]
#[actix_web::test]
async fn field_named_like_envelope_key_does_not_replace_it() {
    let error = Error::invalid_request("validation failed").with_details(json!({
        "field_errors": { "message": [{ "code": "blank", "message": "required" }] }
    }));

    let body = json_of(ResponseError::error_response(&error)).await;
    assert_eq!(body["message"], "validation failed");
}

#[rstest]
fn unauthorized_responses_advertise_token_scheme() {
    let response = ResponseError::error_response(&Error::unauthorized("Invalid token."));
    assert_eq!(
        response
            .headers()
            .get(header::WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some(AUTH_SCHEME)
    );
}

#[rstest]
fn other_errors_omit_www_authenticate() {
    let response = ResponseError::error_response(&Error::not_found("missing"));
    assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
}
