//! Tests for the domain error payload and trace propagation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case(Error::unauthorized("no token"), ErrorCode::Unauthorized)]
#[case(Error::not_found("missing"), ErrorCode::NotFound)]
#[case(Error::method_not_allowed("nope"), ErrorCode::MethodNotAllowed)]
#[case(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable)]
#[case(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
#[case(ErrorCode::InvalidRequest)]
#[case(ErrorCode::Unauthorized)]
#[case(ErrorCode::NotFound)]
#[case(ErrorCode::MethodNotAllowed)]
#[case(ErrorCode::ServiceUnavailable)]
#[case(ErrorCode::InternalError)]
fn as_str_matches_serialised_code(#[case] code: ErrorCode) {
    let value = serde_json::to_value(code).expect("serialise code");
    assert_eq!(value, json!(code.as_str()));
    assert_eq!(code.to_string(), code.as_str());
}

#[rstest]
fn new_has_no_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[rstest]
#[tokio::test]
async fn new_captures_trace_id_in_scope(expected_trace_id: String) {
    let trace_id: TraceId = expected_trace_id
        .parse()
        .expect("fixtures provide a valid UUID");
    let error = TraceId::scope(trace_id, async move { Error::internal("boom") }).await;

    assert_eq!(error.trace_id(), Some(expected_trace_id.as_str()));
}

#[rstest]
fn serialises_camel_case_and_skips_empty_fields() {
    let error = Error::invalid_request("bad");
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({ "code": "invalid_request", "message": "bad" })
    );
}

#[rstest]
fn round_trips_details_and_trace_id(expected_trace_id: String) {
    let error = Error::invalid_request("bad")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({ "field_errors": { "email": [] } }));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value.get("traceId").and_then(serde_json::Value::as_str),
        Some(expected_trace_id.as_str())
    );

    let decoded: Error = serde_json::from_value(value).expect("deserialise error");
    assert_eq!(decoded, error);
}

#[rstest]
fn accepts_snake_case_trace_id_alias() {
    let decoded: Error = serde_json::from_value(json!({
        "code": "unauthorized",
        "message": "Invalid token.",
        "trace_id": TRACE_ID,
    }))
    .expect("alias accepted");
    assert_eq!(decoded.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn rejects_unknown_fields() {
    let result: Result<Error, _> = serde_json::from_value(json!({
        "code": "unauthorized",
        "message": "x",
        "extra": true,
    }));
    assert!(result.is_err());
}

#[rstest]
fn display_uses_message() {
    assert_eq!(Error::not_found("missing").to_string(), "missing");
}
