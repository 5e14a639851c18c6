//! Tests for the domain user model.

use super::*;
use rstest::{fixture, rstest};

const VALID_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

#[fixture]
fn valid_uuid() -> Uuid {
    Uuid::parse_str(VALID_ID).expect("fixture UUID is valid")
}

#[rstest]
#[case("ada@example.com", "ada@example.com")]
#[case("  ada@example.com\n", "ada@example.com")]
#[case("Ada.Lovelace@EXAMPLE.Com", "Ada.Lovelace@example.com")]
#[case("first+tag@sub.example.org", "first+tag@sub.example.org")]
fn email_normalises_domain_and_whitespace(#[case] raw: &str, #[case] expected: &str) {
    let email = EmailAddress::new(raw).expect("valid email");
    assert_eq!(email.as_ref(), expected);
}

#[rstest]
#[case("", FieldViolation::Blank)]
#[case("   ", FieldViolation::Blank)]
#[case("no-at-sign", FieldViolation::InvalidEmail)]
#[case("ada@", FieldViolation::InvalidEmail)]
#[case("@example.com", FieldViolation::InvalidEmail)]
#[case("ada@localhost", FieldViolation::InvalidEmail)]
#[case("ada lovelace@example.com", FieldViolation::InvalidEmail)]
fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: FieldViolation) {
    assert_eq!(EmailAddress::new(raw), Err(expected));
}

#[rstest]
fn email_rejects_overlong_address() {
    let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX));
    assert_eq!(
        EmailAddress::new(&raw),
        Err(FieldViolation::TooLong { max: EMAIL_MAX })
    );
}

#[rstest]
#[case("Ada Lovelace", "Ada Lovelace")]
#[case("  Grace  ", "Grace")]
#[case("李小龍", "李小龍")]
fn display_name_trims(#[case] raw: &str, #[case] expected: &str) {
    let name = DisplayName::new(raw).expect("valid name");
    assert_eq!(name.as_ref(), expected);
}

#[rstest]
#[case("")]
#[case(" \t ")]
fn display_name_rejects_blank(#[case] raw: &str) {
    assert_eq!(DisplayName::new(raw), Err(FieldViolation::Blank));
}

#[rstest]
fn display_name_counts_characters_not_bytes() {
    let at_limit = "é".repeat(DISPLAY_NAME_MAX);
    assert!(DisplayName::new(&at_limit).is_ok());

    let over_limit = "é".repeat(DISPLAY_NAME_MAX + 1);
    assert_eq!(
        DisplayName::new(&over_limit),
        Err(FieldViolation::TooLong {
            max: DISPLAY_NAME_MAX
        })
    );
}

#[rstest]
fn user_from_parts_exposes_fields(valid_uuid: Uuid) {
    let user = User::try_from_parts(valid_uuid, "ada@example.com", "Ada").expect("valid user");

    assert_eq!(user.id().as_uuid(), &valid_uuid);
    assert_eq!(user.id().to_string(), VALID_ID);
    assert_eq!(user.email().as_ref(), "ada@example.com");
    assert_eq!(user.name().as_ref(), "Ada");
}

#[rstest]
fn user_from_parts_rejects_bad_email(valid_uuid: Uuid) {
    let result = User::try_from_parts(valid_uuid, "nope", "Ada");
    assert_eq!(result, Err(FieldViolation::InvalidEmail));
}

#[rstest]
fn random_ids_differ() {
    assert_ne!(UserId::random(), UserId::random());
}
