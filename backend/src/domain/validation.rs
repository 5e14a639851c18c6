//! Field-level validation failures.
//!
//! Value constructors return a [`FieldViolation`]; request-level
//! constructors gather them per field into [`FieldErrors`] so clients see
//! every problem in one response.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Value, json};

use super::Error;

/// A single rule a field value broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldViolation {
    /// Field was absent or null.
    Required,
    /// Field was present but blank.
    Blank,
    /// Field is not a well-formed email address.
    InvalidEmail,
    /// Field is shorter than the minimum length.
    TooShort { min: usize },
    /// Field is longer than the maximum length.
    TooLong { max: usize },
    /// Another record already uses this value.
    Duplicate { entity: &'static str, field: &'static str },
}

impl FieldViolation {
    /// Stable machine-readable code for the violation.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Blank => "blank",
            Self::InvalidEmail => "invalid",
            Self::TooShort { .. } => "min_length",
            Self::TooLong { .. } => "max_length",
            Self::Duplicate { .. } => "unique",
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Required => write!(f, "This field is required."),
            Self::Blank => write!(f, "This field may not be blank."),
            Self::InvalidEmail => write!(f, "Enter a valid email address."),
            Self::TooShort { min } => {
                write!(f, "Ensure this field has at least {min} characters.")
            }
            Self::TooLong { max } => {
                write!(f, "Ensure this field has no more than {max} characters.")
            }
            Self::Duplicate { entity, field } => {
                write!(f, "{entity} with this {field} already exists.")
            }
        }
    }
}

impl std::error::Error for FieldViolation {}

/// Reject a missing value before field-specific rules run.
pub fn required(value: Option<&str>) -> Result<&str, FieldViolation> {
    value.ok_or(FieldViolation::Required)
}

/// Violations grouped by field name, in stable field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, Vec<FieldViolation>>);

impl FieldErrors {
    /// Start an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection holding a single violation.
    pub fn single(field: &'static str, violation: FieldViolation) -> Self {
        let mut errors = Self::new();
        errors.push(field, violation);
        errors
    }

    /// Record a violation against `field`.
    pub fn push(&mut self, field: &'static str, violation: FieldViolation) {
        self.0.entry(field).or_default().push(violation);
    }

    /// Keep a successfully parsed value, or record its violation.
    ///
    /// # Examples
    /// ```
    /// use user_api::domain::{DisplayName, FieldErrors};
    ///
    /// let mut errors = FieldErrors::new();
    /// let name = errors.collect("name", DisplayName::new("   "));
    /// assert!(name.is_none());
    /// assert_eq!(errors.violations("name").len(), 1);
    /// ```
    pub fn collect<T>(
        &mut self,
        field: &'static str,
        result: Result<T, FieldViolation>,
    ) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(violation) => {
                self.push(field, violation);
                None
            }
        }
    }

    /// Whether no violations were recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Violations recorded against `field`.
    pub fn violations(&self, field: &str) -> &[FieldViolation] {
        self.0.get(field).map_or(&[], Vec::as_slice)
    }

    /// Names of the fields that failed, in order.
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    fn to_details(&self) -> Value {
        let fields: serde_json::Map<String, Value> = self
            .0
            .iter()
            .map(|(field, violations)| {
                let entries = violations
                    .iter()
                    .map(|violation| {
                        json!({ "code": violation.code(), "message": violation.to_string() })
                    })
                    .collect();
                ((*field).to_owned(), Value::Array(entries))
            })
            .collect();
        json!({ "field_errors": fields })
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Self::invalid_request("validation failed").with_details(errors.to_details())
    }
}
