//! User data model.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use super::validation::FieldViolation;

/// Maximum length of an email address, in characters.
pub const EMAIL_MAX: usize = 255;
/// Maximum length of a display name, in characters.
pub const DISPLAY_NAME_MAX: usize = 255;

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(Uuid);

impl UserId {
    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = concat!(
            r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
            r"@(?:[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
        );
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Normalised email address used as the login identity.
///
/// ## Invariants
/// - Surrounding whitespace is removed.
/// - The domain part is lower-case; the local part keeps its case.
/// - At most [`EMAIL_MAX`] characters.
///
/// # Examples
/// ```
/// use user_api::domain::EmailAddress;
///
/// let email = EmailAddress::new("  Ada@Example.COM ").expect("valid email");
/// assert_eq!(email.as_ref(), "Ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: &str) -> Result<Self, FieldViolation> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FieldViolation::Blank);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(FieldViolation::TooLong { max: EMAIL_MAX });
        }

        let (local, domain) = trimmed
            .rsplit_once('@')
            .ok_or(FieldViolation::InvalidEmail)?;
        let normalised = format!("{local}@{}", domain.to_lowercase());
        if !email_regex().is_match(&normalised) {
            return Err(FieldViolation::InvalidEmail);
        }

        Ok(Self(normalised))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Validate a display name, trimming surrounding whitespace.
    pub fn new(raw: &str) -> Result<Self, FieldViolation> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(FieldViolation::Blank);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(FieldViolation::TooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Registered user as seen by callers. The password hash never appears
/// here; see [`crate::domain::StoredCredentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: EmailAddress,
    name: DisplayName,
}

impl User {
    /// Build a new [`User`] from validated components.
    pub fn new(id: UserId, email: EmailAddress, name: DisplayName) -> Self {
        Self { id, email, name }
    }

    /// Build a [`User`] from raw strings, as read back from storage.
    pub fn try_from_parts(id: Uuid, email: &str, name: &str) -> Result<Self, FieldViolation> {
        Ok(Self::new(
            UserId::from_uuid(id),
            EmailAddress::new(email)?,
            DisplayName::new(name)?,
        ))
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login email.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Display name.
    pub fn name(&self) -> &DisplayName {
        &self.name
    }
}

#[cfg(test)]
mod tests;
