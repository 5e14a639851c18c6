//! Validated account commands: registration and profile updates.
//!
//! Constructors take the raw optional fields of a request body and either
//! return a fully validated command or every field violation at once.

use super::password::Password;
use super::user::{DisplayName, EmailAddress};
use super::validation::{FieldErrors, required};

/// Registration request for a new account.
///
/// # Examples
/// ```
/// use user_api::domain::RegistrationRequest;
///
/// let request = RegistrationRequest::try_from_parts(
///     Some("ada@example.com"),
///     Some("testpass123"),
///     Some("Ada"),
/// )
/// .expect("valid registration");
/// assert_eq!(request.name().as_ref(), "Ada");
///
/// let errors = RegistrationRequest::try_from_parts(Some("bad"), Some("pw"), None)
///     .expect_err("three invalid fields");
/// assert_eq!(errors.fields().count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    email: EmailAddress,
    password: Password,
    name: DisplayName,
}

impl RegistrationRequest {
    pub fn try_from_parts(
        email: Option<&str>,
        password: Option<&str>,
        name: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = errors.collect("email", required(email).and_then(EmailAddress::new));
        let password = errors.collect(
            "password",
            required(password).and_then(Password::new_secret),
        );
        let name = errors.collect("name", required(name).and_then(DisplayName::new));

        match (email, password, name) {
            (Some(email), Some(password), Some(name)) => Ok(Self {
                email,
                password,
                name,
            }),
            _ => Err(errors),
        }
    }

    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn name(&self) -> &DisplayName {
        &self.name
    }
}

/// Changes to apply to the authenticated user's profile.
///
/// Absent fields are left untouched. A full replacement is a profile update
/// where every field is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    email: Option<EmailAddress>,
    password: Option<Password>,
    name: Option<DisplayName>,
}

impl ProfileUpdate {
    /// Validate a partial update; only present fields are checked.
    pub fn try_partial(
        email: Option<&str>,
        password: Option<&str>,
        name: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        let email = email.and_then(|raw| errors.collect("email", EmailAddress::new(raw)));
        let password =
            password.and_then(|raw| errors.collect("password", Password::new_secret(raw)));
        let name = name.and_then(|raw| errors.collect("name", DisplayName::new(raw)));

        if errors.is_empty() {
            Ok(Self {
                email,
                password,
                name,
            })
        } else {
            Err(errors)
        }
    }

    /// Validate a full replacement; every field is required.
    pub fn try_full(
        email: Option<&str>,
        password: Option<&str>,
        name: Option<&str>,
    ) -> Result<Self, FieldErrors> {
        RegistrationRequest::try_from_parts(email, password, name).map(|request| Self {
            email: Some(request.email),
            password: Some(request.password),
            name: Some(request.name),
        })
    }

    pub fn email(&self) -> Option<&EmailAddress> {
        self.email.as_ref()
    }

    pub fn password(&self) -> Option<&Password> {
        self.password.as_ref()
    }

    pub fn name(&self) -> Option<&DisplayName> {
        self.name.as_ref()
    }

    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none() && self.name.is_none()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::FieldViolation;
    use rstest::rstest;

    #[rstest]
    fn registration_collects_every_violation() {
        let errors = RegistrationRequest::try_from_parts(Some("nope"), Some("pw"), Some("  "))
            .expect_err("all fields invalid");

        assert_eq!(errors.violations("email"), &[FieldViolation::InvalidEmail]);
        assert_eq!(
            errors.violations("password"),
            &[FieldViolation::TooShort { min: 5 }]
        );
        assert_eq!(errors.violations("name"), &[FieldViolation::Blank]);
    }

    #[rstest]
    #[case(None, Some("testpass123"), Some("Ada"), "email")]
    #[case(Some("ada@example.com"), None, Some("Ada"), "password")]
    #[case(Some("ada@example.com"), Some("testpass123"), None, "name")]
    fn registration_requires_each_field(
        #[case] email: Option<&str>,
        #[case] password: Option<&str>,
        #[case] name: Option<&str>,
        #[case] missing: &str,
    ) {
        let errors =
            RegistrationRequest::try_from_parts(email, password, name).expect_err("missing field");
        assert_eq!(errors.violations(missing), &[FieldViolation::Required]);
    }

    #[rstest]
    fn partial_update_skips_absent_fields() {
        let update =
            ProfileUpdate::try_partial(None, Some("newpassword123"), Some("New Name")).expect("valid");

        assert!(update.email().is_none());
        assert_eq!(update.name().map(ToString::to_string), Some("New Name".to_owned()));
        assert_eq!(
            update.password().map(Password::expose),
            Some("newpassword123")
        );
        assert!(!update.is_empty());
    }

    #[rstest]
    fn empty_partial_update_is_empty() {
        let update = ProfileUpdate::try_partial(None, None, None).expect("nothing to validate");
        assert!(update.is_empty());
    }

    #[rstest]
    fn partial_update_validates_present_fields() {
        let errors = ProfileUpdate::try_partial(Some("bad"), Some("pw"), None)
            .expect_err("invalid fields");
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["email", "password"]);
    }

    #[rstest]
    fn full_update_requires_all_fields() {
        let errors =
            ProfileUpdate::try_full(None, None, Some("Ada")).expect_err("missing fields");
        assert_eq!(errors.violations("email"), &[FieldViolation::Required]);
        assert_eq!(errors.violations("password"), &[FieldViolation::Required]);
    }
}
