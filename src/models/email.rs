//! Email address validation

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for email addresses
const MAX_EMAIL_LEN: usize = 100;

/// Syntactic email check: one `@`, no whitespace, dotted domain.
/// Deliverability is not our problem; this only rejects obvious garbage.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("invalid email regex"));

/// Validated email address
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new email address.
    ///
    /// # Example
    /// ```
    /// use miniblog::models::EmailAddress;
    ///
    /// assert!(EmailAddress::new("john@example.com").is_ok());
    /// assert!(EmailAddress::new("not-an-email").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "email" });
        }

        if s.chars().count() > MAX_EMAIL_LEN {
            return Err(ValidationError::TooLong {
                field: "email",
                max: MAX_EMAIL_LEN,
            });
        }

        if !EMAIL_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "email",
                reason: "must be a valid email address",
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
