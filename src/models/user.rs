//! Username and full-name validation
//!
//! Usernames are case-normalized: whatever mix of cases the client sends,
//! the stored value is lowercase.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Username length bounds
const MIN_USERNAME_LEN: usize = 3;
const MAX_USERNAME_LEN: usize = 50;

/// Full-name maximum length
const MAX_FULL_NAME_LEN: usize = 100;

/// Username pattern: letters, digits, and underscores only
static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("invalid username regex"));

/// Validated username, normalized to lowercase
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a new username, validating and normalizing it.
    ///
    /// # Rules
    /// - 3 to 50 characters
    /// - Letters, digits, and underscores only
    /// - Normalized to lowercase
    ///
    /// # Example
    /// ```
    /// use miniblog::models::Username;
    ///
    /// assert_eq!(Username::new("John_Doe").unwrap().as_str(), "john_doe");
    /// assert!(Username::new("john doe").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }

        if s.len() < MIN_USERNAME_LEN {
            return Err(ValidationError::TooShort {
                field: "username",
                min: MIN_USERNAME_LEN,
            });
        }

        if s.len() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }

        if !USERNAME_RE.is_match(s) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "must contain only letters, digits, and underscores",
            });
        }

        Ok(Self(s.to_lowercase()))
    }

    /// Get the username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated full name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullName(String);

impl FullName {
    /// Create a new full name.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 100 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "full name" });
        }

        if trimmed.chars().count() > MAX_FULL_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "full name",
                max: MAX_FULL_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the full name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for FullName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_usernames() {
        assert!(Username::new("john_doe").is_ok());
        assert!(Username::new("abc").is_ok());
        assert!(Username::new("user123").is_ok());
        assert!(Username::new("___").is_ok());
    }

    #[test]
    fn normalizes_to_lowercase() {
        let name = Username::new("John_Doe").unwrap();
        assert_eq!(name.as_str(), "john_doe");

        let name = Username::new("ALLCAPS").unwrap();
        assert_eq!(name.as_str(), "allcaps");
    }

    #[test]
    fn rejects_invalid_characters() {
        assert!(matches!(
            Username::new("john-doe").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(matches!(
            Username::new("john doe").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
        assert!(matches!(
            Username::new("john@doe").unwrap_err(),
            ValidationError::InvalidFormat { .. }
        ));
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            Username::new("").unwrap_err(),
            ValidationError::Empty { .. }
        ));
    }

    #[test]
    fn length_bounds() {
        assert!(matches!(
            Username::new("ab").unwrap_err(),
            ValidationError::TooShort { min: 3, .. }
        ));

        let name_50 = "a".repeat(50);
        assert!(Username::new(&name_50).is_ok());

        let name_51 = "a".repeat(51);
        assert!(matches!(
            Username::new(&name_51).unwrap_err(),
            ValidationError::TooLong { max: 50, .. }
        ));
    }

    #[test]
    fn full_name_bounds() {
        assert!(FullName::new("John Doe").is_ok());
        assert!(FullName::new("J").is_ok());

        assert!(matches!(
            FullName::new("   ").unwrap_err(),
            ValidationError::Empty { .. }
        ));

        let name_101 = "a".repeat(101);
        assert!(matches!(
            FullName::new(&name_101).unwrap_err(),
            ValidationError::TooLong { max: 100, .. }
        ));
    }

    #[test]
    fn full_name_length_counts_characters_not_bytes() {
        // 60 two-byte characters is well within the 100-character bound
        let accented = "é".repeat(60);
        assert!(FullName::new(&accented).is_ok());

        let accented_101 = "é".repeat(101);
        assert!(matches!(
            FullName::new(&accented_101).unwrap_err(),
            ValidationError::TooLong { max: 100, .. }
        ));
    }

    #[test]
    fn full_name_trims_whitespace() {
        let name = FullName::new("  John Doe  ").unwrap();
        assert_eq!(name.as_str(), "John Doe");
    }
}
