//! Post title and content validation

use super::ValidationError;

/// Title length bounds
const MIN_TITLE_LEN: usize = 5;
const MAX_TITLE_LEN: usize = 200;

/// Minimum content length; no upper bound
const MIN_CONTENT_LEN: usize = 10;

/// Validated post title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTitle(String);

impl PostTitle {
    /// Create a new post title.
    ///
    /// # Rules
    /// - 5 to 200 characters (after trimming whitespace)
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "title" });
        }

        let chars = trimmed.chars().count();

        if chars < MIN_TITLE_LEN {
            return Err(ValidationError::TooShort {
                field: "title",
                min: MIN_TITLE_LEN,
            });
        }

        if chars > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    /// Get the title as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PostTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated post content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostContent(String);

impl PostContent {
    /// Create new post content.
    ///
    /// # Rules
    /// - At least 10 characters, unbounded above
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "content" });
        }

        if s.chars().count() < MIN_CONTENT_LEN {
            return Err(ValidationError::TooShort {
                field: "content",
                min: MIN_CONTENT_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Get the content as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for PostContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
