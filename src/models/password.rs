//! Password validation and hashing
//!
//! Plaintext never reaches the database layer: handlers construct a
//! `Password`, hash it, and only the argon2 hash string is stored.

use std::fmt;

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHasher};

use super::ValidationError;

/// Password length bounds
const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Validated plaintext password
#[derive(Clone)]
pub struct Password(String);

impl Password {
    /// Create a new password.
    ///
    /// # Rules
    /// - 8 to 128 characters
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        if s.is_empty() {
            return Err(ValidationError::Empty { field: "password" });
        }

        let chars = s.chars().count();

        if chars < MIN_PASSWORD_LEN {
            return Err(ValidationError::TooShort {
                field: "password",
                min: MIN_PASSWORD_LEN,
            });
        }

        if chars > MAX_PASSWORD_LEN {
            return Err(ValidationError::TooLong {
                field: "password",
                max: MAX_PASSWORD_LEN,
            });
        }

        Ok(Self(s.to_owned()))
    }

    /// Hash the password with argon2 and a fresh random salt.
    pub fn hash(&self) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        Ok(Argon2::default()
            .hash_password(self.0.as_bytes(), &salt)?
            .to_string())
    }
}

// Keep the plaintext out of logs and error output.
impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}
