//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod email;
pub mod password;
pub mod post;
pub mod user;
pub mod validation;

pub use email::EmailAddress;
pub use password::Password;
pub use post::{PostContent, PostTitle};
pub use user::{FullName, Username};
pub use validation::ValidationError;
