//! Identifiers, redacted secrets, and the bearer token model.

pub mod id;
pub mod secret;
pub mod token;

pub use id::*;
pub use secret::*;
pub use token::*;
