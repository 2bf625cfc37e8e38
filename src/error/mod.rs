//! Error handling
//!
//! Defines error types and user-facing error copy for the session client.

pub mod handlers;
pub mod types;

pub use handlers::{Operation, describe};
pub use types::*;
