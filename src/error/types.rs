//! Error types
//!
//! Defines the closed error taxonomy surfaced to the UI layer, the open fault
//! type returned by identity service collaborators, and profile validation errors.

use thiserror::Error;

/// Error kinds a session operation can fail with.
///
/// This set is closed: every fault raised while talking to the identity service
/// is normalized into one of these before it reaches session state or a failure event.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientError {
    /// No connection to the identity service
    #[error("no connection to the identity service")]
    NoConnection,
    /// Credentials or token were rejected
    #[error("unauthorized")]
    Unauthorized,
    /// Requested username is already registered
    #[error("username unavailable")]
    UsernameUnavailable,
    /// Any other communication fault, including timeouts
    #[error("unknown error")]
    Unknown,
}

/// Faults an identity service implementation may report.
///
/// Only `Rejected` carries a typed error kind; everything else collapses to
/// [`ClientError::Unknown`] on conversion.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ServiceError {
    #[error("rejected by service: {0}")]
    Rejected(ClientError),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("unexpected status code: {0}")]
    Status(u16),
    #[error("internal failure: {0}")]
    Internal(String),
}

impl From<ClientError> for ServiceError {
    fn from(error: ClientError) -> Self {
        ServiceError::Rejected(error)
    }
}

impl From<ServiceError> for ClientError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Rejected(kind) => kind,
            ServiceError::Transport(_)
            | ServiceError::Decode(_)
            | ServiceError::Status(_)
            | ServiceError::Internal(_) => ClientError::Unknown,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(error: serde_json::Error) -> Self {
        ServiceError::Decode(error.to_string())
    }
}

/// Profile validation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    #[error("invalid username: {0:?} (expected 1 to 16 letters, digits or underscores)")]
    InvalidUsername(String),
    #[error("skill {name} out of range: {value} (expected 0.0 to 1.0)")]
    SkillOutOfRange { name: &'static str, value: f32 },
}
