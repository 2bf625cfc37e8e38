//! Error handlers
//!
//! Maps error kinds to user-facing copy.

use crate::error::types::ClientError;

/// The session operation a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Login,
    SignUp,
}

/// Returns the message shown to the user when `operation` fails with `error`.
pub fn describe(error: ClientError, operation: Operation) -> &'static str {
    match (operation, error) {
        (_, ClientError::NoConnection) => {
            "No connection. Check your network settings and try again."
        }
        (Operation::Login, ClientError::Unauthorized) => "Invalid username or password.",
        (Operation::SignUp, ClientError::Unauthorized) => {
            "The service refused the registration request."
        }
        (_, ClientError::UsernameUnavailable) => {
            "This username is already taken. Pick another one."
        }
        (Operation::Login, ClientError::Unknown) => {
            "There was a problem when logging in. Try again in a few seconds."
        }
        (Operation::SignUp, ClientError::Unknown) => {
            "There was a problem when signing up. Try again in a few seconds."
        }
    }
}
