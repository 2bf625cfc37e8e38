//! Failure events
//!
//! Records emitted when a login or sign-up attempt fails. They are broadcast
//! to subscribers and never stored by the session client.

use std::fmt;

use crate::error::ClientError;
use crate::profile::Profile;

/// A login attempt failed.
///
/// `error` is `NoConnection`, `Unauthorized` or `Unknown`.
#[derive(Clone, PartialEq)]
pub struct LoginFailed {
    pub username: String,
    pub password: String,
    pub error: ClientError,
}

/// A sign-up attempt failed.
///
/// `error` is `NoConnection`, `UsernameUnavailable` or `Unknown`.
#[derive(Clone, PartialEq)]
pub struct SignUpFailed {
    pub profile: Profile,
    pub password: String,
    pub error: ClientError,
}

// Passwords are kept out of debug output.

impl fmt::Debug for LoginFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginFailed")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("error", &self.error)
            .finish()
    }
}

impl fmt::Debug for SignUpFailed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUpFailed")
            .field("profile", &self.profile)
            .field("password", &"<redacted>")
            .field("error", &self.error)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let event = LoginFailed {
            username: "bob".into(),
            password: "hunter2".into(),
            error: ClientError::Unauthorized,
        };
        let rendered = format!("{:?}", event);
        assert!(rendered.contains("bob"));
        assert!(rendered.contains("Unauthorized"));
        assert!(!rendered.contains("hunter2"));
    }
}
