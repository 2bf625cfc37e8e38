//! Profile validation
//!
//! Value and format checks applied to profile fields before they are sent to
//! the identity service.

use crate::error::ProfileError;

/// Maximum accepted username length.
pub const MAX_USERNAME_LENGTH: usize = 16;

/// Checks that a username is 1 to 16 characters of letters, digits or underscores.
pub fn validate_username(username: &str) -> Result<(), ProfileError> {
    let well_formed = !username.is_empty()
        && username.chars().count() <= MAX_USERNAME_LENGTH
        && username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');

    if well_formed {
        Ok(())
    } else {
        Err(ProfileError::InvalidUsername(username.to_string()))
    }
}

/// Checks that a skill level lies within `[0.0, 1.0]`. NaN is rejected.
pub fn validate_skill(name: &'static str, value: f32) -> Result<(), ProfileError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ProfileError::SkillOutOfRange { name, value })
    }
}
