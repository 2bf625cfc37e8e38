//! User profiles
//!
//! Defines the authenticated user's data: a username plus three skill levels
//! bounded to `[0.0, 1.0]`.

pub mod validation;

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use validation::{validate_skill, validate_username};

/// Data describing a user, either registered or about to be.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub skill_rx_java: f32,
    pub skill_docker: f32,
    pub skill_kotlin: f32,
}

impl Profile {
    /// Builds a validated profile.
    pub fn new(
        username: impl Into<String>,
        skill_rx_java: f32,
        skill_docker: f32,
        skill_kotlin: f32,
    ) -> Result<Self, ProfileError> {
        let profile = Self {
            username: username.into(),
            skill_rx_java,
            skill_docker,
            skill_kotlin,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Re-checks every field, e.g. after deserializing a value from the network.
    pub fn validate(&self) -> Result<(), ProfileError> {
        validate_username(&self.username)?;
        validate_skill("rx_java", self.skill_rx_java)?;
        validate_skill("docker", self.skill_docker)?;
        validate_skill("kotlin", self.skill_kotlin)?;
        Ok(())
    }
}
