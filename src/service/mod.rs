//! Identity service collaborators
//!
//! Defines the asynchronous remote operations the session client relies on,
//! with an in-process implementation and an HTTP implementation.

pub mod http;
pub mod memory;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::profile::Profile;

pub use http::HttpIdentityService;
pub use memory::{MemoryIdentityService, Uncertainty};

/// Remote identity operations.
///
/// Typed rejections are reported as [`ServiceError::Rejected`]:
///
/// - `exchange_credentials`: `NoConnection`, `Unauthorized`, `Unknown`
/// - `fetch_profile`: `NoConnection`, `Unauthorized` (invalid or expired token), `Unknown`
/// - `register_profile`: `NoConnection`, `UsernameUnavailable`, `Unknown`
///
/// Any other variant is treated as an unknown failure by the session client.
#[async_trait]
pub trait IdentityService: Send + Sync {
    /// Exchanges a username/password pair for an access token.
    async fn exchange_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, ServiceError>;

    /// Fetches the profile the given access token belongs to.
    async fn fetch_profile(&self, token: &str) -> Result<Profile, ServiceError>;

    /// Registers a new profile protected by `password`.
    async fn register_profile(&self, profile: &Profile, password: &str)
    -> Result<(), ServiceError>;
}
