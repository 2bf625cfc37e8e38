pub mod config;
pub mod error;
pub mod profile;
pub mod service;
pub mod session;
pub mod shell;
pub mod store;
pub mod utils;

pub use error::{ClientError, ServiceError};
pub use profile::Profile;
pub use service::IdentityService;
pub use session::{LoginFailed, SessionClient, SessionState, SignUpFailed};
pub use store::LocalTokenStore;
