//! Session management
//!
//! Handles the login/sign-up/logout state machine, its observable state and
//! failure events, and the supervision of in-flight identity operations.

pub mod broadcast;
pub mod client;
pub mod events;
pub mod operations;
pub mod state;

pub use broadcast::{Broadcaster, Subscription};
pub use client::SessionClient;
pub use events::{LoginFailed, SignUpFailed};
pub use operations::DEFAULT_TIMEOUT;
pub use state::{OperationHandle, OperationId, SessionState};
