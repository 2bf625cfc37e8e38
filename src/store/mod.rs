//! Local token storage
//!
//! Defines the synchronous token store the session client persists its access
//! token into, plus in-memory and file-backed implementations.

pub mod file;
pub mod memory;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

/// Synchronous, durable storage for a single optional access token.
///
/// Implementations never fail from the caller's point of view: I/O problems
/// are logged and treated as an absent token or a lost write.
pub trait LocalTokenStore {
    /// Returns the stored token, if any.
    fn token(&self) -> Option<String>;

    /// Replaces the stored token. `None` clears it.
    fn set_token(&mut self, token: Option<String>);
}

impl<T: LocalTokenStore + ?Sized> LocalTokenStore for Box<T> {
    fn token(&self) -> Option<String> {
        (**self).token()
    }

    fn set_token(&mut self, token: Option<String>) {
        (**self).set_token(token)
    }
}
