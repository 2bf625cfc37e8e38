//! In-memory token store
//!
//! Keeps the token in a shared slot. Clones observe the same slot, which lets a
//! caller hand one copy to the session client and keep another for inspection.

use std::sync::{Arc, Mutex, PoisonError};

use super::LocalTokenStore;

#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(token.into()))),
        }
    }
}

impl LocalTokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&mut self, token: Option<String>) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = token;
    }
}
