//! Module `state`
//!
//! Defines the externally visible [`SessionState`] and the internal session
//! record it is derived from, together with the cancel handles of in-flight
//! operations.

use futures_util::future::AbortHandle;
use std::fmt;

use crate::profile::Profile;

/// Identifies one dispatched operation. Completions carry it so that results
/// of superseded operations can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperationId(u64);

impl OperationId {
    pub(crate) fn first() -> Self {
        Self(1)
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Cancel handle of an in-flight operation.
#[derive(Debug)]
pub struct OperationHandle {
    id: OperationId,
    abort: AbortHandle,
}

impl OperationHandle {
    pub(crate) fn new(id: OperationId, abort: AbortHandle) -> Self {
        Self { id, abort }
    }

    pub fn id(&self) -> OperationId {
        self.id
    }

    /// Aborts the underlying task. Takes effect immediately: a completion that
    /// was already queued is discarded by its id check.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub fn is_cancelled(&self) -> bool {
        self.abort.is_aborted()
    }
}

/// The session state observed by the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    LoggedOut,
    LoggingIn,
    SigningUp,
    LoggedIn(Profile),
}

impl SessionState {
    /// Returns `true` while a login or sign-up is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, SessionState::LoggingIn | SessionState::SigningUp)
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            SessionState::LoggedIn(profile) => Some(profile),
            _ => None,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::LoggedOut => write!(f, "logged out"),
            SessionState::LoggingIn => write!(f, "logging in"),
            SessionState::SigningUp => write!(f, "signing up"),
            SessionState::LoggedIn(profile) => write!(f, "logged in as {}", profile.username),
        }
    }
}

/// Internal session record.
///
/// Only the constructors below create values, so at most one handle is ever
/// set and a profile is only held when no operation is in flight.
#[derive(Debug, Default)]
pub(crate) struct SessionData {
    login: Option<OperationHandle>,
    sign_up: Option<OperationHandle>,
    profile: Option<Profile>,
}

impl SessionData {
    pub(crate) fn logged_out() -> Self {
        Self::default()
    }

    pub(crate) fn logging_in(handle: OperationHandle) -> Self {
        Self {
            login: Some(handle),
            ..Self::default()
        }
    }

    pub(crate) fn signing_up(handle: OperationHandle) -> Self {
        Self {
            sign_up: Some(handle),
            ..Self::default()
        }
    }

    pub(crate) fn logged_in(profile: Profile) -> Self {
        Self {
            profile: Some(profile),
            ..Self::default()
        }
    }

    /// Derives the visible state. Precedence: login, sign-up, profile.
    pub(crate) fn state(&self) -> SessionState {
        if self.login.is_some() {
            SessionState::LoggingIn
        } else if self.sign_up.is_some() {
            SessionState::SigningUp
        } else if let Some(profile) = &self.profile {
            SessionState::LoggedIn(profile.clone())
        } else {
            SessionState::LoggedOut
        }
    }

    // --- Accessors ---

    pub(crate) fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    /// Returns `true` if `id` is the login currently in flight.
    pub(crate) fn is_current_login(&self, id: OperationId) -> bool {
        self.login.as_ref().is_some_and(|h| h.id() == id)
    }

    /// Returns `true` if `id` is the sign-up currently in flight.
    pub(crate) fn is_current_sign_up(&self, id: OperationId) -> bool {
        self.sign_up.as_ref().is_some_and(|h| h.id() == id)
    }

    pub(crate) fn pending(&self) -> Option<&OperationHandle> {
        self.login.as_ref().or(self.sign_up.as_ref())
    }

    // --- Mutators ---

    /// Cancels whichever operation is in flight and forgets its handle.
    /// Returns the id of the cancelled operation.
    pub(crate) fn cancel_pending(&mut self) -> Option<OperationId> {
        let handle = self.login.take().or_else(|| self.sign_up.take())?;
        handle.cancel();
        Some(handle.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(id: u64) -> OperationHandle {
        let (abort, _registration) = AbortHandle::new_pair();
        OperationHandle::new(OperationId(id), abort)
    }

    fn profile() -> Profile {
        Profile::new("alice", 0.0, 0.5, 1.0).unwrap()
    }

    #[test]
    fn test_derived_states() {
        assert_eq!(SessionData::logged_out().state(), SessionState::LoggedOut);
        assert_eq!(SessionData::logging_in(handle(1)).state(), SessionState::LoggingIn);
        assert_eq!(SessionData::signing_up(handle(1)).state(), SessionState::SigningUp);
        assert_eq!(
            SessionData::logged_in(profile()).state(),
            SessionState::LoggedIn(profile())
        );
    }

    #[test]
    fn test_handle_takes_precedence_over_stale_profile() {
        let data = SessionData {
            login: Some(handle(2)),
            sign_up: None,
            profile: Some(profile()),
        };
        assert_eq!(data.state(), SessionState::LoggingIn);

        let data = SessionData {
            login: None,
            sign_up: Some(handle(3)),
            profile: Some(profile()),
        };
        assert_eq!(data.state(), SessionState::SigningUp);
    }

    #[test]
    fn test_cancel_pending() {
        let mut data = SessionData::logging_in(handle(7));
        assert!(data.is_current_login(OperationId(7)));
        assert!(!data.is_current_login(OperationId(8)));
        assert!(!data.is_current_sign_up(OperationId(7)));

        let pending = data.pending().map(|h| h.id());
        assert_eq!(pending, Some(OperationId(7)));

        assert_eq!(data.cancel_pending(), Some(OperationId(7)));
        assert!(data.pending().is_none());
        assert_eq!(data.state(), SessionState::LoggedOut);
        assert_eq!(data.cancel_pending(), None);
    }

    #[test]
    fn test_cancel_marks_handle_aborted() {
        let h = handle(1);
        assert!(!h.is_cancelled());
        h.cancel();
        assert!(h.is_cancelled());
    }

    #[test]
    fn test_operation_ids_increase() {
        let first = OperationId::first();
        assert!(first.next() > first);
        assert_eq!(first.next().to_string(), "#2");
    }
}
