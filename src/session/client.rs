//! Module `client`
//!
//! Defines [`SessionClient`], the login/sign-up/logout state machine.
//!
//! The client is confined to one control loop. Commands and the
//! `process_*` methods must all be called from that loop; the type is neither
//! `Send` nor `Sync` and performs no locking. Network work runs on spawned
//! tokio tasks whose results are queued on a channel and only applied when the
//! loop calls [`SessionClient::process_next`] or
//! [`SessionClient::process_pending`]. Commands and construction therefore
//! require a running tokio runtime.

use futures_util::future::{AbortHandle, AbortRegistration, Abortable};
use log::{debug, info, warn};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use super::broadcast::{Broadcaster, Subscription};
use super::events::{LoginFailed, SignUpFailed};
use super::operations::{self, Completion, DEFAULT_TIMEOUT};
use super::state::{OperationHandle, OperationId, SessionData, SessionState};
use crate::profile::Profile;
use crate::service::IdentityService;
use crate::store::LocalTokenStore;

pub struct SessionClient {
    store: Box<dyn LocalTokenStore>,
    service: Arc<dyn IdentityService>,
    timeout: Duration,

    data: SessionData,
    last_state: SessionState,
    next_id: OperationId,

    completions_tx: UnboundedSender<Completion>,
    completions_rx: UnboundedReceiver<Completion>,

    states: Broadcaster<SessionState>,
    login_failures: Broadcaster<LoginFailed>,
    sign_up_failures: Broadcaster<SignUpFailed>,
}

impl SessionClient {
    /// Creates a client with the default 10 second operation timeout.
    ///
    /// If `store` holds a token, it is cleared right away and a profile fetch
    /// with it is dispatched; the client is `LoggingIn` until that resolves.
    pub fn new(store: impl LocalTokenStore + 'static, service: Arc<dyn IdentityService>) -> Self {
        Self::with_timeout(store, service, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        store: impl LocalTokenStore + 'static,
        service: Arc<dyn IdentityService>,
        timeout: Duration,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();

        let mut client = Self {
            store: Box::new(store),
            service,
            timeout,
            data: SessionData::logged_out(),
            last_state: SessionState::LoggedOut,
            next_id: OperationId::first(),
            completions_tx,
            completions_rx,
            states: Broadcaster::new(),
            login_failures: Broadcaster::new(),
            sign_up_failures: Broadcaster::new(),
        };
        client.resume();
        client
    }

    // --------------------
    // Sensing
    // --------------------

    pub fn current_state(&self) -> SessionState {
        self.data.state()
    }

    /// The logged in user's profile, or `None` unless the state is `LoggedIn`.
    pub fn current_profile(&self) -> Option<&Profile> {
        self.data.profile()
    }

    /// Id of the login or sign-up currently in flight.
    pub fn pending_operation(&self) -> Option<OperationId> {
        self.data.pending().map(OperationHandle::id)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Stream of session states. The first element is the current state;
    /// after that, every change in commit order. Repeated states are collapsed.
    pub fn state_stream(&self) -> Subscription<SessionState> {
        self.states.subscribe_with(self.current_state())
    }

    /// Failed login attempts emitted after subscribing.
    pub fn login_failures(&self) -> Subscription<LoginFailed> {
        self.login_failures.subscribe()
    }

    /// Failed sign-up attempts emitted after subscribing.
    pub fn sign_up_failures(&self) -> Subscription<SignUpFailed> {
        self.sign_up_failures.subscribe()
    }

    // --------------------
    // Actuating
    // --------------------

    /// Logs in with the given credentials, superseding any operation in flight.
    ///
    /// The state becomes `LoggingIn` before this returns. It later moves to
    /// `LoggedIn`, or to `LoggedOut` with a [`LoginFailed`] event.
    pub fn login(&mut self, username: impl Into<String>, password: impl Into<String>) {
        let username = username.into();
        let password = password.into();
        self.supersede();

        info!("Logging in as {}", username);
        let id = self.next_operation_id();
        let (abort, registration) = AbortHandle::new_pair();
        self.commit(SessionData::logging_in(OperationHandle::new(id, abort)));

        let operation = operations::login(
            Arc::clone(&self.service),
            id,
            username,
            password,
            self.timeout,
        );
        self.spawn(registration, operation);
    }

    /// Registers `profile`, then logs in with the same credentials.
    ///
    /// The state becomes `SigningUp` before this returns. A failed
    /// registration moves to `LoggedOut` with a [`SignUpFailed`] event; a failed
    /// follow-up login only reports [`LoginFailed`].
    pub fn sign_up(&mut self, profile: Profile, password: impl Into<String>) {
        let password = password.into();
        self.supersede();

        info!("Signing up as {}", profile.username);
        let id = self.next_operation_id();
        let (abort, registration) = AbortHandle::new_pair();
        self.commit(SessionData::signing_up(OperationHandle::new(id, abort)));

        let operation = operations::sign_up(
            Arc::clone(&self.service),
            id,
            profile,
            password,
            self.timeout,
        );
        self.spawn(registration, operation);
    }

    /// Cancels any operation in flight, moves to `LoggedOut` and clears the
    /// stored token.
    pub fn logout(&mut self) {
        self.supersede();
        info!("Logging out");
        self.commit(SessionData::logged_out());
        self.store.set_token(None);
    }

    // --------------------
    // Completion delivery
    // --------------------

    /// Waits for the next operation result and applies it.
    ///
    /// Cancel safe: a result is only taken off the queue once it is applied.
    pub async fn process_next(&mut self) {
        // The client owns a sender, so the queue never closes.
        if let Some(completion) = self.completions_rx.recv().await {
            self.apply(completion);
        }
    }

    /// Applies every result that is already queued without waiting.
    /// Returns how many were taken off the queue, including discarded ones.
    pub fn process_pending(&mut self) -> usize {
        let mut processed = 0;
        while let Ok(completion) = self.completions_rx.try_recv() {
            self.apply(completion);
            processed += 1;
        }
        processed
    }

    // --------------------
    // Internals
    // --------------------

    /// Consumes a stored token once and tries to resume its session.
    fn resume(&mut self) {
        let Some(token) = self.store.token() else {
            return;
        };
        self.store.set_token(None);

        info!("Resuming session from stored token");
        let id = self.next_operation_id();
        let (abort, registration) = AbortHandle::new_pair();
        self.commit(SessionData::logging_in(OperationHandle::new(id, abort)));

        let operation = operations::resume(Arc::clone(&self.service), id, token, self.timeout);
        self.spawn(registration, operation);
    }

    fn apply(&mut self, completion: Completion) {
        let id = completion.id();
        let current = match &completion {
            Completion::Login { .. } | Completion::Resume { .. } => self.data.is_current_login(id),
            Completion::SignUp { .. } => self.data.is_current_sign_up(id),
        };
        if !current {
            debug!("Discarding result of superseded operation {}", id);
            return;
        }

        match completion {
            Completion::Login {
                username,
                password,
                result,
                ..
            } => match result {
                Ok((profile, token)) => {
                    info!("Logged in as {}", profile.username);
                    self.store.set_token(Some(token));
                    self.commit(SessionData::logged_in(profile));
                }
                Err(error) => {
                    warn!("Login as {} failed: {}", username, error);
                    self.commit(SessionData::logged_out());
                    self.login_failures.emit(&LoginFailed {
                        username,
                        password,
                        error,
                    });
                }
            },
            Completion::SignUp {
                profile,
                password,
                result,
                ..
            } => match result {
                Ok(()) => {
                    info!("Signed up as {}", profile.username);
                    self.login(profile.username, password);
                }
                Err(error) => {
                    warn!("Sign up as {} failed: {}", profile.username, error);
                    self.commit(SessionData::logged_out());
                    self.sign_up_failures.emit(&SignUpFailed {
                        profile,
                        password,
                        error,
                    });
                }
            },
            Completion::Resume { token, result, .. } => match result {
                Ok(profile) => {
                    info!("Resumed session of {}", profile.username);
                    self.store.set_token(Some(token));
                    self.commit(SessionData::logged_in(profile));
                }
                Err(error) => {
                    info!("Stored session could not be resumed: {}", error);
                    self.commit(SessionData::logged_out());
                }
            },
        }
    }

    /// Replaces the session record and notifies state subscribers if the
    /// visible state changed.
    fn commit(&mut self, data: SessionData) {
        self.data = data;
        let state = self.data.state();
        if state != self.last_state {
            debug!("Session state: {} -> {}", self.last_state, state);
            self.last_state = state.clone();
            self.states.emit(&state);
        }
    }

    fn supersede(&mut self) {
        if let Some(id) = self.data.cancel_pending() {
            debug!("Cancelled operation {}", id);
        }
    }

    fn next_operation_id(&mut self) -> OperationId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    fn spawn<F>(&self, registration: AbortRegistration, operation: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let completions = self.completions_tx.clone();
        tokio::spawn(async move {
            if let Ok(completion) = Abortable::new(operation, registration).await {
                let _ = completions.send(completion);
            }
        });
    }
}

impl Drop for SessionClient {
    fn drop(&mut self) {
        self.supersede();
    }
}
