//! Shared test doubles for driving `SessionClient` step by step.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

use session_client::error::{ClientError, ServiceError};
use session_client::profile::Profile;
use session_client::service::IdentityService;
use session_client::store::LocalTokenStore;

/// A call received by the scripted service.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Exchange { username: String, password: String },
    Fetch { token: String },
    Register { profile: Profile, password: String },
}

#[derive(Debug)]
pub enum Reply {
    Token(String),
    Profile(Profile),
    Registered,
}

/// A call waiting for the test to answer it.
#[derive(Debug)]
pub struct PendingCall {
    pub call: Call,
    reply: oneshot::Sender<Result<Reply, ServiceError>>,
}

impl PendingCall {
    /// Answers the call. Returns `false` if the caller is gone, i.e. the
    /// operation was cancelled.
    pub fn resolve(self, reply: Result<Reply, ServiceError>) -> bool {
        self.reply.send(reply).is_ok()
    }

    pub fn token(self, token: &str) -> bool {
        self.resolve(Ok(Reply::Token(token.to_string())))
    }

    pub fn profile(self, profile: Profile) -> bool {
        self.resolve(Ok(Reply::Profile(profile)))
    }

    pub fn registered(self) -> bool {
        self.resolve(Ok(Reply::Registered))
    }

    pub fn reject(self, kind: ClientError) -> bool {
        self.resolve(Err(ServiceError::Rejected(kind)))
    }

    pub fn is_cancelled(&self) -> bool {
        self.reply.is_closed()
    }
}

/// Identity service whose every call is handed to the test for resolution.
pub struct ScriptedService {
    calls: mpsc::UnboundedSender<PendingCall>,
}

impl ScriptedService {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<PendingCall>) {
        let (calls, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { calls }), rx)
    }

    async fn call(&self, call: Call) -> Result<Reply, ServiceError> {
        let (reply, rx) = oneshot::channel();
        self.calls
            .send(PendingCall { call, reply })
            .map_err(|_| ServiceError::Internal("test harness gone".into()))?;
        rx.await
            .map_err(|_| ServiceError::Internal("call dropped unanswered".into()))?
    }
}

#[async_trait]
impl IdentityService for ScriptedService {
    async fn exchange_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, ServiceError> {
        let call = Call::Exchange {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.call(call).await? {
            Reply::Token(token) => Ok(token),
            other => Err(ServiceError::Internal(format!("unexpected reply {:?}", other))),
        }
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, ServiceError> {
        let call = Call::Fetch {
            token: token.to_string(),
        };
        match self.call(call).await? {
            Reply::Profile(profile) => Ok(profile),
            other => Err(ServiceError::Internal(format!("unexpected reply {:?}", other))),
        }
    }

    async fn register_profile(
        &self,
        profile: &Profile,
        password: &str,
    ) -> Result<(), ServiceError> {
        let call = Call::Register {
            profile: profile.clone(),
            password: password.to_string(),
        };
        match self.call(call).await? {
            Reply::Registered => Ok(()),
            other => Err(ServiceError::Internal(format!("unexpected reply {:?}", other))),
        }
    }
}

/// Token store that records every write.
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    token: Arc<Mutex<Option<String>>>,
    writes: Arc<Mutex<Vec<Option<String>>>>,
}

impl RecordingStore {
    pub fn with_token(token: &str) -> Self {
        let store = Self::default();
        *store.token.lock().unwrap() = Some(token.to_string());
        store
    }

    pub fn current(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Option<String>> {
        self.writes.lock().unwrap().clone()
    }
}

impl LocalTokenStore for RecordingStore {
    fn token(&self) -> Option<String> {
        self.current()
    }

    fn set_token(&mut self, token: Option<String>) {
        self.writes.lock().unwrap().push(token.clone());
        *self.token.lock().unwrap() = token;
    }
}

pub fn alice() -> Profile {
    Profile::new("alice", 0.0, 0.5, 1.0).unwrap()
}

pub fn bob() -> Profile {
    Profile::new("bob", 0.3, 0.6, 0.9).unwrap()
}

/// Lets spawned operation tasks run until they block again.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
