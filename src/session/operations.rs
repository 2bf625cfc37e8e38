//! Session operations
//!
//! The asynchronous units dispatched by the session client. Each unit runs
//! under one overall timeout and resolves to a [`Completion`] that is posted
//! back to the control loop. No unit touches session state itself.

use futures_util::FutureExt;
use log::{error, warn};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use super::state::OperationId;
use crate::error::{ClientError, ServiceError};
use crate::profile::Profile;
use crate::service::IdentityService;

/// Default overall timeout of a composite operation.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a dispatched operation, delivered back to the control loop.
#[derive(Debug)]
pub(crate) enum Completion {
    Login {
        id: OperationId,
        username: String,
        password: String,
        result: Result<(Profile, String), ClientError>,
    },
    SignUp {
        id: OperationId,
        profile: Profile,
        password: String,
        result: Result<(), ClientError>,
    },
    Resume {
        id: OperationId,
        token: String,
        result: Result<Profile, ClientError>,
    },
}

impl Completion {
    pub(crate) fn id(&self) -> OperationId {
        match self {
            Completion::Login { id, .. }
            | Completion::SignUp { id, .. }
            | Completion::Resume { id, .. } => *id,
        }
    }
}

/// Runs `operation` under `limit` and normalizes every outcome into the
/// closed error set. Timeouts and panics become `Unknown`.
pub(crate) async fn supervise<T, F>(limit: Duration, operation: F) -> Result<T, ClientError>
where
    F: Future<Output = Result<T, ServiceError>>,
{
    match tokio::time::timeout(limit, AssertUnwindSafe(operation).catch_unwind()).await {
        Ok(Ok(Ok(value))) => Ok(value),
        Ok(Ok(Err(fault))) => {
            let kind = ClientError::from(fault.clone());
            if kind == ClientError::Unknown {
                warn!("Identity service fault: {}", fault);
            }
            Err(kind)
        }
        Ok(Err(_panic)) => {
            error!("Identity service panicked during an operation");
            Err(ClientError::Unknown)
        }
        Err(_elapsed) => {
            warn!("Operation timed out after {:?}", limit);
            Err(ClientError::Unknown)
        }
    }
}

/// Exchanges credentials for a token, then fetches the profile with it.
pub(crate) async fn login(
    service: Arc<dyn IdentityService>,
    id: OperationId,
    username: String,
    password: String,
    limit: Duration,
) -> Completion {
    let result = supervise(limit, async {
        let token = service.exchange_credentials(&username, &password).await?;
        let profile = service.fetch_profile(&token).await?;
        Ok::<_, ServiceError>((profile, token))
    })
    .await;

    Completion::Login {
        id,
        username,
        password,
        result,
    }
}

/// Registers a new profile.
pub(crate) async fn sign_up(
    service: Arc<dyn IdentityService>,
    id: OperationId,
    profile: Profile,
    password: String,
    limit: Duration,
) -> Completion {
    let result = supervise(limit, service.register_profile(&profile, &password)).await;

    Completion::SignUp {
        id,
        profile,
        password,
        result,
    }
}

/// Fetches the profile belonging to a previously stored token.
pub(crate) async fn resume(
    service: Arc<dyn IdentityService>,
    id: OperationId,
    token: String,
    limit: Duration,
) -> Completion {
    let result = supervise(limit, service.fetch_profile(&token)).await;

    Completion::Resume { id, token, result }
}
