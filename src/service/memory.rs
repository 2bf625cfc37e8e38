//! In-process identity service
//!
//! Emulates the remote backend with a record list held in memory. Optional
//! [`Uncertainty`] parameters inject latency and failures so the session client
//! can be exercised against a slow or flaky service without a network.

use async_trait::async_trait;
use log::debug;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use uuid::Uuid;

use super::IdentityService;
use crate::error::{ClientError, ServiceError};
use crate::profile::Profile;

/// A single registered user.
#[derive(Debug, Clone)]
pub struct Record {
    pub profile: Profile,
    pub password: String,
    /// Token matched on profile lookups, or `None` if none was issued yet
    pub token: Option<String>,
}

impl Record {
    pub fn new(profile: Profile, password: impl Into<String>) -> Self {
        Self {
            profile,
            password: password.into(),
            token: None,
        }
    }

    /// Returns the current token, issuing a new one first if needed.
    fn token_or_issue(&mut self) -> String {
        self.token
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone()
    }
}

/// Parameters used to emulate an unreliable service.
///
/// Each operation first fails with `NoConnection` with probability
/// `no_connection_chance`, then waits for the simulated latency, then fails
/// with `Unknown` with probability `unknown_error_chance`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Uncertainty {
    pub no_connection_chance: f64,
    pub unknown_error_chance: f64,
    pub average_delay: Duration,
    /// Total spread of the latency, centred on `average_delay`
    pub delay_deviation: Duration,
}

impl Uncertainty {
    fn roll(chance: f64) -> bool {
        chance > 0.0 && rand::random::<f64>() < chance
    }

    fn delay(&self) -> Duration {
        let average = self.average_delay.as_secs_f64();
        let deviation = (rand::random::<f64>() - 0.5) * self.delay_deviation.as_secs_f64();
        Duration::from_secs_f64((average + deviation).max(0.0))
    }

    async fn apply(&self) -> Result<(), ServiceError> {
        if Self::roll(self.no_connection_chance) {
            return Err(ClientError::NoConnection.into());
        }

        let delay = self.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if Self::roll(self.unknown_error_chance) {
            return Err(ClientError::Unknown.into());
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemoryIdentityService {
    records: Mutex<Vec<Record>>,
    uncertainty: Uncertainty,
}

impl MemoryIdentityService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            uncertainty: Uncertainty::default(),
        }
    }

    pub fn uncertainty(mut self, uncertainty: Uncertainty) -> Self {
        self.uncertainty = uncertainty;
        self
    }

    /// Number of registered users.
    pub fn len(&self) -> usize {
        self.records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn records(&self) -> std::sync::MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityService for MemoryIdentityService {
    async fn exchange_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, ServiceError> {
        self.uncertainty.apply().await?;

        let mut records = self.records();
        records
            .iter_mut()
            .find(|r| r.profile.username == username && r.password == password)
            .map(Record::token_or_issue)
            .ok_or(ClientError::Unauthorized.into())
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, ServiceError> {
        self.uncertainty.apply().await?;

        self.records()
            .iter()
            .find(|r| r.token.as_deref() == Some(token))
            .map(|r| r.profile.clone())
            .ok_or(ClientError::Unauthorized.into())
    }

    async fn register_profile(
        &self,
        profile: &Profile,
        password: &str,
    ) -> Result<(), ServiceError> {
        self.uncertainty.apply().await?;

        let mut records = self.records();
        if records
            .iter()
            .any(|r| r.profile.username == profile.username)
        {
            return Err(ClientError::UsernameUnavailable.into());
        }

        debug!("Registered user {}", profile.username);
        records.push(Record::new(profile.clone(), password));
        Ok(())
    }
}
