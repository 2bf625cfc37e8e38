//! HTTP identity service
//!
//! Talks to the remote identity backend:
//!
//! - `POST /token` with basic auth, answering `{"token": "..."}`
//! - `GET /user` with a bearer token, answering the profile JSON
//! - `POST /user` with basic auth and the profile JSON as body
//!
//! A 401 maps to `Unauthorized`, a 409 on registration maps to
//! `UsernameUnavailable`, and connection failures map to `NoConnection`.

use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use super::IdentityService;
use crate::error::{ClientError, ServiceError};
use crate::profile::Profile;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Debug, Clone)]
pub struct HttpIdentityService {
    client: Client,
    base_url: String,
}

impl HttpIdentityService {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .build()
            .map_err(|e| ServiceError::Internal(e.to_string()))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends the request and returns the body of a successful response.
    ///
    /// `rejections` lists the status codes that carry a typed error kind.
    async fn send(
        request: RequestBuilder,
        rejections: &[(StatusCode, ClientError)],
    ) -> Result<String, ServiceError> {
        let response = request.send().await.map_err(transport_error)?;
        let status = response.status();

        if let Some((_, kind)) = rejections.iter().find(|(code, _)| *code == status) {
            return Err(ServiceError::Rejected(*kind));
        }
        if !status.is_success() {
            return Err(ServiceError::Status(status.as_u16()));
        }

        response.text().await.map_err(transport_error)
    }
}

fn transport_error(error: reqwest::Error) -> ServiceError {
    if error.is_connect() {
        ServiceError::Rejected(ClientError::NoConnection)
    } else if error.is_decode() {
        ServiceError::Decode(error.to_string())
    } else {
        ServiceError::Transport(error.to_string())
    }
}

#[async_trait]
impl IdentityService for HttpIdentityService {
    async fn exchange_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, ServiceError> {
        debug!("POST {} for {}", self.url("/token"), username);
        let request = self
            .client
            .post(self.url("/token"))
            .basic_auth(username, Some(password));

        let body = Self::send(request, &[(StatusCode::UNAUTHORIZED, ClientError::Unauthorized)])
            .await?;
        let response: TokenResponse = serde_json::from_str(&body)?;
        Ok(response.token)
    }

    async fn fetch_profile(&self, token: &str) -> Result<Profile, ServiceError> {
        let request = self.client.get(self.url("/user")).bearer_auth(token);

        let body = Self::send(request, &[(StatusCode::UNAUTHORIZED, ClientError::Unauthorized)])
            .await?;
        let profile: Profile = serde_json::from_str(&body)?;
        profile
            .validate()
            .map_err(|e| ServiceError::Decode(e.to_string()))?;
        Ok(profile)
    }

    async fn register_profile(
        &self,
        profile: &Profile,
        password: &str,
    ) -> Result<(), ServiceError> {
        debug!("POST {} for {}", self.url("/user"), profile.username);
        let request = self
            .client
            .post(self.url("/user"))
            .basic_auth(&profile.username, Some(password))
            .json(profile);

        Self::send(
            request,
            &[(StatusCode::CONFLICT, ClientError::UsernameUnavailable)],
        )
        .await?;
        Ok(())
    }
}
