//! remote::http
//!
//! HTTP implementations of the identity collaborators.
//!
//! # Design
//!
//! [`HttpValidator`] issues `GET <api_base>/v1/users/<id>` and treats
//! exactly HTTP 200 as "valid". Everything else - 404, 5xx, transport
//! errors, and requests exceeding the configured timeout - is
//! "invalid". The timeout is set on the reqwest client, so no check
//! can block past the configured ceiling.
//!
//! [`HttpDirectory`] issues `GET <base>/v1/users/<id>` and reads a
//! `name` field from the JSON body; any failure yields the standard
//! unknown label.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use super::traits::{unknown_label, CallerDirectory, IdentityValidator, RemoteError};
use crate::core::types::{CallerId, ExternalId};

/// User-Agent header value for API requests.
const USER_AGENT_VALUE: &str = "turnstile-cli";

fn build_client(timeout: Duration) -> Result<Client, RemoteError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT_VALUE)
        .build()
        .map_err(|e| RemoteError::BuildFailed(e.to_string()))
}

/// HTTP identity-validity check. Fail closed.
#[derive(Debug, Clone)]
pub struct HttpValidator {
    client: Client,
    api_base: String,
}

impl HttpValidator {
    /// Create a validator against an API base URL with a fixed request
    /// timeout.
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_base: trim_base(api_base.into()),
        })
    }
}

#[async_trait]
impl IdentityValidator for HttpValidator {
    async fn is_valid(&self, id: ExternalId) -> bool {
        let url = format!("{}/v1/users/{}", self.api_base, id);
        match self.client.get(&url).send().await {
            Ok(response) => response.status() == StatusCode::OK,
            // Transport error or timeout: assume invalid.
            Err(_) => false,
        }
    }
}

/// Minimal shape of a directory lookup response.
#[derive(Debug, Deserialize)]
struct UserInfo {
    name: String,
}

/// HTTP caller display lookup.
#[derive(Debug, Clone)]
pub struct HttpDirectory {
    client: Client,
    base: String,
}

impl HttpDirectory {
    /// Create a directory against a base URL with a fixed request
    /// timeout.
    pub fn new(base: impl Into<String>, timeout: Duration) -> Result<Self, RemoteError> {
        Ok(Self {
            client: build_client(timeout)?,
            base: trim_base(base.into()),
        })
    }
}

#[async_trait]
impl CallerDirectory for HttpDirectory {
    async fn display(&self, caller: &CallerId) -> String {
        let url = format!("{}/v1/users/{}", self.base, caller);
        let response = match self.client.get(&url).send().await {
            Ok(response) if response.status() == StatusCode::OK => response,
            _ => return unknown_label(caller),
        };
        match response.json::<UserInfo>().await {
            Ok(info) => format!("{} ({})", info.name, caller),
            Err(_) => unknown_label(caller),
        }
    }
}

fn trim_base(base: String) -> String {
    base.trim_end_matches('/').to_string()
}
