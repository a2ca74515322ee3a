//! Practicum homework status API client
//!
//! Issues one authenticated `GET` per polling cycle with a `from_date` window
//! and hands back the parsed JSON body untouched. Shape checks live in
//! [`crate::services::validation`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// Source of homework status payloads.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch statuses changed since `from_date` (Unix seconds).
    async fn homework_statuses(&self, from_date: i64) -> Result<Value, RequestFailure>;
}

/// Client for the Practicum homework status endpoint.
pub struct PracticumClient {
    http: Client,
    endpoint: String,
    token: String,
}

impl PracticumClient {
    pub fn new(endpoint: &str, token: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder()
            .user_agent(concat!("homework-status-bot/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }

    async fn request(&self, from_date: i64) -> Result<Value, RequestCause> {
        let response = self
            .http
            .get(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(RequestCause::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RequestCause::Status(status));
        }

        let body = response.text().await.map_err(RequestCause::Transport)?;
        serde_json::from_str(&body).map_err(RequestCause::Decode)
    }
}

#[async_trait]
impl StatusSource for PracticumClient {
    async fn homework_statuses(&self, from_date: i64) -> Result<Value, RequestFailure> {
        tracing::debug!(
            endpoint = %self.endpoint,
            from_date,
            "Requesting homework statuses"
        );

        match self.request(from_date).await {
            Ok(payload) => {
                tracing::debug!("Homework API answered");
                Ok(payload)
            }
            Err(cause) => {
                tracing::error!(error = %cause, "Homework API request failed");
                Err(RequestFailure { cause })
            }
        }
    }
}

/// Any failure to obtain a payload from the homework API.
#[derive(Debug, thiserror::Error)]
#[error("Homework API request failed: {cause}")]
pub struct RequestFailure {
    #[source]
    pub cause: RequestCause,
}

#[derive(Debug, thiserror::Error)]
pub enum RequestCause {
    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("endpoint returned HTTP {0}")]
    Status(StatusCode),

    #[error("response body is not valid JSON: {0}")]
    Decode(#[source] serde_json::Error),
}
