//! REST + WebSocket backend
//!
//! Inserts and reads go to the feedback API with `reqwest`; subscriptions
//! are served by a background gateway listener per subscription.

use super::{
    gateway, Backoff, BackendError, BackendResult, FeedbackBackend, NewFeedback, Subscription,
};
use async_trait::async_trait;
use board_common::{ClientConfig, ErrorResponse};
use board_core::{Feedback, Snowflake};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Backend talking to `board-api` and `board-gateway`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    feedback_url: String,
    gateway_url: String,
    reconnect_initial_ms: u64,
    reconnect_max_ms: u64,
}

impl HttpBackend {
    /// Build from client configuration
    pub fn new(config: &ClientConfig) -> BackendResult<Self> {
        if !(config.gateway_url.starts_with("ws://") || config.gateway_url.starts_with("wss://")) {
            return Err(BackendError::Config(format!(
                "gateway URL must use ws:// or wss://, got {}",
                config.gateway_url
            )));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            feedback_url: config.feedback_endpoint(),
            gateway_url: config.gateway_url.clone(),
            reconnect_initial_ms: config.reconnect_initial_ms,
            reconnect_max_ms: config.reconnect_max_ms,
        })
    }

    pub fn feedback_url(&self) -> &str {
        &self.feedback_url
    }

    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }
}

/// Decode a success body, or turn the API error body into [`BackendError::Rejected`]
async fn decode<T: DeserializeOwned>(response: Response) -> BackendResult<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let error = serde_json::from_str::<ErrorResponse>(&body)
        .unwrap_or_else(|_| ErrorResponse::new("HTTP_ERROR", body));

    Err(BackendError::Rejected {
        status: status.as_u16(),
        code: error.code,
        message: error.message,
    })
}

#[async_trait]
impl FeedbackBackend for HttpBackend {
    async fn insert(&self, feedback: NewFeedback) -> BackendResult<Snowflake> {
        let response = self
            .client
            .post(&self.feedback_url)
            .json(&feedback)
            .send()
            .await?;

        let stored: Feedback = decode(response).await?;
        tracing::debug!(id = %stored.id, "Feedback stored");
        Ok(stored.id)
    }

    async fn recent(&self, limit: usize) -> BackendResult<Vec<Feedback>> {
        let response = self
            .client
            .get(&self.feedback_url)
            .query(&[("limit", limit)])
            .send()
            .await?;

        decode(response).await
    }

    async fn subscribe(&self) -> BackendResult<Subscription> {
        let (subscription, sink) = Subscription::channel();
        let backoff = Backoff::from_millis(self.reconnect_initial_ms, self.reconnect_max_ms);

        tokio::spawn(gateway::run(self.gateway_url.clone(), backoff, sink));

        Ok(subscription)
    }
}
