//! HTTP clients for the trained assistant
//!
//! The NLU parse endpoint and the conversational REST endpoint sit
//! behind traits so the pipelines can run against stubs in tests.

use async_trait::async_trait;
use rail_assist_core::ParsedMessage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelError {
    #[error("model request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("model returned an unusable payload: {0}")]
    BadPayload(String),
}

/// Intent classification over a trained NLU model
#[async_trait]
pub trait NluModel: Send + Sync {
    async fn parse(&self, text: &str) -> Result<ParsedMessage, ModelError>;
}

/// Response generation over the full dialogue stack
#[async_trait]
pub trait DialogueModel: Send + Sync {
    /// All textual messages the bot utters for one user input.
    async fn respond(&self, text: &str) -> Result<Vec<String>, ModelError>;
}

#[derive(Debug, Clone)]
pub struct ModelClientConfig {
    pub base_url: String,
    pub request_timeout: Duration,
}

/// Client for the assistant's HTTP API
pub struct HttpModelClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct MessageRequest<'a> {
    sender: &'a str,
    message: &'a str,
}

#[derive(Deserialize)]
struct BotMessage {
    text: Option<String>,
}

impl HttpModelClient {
    pub fn new(config: ModelClientConfig) -> Result<Self, ModelError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl NluModel for HttpModelClient {
    async fn parse(&self, text: &str) -> Result<ParsedMessage, ModelError> {
        let url = format!("{}/model/parse", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ParseRequest { text })
            .send()
            .await?
            .error_for_status()?;

        let parsed: ParsedMessage = response
            .json()
            .await
            .map_err(|e| ModelError::BadPayload(e.to_string()))?;
        Ok(parsed)
    }
}

#[async_trait]
impl DialogueModel for HttpModelClient {
    async fn respond(&self, text: &str) -> Result<Vec<String>, ModelError> {
        let url = format!("{}/webhooks/rest/webhook", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&MessageRequest {
                sender: "offline-eval",
                message: text,
            })
            .send()
            .await?
            .error_for_status()?;

        let messages: Vec<BotMessage> = response
            .json()
            .await
            .map_err(|e| ModelError::BadPayload(e.to_string()))?;

        Ok(messages.into_iter().filter_map(|m| m.text).collect())
    }
}
