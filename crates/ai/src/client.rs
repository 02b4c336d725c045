//! Chat-completion client with retry/timeout wrapping.

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::sleep;

use crate::fallback;

const DEFAULT_GATEWAY_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
const DEFAULT_MODEL: &str = "google/gemma-3-27b-it";

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Sampling parameters for one completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 1000,
            top_p: 0.95,
        }
    }
}

/// Gateway endpoint and retry tuning.
#[derive(Debug, Clone)]
pub struct AiClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Referer/title headers some gateways use for attribution.
    pub referer: String,
    pub app_title: String,
    /// Retries after the first attempt; total attempts are `1 + max_retries`.
    pub max_retries: u32,
    pub initial_timeout: Duration,
    /// Added to the timeout on each retry, capped at `max_timeout`.
    pub timeout_step: Duration,
    pub max_timeout: Duration,
    pub retry_delay: Duration,
}

impl AiClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_GATEWAY_URL.to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            referer: "https://wayfarer.app".to_string(),
            app_title: "Wayfarer Travel Assistant".to_string(),
            max_retries: 1,
            initial_timeout: Duration::from_secs(10),
            timeout_step: Duration::from_secs(5),
            max_timeout: Duration::from_secs(15),
            retry_delay: Duration::from_secs(1),
        }
    }

    /// Per-attempt timeout: grows by `timeout_step` per retry, capped.
    pub(crate) fn attempt_timeout(&self, retry_count: u32) -> Duration {
        (self.initial_timeout + self.timeout_step * retry_count).min(self.max_timeout)
    }
}

/// Why a completion attempt failed; drives both retry policy and the
/// canned-fallback wording.
#[derive(Debug, Clone, Error)]
pub enum FailureKind {
    #[error("no network connection")]
    Offline,
    #[error("request timed out")]
    Timeout,
    #[error("transient network failure: {0}")]
    Network(String),
    #[error("rate limited")]
    RateLimited,
    #[error("gateway error: {0}")]
    Api(String),
}

impl FailureKind {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::Timeout | Self::Network(_))
    }
}

/// Connectivity check consulted before any HTTP attempt.
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    async fn is_connected(&self) -> bool;
}

/// Probe that assumes connectivity; the transport errors handle the rest.
pub struct AlwaysConnected;

#[async_trait]
impl ConnectivityProbe for AlwaysConnected {
    async fn is_connected(&self) -> bool {
        true
    }
}

/// Chat response shapes from the gateway.
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorBody {
    error: GatewayErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GatewayErrorDetail {
    message: String,
}

/// Client for the remote chat-completion gateway.
pub struct AiGatewayClient {
    client: reqwest::Client,
    config: AiClientConfig,
    probe: Arc<dyn ConnectivityProbe>,
}

impl AiGatewayClient {
    pub fn new(config: AiClientConfig) -> Self {
        Self::with_probe(config, Arc::new(AlwaysConnected))
    }

    pub fn with_probe(config: AiClientConfig, probe: Arc<dyn ConnectivityProbe>) -> Self {
        // Timeouts are set per attempt, not on the client.
        Self {
            client: reqwest::Client::new(),
            config,
            probe,
        }
    }

    fn headers(&self) -> Result<HeaderMap, FailureKind> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.api_key))
            .map_err(|_| FailureKind::Api("invalid API key format".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        if let Ok(value) = HeaderValue::from_str(&self.config.referer) {
            headers.insert("HTTP-Referer", value);
        }
        if let Ok(value) = HeaderValue::from_str(&self.config.app_title) {
            headers.insert("X-Title", value);
        }
        Ok(headers)
    }

    /// Obtain an assistant reply for the conversation.
    ///
    /// Never fails: offline, timeout, transport and gateway errors all
    /// degrade to a keyword-matched canned reply.
    pub async fn send_message(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> ChatMessage {
        if !self.probe.is_connected().await {
            debug!("connectivity probe reports offline, using canned reply");
            return fallback::canned_reply(messages, Some(&FailureKind::Offline));
        }

        match self.request_with_retry(messages, options).await {
            Ok(reply) => reply,
            Err(failure) => {
                warn!("AI gateway unavailable ({}), using canned reply", failure);
                fallback::canned_reply(messages, Some(&failure))
            }
        }
    }

    async fn request_with_retry(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
    ) -> Result<ChatMessage, FailureKind> {
        let mut retry_count = 0;
        loop {
            match self.request_once(messages, options, retry_count).await {
                Ok(reply) => return Ok(reply),
                Err(failure) => {
                    if failure.is_retryable() && retry_count < self.config.max_retries {
                        retry_count += 1;
                        debug!(
                            "retrying AI request ({}/{}) after {}",
                            retry_count, self.config.max_retries, failure
                        );
                        sleep(self.config.retry_delay).await;
                        continue;
                    }
                    return Err(failure);
                }
            }
        }
    }

    async fn request_once(
        &self,
        messages: &[ChatMessage],
        options: &ChatOptions,
        retry_count: u32,
    ) -> Result<ChatMessage, FailureKind> {
        let body = serde_json::json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
            "top_p": options.top_p,
            "stream": false,
        });

        let response = self
            .client
            .post(&self.config.base_url)
            .headers(self.headers()?)
            .timeout(self.config.attempt_timeout(retry_count))
            .json(&body)
            .send()
            .await
            .map_err(classify_transport)?;

        let status = response.status();
        let text = response.text().await.map_err(classify_transport)?;

        if !status.is_success() {
            if status.as_u16() == 429 {
                return Err(FailureKind::RateLimited);
            }
            let message = serde_json::from_str::<GatewayErrorBody>(&text)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| format!("API error: {}", status));
            return Err(FailureKind::Api(message));
        }

        let parsed: CompletionResponse = serde_json::from_str(&text)
            .map_err(|e| FailureKind::Api(format!("invalid response format: {}", e)))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message)
            .ok_or_else(|| FailureKind::Api("response carried no choices".to_string()))
    }
}

fn classify_transport(err: reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Network(err.to_string())
    }
}
