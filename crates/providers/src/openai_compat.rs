//! OpenAI-compatible provider implementation.
//!
//! Works with: OpenAI, OpenRouter, Ollama, vLLM, llama.cpp, Together AI and
//! any endpoint speaking the chat-completions protocol.
//!
//! Supports:
//! - Single-shot chat completions
//! - Streaming completions over server-sent events
//! - Backend-reported errors inside a successful HTTP response

use crate::sse::{Frame, SseDecoder};
use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use switchboard_config::AppConfig;
use switchboard_core::error::ProviderError;
use switchboard_core::message::Message;
use switchboard_core::provider::*;
use tracing::{debug, warn};

/// An OpenAI-compatible model gateway.
///
/// Holds only immutable configuration; every call is independent.
pub struct OpenAiCompatProvider {
    name: String,
    endpoint: String,
    api_key: String,
    /// Bound on a whole single-shot call. Streams are only bounded by
    /// connect time, so a long healthy reply is never cut off.
    timeout: std::time::Duration,
    client: reqwest::Client,
}

impl OpenAiCompatProvider {
    /// Create a provider posting to the full chat-completions `endpoint`.
    pub fn new(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self::with_timeout(name, endpoint, api_key, std::time::Duration::from_secs(120))
    }

    pub fn with_timeout(
        name: impl Into<String>,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        timeout: std::time::Duration,
    ) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            name: name.into(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            timeout,
            client,
        }
    }

    /// Build the gateway described by the application configuration.
    pub fn from_config(config: &AppConfig) -> Self {
        Self::with_timeout(
            "openai-compat",
            &config.server_url,
            config.api_key.clone().unwrap_or_default(),
            std::time::Duration::from_secs(config.request_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post(&self, request: &ProviderRequest) -> std::result::Result<reqwest::Response, ProviderError> {
        debug!(
            provider = %self.name,
            model = %request.model,
            messages = request.messages.len(),
            stream = request.stream,
            "Sending completion request"
        );

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json");
        if request.stream {
            builder = builder.header("Accept", "text/event-stream");
        } else {
            builder = builder.timeout(self.timeout);
        }

        let response = builder
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(ProviderError::RateLimited { retry_after_secs });
        }

        if status == 401 || status == 403 {
            return Err(ProviderError::AuthenticationFailed(
                "Invalid API key or insufficient permissions".into(),
            ));
        }

        if !response.status().is_success() {
            let error_body = response.text().await.unwrap_or_default();
            warn!(status, body = %error_body, "Provider returned error");
            return Err(ProviderError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Provider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, mut request: ProviderRequest) -> std::result::Result<ModelReply, ProviderError> {
        request.stream = false;
        let response = self.post(&request).await?;
        let status_code = response.status().as_u16();

        let api_response: ApiResponse = response.json().await.map_err(|e| ProviderError::ApiError {
            status_code,
            message: format!("Failed to parse response: {e}"),
        })?;

        api_response.into_reply()
    }

    async fn stream(&self, mut request: ProviderRequest) -> std::result::Result<ReplyStream, ProviderError> {
        request.stream = true;
        let response = self.post(&request).await?;

        let (tx, rx) = tokio::sync::mpsc::channel(64);
        let provider_name = self.name.clone();

        // Read the byte stream in the background; events arrive in order.
        tokio::spawn(async move {
            let mut byte_stream = response.bytes_stream();
            let mut decoder = SseDecoder::new();

            while let Some(chunk) = byte_stream.next().await {
                let bytes = match chunk {
                    Ok(b) => b,
                    Err(e) => {
                        warn!(provider = %provider_name, error = %e, "Stream interrupted");
                        let _ = tx.send(Err(ProviderError::StreamInterrupted(e.to_string()))).await;
                        return;
                    }
                };

                for frame in decoder.push(&bytes) {
                    match frame {
                        Frame::Delta(text) => {
                            if tx.send(Ok(StreamEvent::Delta(text))).await.is_err() {
                                return; // receiver dropped
                            }
                        }
                        Frame::Done => {
                            let _ = tx.send(Ok(StreamEvent::End)).await;
                            return;
                        }
                    }
                }
            }

            for frame in decoder.finish() {
                match frame {
                    Frame::Delta(text) => {
                        if tx.send(Ok(StreamEvent::Delta(text))).await.is_err() {
                            return;
                        }
                    }
                    Frame::Done => break,
                }
            }

            // Stream ended without [DONE]
            let _ = tx.send(Ok(StreamEvent::End)).await;
        });

        Ok(rx)
    }
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    id: String,
    #[serde(default)]
    object: String,
    #[serde(default)]
    created: i64,
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<ApiChoice>,
    #[serde(default)]
    usage: Option<ApiUsage>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    index: u32,
    message: ApiMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    param: Option<String>,
    /// Some backends send a number here.
    #[serde(default)]
    code: Option<serde_json::Value>,
}

impl ApiResponse {
    fn into_reply(self) -> std::result::Result<ModelReply, ProviderError> {
        if let Some(err) = self.error {
            return Err(ProviderError::Backend {
                message: err.message,
                kind: err.kind.unwrap_or_else(|| "unknown".into()),
                param: err.param,
                code: err.code.map(|c| match c {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                }),
            });
        }

        if self.choices.is_empty() {
            return Err(ProviderError::NoChoices);
        }

        Ok(ModelReply {
            id: self.id,
            object: self.object,
            created: self.created,
            model: self.model,
            choices: self
                .choices
                .into_iter()
                .map(|c| ReplyChoice {
                    index: c.index,
                    message: Message::assistant(c.message.content.unwrap_or_default()),
                    finish_reason: c.finish_reason,
                })
                .collect(),
            usage: self.usage.map(|u| Usage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            }),
        })
    }
}
