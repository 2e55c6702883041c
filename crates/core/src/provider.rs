//! Provider trait — the model gateway abstraction.
//!
//! A Provider turns a (system prompt, user prompt, history) triple into a
//! model reply, either as one complete reply or as a lazy sequence of text
//! deltas terminated by [`StreamEvent::End`].

use crate::error::ProviderError;
use crate::message::Message;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Fixed completion budget sent with every request.
pub const MAX_TOKENS: u32 = 8192;

/// A single chat-completions request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// The model id (e.g., "gpt-4o-mini")
    pub model: String,

    /// System message, then history, then the new user prompt
    pub messages: Vec<Message>,

    /// Sampling temperature; omitted from the wire when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Whether to stream the response
    #[serde(default)]
    pub stream: bool,
}

fn default_max_tokens() -> u32 {
    MAX_TOKENS
}

impl ProviderRequest {
    /// Build the ordered message list: `system`, every message of `history`,
    /// then `prompt` as a new user message.
    pub fn compose(
        model: impl Into<String>,
        system_prompt: &str,
        prompt: &str,
        history: &[Message],
    ) -> Self {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(Message::system(system_prompt));
        messages.extend_from_slice(history);
        messages.push(Message::user(prompt));

        Self {
            model: model.into(),
            messages,
            temperature: None,
            max_tokens: MAX_TOKENS,
            stream: false,
        }
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// A complete (non-streaming) reply from the model backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelReply {
    pub id: String,
    pub object: String,
    pub created: i64,

    /// Which model actually responded (may differ from requested)
    pub model: String,

    pub choices: Vec<ReplyChoice>,

    /// Token usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl ModelReply {
    /// Text of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyChoice {
    pub index: u32,
    pub message: Message,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
}

/// Token usage information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One item of a streamed reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "text", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental text, delivered exactly as it arrived.
    Delta(String),
    /// The stream is over. Always the last event, sent exactly once.
    End,
}

/// Receiving half of a streamed reply.
pub type ReplyStream = mpsc::Receiver<std::result::Result<StreamEvent, ProviderError>>;

/// The core Provider trait.
///
/// Implementations hold only immutable configuration, so any number of
/// independent calls may be in flight at once.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a request and get a complete reply.
    async fn complete(&self, request: ProviderRequest) -> std::result::Result<ModelReply, ProviderError>;

    /// Send a request and get a stream of [`StreamEvent`]s.
    ///
    /// Default implementation calls `complete()` and replays the result as a
    /// single delta followed by `End`.
    async fn stream(&self, request: ProviderRequest) -> std::result::Result<ReplyStream, ProviderError> {
        let reply = self.complete(request).await?;
        let (tx, rx) = mpsc::channel(2);
        if let Some(text) = reply.content().filter(|t| !t.is_empty()) {
            let _ = tx.send(Ok(StreamEvent::Delta(text.to_string()))).await;
        }
        let _ = tx.send(Ok(StreamEvent::End)).await;
        Ok(rx)
    }
}
