//! Shared test doubles for orchestrator tests.

use async_trait::async_trait;
use switchboard_core::error::ProviderError;
use switchboard_core::message::Message;
use switchboard_core::provider::{
    ModelReply, Provider, ProviderRequest, ReplyChoice, ReplyStream, StreamEvent, Usage,
};
use std::sync::Mutex;
use tokio::sync::mpsc;

/// A provider that returns a scripted sequence of results and records every
/// request it receives.
///
/// Panics if more calls are made than results provided.
pub struct ScriptedProvider {
    script: Mutex<Vec<Result<ModelReply, ProviderError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(script: Vec<Result<ModelReply, ProviderError>>) -> Self {
        Self {
            script: Mutex::new(script),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Script a sequence of plain text replies.
    pub fn texts(replies: &[&str]) -> Self {
        Self::new(replies.iter().map(|r| Ok(text_reply(r))).collect())
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ModelReply, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len() - 1
        };

        let script = self.script.lock().unwrap();
        match script.get(call) {
            Some(result) => result.clone(),
            None => panic!(
                "ScriptedProvider: no more replies (call #{call}, have {})",
                script.len()
            ),
        }
    }
}

/// Answers every request with `{"input": <last message>}`, so each chain
/// finishes with its own prompt.
pub struct EchoProvider;

#[async_trait]
impl Provider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ModelReply, ProviderError> {
        tokio::task::yield_now().await;
        let last = request
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();
        Ok(text_reply(&serde_json::json!({ "input": last }).to_string()))
    }
}

/// Streams a fixed list of events and nothing else.
pub struct ChunkProvider {
    events: Vec<Result<StreamEvent, ProviderError>>,
}

impl ChunkProvider {
    pub fn new(events: Vec<Result<StreamEvent, ProviderError>>) -> Self {
        Self { events }
    }
}

#[async_trait]
impl Provider for ChunkProvider {
    fn name(&self) -> &str {
        "chunks"
    }

    async fn complete(&self, _request: ProviderRequest) -> Result<ModelReply, ProviderError> {
        Err(ProviderError::Network("chunk provider only streams".into()))
    }

    async fn stream(&self, _request: ProviderRequest) -> Result<ReplyStream, ProviderError> {
        let (tx, rx) = mpsc::channel(self.events.len().max(1));
        for event in self.events.clone() {
            tx.send(event).await.unwrap();
        }
        Ok(rx)
    }
}

/// A reply with a single assistant choice.
pub fn text_reply(content: &str) -> ModelReply {
    ModelReply {
        id: "chatcmpl-test".into(),
        object: "chat.completion".into(),
        created: 0,
        model: "test-model".into(),
        choices: vec![ReplyChoice {
            index: 0,
            message: Message::assistant(content),
            finish_reason: Some("stop".into()),
        }],
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
    }
}
