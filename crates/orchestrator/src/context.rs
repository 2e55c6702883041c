//! The global context: the system prompt sent with every model call of
//! every chain.
//!
//! It is rendered once from the registry when the orchestrator is built and
//! shared by reference afterwards.

use std::sync::Arc;
use switchboard_core::agent::Registry;
use switchboard_core::error::Result;

/// Immutable system prompt describing the registry and the exchange protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalContext(Arc<str>);

impl GlobalContext {
    /// Render the context for `registry`, appending `suffix` when present.
    pub fn build(registry: &Registry, suffix: Option<&str>) -> Result<Self> {
        let agents = serde_json::to_string(&registry.summaries())?;

        let mut text = String::with_capacity(1536 + agents.len());
        text.push_str(
            "You are a helpful assistant whose job is to answer questions about a specific topic. ",
        );
        text.push_str(
            "To do so you can rely on a set of agents, each specialised in a different topic: ",
        );
        text.push_str(&agents);
        text.push_str(". ");
        text.push_str(PROTOCOL);

        if let Some(suffix) = suffix.map(str::trim).filter(|s| !s.is_empty()) {
            text.push(' ');
            text.push_str(suffix);
        }

        Ok(Self(text.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for GlobalContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

const PROTOCOL: &str = concat!(
    "Each agent owns tools that solve one specific kind of task. ",
    "Before using an agent's tools, ask the agent what they are and how to use them. ",
    "To get an agent's tool descriptions, send me exactly this JSON: ",
    r#"{"action":"describe","agent":"<agent name>"}. "#,
    "To use a tool, send me this JSON and I will run it for you: ",
    r#"{"agent":"<agent name>","tool":"<tool tag>","input":"<tool input>"}. "#,
    "Repeat this until you have the final answer. ",
    "If you cannot solve the task, send me: ",
    r#"{"tool":"none","input":"<why you cannot help>"}. "#,
    "When you have the final answer, send me: ",
    r#"{"tool":"finished","input":"<the final result>"}. "#,
    "Do not explain what you are doing, just do it. ",
    "Always exchange JSON objects with me and always answer in the language I use with you.",
);
