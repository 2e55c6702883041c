//! Tool trait — a named, invocable capability owned by one agent.
//!
//! The orchestrator never looks inside a tool's output: whatever text the
//! tool returns is fed back to the model verbatim.

use crate::error::ToolError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The static, model-facing description of a tool.
///
/// This is what the model receives when it asks an agent to describe its
/// tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    /// Tag, unique within the owning agent
    pub tag: String,

    /// What the tool does
    pub description: String,

    /// Free-text description of the expected input
    pub input: String,

    /// Free-text description of the produced output
    pub output: String,
}

/// The core Tool trait.
///
/// `call` may be invoked concurrently from independent tasks; implementations
/// must tolerate that.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tag used by the model to select this tool.
    fn tag(&self) -> &str;

    fn description(&self) -> &str;

    /// Expected input shape, in words.
    fn input(&self) -> &str;

    /// Produced output shape, in words.
    fn output(&self) -> &str;

    /// Run the tool.
    async fn call(&self, input: Option<&str>) -> std::result::Result<String, ToolError>;

    fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor {
            tag: self.tag().to_string(),
            description: self.description().to_string(),
            input: self.input().to_string(),
            output: self.output().to_string(),
        }
    }
}

type ToolFuture = Pin<Box<dyn Future<Output = std::result::Result<String, ToolError>> + Send>>;
type Handler = dyn Fn(Option<String>) -> ToolFuture + Send + Sync;

/// A tool backed by an async closure.
///
/// ```ignore
/// let echo = FnTool::new("echo", "Repeats its input", "any text", "the same text",
///     |input| async move { Ok(input.unwrap_or_default()) });
/// ```
#[derive(Clone)]
pub struct FnTool {
    descriptor: ToolDescriptor,
    handler: Arc<Handler>,
}

impl FnTool {
    pub fn new<F, Fut>(
        tag: impl Into<String>,
        description: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
        handler: F,
    ) -> Self
    where
        F: Fn(Option<String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<String, ToolError>> + Send + 'static,
    {
        Self {
            descriptor: ToolDescriptor {
                tag: tag.into(),
                description: description.into(),
                input: input.into(),
                output: output.into(),
            },
            handler: Arc::new(move |input| Box::pin(handler(input))),
        }
    }
}

impl std::fmt::Debug for FnTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("descriptor", &self.descriptor)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Tool for FnTool {
    fn tag(&self) -> &str {
        &self.descriptor.tag
    }

    fn description(&self) -> &str {
        &self.descriptor.description
    }

    fn input(&self) -> &str {
        &self.descriptor.input
    }

    fn output(&self) -> &str {
        &self.descriptor.output
    }

    async fn call(&self, input: Option<&str>) -> std::result::Result<String, ToolError> {
        (self.handler)(input.map(str::to_string)).await
    }

    fn descriptor(&self) -> ToolDescriptor {
        self.descriptor.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A simple struct-based tool for unit tests.
    struct ShoutTool;

    #[async_trait]
    impl Tool for ShoutTool {
        fn tag(&self) -> &str {
            "shout"
        }
        fn description(&self) -> &str {
            "Uppercases the input"
        }
        fn input(&self) -> &str {
            "any text"
        }
        fn output(&self) -> &str {
            "the text in capitals"
        }
        async fn call(&self, input: Option<&str>) -> std::result::Result<String, ToolError> {
            input
                .map(str::to_uppercase)
                .ok_or_else(|| ToolError::InvalidInput("shout needs text".into()))
        }
    }

    #[tokio::test]
    async fn struct_tool_calls_and_describes() {
        assert_eq!(ShoutTool.call(Some("hey")).await.unwrap(), "HEY");
        assert!(matches!(ShoutTool.call(None).await, Err(ToolError::InvalidInput(_))));

        let d = ShoutTool.descriptor();
        assert_eq!(d.tag, "shout");
        assert_eq!(d.output, "the text in capitals");
    }

    #[tokio::test]
    async fn fn_tool_forwards_input() {
        let echo = FnTool::new("echo", "Echoes", "text", "text", |input| async move {
            Ok(input.unwrap_or_default())
        });
        assert_eq!(echo.tag(), "echo");
        assert_eq!(echo.call(Some("X")).await.unwrap(), "X");
        assert_eq!(echo.call(None).await.unwrap(), "");
    }

    #[test]
    fn descriptor_serializes_without_capability() {
        let echo = FnTool::new("echo", "Echoes", "text", "same text", |_| async { Ok(String::new()) });
        let json = serde_json::to_value(echo.descriptor()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tag": "echo",
                "description": "Echoes",
                "input": "text",
                "output": "same text"
            })
        );
    }
}
