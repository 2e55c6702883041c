//! Terminal results of a chain.
//!
//! Fatal failures (transport, backend errors) are `Err` values of
//! [`switchboard_core::Error`]. Everything else ends the chain with a
//! [`TaskOutcome`], whose `Display` is the text a caller shows the user.

use serde::Serialize;

/// How a chain ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The model produced a final answer.
    Answer(String),
    /// The chain stopped early; the diagnostic explains why.
    Diagnostic(Diagnostic),
}

impl TaskOutcome {
    pub fn is_answer(&self) -> bool {
        matches!(self, TaskOutcome::Answer(_))
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            TaskOutcome::Diagnostic(d) => Some(d),
            TaskOutcome::Answer(_) => None,
        }
    }

    /// "answer" or the diagnostic kind.
    pub fn kind(&self) -> &'static str {
        match self {
            TaskOutcome::Answer(_) => "answer",
            TaskOutcome::Diagnostic(d) => d.kind(),
        }
    }

    /// The user-facing text, consuming the outcome.
    pub fn into_text(self) -> String {
        match self {
            TaskOutcome::Answer(text) => text,
            TaskOutcome::Diagnostic(d) => d.to_string(),
        }
    }
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskOutcome::Answer(text) => f.write_str(text),
            TaskOutcome::Diagnostic(d) => std::fmt::Display::fmt(d, f),
        }
    }
}

impl From<Diagnostic> for TaskOutcome {
    fn from(d: Diagnostic) -> Self {
        TaskOutcome::Diagnostic(d)
    }
}

/// A non-fatal reason for ending a chain without an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The cleaned reply did not start with `{`.
    WrongFormat { reply: String },

    /// The reply started with `{` but did not decode.
    MalformedDirective { reply: String, reason: String },

    UnknownAgent { agent: Option<String> },

    UnknownTool { agent: String, tool: Option<String> },

    /// The tool itself reported a failure.
    ToolFailed {
        agent: String,
        tool: String,
        reason: String,
    },

    /// The chain used all of its model calls.
    StepLimit { max_steps: u32 },
}

impl Diagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            Diagnostic::WrongFormat { .. } => "wrong_format",
            Diagnostic::MalformedDirective { .. } => "malformed_directive",
            Diagnostic::UnknownAgent { .. } => "unknown_agent",
            Diagnostic::UnknownTool { .. } => "unknown_tool",
            Diagnostic::ToolFailed { .. } => "tool_failed",
            Diagnostic::StepLimit { .. } => "step_limit",
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::WrongFormat { reply } | Diagnostic::MalformedDirective { reply, .. } => {
                write!(f, "Data in wrong format {reply}")
            }
            Diagnostic::UnknownAgent { .. } => f.write_str("No matching agent found for this task"),
            Diagnostic::UnknownTool { .. } => f.write_str("No matching tool found for this task"),
            Diagnostic::ToolFailed { agent, tool, reason } => {
                write!(f, "Tool '{tool}' of agent '{agent}' failed: {reason}")
            }
            Diagnostic::StepLimit { max_steps } => {
                write!(f, "No final answer after {max_steps} steps")
            }
        }
    }
}
