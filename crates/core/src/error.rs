//! Error types for the Switchboard domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] is the fatal
//! error surfaced to callers of the orchestrator.

use thiserror::Error;

/// The top-level error type for all Switchboard operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider{}", retry_suffix(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The backend answered with HTTP success but reported an error in the body.
    #[error("Model error ({kind}): {message}{}", code_suffix(.code))]
    Backend {
        message: String,
        kind: String,
        param: Option<String>,
        code: Option<String>,
    },

    #[error("Model reply contained no choices")]
    NoChoices,

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Network error: {0}")]
    Network(String),
}

fn retry_suffix(secs: &Option<u64>) -> String {
    secs.map(|s| format!(", retry after {s}s")).unwrap_or_default()
}

fn code_suffix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|c| format!(" [code: {c}]"))
        .unwrap_or_default()
}

#[derive(Debug, Clone, Error)]
pub enum ToolError {
    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Invalid tool input: {0}")]
    InvalidInput(String),
}

/// Why a model reply could not be read as a directive.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    /// The cleaned reply does not start with `{`.
    #[error("reply is not an object")]
    NotAnObject,

    /// The reply looks like an object but does not decode.
    #[error("malformed directive: {0}")]
    Malformed(String),
}
