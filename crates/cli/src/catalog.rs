//! The built-in agent catalog shipped with the `switchboard` binary.
//!
//! Library users register their own agents; these exist so the CLI can run
//! a chain end to end out of the box.

use chrono::{SecondsFormat, Utc};
use switchboard_core::agent::Agent;
use switchboard_core::error::ToolError;
use switchboard_core::tool::FnTool;

/// Every built-in agent, in listing order.
pub fn builtin_agents() -> Vec<Agent> {
    vec![text_agent(), clock_agent()]
}

fn text_agent() -> Agent {
    Agent::new(
        "text",
        "Transforms and measures plain text: case changes, word counts, reversal",
    )
    .with_tool(FnTool::new(
        "uppercase",
        "Convert text to upper case",
        "the text to convert",
        "the text in upper case",
        |input| async move { required(input, "uppercase").map(|text| text.to_uppercase()) },
    ))
    .with_tool(FnTool::new(
        "word_count",
        "Count the words in a text",
        "the text to count",
        "the number of whitespace-separated words",
        |input| async move {
            required(input, "word_count").map(|text| text.split_whitespace().count().to_string())
        },
    ))
    .with_tool(FnTool::new(
        "reverse",
        "Reverse the characters of a text",
        "the text to reverse",
        "the reversed text",
        |input| async move { required(input, "reverse").map(|text| text.chars().rev().collect::<String>()) },
    ))
}

fn clock_agent() -> Agent {
    Agent::new("clock", "Knows the current date and time").with_tool(FnTool::new(
        "utc_now",
        "Current date and time in UTC",
        "nothing",
        "an RFC 3339 timestamp, e.g. 2024-05-01T12:00:00Z",
        |_| async { Ok(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)) },
    ))
}

fn required(input: Option<String>, tool: &str) -> Result<String, ToolError> {
    input.ok_or_else(|| ToolError::InvalidInput(format!("{tool} needs an input text")))
}
