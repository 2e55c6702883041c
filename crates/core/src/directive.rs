//! The directive protocol spoken between the model and the orchestrator.
//!
//! A cleaned model reply is a directive only if it starts with `{`. It then
//! decodes into four optional fields, whose combination selects the branch:
//!
//! | action     | agent | tool | input | meaning                          |
//! |------------|-------|------|-------|----------------------------------|
//! | "describe" | set   | –    | –     | list the agent's tools           |
//! | other/none | set   | set  | set   | invoke the tool with the input   |
//! | other/none | unset | –    | set   | `input` is the final answer      |
//!
//! A missing `agent` always means "final answer". A model that forgets the
//! field by mistake cannot be told apart from one that is done.

use crate::error::DirectiveError;
use serde::{Deserialize, Deserializer};

/// The `action` value that asks for an agent's tool list.
pub const DESCRIBE_ACTION: &str = "describe";

/// A decoded model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// List the tools of `agent`. A missing name never resolves.
    Describe { agent: Option<String> },

    /// Call `tool` on `agent` with `input`.
    Invoke {
        agent: String,
        tool: Option<String>,
        input: Option<String>,
    },

    /// The chain is over; `input` is the answer.
    Answer { input: Option<String> },
}

#[derive(Debug, Default, Deserialize)]
struct RawDirective {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    agent: Option<String>,
    #[serde(default)]
    tool: Option<String>,
    #[serde(default, deserialize_with = "text_or_json")]
    input: Option<String>,
}

/// Accept `input` as a string, or as any other JSON value rendered back to
/// compact JSON text. Models regularly send structured tool input.
fn text_or_json<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

impl Directive {
    /// Interpret an already-cleaned reply.
    pub fn parse(reply: &str) -> Result<Self, DirectiveError> {
        let reply = reply.trim();
        if !reply.starts_with('{') {
            return Err(DirectiveError::NotAnObject);
        }

        let raw: RawDirective =
            serde_json::from_str(reply).map_err(|e| DirectiveError::Malformed(e.to_string()))?;

        // An empty agent name counts as no agent at all.
        let agent = raw.agent.filter(|a| !a.is_empty());

        if raw.action.as_deref() == Some(DESCRIBE_ACTION) {
            return Ok(Directive::Describe { agent });
        }

        Ok(match agent {
            Some(agent) => Directive::Invoke {
                agent,
                tool: raw.tool,
                input: raw.input,
            },
            None => Directive::Answer { input: raw.input },
        })
    }

    /// Short label for logs and events.
    pub fn kind(&self) -> &'static str {
        match self {
            Directive::Describe { .. } => "describe",
            Directive::Invoke { .. } => "invoke",
            Directive::Answer { .. } => "answer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_directive() {
        let d = Directive::parse(r#"{"action":"describe","agent":"math"}"#).unwrap();
        assert_eq!(d, Directive::Describe { agent: Some("math".into()) });
        assert_eq!(d.kind(), "describe");
    }

    #[test]
    fn describe_without_agent_keeps_branch() {
        let d = Directive::parse(r#"{"action":"describe"}"#).unwrap();
        assert_eq!(d, Directive::Describe { agent: None });
    }

    #[test]
    fn invoke_directive() {
        let d = Directive::parse(r#"{"agent":"A","tool":"T","input":"X"}"#).unwrap();
        assert_eq!(
            d,
            Directive::Invoke {
                agent: "A".into(),
                tool: Some("T".into()),
                input: Some("X".into()),
            }
        );
    }

    #[test]
    fn unknown_action_with_agent_is_invoke() {
        let d = Directive::parse(r#"{"action":"run","agent":"A","tool":"T"}"#).unwrap();
        assert!(matches!(d, Directive::Invoke { input: None, .. }));
    }

    #[test]
    fn missing_agent_is_answer() {
        let d = Directive::parse(r#"{"tool":"finished","input":"42"}"#).unwrap();
        assert_eq!(d, Directive::Answer { input: Some("42".into()) });

        let d = Directive::parse(r#"{"agent":"","input":"empty name"}"#).unwrap();
        assert_eq!(d, Directive::Answer { input: Some("empty name".into()) });
    }

    #[test]
    fn structured_input_becomes_json_text() {
        let d = Directive::parse(r#"{"agent":"A","tool":"T","input":{"q":"rust","n":3}}"#).unwrap();
        match d {
            Directive::Invoke { input: Some(input), .. } => {
                let v: serde_json::Value = serde_json::from_str(&input).unwrap();
                assert_eq!(v["q"], "rust");
                assert_eq!(v["n"], 3);
            }
            other => panic!("Expected Invoke, got {other:?}"),
        }
    }

    #[test]
    fn non_object_is_rejected() {
        assert_eq!(Directive::parse("Sure! Here you go."), Err(DirectiveError::NotAnObject));
        assert_eq!(Directive::parse(r#"["agent"]"#), Err(DirectiveError::NotAnObject));
        assert_eq!(Directive::parse(""), Err(DirectiveError::NotAnObject));
    }

    #[test]
    fn broken_object_is_malformed() {
        assert!(matches!(
            Directive::parse(r#"{"agent": "A", "tool": "#),
            Err(DirectiveError::Malformed(_))
        ));
        assert!(matches!(
            Directive::parse(r#"{"agent": 7}"#),
            Err(DirectiveError::Malformed(_))
        ));
        assert!(matches!(
            Directive::parse(r#"{"input":"x"} trailing words"#),
            Err(DirectiveError::Malformed(_))
        ));
    }
}
