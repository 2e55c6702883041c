//! Agents and the registry the orchestrator resolves names against.
//!
//! Both are built once, before the orchestrator starts, and never mutated
//! afterwards.

use crate::error::{Error, Result};
use crate::tool::{Tool, ToolDescriptor};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// A named bundle of tools.
#[derive(Clone)]
pub struct Agent {
    name: String,
    description: String,
    tools: Vec<Arc<dyn Tool>>,
}

impl Agent {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            tools: Vec::new(),
        }
    }

    /// Add a tool. Order is preserved in every listing the model sees.
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Self {
        self.tools.push(Arc::new(tool));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Find a tool by tag.
    pub fn tool(&self, tag: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.tag() == tag)
    }

    pub fn descriptors(&self) -> Vec<ToolDescriptor> {
        self.tools.iter().map(|t| t.descriptor()).collect()
    }

    /// JSON array of this agent's tool descriptors.
    pub fn describe_tools(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.descriptors())?)
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("tools", &self.tools.iter().map(|t| t.tag()).collect::<Vec<_>>())
            .finish()
    }
}

/// Registry entry as presented to the model in the global context.
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub tools: Vec<&'a str>,
}

/// The immutable set of agents an orchestrator can route to.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    agents: Vec<Agent>,
}

impl Registry {
    /// Build a registry, rejecting duplicate agent names and duplicate tool
    /// tags within one agent. The same tag may appear on different agents.
    pub fn new(agents: Vec<Agent>) -> Result<Self> {
        check_unique(&agents)?;
        debug!(agents = agents.len(), "Registry built");
        Ok(Self { agents })
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Look up an agent by name. `None` is a normal outcome.
    pub fn resolve_agent(&self, name: &str) -> Option<&Agent> {
        self.agents.iter().find(|a| a.name() == name)
    }

    /// Look up a tool by tag within `agent`.
    pub fn resolve_tool<'a>(&self, agent: &'a Agent, tag: &str) -> Option<&'a Arc<dyn Tool>> {
        agent.tool(tag)
    }

    pub fn summaries(&self) -> Vec<AgentSummary<'_>> {
        self.agents
            .iter()
            .map(|a| AgentSummary {
                name: a.name(),
                description: a.description(),
                tools: a.tools().iter().map(|t| t.tag()).collect(),
            })
            .collect()
    }
}

fn check_unique(agents: &[Agent]) -> Result<()> {
    let mut names = HashSet::new();
    for agent in agents {
        if !names.insert(agent.name()) {
            return Err(Error::Config {
                message: format!("duplicate agent name '{}'", agent.name()),
            });
        }

        let mut tags = HashSet::new();
        for tool in agent.tools() {
            if !tags.insert(tool.tag()) {
                return Err(Error::Config {
                    message: format!(
                        "duplicate tool tag '{}' on agent '{}'",
                        tool.tag(),
                        agent.name()
                    ),
                });
            }
        }
    }
    Ok(())
}
