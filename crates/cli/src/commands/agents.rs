//! `switchboard agents` — list the built-in catalog.

use super::CmdResult;
use crate::catalog::builtin_agents;

pub fn run(json: bool) -> CmdResult {
    let agents = builtin_agents();

    if json {
        let listing: Vec<serde_json::Value> = agents
            .iter()
            .map(|agent| {
                serde_json::json!({
                    "name": agent.name(),
                    "description": agent.description(),
                    "tools": agent.descriptors(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    for agent in &agents {
        println!("{} — {}", agent.name(), agent.description());
        for tool in agent.tools() {
            println!("    {:<12} {}", tool.tag(), tool.description());
        }
    }
    Ok(())
}
