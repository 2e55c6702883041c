//! `switchboard context` — print the global context.

use super::{CmdResult, load_config};
use crate::catalog::builtin_agents;
use switchboard_core::agent::Registry;
use switchboard_orchestrator::GlobalContext;

pub fn run() -> CmdResult {
    let config = load_config()?;
    let registry = Registry::new(builtin_agents())?;
    let context = GlobalContext::build(&registry, config.system_prompt_suffix.as_deref())?;
    println!("{context}");
    Ok(())
}
