//! `switchboard run` — execute one task through the orchestration loop.

use super::{CmdResult, load_config, orchestrator};
use tracing::info;

pub async fn run(message: &str, trace: bool, json: bool) -> CmdResult {
    let config = load_config()?;
    let orchestrator = orchestrator(&config)?;

    let outcome = orchestrator
        .execute_task_with_log(message, &[], |line| {
            if trace {
                eprintln!("  · {line}");
            }
        })
        .await?;
    info!(kind = outcome.kind(), "Task finished");

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else if outcome.is_answer() {
        println!("{outcome}");
    } else {
        eprintln!("  [{}]", outcome.kind());
        println!("{outcome}");
    }
    Ok(())
}
