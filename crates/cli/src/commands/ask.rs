//! `switchboard ask` — one raw model call, streamed to stdout.

use super::{CmdResult, load_config, orchestrator};
use std::io::Write;
use switchboard_core::provider::StreamEvent;

pub async fn run(system: &str, message: &str) -> CmdResult {
    let config = load_config()?;
    let orchestrator = orchestrator(&config)?;

    let mut stdout = std::io::stdout();
    orchestrator
        .ask_llm_with(system, message, &[], |event| match event {
            StreamEvent::Delta(text) => {
                print!("{text}");
                let _ = stdout.flush();
            }
            StreamEvent::End => println!(),
        })
        .await?;
    Ok(())
}
