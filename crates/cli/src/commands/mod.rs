pub mod agents;
pub mod ask;
pub mod context;
pub mod init;
pub mod run;

use std::sync::Arc;
use switchboard_config::AppConfig;
use switchboard_orchestrator::Orchestrator;
use switchboard_providers::OpenAiCompatProvider;
use tracing::debug;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

pub(crate) fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

/// Build an orchestrator over the built-in catalog, talking to the
/// configured endpoint. Fails early when no API key is available.
pub(crate) fn orchestrator(config: &AppConfig) -> Result<Orchestrator, Box<dyn std::error::Error>> {
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    SWITCHBOARD_API_KEY=sk-...");
        eprintln!("    OPENAI_API_KEY=sk-...");
        eprintln!();
        eprintln!("  Or add `api_key` to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let provider = Arc::new(OpenAiCompatProvider::from_config(config));
    debug!(endpoint = provider.endpoint(), model = %config.model, "Using model endpoint");
    Ok(Orchestrator::from_config(
        provider,
        crate::catalog::builtin_agents(),
        config,
    )?)
}
