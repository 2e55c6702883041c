//! `switchboard init` — write a starter config file.

use super::CmdResult;
use switchboard_config::AppConfig;

pub fn run(force: bool) -> CmdResult {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    }

    if config_path.exists() && !force {
        println!("⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or re-run with --force.");
        return Ok(());
    }

    std::fs::write(&config_path, AppConfig::default_toml())?;
    println!("✅ Wrote config.toml at: {}", config_path.display());
    println!();
    println!("📝 Next steps:");
    println!("   1. Set `api_key` in the file, or export SWITCHBOARD_API_KEY");
    println!("   2. Point `server_url` at any chat-completions endpoint");
    println!("   3. Try: switchboard run -m \"How many words are in 'to be or not to be'?\"");
    Ok(())
}
