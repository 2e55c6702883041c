//! Switchboard CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Write a starter config file
//! - `agents`   — List the built-in agents and their tools
//! - `context`  — Print the system prompt sent with every model call
//! - `run`      — Execute a task through the orchestration loop
//! - `ask`      — One raw, streamed model call

use clap::{Parser, Subcommand};

mod catalog;
mod commands;

#[derive(Parser)]
#[command(
    name = "switchboard",
    about = "Switchboard — route tasks between a language model and your agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter ~/.switchboard/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// List the built-in agents and their tools
    Agents {
        /// Print the tool descriptors as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the global context sent as the system prompt
    Context,

    /// Execute a task and print the outcome
    Run {
        /// The task prompt
        #[arg(short, long)]
        message: String,

        /// Print every cleaned model reply as the chain runs
        #[arg(long)]
        trace: bool,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send one prompt straight to the model and stream the reply
    Ask {
        /// System prompt for this call
        #[arg(short, long, default_value = "You are a helpful assistant.")]
        system: String,

        /// The user prompt
        #[arg(short, long)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays clean for answers.
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { force } => commands::init::run(force)?,
        Commands::Agents { json } => commands::agents::run(json)?,
        Commands::Context => commands::context::run()?,
        Commands::Run {
            message,
            trace,
            json,
        } => commands::run::run(&message, trace, json).await?,
        Commands::Ask { system, message } => commands::ask::run(&system, &message).await?,
    }

    Ok(())
}
