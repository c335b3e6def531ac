//! arka CLI — the main entry point.
//!
//! Commands:
//! - `ask`    — Answer a single query and exit
//! - `chat`   — Interactive session
//! - `tools`  — List the available tools
//! - `config` — Show the effective configuration

use clap::{Parser, Subcommand};

mod approval;
mod commands;
mod session;

#[derive(Parser)]
#[command(
    name = "arka",
    about = "arka — an agentic AI assistant for your terminal",
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
    /// Answer a single query and exit
    Ask {
        /// The question or task for the agent
        query: String,

        /// Approve every tool call without prompting
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Start an interactive chat session
    Chat {
        /// Approve every tool call without prompting
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List the available tools
    Tools,

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing. Logs go to stderr so streamed answers stay clean.
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
        Commands::Ask { query, yes } => commands::ask::run(&query, yes).await?,
        Commands::Chat { yes } => commands::chat::run(yes).await?,
        Commands::Tools => commands::tools_cmd::run()?,
        Commands::Config => commands::config_cmd::run()?,
    }

    Ok(())
}
