//! Main entry point for the Chinook relay

#![forbid(unsafe_code)]

use clap::Parser;
use dotenvy::dotenv;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chinook_relay::cli::commands::{self, Commands};
use chinook_relay::RelayConfig;

/// Chinook Relay - forwards words to a chat-completion API for translation
#[derive(Parser, Debug)]
#[command(name = "chinook-relay", version, about, long_about = None)]
struct Args {
    /// Upstream API key (optional, defaults to OPENAI_API_KEY env var)
    #[arg(long)]
    api_key: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(debug: bool) {
    let log_level = if debug { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("chinook_relay={log_level},tower_http={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    let args = Args::parse();
    let command = args.command.unwrap_or_default();

    init_logging(args.verbose || command.wants_debug());

    let mut config = RelayConfig::from_env()?;

    // Override config with CLI args if provided
    if let Some(api_key) = args.api_key {
        config.api_key = api_key;
    }

    // Hard precondition: nothing is bound without a key
    if let Err(e) = config.validate() {
        error!("Missing or invalid configuration: {}", e);
        return Err(e.into());
    }

    match command {
        Commands::Server { host, port, .. } => {
            commands::handle_server(config, host, port).await?;
        }
        Commands::Translate { word } => {
            commands::handle_translate(config, word).await?;
        }
    }

    Ok(())
}
