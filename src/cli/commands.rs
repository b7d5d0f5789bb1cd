//! CLI command definitions and handlers

use clap::Subcommand;
use tracing::info;

use crate::core::client::{AsyncTranslator, Translator};
use crate::core::config::RelayConfig;

/// Commands for the Chinook relay
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP relay (default)
    Server {
        /// Bind address (default: HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Listen port (default: PORT or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long)]
        debug: bool,
    },

    /// Translate one word through the upstream API and print the result
    Translate {
        /// Word or phrase to translate
        word: String,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Server {
            host: None,
            port: None,
            debug: false,
        }
    }
}

impl Commands {
    /// Whether this command asks for debug logging
    pub fn wants_debug(&self) -> bool {
        matches!(self, Commands::Server { debug: true, .. })
    }
}

/// Handle server command
pub async fn handle_server(
    mut config: RelayConfig,
    host: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    use crate::server::api::run_server;

    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }

    info!("Starting HTTP relay on {}", config.bind_addr());
    println!("🚀 Relay starting on http://{}", config.bind_addr());

    run_server(config).await
}

/// Handle translate command
pub async fn handle_translate(config: RelayConfig, word: String) -> anyhow::Result<()> {
    let word = word.trim();
    if word.is_empty() {
        anyhow::bail!("Missing input word.");
    }

    let translator = AsyncTranslator::new(config)?;
    let result = translator.translate(word).await?;

    println!("{}", result.translation);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Cli {
        #[command(subcommand)]
        command: Option<Commands>,
    }

    #[test]
    fn test_parse_server_overrides() {
        let cli = Cli::parse_from(["relay", "server", "--port", "8080", "--debug"]);
        let command = cli.command.unwrap();
        assert!(command.wants_debug());
        assert_eq!(
            command,
            Commands::Server {
                host: None,
                port: Some(8080),
                debug: true,
            }
        );
    }

    #[test]
    fn test_parse_translate() {
        let cli = Cli::parse_from(["relay", "translate", "friend"]);
        assert_eq!(
            cli.command,
            Some(Commands::Translate {
                word: "friend".to_string(),
            })
        );
    }

    #[test]
    fn test_no_subcommand_defaults_to_server() {
        let cli = Cli::parse_from(["relay"]);
        assert_eq!(cli.command.unwrap_or_default(), Commands::default());
        assert!(!Commands::default().wants_debug());
    }

    #[tokio::test]
    async fn test_translate_rejects_blank_word() {
        let config = RelayConfig {
            api_key: "k".to_string(),
            ..Default::default()
        };
        assert!(handle_translate(config, "   ".to_string()).await.is_err());
    }
}
