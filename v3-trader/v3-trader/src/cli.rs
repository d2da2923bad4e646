//! The CLI for the v3 trader

use std::str::FromStr;

use alloy::signers::local::PrivateKeySigner;
use clap::{Parser, Subcommand};
use tokio::fs::read_to_string;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use v3_trader::{
    chain::{alloy_chain::connect_http, ChainAccess},
    error::TraderError,
};
use v3_trader_api::config::TraderConfig;

/// Quote and execute swaps against a v3 pool
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The path to the JSON trader configuration
    #[arg(long, env = "TRADER_CONFIG_PATH")]
    pub config_path: String,
    /// The RPC URL of the node to read from and submit to
    #[arg(long, env = "RPC_URL")]
    pub rpc_url: String,
    /// The private key of the trading account; reads only without it
    #[arg(long, env = "PRIVATE_KEY")]
    pub private_key: Option<String>,
    /// Whether to emit JSON formatted logs
    #[arg(long, env = "JSON_LOGS")]
    pub json_logs: bool,

    /// The operation to run
    #[command(subcommand)]
    pub command: Command,
}

/// The operations the trader runs
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print a snapshot of the configured pool
    Pool,
    /// Quote the configured trade
    Quote {
        /// A readable input amount overriding the configured one
        #[arg(long)]
        amount: Option<String>,
    },
    /// Quote the configured trade and execute it
    Trade {
        /// A readable input amount overriding the configured one
        #[arg(long)]
        amount: Option<String>,
    },
}

impl Cli {
    /// Configure the logging subscriber
    pub fn setup_logging(&self) {
        let filter =
            EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy();
        let registry = tracing_subscriber::registry().with(filter);

        if self.json_logs {
            registry
                .with(fmt::layer().with_file(true).with_line_number(true).json().flatten_event(true))
                .init();
        } else {
            registry.with(fmt::layer().with_file(true).with_line_number(true)).init();
        }
    }

    /// Read and validate the trader configuration
    pub async fn parse_config(&self) -> Result<TraderConfig, TraderError> {
        let json_str = read_to_string(&self.config_path).await.map_err(TraderError::config)?;
        Ok(TraderConfig::from_json_str(&json_str)?)
    }

    /// Connect to the configured node, with a signer if a key was given
    pub fn connect(&self) -> Result<ChainAccess, TraderError> {
        let signer = self
            .private_key
            .as_deref()
            .map(PrivateKeySigner::from_str)
            .transpose()
            .map_err(TraderError::config)?;

        connect_http(&self.rpc_url, signer)
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    /// Test that the CLI definition is well formed
    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    /// Test parsing a quote without a signer
    #[test]
    fn test_parse_quote() {
        let cli = Cli::try_parse_from([
            "v3-trader",
            "--config-path",
            "trader.json",
            "--rpc-url",
            "http://localhost:8545",
            "quote",
            "--amount",
            "250.5",
        ])
        .unwrap();

        assert!(cli.private_key.is_none());
        assert!(!cli.json_logs);
        assert_eq!(cli.command, Command::Quote { amount: Some("250.5".to_string()) });
    }

    /// Test that a malformed private key is refused
    #[test]
    fn test_invalid_private_key() {
        let cli = Cli::try_parse_from([
            "v3-trader",
            "--config-path",
            "trader.json",
            "--rpc-url",
            "http://localhost:8545",
            "--private-key",
            "not-a-key",
            "pool",
        ])
        .unwrap();

        assert!(matches!(cli.connect(), Err(TraderError::Config(_))));
    }
}
