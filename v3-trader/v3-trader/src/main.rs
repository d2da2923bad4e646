//! Entrypoint for the v3 trader

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(clippy::needless_pass_by_value)]
#![deny(unsafe_code)]
#![deny(clippy::uninlined_format_args)]

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use v3_trader::{error::TraderError, TradingClient};

use crate::cli::{Cli, Command};

mod cli;

/// Main entrypoint for the v3 trader
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.setup_logging();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(state = %e.transaction_state(), "{e}");
            ExitCode::FAILURE
        },
    }
}

/// Load the configuration, connect and run the requested operation
async fn run(cli: Cli) -> Result<(), TraderError> {
    let config = cli.parse_config().await?;
    let chain = cli.connect()?;
    let client = TradingClient::new(config, chain);

    let identity = client.config().pool_identity();
    let token_in = client.config().trade.token_in.clone();
    let configured_amount = client.config().trade.amount_in.clone();

    match cli.command {
        Command::Pool => {
            let pool = client.get_pool_info(&identity).await?;
            println!("pool {identity} at {:#x}", pool.address);
            println!("  liquidity:     {}", pool.liquidity);
            println!("  sqrtPriceX96:  {}", pool.sqrt_price_x96);
            println!("  tick:          {}", pool.tick);
            println!("  tick spacing:  {}", pool.tick_spacing);
            println!("  block:         {}", pool.block_number);
        },
        Command::Quote { amount } => {
            let amount_in = amount.unwrap_or(configured_amount);
            let amount_out = client.quote_readable(&identity, &token_in, &amount_in).await?;
            let token_out =
                identity.counter_asset(&token_in).map(|a| a.symbol.as_str()).unwrap_or_default();
            println!("{amount_in} {} -> {amount_out} {token_out}", token_in.symbol);
        },
        Command::Trade { amount } => {
            let amount_in = amount.unwrap_or(configured_amount);
            let trade = client.create_trade(&identity, &token_in, &amount_in).await?;
            info!("executing trade of {amount_in} {}", token_in.symbol);

            let submission = client.execute_trade(&trade).await?;
            let json = serde_json::to_string_pretty(&submission).map_err(TraderError::parse)?;
            println!("{json}");
        },
    }

    Ok(())
}
