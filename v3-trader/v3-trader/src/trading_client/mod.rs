//! The trading client: pool reads, quotes, trade assembly and execution
//! against a single concentrated-liquidity deployment
pub mod execution;
pub mod pool;
pub mod quotes;
pub mod trade;

use std::{future::Future, sync::Arc, time::Duration};

use v3_trader_api::config::TraderConfig;

use crate::{chain::ChainAccess, error::TraderError, helpers::with_timeout};

/// The client through which all trader operations run
#[derive(Clone)]
pub struct TradingClient {
    /// The static configuration
    config: Arc<TraderConfig>,
    /// The chain handle
    chain: ChainAccess,
}

impl TradingClient {
    /// Create a new client
    pub fn new(config: TraderConfig, chain: ChainAccess) -> Self {
        Self { config: Arc::new(config), chain }
    }

    /// The client's configuration
    pub fn config(&self) -> &TraderConfig {
        &self.config
    }

    /// The timeout applied to each RPC call
    fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.config.rpc_timeout_ms)
    }

    /// Run an RPC future under the configured timeout
    async fn rpc<T, F>(&self, fut: F) -> Result<T, TraderError>
    where
        F: Future<Output = Result<T, TraderError>>,
    {
        with_timeout(self.rpc_timeout(), fut).await
    }
}
