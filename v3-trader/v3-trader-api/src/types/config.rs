//! The static configuration of the trader, loaded once at startup

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

use crate::{
    error::TypesError,
    serialization::address_string_serialization,
    types::{
        asset::{Asset, MAINNET_CHAIN_ID},
        pool::{FeeTier, PoolIdentity, POOL_FACTORY_ADDRESS},
        trade::SlippageTolerance,
    },
};

// -------------
// | Constants |
// -------------

/// The address of the v3 quoter on mainnet
pub const QUOTER_ADDRESS: Address = address!("b27308f9f90d607463bb33ea1bebb41c27ce5ab6");
/// The address of the v3 swap router on mainnet
pub const SWAP_ROUTER_ADDRESS: Address = address!("e592427a0aece92de3edee1f18e0157c05861564");
/// The default max fee per gas, in wei
pub const DEFAULT_MAX_FEE_PER_GAS: u64 = 100_000_000_000; // 100 gwei
/// The default max priority fee per gas, in wei
pub const DEFAULT_MAX_PRIORITY_FEE_PER_GAS: u64 = 100_000_000_000; // 100 gwei
/// The default readable amount of the input token to approve for the router
pub const DEFAULT_APPROVAL_AMOUNT: &str = "1000";
/// The default timeout applied to every RPC call
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000; // 10 seconds
/// The default maximum age of a quote the executor will act on
pub const DEFAULT_MAX_QUOTE_AGE_SECS: u64 = 60; // 1 minute

// ---------
// | Types |
// ---------

/// The addresses of the protocol contracts the trader talks to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// The pool factory, used to derive pool addresses
    #[serde(with = "address_string_serialization")]
    pub factory: Address,
    /// The quoter, used to simulate swaps
    #[serde(with = "address_string_serialization")]
    pub quoter: Address,
    /// The swap router, which executes swaps and is the approved spender
    #[serde(with = "address_string_serialization")]
    pub swap_router: Address,
}

impl Default for ContractAddresses {
    fn default() -> Self {
        Self {
            factory: POOL_FACTORY_ADDRESS,
            quoter: QUOTER_ADDRESS,
            swap_router: SWAP_ROUTER_ADDRESS,
        }
    }
}

/// The trade the trader is configured to quote and execute
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeConfig {
    /// The asset sold
    pub token_in: Asset,
    /// The asset bought
    pub token_out: Asset,
    /// The readable amount of `token_in` to sell
    pub amount_in: String,
    /// The fee tier of the pool to trade through
    pub pool_fee: FeeTier,
    /// The readable amount of `token_in` the router is approved to spend
    #[serde(default = "default_approval_amount")]
    pub approval_amount: String,
}

/// How transactions are priced
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum GasConfig {
    /// Fixed EIP-1559 fee caps
    Static {
        /// The max fee per gas, in wei
        max_fee_per_gas: u64,
        /// The max priority fee per gas, in wei
        max_priority_fee_per_gas: u64,
    },
    /// Fee caps derived from the latest block's base fee
    LatestBaseFee,
}

impl Default for GasConfig {
    fn default() -> Self {
        GasConfig::Static {
            max_fee_per_gas: DEFAULT_MAX_FEE_PER_GAS,
            max_priority_fee_per_gas: DEFAULT_MAX_PRIORITY_FEE_PER_GAS,
        }
    }
}

/// The full trader configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderConfig {
    /// The chain the trader operates on
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,
    /// The protocol contract addresses
    #[serde(default)]
    pub contracts: ContractAddresses,
    /// The configured trade
    pub trade: TradeConfig,
    /// The slippage tolerance applied when executing
    #[serde(default)]
    pub slippage: SlippageTolerance,
    /// Transaction pricing
    #[serde(default)]
    pub gas: GasConfig,
    /// The timeout applied to each RPC call, in milliseconds
    #[serde(default = "default_rpc_timeout_ms")]
    pub rpc_timeout_ms: u64,
    /// The oldest quote, in seconds, the executor will act on
    #[serde(default = "default_max_quote_age_secs")]
    pub max_quote_age_secs: u64,
}

impl TraderConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, TypesError> {
        let config: Self = serde_json::from_str(json).map_err(TypesError::invalid_config)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for internal consistency
    pub fn validate(&self) -> Result<(), TypesError> {
        let TradeConfig { token_in, token_out, amount_in, approval_amount, .. } = &self.trade;
        for asset in [token_in, token_out] {
            if asset.chain_id != self.chain_id {
                return Err(TypesError::invalid_config(format!(
                    "{asset} is on chain {}, expected {}",
                    asset.chain_id, self.chain_id
                )));
            }
        }

        if token_in == token_out {
            return Err(TypesError::invalid_config("token_in and token_out are the same asset"));
        }

        token_in.from_readable(amount_in)?;
        token_in.from_readable(approval_amount)?;
        Ok(())
    }

    /// The identity of the configured pool
    pub fn pool_identity(&self) -> PoolIdentity {
        PoolIdentity::new(
            self.trade.token_in.clone(),
            self.trade.token_out.clone(),
            self.trade.pool_fee,
        )
    }
}

// ------------
// | Defaults |
// ------------

/// The default chain ID
fn default_chain_id() -> u64 {
    MAINNET_CHAIN_ID
}

/// The default approval amount
fn default_approval_amount() -> String {
    DEFAULT_APPROVAL_AMOUNT.to_string()
}

/// The default RPC timeout
fn default_rpc_timeout_ms() -> u64 {
    DEFAULT_RPC_TIMEOUT_MS
}

/// The default maximum quote age
fn default_max_quote_age_secs() -> u64 {
    DEFAULT_MAX_QUOTE_AGE_SECS
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A minimal configuration trading USDC for WETH
    const MINIMAL_CONFIG: &str = r#"{
        "trade": {
            "token_in": {
                "chain_id": 1,
                "address": "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48",
                "decimals": 6,
                "symbol": "USDC"
            },
            "token_out": {
                "chain_id": 1,
                "address": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2",
                "decimals": 18,
                "symbol": "WETH"
            },
            "amount_in": "1000",
            "pool_fee": 3000
        }
    }"#;

    /// Test that omitted fields take their defaults
    #[test]
    fn test_minimal_config_defaults() {
        let config = TraderConfig::from_json_str(MINIMAL_CONFIG).unwrap();

        assert_eq!(config.chain_id, MAINNET_CHAIN_ID);
        assert_eq!(config.contracts, ContractAddresses::default());
        assert_eq!(config.slippage.bips, 50);
        assert_eq!(config.gas, GasConfig::default());
        assert_eq!(config.trade.approval_amount, DEFAULT_APPROVAL_AMOUNT);
        assert_eq!(config.trade.token_in, Asset::usdc_mainnet());
        assert_eq!(config.pool_identity().fee, FeeTier::Medium);
    }

    /// Test that an unsupported fee tier is rejected
    #[test]
    fn test_invalid_fee_tier() {
        let json = MINIMAL_CONFIG.replace("3000", "2500");
        assert!(TraderConfig::from_json_str(&json).is_err());
    }

    /// Test that assets on the wrong chain are rejected
    #[test]
    fn test_chain_mismatch() {
        let json = MINIMAL_CONFIG.replace("\"trade\"", "\"chain_id\": 10, \"trade\"");
        assert!(TraderConfig::from_json_str(&json).is_err());
    }

    /// Test that the dynamic gas strategy parses
    #[test]
    fn test_gas_strategy_parsing() {
        let gas: GasConfig = serde_json::from_str(r#"{ "strategy": "latest_base_fee" }"#).unwrap();
        assert_eq!(gas, GasConfig::LatestBaseFee);

        let gas: GasConfig = serde_json::from_str(
            r#"{ "strategy": "static", "max_fee_per_gas": 1, "max_priority_fee_per_gas": 2 }"#,
        )
        .unwrap();
        assert_eq!(gas, GasConfig::Static { max_fee_per_gas: 1, max_priority_fee_per_gas: 2 });
    }
}
