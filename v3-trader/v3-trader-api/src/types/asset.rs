//! Asset definitions and conversions between readable and raw amounts

use std::{
    fmt::Display,
    hash::{Hash, Hasher},
};

use alloy_primitives::{
    address,
    utils::{format_units, parse_units, ParseUnits},
    Address, U256,
};
use serde::{Deserialize, Serialize};

use crate::{error::TypesError, serialization::address_string_serialization};

// -------------
// | Constants |
// -------------

/// The chain ID of Ethereum mainnet
pub const MAINNET_CHAIN_ID: u64 = 1;
/// The address of wrapped ether on mainnet
pub const WETH_MAINNET_ADDRESS: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
/// The address of USDC on mainnet
pub const USDC_MAINNET_ADDRESS: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

// ---------
// | Asset |
// ---------

/// An ERC-20 asset on a given chain
///
/// Two assets are equal iff they share a chain and a contract address, the
/// remaining fields are descriptive
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Asset {
    /// The chain the asset lives on
    pub chain_id: u64,
    /// The token contract address
    #[serde(with = "address_string_serialization")]
    pub address: Address,
    /// The decimal precision of the token
    pub decimals: u8,
    /// The ticker symbol
    pub symbol: String,
    /// The display name, if known
    #[serde(default)]
    pub name: Option<String>,
}

impl Asset {
    /// Create a new asset
    pub fn new(chain_id: u64, address: Address, decimals: u8, symbol: &str) -> Self {
        Self { chain_id, address, decimals, symbol: symbol.to_string(), name: None }
    }

    /// Attach a display name to the asset
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Wrapped ether on mainnet
    pub fn weth_mainnet() -> Self {
        Self::new(MAINNET_CHAIN_ID, WETH_MAINNET_ADDRESS, 18, "WETH").with_name("Wrapped Ether")
    }

    /// USDC on mainnet
    pub fn usdc_mainnet() -> Self {
        Self::new(MAINNET_CHAIN_ID, USDC_MAINNET_ADDRESS, 6, "USDC").with_name("USD//C")
    }

    /// Whether this asset is token0 when paired with `other`, i.e. whether it
    /// has the lower address
    pub fn sorts_before(&self, other: &Asset) -> bool {
        self.address < other.address
    }

    /// Convert a readable amount of this asset into raw units
    pub fn from_readable(&self, amount: &str) -> Result<U256, TypesError> {
        from_readable_amount(amount, self.decimals)
    }

    /// Convert a raw amount of this asset into a readable decimal string
    pub fn to_readable(&self, amount: U256) -> Result<String, TypesError> {
        to_readable_amount(amount, self.decimals)
    }
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Asset {}

impl Hash for Asset {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({:#x})", self.symbol, self.address)
    }
}

// ----------------------
// | Amount Conversions |
// ----------------------

/// Convert a readable decimal amount (e.g. "1000.5") into raw units of a
/// token with the given decimal precision
///
/// Digits beyond the token's precision are truncated. Negative amounts are
/// rejected
pub fn from_readable_amount(amount: &str, decimals: u8) -> Result<U256, TypesError> {
    let amount = amount.trim();
    match parse_units(amount, decimals).map_err(TypesError::invalid_amount)? {
        ParseUnits::U256(raw) => Ok(raw),
        ParseUnits::I256(_) => {
            Err(TypesError::invalid_amount(format!("negative amount: {amount}")))
        },
    }
}

/// Convert a raw amount into a readable decimal string for a token with the
/// given decimal precision, without trailing fractional zeros
pub fn to_readable_amount(amount: U256, decimals: u8) -> Result<String, TypesError> {
    let formatted = format_units(amount, decimals).map_err(TypesError::invalid_amount)?;
    if !formatted.contains('.') {
        return Ok(formatted);
    }

    Ok(formatted.trim_end_matches('0').trim_end_matches('.').to_string())
}
