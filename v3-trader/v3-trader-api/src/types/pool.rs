//! Pool identity, address derivation and on-chain pool state

use std::fmt::Display;

use alloy_primitives::{address, b256, aliases::U160, keccak256, Address, B256, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

use crate::{error::TypesError, types::asset::Asset};

// -------------
// | Constants |
// -------------

/// The address of the v3 pool factory on mainnet
pub const POOL_FACTORY_ADDRESS: Address = address!("1f98431c8ad98523631ae4a59f267346ea31f984");
/// The keccak hash of the pool contract's init code, used in CREATE2 address
/// derivation
pub const POOL_INIT_CODE_HASH: B256 =
    b256!("e34f199b19b2b4f47f68442619d555527d244f78a3297ea89325f843f87b8b54");

// ------------
// | Fee Tier |
// ------------

/// The fee tiers a pool may be deployed with, in hundredths of a bip
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
    /// 0.01%
    Lowest,
    /// 0.05%
    Low,
    /// 0.3%
    Medium,
    /// 1%
    High,
}

impl FeeTier {
    /// The fee in hundredths of a bip
    pub fn as_u32(&self) -> u32 {
        match self {
            FeeTier::Lowest => 100,
            FeeTier::Low => 500,
            FeeTier::Medium => 3000,
            FeeTier::High => 10_000,
        }
    }

    /// The tick spacing the factory enables for this fee
    pub fn tick_spacing(&self) -> i32 {
        match self {
            FeeTier::Lowest => 1,
            FeeTier::Low => 10,
            FeeTier::Medium => 60,
            FeeTier::High => 200,
        }
    }
}

impl TryFrom<u32> for FeeTier {
    type Error = TypesError;

    fn try_from(fee: u32) -> Result<Self, Self::Error> {
        match fee {
            100 => Ok(FeeTier::Lowest),
            500 => Ok(FeeTier::Low),
            3000 => Ok(FeeTier::Medium),
            10_000 => Ok(FeeTier::High),
            _ => Err(TypesError::InvalidFeeTier(fee)),
        }
    }
}

impl From<FeeTier> for u32 {
    fn from(fee: FeeTier) -> Self {
        fee.as_u32()
    }
}

impl Display for FeeTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u32())
    }
}

// -----------------
// | Pool Identity |
// -----------------

/// The identity of a pool: an asset pair and a fee tier
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PoolIdentity {
    /// One asset of the pair
    pub asset_a: Asset,
    /// The other asset of the pair
    pub asset_b: Asset,
    /// The pool's fee tier
    pub fee: FeeTier,
}

impl PoolIdentity {
    /// Create a new pool identity, in either asset order
    pub fn new(asset_a: Asset, asset_b: Asset, fee: FeeTier) -> Self {
        Self { asset_a, asset_b, fee }
    }

    /// The pair in canonical (token0, token1) order
    pub fn sorted_assets(&self) -> (&Asset, &Asset) {
        if self.asset_a.sorts_before(&self.asset_b) {
            (&self.asset_a, &self.asset_b)
        } else {
            (&self.asset_b, &self.asset_a)
        }
    }

    /// Whether the asset is one side of the pool
    pub fn contains(&self, asset: &Asset) -> bool {
        &self.asset_a == asset || &self.asset_b == asset
    }

    /// The asset on the other side of the pool from `asset`, if `asset` is in
    /// the pool
    pub fn counter_asset(&self, asset: &Asset) -> Option<&Asset> {
        if &self.asset_a == asset {
            Some(&self.asset_b)
        } else if &self.asset_b == asset {
            Some(&self.asset_a)
        } else {
            None
        }
    }

    /// Derive the pool's address under the given factory
    pub fn pool_address(&self, factory: Address) -> Address {
        compute_pool_address(factory, self.asset_a.address, self.asset_b.address, self.fee)
    }
}

impl Display for PoolIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (token0, token1) = self.sorted_assets();
        write!(f, "{}/{} ({})", token0.symbol, token1.symbol, self.fee)
    }
}

/// Derive a pool's CREATE2 address from the factory, the pair and the fee
///
/// Pure function of its inputs; the pair may be given in either order
pub fn compute_pool_address(
    factory: Address,
    token_a: Address,
    token_b: Address,
    fee: FeeTier,
) -> Address {
    let (token0, token1) = if token_a < token_b { (token_a, token_b) } else { (token_b, token_a) };
    let salt = keccak256((token0, token1, U256::from(fee.as_u32())).abi_encode());
    factory.create2(salt, POOL_INIT_CODE_HASH)
}

// --------------
// | Pool State |
// --------------

/// A snapshot of a pool's on-chain state
///
/// The fields are read by independent calls, so they are a best-effort
/// snapshot rather than an atomic read of one block
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    /// The pool's address
    pub address: Address,
    /// The lower-sorted token of the pair
    pub token0: Address,
    /// The higher-sorted token of the pair
    pub token1: Address,
    /// The pool fee in hundredths of a bip
    pub fee: u32,
    /// The tick spacing of the pool
    pub tick_spacing: i32,
    /// The in-range liquidity
    pub liquidity: u128,
    /// The current sqrt price as a Q64.96 value
    pub sqrt_price_x96: U160,
    /// The current tick
    pub tick: i32,
    /// The latest block number observed alongside the snapshot
    pub block_number: u64,
}

impl PoolState {
    /// Whether the pool trades the given token
    pub fn has_token(&self, token: Address) -> bool {
        self.token0 == token || self.token1 == token
    }

    /// The token on the other side of the pool, if `token` is in the pool
    pub fn other_token(&self, token: Address) -> Option<Address> {
        if token == self.token0 {
            Some(self.token1)
        } else if token == self.token1 {
            Some(self.token0)
        } else {
            None
        }
    }

    /// Whether this state is consistent with the given pool identity
    pub fn matches(&self, identity: &PoolIdentity) -> bool {
        let (token0, token1) = identity.sorted_assets();
        self.token0 == token0.address
            && self.token1 == token1.address
            && self.fee == identity.fee.as_u32()
    }
}
