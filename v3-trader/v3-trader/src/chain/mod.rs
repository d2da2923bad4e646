//! Access to the chain
//!
//! Each contract the trader talks to sits behind a narrow trait, so the
//! trading logic can be exercised against in-memory implementations. A
//! [`ChainAccess`] bundles an optional read connection and an optional signer;
//! operations that need either fail with a typed error when it is absent

pub mod abis;
pub mod alloy_chain;
#[cfg(test)]
pub(crate) mod mock_chain;
pub mod router;

use std::sync::Arc;

use alloy::rpc::types::TransactionRequest;
use alloy_primitives::{aliases::U160, Address, Bytes, U256};
use async_trait::async_trait;
use v3_trader_api::{quote::TradeType, trade::Trade, transaction::TransactionState};

use crate::error::TraderError;

use self::router::SwapRouterEncoder;

// ---------
// | Types |
// ---------

/// The price fields of a pool's `slot0`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot0 {
    /// The sqrt of the price as a Q64.96
    pub sqrt_price_x96: U160,
    /// The current tick
    pub tick: i32,
}

/// A single-pool swap to simulate against the quoter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SingleQuoteRequest {
    /// The address of the asset sold
    pub token_in: Address,
    /// The address of the asset bought
    pub token_out: Address,
    /// The pool fee in hundredths of a bip
    pub fee: u32,
    /// The fixed amount, in raw units
    pub amount: U256,
    /// Which side `amount` fixes
    pub trade_type: TradeType,
}

/// The execution parameters layered onto a trade when encoding a swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SwapOptions {
    /// The receiver of the swap output
    pub recipient: Address,
    /// The unix timestamp after which the swap reverts
    pub deadline: u64,
    /// The smallest output accepted
    pub amount_out_minimum: U256,
    /// The largest input spent
    pub amount_in_maximum: U256,
}

/// An encoded router call
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodParameters {
    /// The calldata
    pub calldata: Bytes,
    /// The native value to attach
    pub value: U256,
}

// ----------
// | Traits |
// ----------

/// Reads from a pool contract
#[async_trait]
pub trait PoolContract: Send + Sync {
    /// The lower-sorted token of the pool
    async fn token0(&self, pool: Address) -> Result<Address, TraderError>;
    /// The higher-sorted token of the pool
    async fn token1(&self, pool: Address) -> Result<Address, TraderError>;
    /// The pool's fee
    async fn fee(&self, pool: Address) -> Result<u32, TraderError>;
    /// The pool's tick spacing
    async fn tick_spacing(&self, pool: Address) -> Result<i32, TraderError>;
    /// The liquidity in range
    async fn liquidity(&self, pool: Address) -> Result<u128, TraderError>;
    /// The current price and tick
    async fn slot0(&self, pool: Address) -> Result<Slot0, TraderError>;
}

/// Simulated swaps against the quoter contract
#[async_trait]
pub trait QuoterContract: Send + Sync {
    /// Simulate a single-pool swap, returning the counter amount
    async fn quote_single(
        &self,
        quoter: Address,
        request: &SingleQuoteRequest,
    ) -> Result<U256, TraderError>;
}

/// Reads from ERC20 contracts
#[async_trait]
pub trait Erc20Contract: Send + Sync {
    /// The amount `spender` may transfer on behalf of `owner`
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, TraderError>;
}

/// Reads of chain-level state
#[async_trait]
pub trait BlockReader: Send + Sync {
    /// The latest block number
    async fn block_number(&self) -> Result<u64, TraderError>;
    /// The base fee of the latest block, in wei
    async fn latest_base_fee(&self) -> Result<u128, TraderError>;
}

/// Encodes router calls for a trade
pub trait SwapRouterContract: Send + Sync {
    /// Encode the call executing `trade` under `options`
    fn swap_call_parameters(
        &self,
        trade: &Trade,
        options: &SwapOptions,
    ) -> Result<MethodParameters, TraderError>;
}

/// Signs and submits transactions
///
/// Submission never fails with an error; the outcome is reported through the
/// returned state
#[async_trait]
pub trait TransactionSubmitter: Send + Sync {
    /// The address transactions are sent from
    fn address(&self) -> Address;
    /// Sign and submit a transaction, returning once the node has accepted
    /// or refused it
    async fn submit(&self, tx: TransactionRequest) -> TransactionState;
}

// ---------------
// | Chain Access |
// ---------------

/// The read side of a chain connection
#[derive(Clone)]
pub struct ReadConnection {
    /// Pool reads
    pub pools: Arc<dyn PoolContract>,
    /// Quoter simulations
    pub quoter: Arc<dyn QuoterContract>,
    /// Token reads
    pub tokens: Arc<dyn Erc20Contract>,
    /// Block reads
    pub blocks: Arc<dyn BlockReader>,
}

impl ReadConnection {
    /// Build a read connection from a single implementation of every read
    /// interface
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: PoolContract + QuoterContract + Erc20Contract + BlockReader + 'static,
    {
        let reader = Arc::new(reader);
        Self { pools: reader.clone(), quoter: reader.clone(), tokens: reader.clone(), blocks: reader }
    }
}

/// A handle on the chain: an optional read connection, an optional signer and
/// the router encoder
#[derive(Clone)]
pub struct ChainAccess {
    /// The read connection, if any
    reader: Option<ReadConnection>,
    /// The signer, if any
    wallet: Option<Arc<dyn TransactionSubmitter>>,
    /// The swap router encoder
    router: Arc<dyn SwapRouterContract>,
}

impl ChainAccess {
    /// Create a new handle
    pub fn new(
        reader: Option<ReadConnection>,
        wallet: Option<Arc<dyn TransactionSubmitter>>,
    ) -> Self {
        Self { reader, wallet, router: Arc::new(SwapRouterEncoder) }
    }

    /// Create a handle with neither a reader nor a signer
    pub fn disconnected() -> Self {
        Self::new(None, None)
    }

    /// Replace the router encoder
    pub fn with_router(mut self, router: Arc<dyn SwapRouterContract>) -> Self {
        self.router = router;
        self
    }

    /// The read connection
    pub fn reader(&self) -> Result<&ReadConnection, TraderError> {
        self.reader.as_ref().ok_or(TraderError::ProviderUnavailable)
    }

    /// The signer
    pub fn wallet(&self) -> Result<&Arc<dyn TransactionSubmitter>, TraderError> {
        self.wallet.as_ref().ok_or(TraderError::NoSigner)
    }

    /// The router encoder
    pub fn router(&self) -> &dyn SwapRouterContract {
        self.router.as_ref()
    }
}
