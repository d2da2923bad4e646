//! In-memory chain implementations for tests

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use alloy::rpc::types::TransactionRequest;
use alloy_primitives::{address, aliases::U160, Address, B256, U256};
use async_trait::async_trait;
use tokio::sync::{Barrier, Mutex};
use v3_trader_api::{
    asset::Asset, pool::PoolState, trade::Trade, transaction::TransactionState,
};

use crate::error::TraderError;

use super::{
    router::SwapRouterEncoder, BlockReader, ChainAccess, Erc20Contract, MethodParameters,
    PoolContract, QuoterContract, ReadConnection, SingleQuoteRequest, Slot0, SwapOptions,
    SwapRouterContract, TransactionSubmitter,
};

/// The number of calls a pool snapshot makes to the pool contract
pub(crate) const POOL_READS: usize = 6;
/// The block number reported by the mock
pub(crate) const MOCK_BLOCK_NUMBER: u64 = 18_000_000;
/// The address of the mock signer
pub(crate) const MOCK_SIGNER: Address = address!("aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");

/// The USDC/WETH 0.3% pool state served by default
pub(crate) fn usdc_weth_pool_state() -> PoolState {
    PoolState {
        address: Address::ZERO,
        token0: Asset::usdc_mainnet().address,
        token1: Asset::weth_mainnet().address,
        fee: 3000,
        tick_spacing: 60,
        liquidity: 10_000_000,
        sqrt_price_x96: U160::from(1u128 << 96),
        tick: 0,
        block_number: MOCK_BLOCK_NUMBER,
    }
}

// ----------
// | Reader |
// ----------

/// An in-memory read connection
pub(crate) struct MockChain {
    /// The pool state served for every pool address
    pub pool: PoolState,
    /// Whether pool reads revert
    pub pool_reverts: bool,
    /// The amount the quoter returns, or `None` to revert
    pub quote_amount: Option<U256>,
    /// The allowance reported for every token
    pub allowance: U256,
    /// The latest base fee
    pub base_fee: u128,
    /// The number of pool contract calls made
    pub pool_calls: AtomicUsize,
    /// If set, every pool call waits here until all of them are in flight
    pub pool_barrier: Option<Barrier>,
    /// The quote requests received
    pub quote_requests: Mutex<Vec<SingleQuoteRequest>>,
    /// The number of allowance reads made
    pub allowance_calls: AtomicUsize,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            pool: usdc_weth_pool_state(),
            pool_reverts: false,
            quote_amount: Some(U256::from(500_000_000_000_000_000u64)),
            allowance: U256::ZERO,
            base_fee: 30_000_000_000,
            pool_calls: AtomicUsize::new(0),
            pool_barrier: None,
            quote_requests: Mutex::new(Vec::new()),
            allowance_calls: AtomicUsize::new(0),
        }
    }
}

impl MockChain {
    /// Require the pool reads of a snapshot to be in flight concurrently
    pub fn with_concurrent_pool_reads(mut self) -> Self {
        self.pool_barrier = Some(Barrier::new(POOL_READS));
        self
    }

    /// Record a pool call and return the pool state
    async fn read_pool(&self) -> Result<&PoolState, TraderError> {
        self.pool_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(barrier) = &self.pool_barrier {
            barrier.wait().await;
        }

        if self.pool_reverts {
            return Err(TraderError::contract_read("execution reverted"));
        }
        Ok(&self.pool)
    }
}

#[async_trait]
impl PoolContract for MockChain {
    async fn token0(&self, _pool: Address) -> Result<Address, TraderError> {
        Ok(self.read_pool().await?.token0)
    }

    async fn token1(&self, _pool: Address) -> Result<Address, TraderError> {
        Ok(self.read_pool().await?.token1)
    }

    async fn fee(&self, _pool: Address) -> Result<u32, TraderError> {
        Ok(self.read_pool().await?.fee)
    }

    async fn tick_spacing(&self, _pool: Address) -> Result<i32, TraderError> {
        Ok(self.read_pool().await?.tick_spacing)
    }

    async fn liquidity(&self, _pool: Address) -> Result<u128, TraderError> {
        Ok(self.read_pool().await?.liquidity)
    }

    async fn slot0(&self, _pool: Address) -> Result<Slot0, TraderError> {
        let pool = self.read_pool().await?;
        Ok(Slot0 { sqrt_price_x96: pool.sqrt_price_x96, tick: pool.tick })
    }
}

#[async_trait]
impl QuoterContract for MockChain {
    async fn quote_single(
        &self,
        _quoter: Address,
        request: &SingleQuoteRequest,
    ) -> Result<U256, TraderError> {
        self.quote_requests.lock().await.push(request.clone());
        self.quote_amount.ok_or_else(|| TraderError::quote_unavailable("execution reverted"))
    }
}

#[async_trait]
impl Erc20Contract for MockChain {
    async fn allowance(
        &self,
        _token: Address,
        _owner: Address,
        _spender: Address,
    ) -> Result<U256, TraderError> {
        self.allowance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.allowance)
    }
}

#[async_trait]
impl BlockReader for MockChain {
    async fn block_number(&self) -> Result<u64, TraderError> {
        Ok(MOCK_BLOCK_NUMBER)
    }

    async fn latest_base_fee(&self) -> Result<u128, TraderError> {
        Ok(self.base_fee)
    }
}

// ----------
// | Wallet |
// ----------

/// A signer that records submissions and replies with scripted states
pub(crate) struct MockWallet {
    /// The states returned, in order; `Sent` with a fresh hash once exhausted
    pub responses: Mutex<VecDeque<TransactionState>>,
    /// The transactions submitted
    pub submitted: Mutex<Vec<TransactionRequest>>,
}

impl MockWallet {
    /// A wallet that accepts every transaction
    pub fn accepting() -> Self {
        Self::with_responses(vec![])
    }

    /// A wallet replying with the given states before accepting
    pub fn with_responses(responses: Vec<TransactionState>) -> Self {
        Self { responses: Mutex::new(responses.into()), submitted: Mutex::new(Vec::new()) }
    }
}

#[async_trait]
impl TransactionSubmitter for MockWallet {
    fn address(&self) -> Address {
        MOCK_SIGNER
    }

    async fn submit(&self, tx: TransactionRequest) -> TransactionState {
        let mut submitted = self.submitted.lock().await;
        submitted.push(tx);

        let scripted = self.responses.lock().await.pop_front();
        scripted.unwrap_or_else(|| TransactionState::Sent(B256::repeat_byte(submitted.len() as u8)))
    }
}

// ----------
// | Router |
// ----------

/// A router encoder that records the options it is asked to encode
#[derive(Default)]
pub(crate) struct RecordingRouter {
    /// The options of every encode call
    pub calls: std::sync::Mutex<Vec<SwapOptions>>,
}

impl RecordingRouter {
    /// The options of every encode call so far
    pub fn recorded(&self) -> Vec<SwapOptions> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

impl SwapRouterContract for RecordingRouter {
    fn swap_call_parameters(
        &self,
        trade: &Trade,
        options: &SwapOptions,
    ) -> Result<MethodParameters, TraderError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(*options);
        }
        SwapRouterEncoder.swap_call_parameters(trade, options)
    }
}

// -----------
// | Harness |
// -----------

/// The mocks behind a test chain handle
pub(crate) struct MockHarness {
    /// The read connection
    pub chain: Arc<MockChain>,
    /// The signer
    pub wallet: Arc<MockWallet>,
    /// The router encoder
    pub router: Arc<RecordingRouter>,
}

impl MockHarness {
    /// Wire up the mocks
    pub fn new(chain: MockChain, wallet: MockWallet) -> Self {
        Self {
            chain: Arc::new(chain),
            wallet: Arc::new(wallet),
            router: Arc::new(RecordingRouter::default()),
        }
    }

    /// A handle with both a reader and a signer
    pub fn access(&self) -> ChainAccess {
        ChainAccess::new(Some(self.read_connection()), Some(self.wallet.clone()))
            .with_router(self.router.clone())
    }

    /// A handle with a reader but no signer
    pub fn read_only_access(&self) -> ChainAccess {
        ChainAccess::new(Some(self.read_connection()), None).with_router(self.router.clone())
    }

    /// The read connection over the mock chain
    fn read_connection(&self) -> ReadConnection {
        ReadConnection {
            pools: self.chain.clone(),
            quoter: self.chain.clone(),
            tokens: self.chain.clone(),
            blocks: self.chain.clone(),
        }
    }
}
