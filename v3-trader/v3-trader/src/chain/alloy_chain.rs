//! Chain access over an alloy provider

use std::sync::Arc;

use alloy::{
    eips::BlockId,
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::TransactionRequest,
    signers::local::PrivateKeySigner,
    transports::{http::reqwest::Url, RpcError},
};
use alloy_primitives::{
    aliases::{U160, U24},
    Address, U256,
};
use async_trait::async_trait;
use tracing::{info, instrument, warn};
use v3_trader_api::{quote::TradeType, transaction::TransactionState};

use crate::error::TraderError;

use super::{
    abis::{IQuoter, IUniswapV3Pool, IERC20},
    BlockReader, ChainAccess, Erc20Contract, PoolContract, QuoterContract, ReadConnection,
    SingleQuoteRequest, Slot0, TransactionSubmitter,
};

// -----------
// | Helpers |
// -----------

/// Map a failed contract read, keeping transport failures distinct
fn read_error(e: alloy_contract::Error) -> TraderError {
    match e {
        alloy_contract::Error::TransportError(RpcError::Transport(kind)) => TraderError::rpc(kind),
        e => TraderError::contract_read(e),
    }
}

/// Map a failed quoter simulation; a revert means the pool cannot fill it
fn quote_error(e: alloy_contract::Error) -> TraderError {
    match e {
        alloy_contract::Error::TransportError(RpcError::Transport(kind)) => TraderError::rpc(kind),
        e => TraderError::quote_unavailable(e),
    }
}

/// Connect to an HTTP RPC endpoint, optionally with a signer
pub fn connect_http(
    rpc_url: &str,
    signer: Option<PrivateKeySigner>,
) -> Result<ChainAccess, TraderError> {
    let url: Url = rpc_url.parse().map_err(TraderError::config)?;
    let provider = DynProvider::new(ProviderBuilder::new().connect_http(url.clone()));
    let reader = ReadConnection::from_reader(AlloyChain::new(provider));

    let wallet = signer.map(|signer| {
        let wallet: Arc<dyn TransactionSubmitter> = Arc::new(AlloyWallet::new(signer, url));
        wallet
    });

    Ok(ChainAccess::new(Some(reader), wallet))
}

// ----------
// | Reader |
// ----------

/// Contract and block reads over a provider
#[derive(Clone)]
pub struct AlloyChain {
    /// The underlying provider
    provider: DynProvider,
}

impl AlloyChain {
    /// Create a new reader
    pub fn new(provider: DynProvider) -> Self {
        Self { provider }
    }

    /// A pool contract instance
    fn pool(&self, pool: Address) -> IUniswapV3Pool::IUniswapV3PoolInstance<DynProvider> {
        IUniswapV3Pool::new(pool, self.provider.clone())
    }
}

#[async_trait]
impl PoolContract for AlloyChain {
    async fn token0(&self, pool: Address) -> Result<Address, TraderError> {
        self.pool(pool).token0().call().await.map_err(read_error)
    }

    async fn token1(&self, pool: Address) -> Result<Address, TraderError> {
        self.pool(pool).token1().call().await.map_err(read_error)
    }

    async fn fee(&self, pool: Address) -> Result<u32, TraderError> {
        let fee = self.pool(pool).fee().call().await.map_err(read_error)?;
        Ok(fee.to::<u32>())
    }

    async fn tick_spacing(&self, pool: Address) -> Result<i32, TraderError> {
        let spacing = self.pool(pool).tickSpacing().call().await.map_err(read_error)?;
        i32::try_from(spacing).map_err(TraderError::contract_read)
    }

    async fn liquidity(&self, pool: Address) -> Result<u128, TraderError> {
        self.pool(pool).liquidity().call().await.map_err(read_error)
    }

    async fn slot0(&self, pool: Address) -> Result<Slot0, TraderError> {
        let slot0 = self.pool(pool).slot0().call().await.map_err(read_error)?;
        let tick = i32::try_from(slot0.tick).map_err(TraderError::contract_read)?;
        Ok(Slot0 { sqrt_price_x96: slot0.sqrtPriceX96, tick })
    }
}

#[async_trait]
impl QuoterContract for AlloyChain {
    async fn quote_single(
        &self,
        quoter: Address,
        request: &SingleQuoteRequest,
    ) -> Result<U256, TraderError> {
        let quoter = IQuoter::new(quoter, self.provider.clone());
        let fee = U24::try_from(request.fee).map_err(TraderError::parse)?;
        let SingleQuoteRequest { token_in, token_out, amount, .. } = *request;

        // The quoter is not a view contract; `call` simulates it without a
        // transaction
        match request.trade_type {
            TradeType::ExactInput => quoter
                .quoteExactInputSingle(token_in, token_out, fee, amount, U160::ZERO)
                .call()
                .await
                .map_err(quote_error),
            TradeType::ExactOutput => quoter
                .quoteExactOutputSingle(token_in, token_out, fee, amount, U160::ZERO)
                .call()
                .await
                .map_err(quote_error),
        }
    }
}

#[async_trait]
impl Erc20Contract for AlloyChain {
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, TraderError> {
        let erc20 = IERC20::new(token, self.provider.clone());
        erc20.allowance(owner, spender).call().await.map_err(read_error)
    }
}

#[async_trait]
impl BlockReader for AlloyChain {
    async fn block_number(&self) -> Result<u64, TraderError> {
        self.provider.get_block_number().await.map_err(TraderError::rpc)
    }

    async fn latest_base_fee(&self) -> Result<u128, TraderError> {
        let latest_block = self
            .provider
            .get_block(BlockId::latest())
            .await
            .map_err(TraderError::rpc)?
            .ok_or(TraderError::rpc("no latest block found"))?;

        let base_fee = latest_block
            .header
            .base_fee_per_gas
            .ok_or(TraderError::rpc("no base fee found"))?;
        Ok(base_fee as u128)
    }
}

// ----------
// | Wallet |
// ----------

/// Signs with a local key and submits through a provider
#[derive(Clone)]
pub struct AlloyWallet {
    /// The signing provider
    provider: DynProvider,
    /// The signer's address
    address: Address,
}

impl AlloyWallet {
    /// Create a wallet signing with `signer` and submitting to `url`
    pub fn new(signer: PrivateKeySigner, url: Url) -> Self {
        let address = signer.address();
        let provider = ProviderBuilder::new().wallet(signer).connect_http(url);
        Self { provider: DynProvider::new(provider), address }
    }
}

#[async_trait]
impl TransactionSubmitter for AlloyWallet {
    fn address(&self) -> Address {
        self.address
    }

    #[instrument(skip_all, fields(from = %self.address))]
    async fn submit(&self, tx: TransactionRequest) -> TransactionState {
        match self.provider.send_transaction(tx).await {
            Ok(pending) => {
                let hash = *pending.tx_hash();
                info!("transaction accepted: {hash:#x}");
                TransactionState::Sent(hash)
            },
            // Failures while filling or signing never reach the node
            Err(RpcError::LocalUsageError(e)) => {
                warn!("signer refused transaction: {e}");
                TransactionState::Rejected(e.to_string())
            },
            Err(e) => {
                warn!("node refused transaction: {e}");
                TransactionState::Failed(e.to_string())
            },
        }
    }
}
