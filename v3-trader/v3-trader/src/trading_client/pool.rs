//! Pool snapshots

use tracing::{info, instrument};
use v3_trader_api::pool::{PoolIdentity, PoolState};

use crate::error::TraderError;

use super::TradingClient;

impl TradingClient {
    /// Read a snapshot of the pool identified by `identity`
    ///
    /// The pool's fields are read concurrently, so the snapshot is not
    /// guaranteed to reflect a single block. Fails if the pool at the derived
    /// address does not trade the identified pair at the identified fee
    #[instrument(skip_all, fields(pool = %identity))]
    pub async fn get_pool_info(&self, identity: &PoolIdentity) -> Result<PoolState, TraderError> {
        let reader = self.chain.reader()?;
        let address = identity.pool_address(self.config.contracts.factory);
        let pools = &reader.pools;

        let (token0, token1, fee, tick_spacing, liquidity, slot0, block_number) = self
            .rpc(async {
                futures::try_join!(
                    pools.token0(address),
                    pools.token1(address),
                    pools.fee(address),
                    pools.tick_spacing(address),
                    pools.liquidity(address),
                    pools.slot0(address),
                    reader.blocks.block_number(),
                )
            })
            .await?;

        let state = PoolState {
            address,
            token0,
            token1,
            fee,
            tick_spacing,
            liquidity,
            sqrt_price_x96: slot0.sqrt_price_x96,
            tick: slot0.tick,
            block_number,
        };

        if !state.matches(identity) {
            return Err(TraderError::contract_read(format!(
                "pool at {address:#x} does not trade {identity}"
            )));
        }

        info!(
            liquidity = state.liquidity,
            tick = state.tick,
            block = state.block_number,
            "read pool {address:#x}"
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use alloy_primitives::address;
    use v3_trader_api::{
        asset::Asset,
        pool::{FeeTier, PoolIdentity},
    };

    use crate::{
        chain::{
            mock_chain::{MockChain, MockHarness, MockWallet, MOCK_BLOCK_NUMBER, POOL_READS},
            ChainAccess,
        },
        error::TraderError,
        trading_client::test_helpers::test_client,
    };

    /// The USDC/WETH 0.3% pool
    fn usdc_weth_medium() -> PoolIdentity {
        PoolIdentity::new(Asset::usdc_mainnet(), Asset::weth_mainnet(), FeeTier::Medium)
    }

    /// Test that a snapshot issues its pool reads concurrently
    #[tokio::test]
    async fn test_pool_reads_are_concurrent() {
        let harness =
            MockHarness::new(MockChain::default().with_concurrent_pool_reads(), MockWallet::accepting());
        let client = test_client(harness.read_only_access());

        let state = client.get_pool_info(&usdc_weth_medium()).await.unwrap();

        assert_eq!(harness.chain.pool_calls.load(Ordering::SeqCst), POOL_READS);
        assert_eq!(state.address, address!("8ad599c3a0ff1de082011efddc58f1908eb6e6d8"));
        assert_eq!(state.fee, 3000);
        assert_eq!(state.tick_spacing, 60);
        assert_eq!(state.liquidity, 10_000_000);
        assert_eq!(state.tick, 0);
        assert_eq!(state.block_number, MOCK_BLOCK_NUMBER);
    }

    /// Test that reading without a provider fails before any call is made
    #[tokio::test]
    async fn test_no_provider() {
        let client = test_client(ChainAccess::disconnected());
        let res = client.get_pool_info(&usdc_weth_medium()).await;
        assert!(matches!(res, Err(TraderError::ProviderUnavailable)));
    }

    /// Test that a pool reporting a different fee is rejected
    #[tokio::test]
    async fn test_fee_mismatch() {
        let harness = MockHarness::new(MockChain::default(), MockWallet::accepting());
        let client = test_client(harness.read_only_access());

        let identity =
            PoolIdentity::new(Asset::usdc_mainnet(), Asset::weth_mainnet(), FeeTier::Low);
        let res = client.get_pool_info(&identity).await;
        assert!(matches!(res, Err(TraderError::ContractRead(_))));
    }

    /// Test that a reverting pool surfaces as a contract read error
    #[tokio::test]
    async fn test_reverting_pool() {
        let chain = MockChain { pool_reverts: true, ..Default::default() };
        let harness = MockHarness::new(chain, MockWallet::accepting());
        let client = test_client(harness.read_only_access());

        let res = client.get_pool_info(&usdc_weth_medium()).await;
        assert!(matches!(res, Err(TraderError::ContractRead(_))));
    }
}
