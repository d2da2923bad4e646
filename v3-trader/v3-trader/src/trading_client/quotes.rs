//! Quotes from the on-chain quoter

use alloy_primitives::U256;
use tracing::{info, instrument};
use v3_trader_api::{
    asset::Asset,
    pool::{PoolIdentity, PoolState},
    quote::{Quote, TradeType},
};

use crate::{chain::SingleQuoteRequest, error::TraderError, helpers::get_current_time_seconds};

use super::TradingClient;

impl TradingClient {
    /// Quote the output of selling `amount_in` raw units of `asset_in` into
    /// the pool identified by `identity`
    pub async fn quote_exact_input(
        &self,
        identity: &PoolIdentity,
        asset_in: &Asset,
        amount_in: U256,
    ) -> Result<Quote, TraderError> {
        let pool = self.get_pool_info(identity).await?;
        self.quote_against_pool(identity, &pool, asset_in, amount_in, TradeType::ExactInput).await
    }

    /// Quote the input needed to buy `amount_out` raw units of `asset_out`
    /// from the pool identified by `identity`
    pub async fn quote_exact_output(
        &self,
        identity: &PoolIdentity,
        asset_out: &Asset,
        amount_out: U256,
    ) -> Result<Quote, TraderError> {
        let pool = self.get_pool_info(identity).await?;
        self.quote_against_pool(identity, &pool, asset_out, amount_out, TradeType::ExactOutput)
            .await
    }

    /// Quote selling a readable `amount_in` of `asset_in`, returning the
    /// output as a readable amount of the counter asset
    pub async fn quote_readable(
        &self,
        identity: &PoolIdentity,
        asset_in: &Asset,
        amount_in: &str,
    ) -> Result<String, TraderError> {
        let amount_in = asset_in.from_readable(amount_in)?;
        let quote = self.quote_exact_input(identity, asset_in, amount_in).await?;
        Ok(quote.asset_out.to_readable(quote.quoted_amount)?)
    }

    /// Quote the configured trade as a readable output amount
    pub async fn quote_configured(&self) -> Result<String, TraderError> {
        let trade = &self.config.trade;
        self.quote_readable(&self.config.pool_identity(), &trade.token_in, &trade.amount_in).await
    }

    /// Simulate a swap against an already-read pool
    ///
    /// `fixed_asset` is the asset whose amount is fixed: the input for an
    /// exact-input quote, the output for an exact-output quote
    #[instrument(skip_all, fields(pool = %identity, trade_type = %trade_type))]
    pub(crate) async fn quote_against_pool(
        &self,
        identity: &PoolIdentity,
        pool: &PoolState,
        fixed_asset: &Asset,
        amount: U256,
        trade_type: TradeType,
    ) -> Result<Quote, TraderError> {
        let counter_asset = identity.counter_asset(fixed_asset).ok_or_else(|| {
            TraderError::config(format!("{fixed_asset} is not traded by {identity}"))
        })?;
        if amount.is_zero() {
            return Err(TraderError::quote_unavailable("cannot quote a zero amount"));
        }

        let (asset_in, asset_out) = match trade_type {
            TradeType::ExactInput => (fixed_asset, counter_asset),
            TradeType::ExactOutput => (counter_asset, fixed_asset),
        };

        let request = SingleQuoteRequest {
            token_in: asset_in.address,
            token_out: asset_out.address,
            fee: pool.fee,
            amount,
            trade_type,
        };
        let reader = self.chain.reader()?;
        let quoted_amount =
            self.rpc(reader.quoter.quote_single(self.config.contracts.quoter, &request)).await?;

        if quoted_amount.is_zero() {
            return Err(TraderError::quote_unavailable(format!(
                "quoter returned zero for {amount} of {fixed_asset}"
            )));
        }

        info!("quoted {amount} {fixed_asset} against {quoted_amount} {counter_asset}");
        Ok(Quote {
            asset_in: asset_in.clone(),
            asset_out: asset_out.clone(),
            trade_type,
            requested_amount: amount,
            quoted_amount,
            quoted_at: get_current_time_seconds(),
            block_number: pool.block_number,
        })
    }
}
