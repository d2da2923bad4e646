//! Trade assembly

use alloy_primitives::U256;
use tracing::{info, instrument};
use v3_trader_api::{
    asset::Asset,
    pool::PoolIdentity,
    quote::TradeType,
    trade::{Route, Trade},
};

use crate::error::TraderError;

use super::TradingClient;

impl TradingClient {
    /// Build an exact-input trade selling a readable `amount_in` of
    /// `asset_in` through the pool identified by `identity`
    #[instrument(skip_all, fields(pool = %identity, asset_in = %asset_in, amount_in = %amount_in))]
    pub async fn create_trade(
        &self,
        identity: &PoolIdentity,
        asset_in: &Asset,
        amount_in: &str,
    ) -> Result<Trade, TraderError> {
        let amount = asset_in.from_readable(amount_in)?;
        self.assemble_trade(identity, asset_in, amount, TradeType::ExactInput).await
    }

    /// Build an exact-output trade buying a readable `amount_out` of
    /// `asset_out` through the pool identified by `identity`
    #[instrument(skip_all, fields(pool = %identity, asset_out = %asset_out, amount_out = %amount_out))]
    pub async fn create_exact_output_trade(
        &self,
        identity: &PoolIdentity,
        asset_out: &Asset,
        amount_out: &str,
    ) -> Result<Trade, TraderError> {
        let amount = asset_out.from_readable(amount_out)?;
        self.assemble_trade(identity, asset_out, amount, TradeType::ExactOutput).await
    }

    /// Build the configured trade
    pub async fn create_configured_trade(&self) -> Result<Trade, TraderError> {
        let trade = &self.config.trade;
        self.create_trade(&self.config.pool_identity(), &trade.token_in, &trade.amount_in).await
    }

    /// Read the pool, quote against it and assemble the trade
    async fn assemble_trade(
        &self,
        identity: &PoolIdentity,
        fixed_asset: &Asset,
        amount: U256,
        trade_type: TradeType,
    ) -> Result<Trade, TraderError> {
        let pool = self.get_pool_info(identity).await?;
        let quote =
            self.quote_against_pool(identity, &pool, fixed_asset, amount, trade_type).await?;

        let route = Route::new(vec![pool], quote.asset_in.clone(), quote.asset_out.clone())?;
        let trade = Trade::create_unchecked(route, quote);

        info!(
            input = %trade.input_amount,
            output = %trade.output_amount,
            "assembled {trade_type} trade {} -> {}",
            trade.input_asset(),
            trade.output_asset(),
        );
        Ok(trade)
    }
}
