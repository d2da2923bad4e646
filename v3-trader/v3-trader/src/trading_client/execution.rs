//! Token approvals and swap submission

use std::sync::Arc;

use alloy::{network::TransactionBuilder, rpc::types::TransactionRequest};
use alloy_primitives::{Address, Bytes, TxHash, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;
use tracing::{info, instrument, warn};
use v3_trader_api::{
    asset::Asset,
    config::GasConfig,
    trade::{Trade, SWAP_DEADLINE_SECS},
    transaction::TransactionState,
};

use crate::{
    chain::{abis::IERC20, SwapOptions, TransactionSubmitter},
    error::TraderError,
    helpers::get_current_time_seconds,
};

use super::TradingClient;

/// The outcome of a submitted swap
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SwapSubmission {
    /// The approval sent ahead of the swap, if the allowance was insufficient
    pub approval_tx: Option<TxHash>,
    /// The swap transaction
    pub swap_tx: TxHash,
    /// The unix timestamp after which the swap reverts
    pub deadline: u64,
    /// The smallest output the swap accepts
    pub amount_out_minimum: U256,
    /// The largest input the swap spends
    pub amount_in_maximum: U256,
}

impl TradingClient {
    /// Execute a trade: approve the router if needed, then submit the swap
    ///
    /// Returns once the node has accepted the swap; inclusion is not awaited
    pub async fn execute_trade(&self, trade: &Trade) -> Result<SwapSubmission, TraderError> {
        self.execute_trade_at(trade, get_current_time_seconds()).await
    }

    /// Execute a trade as of unix time `now`
    #[instrument(skip_all, fields(
        asset_in = %trade.input_asset(),
        asset_out = %trade.output_asset(),
        trade_type = %trade.trade_type,
    ))]
    pub async fn execute_trade_at(
        &self,
        trade: &Trade,
        now: u64,
    ) -> Result<SwapSubmission, TraderError> {
        let wallet = self.chain.wallet()?;
        let max_age_secs = self.config.max_quote_age_secs;
        if trade.quote.is_stale(now, max_age_secs) {
            return Err(TraderError::StaleQuote { age_secs: trade.quote.age(now), max_age_secs });
        }

        let slippage = self.config.slippage;
        let amount_in_maximum = trade.maximum_amount_in(slippage);
        let amount_out_minimum = trade.minimum_amount_out(slippage);
        let approval_tx =
            self.ensure_token_transfer_approval(trade.input_asset(), amount_in_maximum).await?;

        let options = SwapOptions {
            recipient: wallet.address(),
            deadline: now + SWAP_DEADLINE_SECS,
            amount_out_minimum,
            amount_in_maximum,
        };
        let params = self.chain.router().swap_call_parameters(trade, &options)?;
        let tx = self
            .build_transaction(self.config.contracts.swap_router, wallet.address(), params.calldata)
            .await?
            .with_value(params.value);

        match self.submit(wallet, tx).await {
            TransactionState::Sent(swap_tx) => {
                info!("swap submitted: {swap_tx:#x}");
                Ok(SwapSubmission {
                    approval_tx,
                    swap_tx,
                    deadline: options.deadline,
                    amount_out_minimum,
                    amount_in_maximum,
                })
            },
            state => Err(TraderError::SubmissionFailed { state }),
        }
    }

    /// Make sure the router may spend at least `required` of `asset`,
    /// approving it if the current allowance falls short
    ///
    /// Returns the approval's hash if one was sent. A refused approval aborts
    /// with `ApprovalRejected`
    #[instrument(skip_all, fields(asset = %asset, required = %required))]
    pub async fn ensure_token_transfer_approval(
        &self,
        asset: &Asset,
        required: U256,
    ) -> Result<Option<TxHash>, TraderError> {
        let wallet = self.chain.wallet()?;
        let reader = self.chain.reader()?;
        let spender = self.config.contracts.swap_router;

        let allowance =
            self.rpc(reader.tokens.allowance(asset.address, wallet.address(), spender)).await?;
        if allowance >= required {
            info!("already approved {asset} allowance for {spender:#x}");
            return Ok(None);
        }

        match self.approve_token_transfer(asset, required).await? {
            TransactionState::Sent(hash) => Ok(Some(hash)),
            state => {
                warn!("approval for {asset} not sent: {state}");
                Err(TraderError::ApprovalRejected { state })
            },
        }
    }

    /// Submit an approval letting the router spend `asset`
    ///
    /// Approves the configured approval amount, raised to `minimum` if that is
    /// larger. The outcome is reported through the returned state
    pub async fn approve_token_transfer(
        &self,
        asset: &Asset,
        minimum: U256,
    ) -> Result<TransactionState, TraderError> {
        let wallet = self.chain.wallet()?;
        let configured = asset.from_readable(&self.config.trade.approval_amount)?;
        let amount = configured.max(minimum);
        let spender = self.config.contracts.swap_router;

        let calldata = IERC20::approveCall { spender, value: amount }.abi_encode();
        let tx = self.build_transaction(asset.address, wallet.address(), calldata.into()).await?;

        info!("approving {amount} of {asset} for {spender:#x}");
        Ok(self.submit(wallet, tx).await)
    }

    // -----------
    // | Helpers |
    // -----------

    /// Build a transaction priced under the configured gas strategy
    async fn build_transaction(
        &self,
        to: Address,
        from: Address,
        input: Bytes,
    ) -> Result<TransactionRequest, TraderError> {
        let (max_fee_per_gas, max_priority_fee_per_gas) = self.fee_caps().await?;
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_from(from)
            .with_input(input)
            .with_max_fee_per_gas(max_fee_per_gas)
            .with_max_priority_fee_per_gas(max_priority_fee_per_gas);

        Ok(tx)
    }

    /// The max fee and max priority fee per gas, in wei
    async fn fee_caps(&self) -> Result<(u128, u128), TraderError> {
        match self.config.gas {
            GasConfig::Static { max_fee_per_gas, max_priority_fee_per_gas } => {
                Ok((max_fee_per_gas as u128, max_priority_fee_per_gas as u128))
            },
            GasConfig::LatestBaseFee => {
                let reader = self.chain.reader()?;
                let base_fee = self.rpc(reader.blocks.latest_base_fee()).await?;
                Ok((base_fee * 2, base_fee * 2))
            },
        }
    }

    /// Submit a transaction under the configured timeout
    async fn submit(
        &self,
        wallet: &Arc<dyn TransactionSubmitter>,
        tx: TransactionRequest,
    ) -> TransactionState {
        let timeout = self.rpc_timeout();
        match tokio::time::timeout(timeout, wallet.submit(tx)).await {
            Ok(state) => state,
            Err(_) => TransactionState::Failed(format!(
                "submission timed out after {}ms",
                timeout.as_millis()
            )),
        }
    }
}
