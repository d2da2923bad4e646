//! Calldata encoding for the swap router

use alloy_primitives::{
    aliases::{U160, U24},
    U256,
};
use alloy_sol_types::SolCall;
use v3_trader_api::{quote::TradeType, trade::Trade};

use crate::error::TraderError;

use super::{
    abis::ISwapRouter::{
        exactInputCall, exactInputSingleCall, exactOutputCall, exactOutputSingleCall,
        ExactInputParams, ExactInputSingleParams, ExactOutputParams, ExactOutputSingleParams,
    },
    MethodParameters, SwapOptions, SwapRouterContract,
};

/// Encodes trades as calls to the v3 swap router
///
/// Single-pool routes use the `*Single` entrypoints, longer routes the packed
/// path entrypoints. Inputs are always ERC20s, so no value is attached
#[derive(Clone, Copy, Debug, Default)]
pub struct SwapRouterEncoder;

impl SwapRouterContract for SwapRouterEncoder {
    fn swap_call_parameters(
        &self,
        trade: &Trade,
        options: &SwapOptions,
    ) -> Result<MethodParameters, TraderError> {
        let route = &trade.route;
        let deadline = U256::from(options.deadline);
        let recipient = options.recipient;

        let calldata = match (route.is_single_pool(), trade.trade_type) {
            (true, TradeType::ExactInput) => exactInputSingleCall {
                params: ExactInputSingleParams {
                    tokenIn: route.input.address,
                    tokenOut: route.output.address,
                    fee: single_pool_fee(trade)?,
                    recipient,
                    deadline,
                    amountIn: trade.input_amount,
                    amountOutMinimum: options.amount_out_minimum,
                    sqrtPriceLimitX96: U160::ZERO,
                },
            }
            .abi_encode(),
            (true, TradeType::ExactOutput) => exactOutputSingleCall {
                params: ExactOutputSingleParams {
                    tokenIn: route.input.address,
                    tokenOut: route.output.address,
                    fee: single_pool_fee(trade)?,
                    recipient,
                    deadline,
                    amountOut: trade.output_amount,
                    amountInMaximum: options.amount_in_maximum,
                    sqrtPriceLimitX96: U160::ZERO,
                },
            }
            .abi_encode(),
            (false, TradeType::ExactInput) => exactInputCall {
                params: ExactInputParams {
                    path: route.encoded_path(TradeType::ExactInput),
                    recipient,
                    deadline,
                    amountIn: trade.input_amount,
                    amountOutMinimum: options.amount_out_minimum,
                },
            }
            .abi_encode(),
            (false, TradeType::ExactOutput) => exactOutputCall {
                params: ExactOutputParams {
                    path: route.encoded_path(TradeType::ExactOutput),
                    recipient,
                    deadline,
                    amountOut: trade.output_amount,
                    amountInMaximum: options.amount_in_maximum,
                },
            }
            .abi_encode(),
        };

        Ok(MethodParameters { calldata: calldata.into(), value: U256::ZERO })
    }
}

/// The fee of a single-pool route as the router's `uint24`
fn single_pool_fee(trade: &Trade) -> Result<U24, TraderError> {
    let pool = trade
        .route
        .pools
        .first()
        .ok_or_else(|| TraderError::parse("trade route has no pools"))?;
    U24::try_from(pool.fee).map_err(TraderError::parse)
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, Address};
    use v3_trader_api::{
        asset::Asset,
        pool::PoolState,
        quote::Quote,
        trade::{Route, SlippageTolerance},
    };

    use super::*;

    /// The recipient used in tests
    const RECIPIENT: Address = address!("00000000000000000000000000000000000000aa");

    /// A USDC/WETH 0.3% pool snapshot
    fn usdc_weth_pool() -> PoolState {
        let usdc = Asset::usdc_mainnet();
        let weth = Asset::weth_mainnet();
        PoolState {
            address: Address::repeat_byte(1),
            token0: usdc.address,
            token1: weth.address,
            fee: 3000,
            tick_spacing: 60,
            liquidity: 10_000_000,
            sqrt_price_x96: U160::from(1u128 << 96),
            tick: 0,
            block_number: 1,
        }
    }

    /// Build a single-pool trade of the given type
    fn trade(trade_type: TradeType) -> Trade {
        let usdc = Asset::usdc_mainnet();
        let weth = Asset::weth_mainnet();
        let route = Route::new(vec![usdc_weth_pool()], usdc.clone(), weth.clone()).unwrap();
        let quote = Quote {
            asset_in: usdc,
            asset_out: weth,
            trade_type,
            requested_amount: U256::from(1_000_000_000u64),
            quoted_amount: U256::from(500_000_000_000_000_000u64),
            quoted_at: 1_700_000_000,
            block_number: 1,
        };
        Trade::create_unchecked(route, quote)
    }

    /// Test the exact-input single-pool encoding
    #[test]
    fn test_exact_input_single_encoding() {
        let trade = trade(TradeType::ExactInput);
        let slippage = SlippageTolerance::default();
        let options = SwapOptions {
            recipient: RECIPIENT,
            deadline: 1_700_001_200,
            amount_out_minimum: trade.minimum_amount_out(slippage),
            amount_in_maximum: trade.maximum_amount_in(slippage),
        };

        let params = SwapRouterEncoder.swap_call_parameters(&trade, &options).unwrap();
        assert_eq!(params.value, U256::ZERO);

        let call = exactInputSingleCall::abi_decode(&params.calldata).unwrap();
        assert_eq!(call.params.tokenIn, Asset::usdc_mainnet().address);
        assert_eq!(call.params.tokenOut, Asset::weth_mainnet().address);
        assert_eq!(call.params.fee, U24::from(3000u32));
        assert_eq!(call.params.recipient, RECIPIENT);
        assert_eq!(call.params.deadline, U256::from(1_700_001_200u64));
        assert_eq!(call.params.amountIn, U256::from(1_000_000_000u64));
        assert_eq!(call.params.amountOutMinimum, options.amount_out_minimum);
        assert!(call.params.amountOutMinimum < trade.output_amount);
        assert_eq!(call.params.sqrtPriceLimitX96, U160::ZERO);
    }

    /// Test the exact-output single-pool encoding
    #[test]
    fn test_exact_output_single_encoding() {
        let trade = trade(TradeType::ExactOutput);
        let slippage = SlippageTolerance::from_bips(100);
        let options = SwapOptions {
            recipient: RECIPIENT,
            deadline: 42,
            amount_out_minimum: trade.minimum_amount_out(slippage),
            amount_in_maximum: trade.maximum_amount_in(slippage),
        };

        let params = SwapRouterEncoder.swap_call_parameters(&trade, &options).unwrap();
        let call = exactOutputSingleCall::abi_decode(&params.calldata).unwrap();
        assert_eq!(call.params.amountOut, U256::from(1_000_000_000u64));
        // 1% over the quoted input
        assert_eq!(call.params.amountInMaximum, U256::from(505_000_000_000_000_000u64));
        assert_eq!(call.params.deadline, U256::from(42u64));
    }
}
