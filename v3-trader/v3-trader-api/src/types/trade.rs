//! Routes, trades and slippage bounds

use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    error::TypesError,
    types::{
        asset::Asset,
        pool::PoolState,
        quote::{Quote, TradeType},
        BASIS_POINTS_DENOMINATOR,
    },
};

/// The default slippage tolerance, in basis points
pub const DEFAULT_SLIPPAGE_BIPS: u32 = 50; // 0.50%
/// The number of seconds after submission a swap remains executable
pub const SWAP_DEADLINE_SECS: u64 = 60 * 20; // 20 minutes

// ---------------------
// | Slippage Tolerance |
// ---------------------

/// The maximum adverse price movement accepted between quote and execution,
/// in basis points out of 10,000
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlippageTolerance {
    /// The tolerance in basis points
    pub bips: u32,
}

impl SlippageTolerance {
    /// Create a tolerance from a number of basis points
    pub fn from_bips(bips: u32) -> Self {
        Self { bips }
    }

    /// The smallest output accepted for a quoted output amount
    pub fn minimum_amount_out(&self, amount_out: U256) -> U256 {
        let denominator = U256::from(BASIS_POINTS_DENOMINATOR + self.bips as u64);
        amount_out * U256::from(BASIS_POINTS_DENOMINATOR) / denominator
    }

    /// The largest input accepted for a quoted input amount
    pub fn maximum_amount_in(&self, amount_in: U256) -> U256 {
        let numerator = U256::from(BASIS_POINTS_DENOMINATOR + self.bips as u64);
        amount_in * numerator / U256::from(BASIS_POINTS_DENOMINATOR)
    }
}

impl Default for SlippageTolerance {
    fn default() -> Self {
        Self::from_bips(DEFAULT_SLIPPAGE_BIPS)
    }
}

// ---------
// | Route |
// ---------

/// An ordered list of pools leading from an input asset to an output asset
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    /// The pools traversed, in order
    pub pools: Vec<PoolState>,
    /// The asset entering the first pool
    pub input: Asset,
    /// The asset leaving the last pool
    pub output: Asset,
    /// The token addresses visited, from input to output
    token_path: Vec<Address>,
}

impl Route {
    /// Create a route, checking that the pools connect input to output
    pub fn new(pools: Vec<PoolState>, input: Asset, output: Asset) -> Result<Self, TypesError> {
        if pools.is_empty() {
            return Err(TypesError::invalid_route("route has no pools"));
        }

        let mut token_path = vec![input.address];
        let mut current = input.address;
        for pool in pools.iter() {
            current = pool.other_token(current).ok_or_else(|| {
                TypesError::invalid_route(format!(
                    "pool {:#x} does not trade {current:#x}",
                    pool.address
                ))
            })?;
            token_path.push(current);
        }

        if current != output.address {
            return Err(TypesError::invalid_route(format!(
                "route ends at {current:#x}, expected {:#x}",
                output.address
            )));
        }

        Ok(Self { pools, input, output, token_path })
    }

    /// Whether the route crosses a single pool
    pub fn is_single_pool(&self) -> bool {
        self.pools.len() == 1
    }

    /// The token addresses visited, from input to output
    pub fn token_path(&self) -> &[Address] {
        &self.token_path
    }

    /// The router's packed path encoding: `token ‖ fee ‖ token ‖ ...`, each
    /// fee as 3 big-endian bytes
    ///
    /// Exact-output swaps walk the path backwards, from output to input
    pub fn encoded_path(&self, trade_type: TradeType) -> Bytes {
        let mut hops: Vec<(Address, u32)> = self
            .token_path
            .iter()
            .zip(self.pools.iter())
            .map(|(token, pool)| (*token, pool.fee))
            .collect();
        let mut last = self.output.address;

        if trade_type == TradeType::ExactOutput {
            hops = self
                .token_path
                .iter()
                .skip(1)
                .zip(self.pools.iter())
                .rev()
                .map(|(token, pool)| (*token, pool.fee))
                .collect();
            last = self.input.address;
        }

        let mut path = Vec::with_capacity(hops.len() * 23 + 20);
        for (token, fee) in hops {
            path.extend_from_slice(token.as_slice());
            path.extend_from_slice(&fee.to_be_bytes()[1..]);
        }
        path.extend_from_slice(last.as_slice());

        path.into()
    }
}

// ---------
// | Trade |
// ---------

/// An unsigned description of a swap, ready for execution
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trade {
    /// The pools the swap crosses
    pub route: Route,
    /// Whether the input or output amount is fixed
    pub trade_type: TradeType,
    /// The raw input amount
    pub input_amount: U256,
    /// The raw output amount
    pub output_amount: U256,
    /// The quote the trade was assembled from
    pub quote: Quote,
}

impl Trade {
    /// Assemble a trade from a route and a quote without validating either
    /// against the pool's invariants
    ///
    /// The quote and route reflect chain state at the moment they were read.
    /// Fee, tick spacing and liquidity constraints are enforced by the chain
    /// when the swap executes, and the quote's age is bounded by the executor
    pub fn create_unchecked(route: Route, quote: Quote) -> Self {
        Self {
            route,
            trade_type: quote.trade_type,
            input_amount: quote.amount_in(),
            output_amount: quote.amount_out(),
            quote,
        }
    }

    /// The asset sold
    pub fn input_asset(&self) -> &Asset {
        &self.route.input
    }

    /// The asset bought
    pub fn output_asset(&self) -> &Asset {
        &self.route.output
    }

    /// The smallest output accepted under the given tolerance
    ///
    /// Exact-output trades fix the output, so no slippage applies
    pub fn minimum_amount_out(&self, slippage: SlippageTolerance) -> U256 {
        match self.trade_type {
            TradeType::ExactInput => slippage.minimum_amount_out(self.output_amount),
            TradeType::ExactOutput => self.output_amount,
        }
    }

    /// The largest input spent under the given tolerance
    ///
    /// Exact-input trades fix the input, so no slippage applies
    pub fn maximum_amount_in(&self, slippage: SlippageTolerance) -> U256 {
        match self.trade_type {
            TradeType::ExactInput => self.input_amount,
            TradeType::ExactOutput => slippage.maximum_amount_in(self.input_amount),
        }
    }
}
