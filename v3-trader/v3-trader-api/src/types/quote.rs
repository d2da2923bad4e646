//! Quotes: simulated, non-binding swap estimates

use std::fmt::Display;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{serialization::u256_string_serialization, types::asset::Asset};

/// The direction in which a trade's amount is fixed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    /// The input amount is fixed, the output is quoted
    ExactInput,
    /// The output amount is fixed, the input is quoted
    ExactOutput,
}

impl Display for TradeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeType::ExactInput => write!(f, "exact-input"),
            TradeType::ExactOutput => write!(f, "exact-output"),
        }
    }
}

/// The result of a simulated swap against the quoter contract
///
/// A quote is only valid at the instant it was taken; the time and block it
/// was taken at are recorded so that callers can bound how stale a quote they
/// are willing to act on
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// The asset sold
    pub asset_in: Asset,
    /// The asset bought
    pub asset_out: Asset,
    /// Whether the input or the output amount was fixed
    pub trade_type: TradeType,
    /// The fixed amount, in raw units of its asset
    #[serde(with = "u256_string_serialization")]
    pub requested_amount: U256,
    /// The simulated counter amount, in raw units of its asset
    #[serde(with = "u256_string_serialization")]
    pub quoted_amount: U256,
    /// The unix timestamp, in seconds, at which the quote was taken
    pub quoted_at: u64,
    /// The block number against which the quote was simulated
    pub block_number: u64,
}

impl Quote {
    /// The raw input amount of the quoted swap
    pub fn amount_in(&self) -> U256 {
        match self.trade_type {
            TradeType::ExactInput => self.requested_amount,
            TradeType::ExactOutput => self.quoted_amount,
        }
    }

    /// The raw output amount of the quoted swap
    pub fn amount_out(&self) -> U256 {
        match self.trade_type {
            TradeType::ExactInput => self.quoted_amount,
            TradeType::ExactOutput => self.requested_amount,
        }
    }

    /// The asset whose amount was quoted
    pub fn quoted_asset(&self) -> &Asset {
        match self.trade_type {
            TradeType::ExactInput => &self.asset_out,
            TradeType::ExactOutput => &self.asset_in,
        }
    }

    /// The age of the quote in seconds at unix time `now`
    pub fn age(&self, now: u64) -> u64 {
        now.saturating_sub(self.quoted_at)
    }

    /// Whether the quote is older than `max_age_secs` at unix time `now`
    pub fn is_stale(&self, now: u64, max_age_secs: u64) -> bool {
        self.age(now) > max_age_secs
    }
}
