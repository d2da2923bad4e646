//! Domain types for the v3 trader

pub mod asset;
pub mod config;
pub mod pool;
pub mod quote;
pub mod trade;
pub mod transaction;

/// The number of basis points in one whole, used for slippage and fee math
pub const BASIS_POINTS_DENOMINATOR: u64 = 10_000;
