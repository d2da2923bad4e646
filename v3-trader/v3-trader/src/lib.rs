//! Quotes, builds and executes swaps against concentrated-liquidity pools
//!
//! The [`TradingClient`] drives the flow: read a pool, quote against it,
//! assemble a trade, approve the router and submit the swap. Chain access is
//! abstracted in [`chain`] so the flow runs against any implementation of the
//! contract interfaces

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]
#![deny(clippy::needless_pass_by_value)]
#![deny(unsafe_code)]
#![deny(clippy::uninlined_format_args)]

pub mod chain;
pub mod error;
pub mod helpers;
pub mod trading_client;

pub use trading_client::{execution::SwapSubmission, TradingClient};
