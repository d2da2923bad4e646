//! Shared types for the v3 trader: assets, pools, quotes, trades and the
//! static configuration they are built from
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod error;
mod serialization;
mod types;
pub use types::*;
