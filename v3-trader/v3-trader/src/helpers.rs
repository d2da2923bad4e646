//! Helpers for the trader

use std::{
    future::Future,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use crate::error::TraderError;

/// The current unix timestamp in seconds
pub fn get_current_time_seconds() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default()
}

/// Await a fallible future, failing with `Timeout` if it takes longer than
/// `timeout`
pub async fn with_timeout<T, F>(timeout: Duration, fut: F) -> Result<T, TraderError>
where
    F: Future<Output = Result<T, TraderError>>,
{
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| TraderError::Timeout(timeout.as_millis() as u64))?
}
