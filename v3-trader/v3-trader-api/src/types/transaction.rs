//! The lifecycle of a submitted transaction

use std::fmt::Display;

use alloy_primitives::TxHash;
use serde::{Deserialize, Serialize};

/// The lifecycle state of a transaction built by the trader
///
/// Submission does not wait for inclusion, so `Sent` is the terminal success
/// state: the node accepted the transaction for broadcast
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "detail", rename_all = "snake_case")]
pub enum TransactionState {
    /// Built but not yet handed to the signer
    NotSubmitted,
    /// Accepted by the node for broadcast
    Sent(TxHash),
    /// The node refused the submission
    Failed(String),
    /// The signer refused to produce a transaction; nothing was broadcast
    Rejected(String),
}

impl TransactionState {
    /// Whether the node accepted the transaction
    pub fn is_sent(&self) -> bool {
        matches!(self, TransactionState::Sent(_))
    }

    /// The transaction hash, if the transaction was sent
    pub fn tx_hash(&self) -> Option<TxHash> {
        match self {
            TransactionState::Sent(hash) => Some(*hash),
            _ => None,
        }
    }
}

impl Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionState::NotSubmitted => write!(f, "not submitted"),
            TransactionState::Sent(hash) => write!(f, "sent ({hash:#x})"),
            TransactionState::Failed(reason) => write!(f, "failed: {reason}"),
            TransactionState::Rejected(reason) => write!(f, "rejected: {reason}"),
        }
    }
}
