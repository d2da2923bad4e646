//! Error types for the trader

use v3_trader_api::{error::TypesError, transaction::TransactionState};

/// An error returned by the trader
#[derive(Debug, Clone, thiserror::Error)]
pub enum TraderError {
    /// No read connection to the chain was configured
    #[error("no provider is connected")]
    ProviderUnavailable,
    /// A contract read failed or returned unexpected data
    #[error("contract read error: {0}")]
    ContractRead(String),
    /// The quoter could not price the requested swap
    #[error("quote unavailable: {0}")]
    QuoteUnavailable(String),
    /// A write was requested without a signer
    #[error("no signer is connected")]
    NoSigner,
    /// The token approval did not reach the network
    #[error("token approval was not sent: {state}")]
    ApprovalRejected {
        /// The final state of the approval
        state: TransactionState,
    },
    /// The swap did not reach the network
    #[error("swap submission failed: {state}")]
    SubmissionFailed {
        /// The final state of the swap
        state: TransactionState,
    },
    /// The quote a trade was built from is too old to execute
    #[error("quote is {age_secs}s old, the limit is {max_age_secs}s")]
    StaleQuote {
        /// The age of the quote
        age_secs: u64,
        /// The configured maximum age
        max_age_secs: u64,
    },
    /// An RPC call did not complete in time
    #[error("rpc call timed out after {0}ms")]
    Timeout(u64),
    /// A transport level RPC error
    #[error("rpc error: {0}")]
    Rpc(String),
    /// An error parsing a value
    #[error("parse error: {0}")]
    Parse(String),
    /// An invalid configuration
    #[error("config error: {0}")]
    Config(String),
}

impl TraderError {
    /// Create a new contract read error
    #[allow(clippy::needless_pass_by_value)]
    pub fn contract_read<T: ToString>(e: T) -> Self {
        TraderError::ContractRead(e.to_string())
    }

    /// Create a new quote unavailable error
    #[allow(clippy::needless_pass_by_value)]
    pub fn quote_unavailable<T: ToString>(e: T) -> Self {
        TraderError::QuoteUnavailable(e.to_string())
    }

    /// Create a new rpc error
    #[allow(clippy::needless_pass_by_value)]
    pub fn rpc<T: ToString>(e: T) -> Self {
        TraderError::Rpc(e.to_string())
    }

    /// Create a new parse error
    #[allow(clippy::needless_pass_by_value)]
    pub fn parse<T: ToString>(e: T) -> Self {
        TraderError::Parse(e.to_string())
    }

    /// Create a new config error
    #[allow(clippy::needless_pass_by_value)]
    pub fn config<T: ToString>(e: T) -> Self {
        TraderError::Config(e.to_string())
    }

    /// The terminal state of the transaction an error aborted
    ///
    /// Errors raised before anything was handed to the signer report
    /// `NotSubmitted`
    pub fn transaction_state(&self) -> TransactionState {
        match self {
            TraderError::ApprovalRejected { state } | TraderError::SubmissionFailed { state } => {
                state.clone()
            },
            _ => TransactionState::NotSubmitted,
        }
    }
}

impl From<TypesError> for TraderError {
    fn from(e: TypesError) -> Self {
        match e {
            TypesError::InvalidAmount(_) | TypesError::InvalidFeeTier(_) => TraderError::parse(e),
            TypesError::InvalidRoute(_) => TraderError::contract_read(e),
            TypesError::InvalidConfig(_) => TraderError::config(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;

    /// Test the lifecycle state carried by each kind of error
    #[test]
    fn test_transaction_state() {
        let sent = TransactionState::Sent(B256::ZERO);
        let err = TraderError::SubmissionFailed { state: sent.clone() };
        assert_eq!(err.transaction_state(), sent);

        let rejected = TransactionState::Rejected("denied".to_string());
        let err = TraderError::ApprovalRejected { state: rejected.clone() };
        assert_eq!(err.transaction_state(), rejected);

        assert_eq!(TraderError::NoSigner.transaction_state(), TransactionState::NotSubmitted);
    }

    /// Test the mapping of type errors
    #[test]
    fn test_types_error_conversion() {
        let err: TraderError = TypesError::invalid_amount("bad").into();
        assert!(matches!(err, TraderError::Parse(_)));

        let err: TraderError = TypesError::invalid_config("bad").into();
        assert!(matches!(err, TraderError::Config(_)));
    }
}
