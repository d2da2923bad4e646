//! Error types for constructing and validating trader types

/// An error constructing one of the trader's domain types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// A readable amount could not be converted to raw units
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The fee is not one of the supported fee tiers
    #[error("unsupported fee tier: {0}")]
    InvalidFeeTier(u32),
    /// A route's pools do not connect its input to its output
    #[error("invalid route: {0}")]
    InvalidRoute(String),
    /// The static configuration is inconsistent
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

impl TypesError {
    /// Create a new invalid amount error
    #[allow(clippy::needless_pass_by_value)]
    pub fn invalid_amount<T: ToString>(e: T) -> Self {
        TypesError::InvalidAmount(e.to_string())
    }

    /// Create a new invalid route error
    #[allow(clippy::needless_pass_by_value)]
    pub fn invalid_route<T: ToString>(e: T) -> Self {
        TypesError::InvalidRoute(e.to_string())
    }

    /// Create a new invalid config error
    #[allow(clippy::needless_pass_by_value)]
    pub fn invalid_config<T: ToString>(e: T) -> Self {
        TypesError::InvalidConfig(e.to_string())
    }
}
