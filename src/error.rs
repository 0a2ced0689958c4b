use thiserror::Error;

/// Failure to turn a (chain, token) symbol pair into a [`crate::models::TokenRef`].
/// Fatal to the whole quote request.
#[derive(Debug, Error)]
pub enum ResolutionError {
    #[error("unknown chain symbol '{0}'")]
    UnknownChain(String),

    #[error("unknown token '{token}' on chain '{chain}'")]
    UnknownToken { chain: String, token: String },

    #[error("invalid token metadata for '{token}': {reason}")]
    InvalidMetadata { token: String, reason: String },

    #[error("metadata source unreachable: {0}")]
    Unreachable(#[from] reqwest::Error),

    #[error("metadata source returned status {0}")]
    Status(u16),
}

/// Failure local to one provider adapter. Never leaves the adapter: the
/// aggregator logs it and drops the provider from the result set.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("provider returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("timed out after {0}ms")]
    Timeout(u64),

    #[error(transparent)]
    Numeric(#[from] NumericError),

    #[error("request signing failed: {0}")]
    Signing(String),
}

impl ProviderError {
    pub fn malformed(field: &str) -> Self {
        ProviderError::Malformed(format!("missing or invalid field '{}'", field))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum NumericError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("non-finite value")]
    NonFinite,

    #[error("invalid amount '{0}'")]
    InvalidAmount(String),
}

/// Error returned by [`crate::Aggregator`]. Provider failures never appear here.
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error("source amount must be positive")]
    InvalidAmount,
}
