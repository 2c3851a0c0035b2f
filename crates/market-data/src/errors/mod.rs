//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur while fetching data from an upstream provider.
///
/// Every variant aborts the fetch for the symbol it was raised for. Callers
/// decide whether the remaining symbols should still be processed.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The provider rate limited the request (HTTP 429 or an in-body notice).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The request to the provider timed out.
    #[error("Timeout: {provider}")]
    Timeout {
        /// The provider that timed out
        provider: String,
    },

    /// A provider-specific error occurred, including error messages carried
    /// in an otherwise successful HTTP response.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Whether the same request could plausibly succeed later.
    ///
    /// Nothing retries automatically; this only feeds log output so operators
    /// can tell quota exhaustion apart from bad symbols.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Timeout { .. } | Self::Network(_) => true,
            Self::SymbolNotFound(_) | Self::ProviderError { .. } => false,
        }
    }
}
