//! Quote provider abstraction.
//!
//! Defines the `QuoteProvider` trait the grader fetches instrument data
//! through, keeping the rating engine free of any I/O concerns.

use async_trait::async_trait;
use thiserror::Error;

use super::{Candle, InstrumentSnapshot};

// ============================================================================
// Provider Error
// ============================================================================

/// Errors produced by quote providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Network error (connection failed, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// Rate limit exceeded
    #[error("rate limited")]
    RateLimited {
        /// Seconds to wait before retrying, when the provider reports one
        retry_after_secs: Option<u64>,
    },

    /// No data exists for the requested symbol
    #[error("data not available: {0}")]
    DataNotAvailable(String),

    /// The provider response could not be decoded
    #[error("response parse error: {0}")]
    Parse(String),

    /// Provider is temporarily unavailable
    #[error("provider unavailable: {0}")]
    Unavailable(String),
}

impl ProviderError {
    /// Whether the error is worth retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::RateLimited { .. } | Self::Unavailable(_)
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() || err.is_connect() {
            Self::Network(err.to_string())
        } else if err.is_decode() {
            Self::Parse(err.to_string())
        } else {
            Self::Unavailable(err.to_string())
        }
    }
}

// ============================================================================
// Quote Provider Trait
// ============================================================================

/// Trait for quote data sources.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Provider name for logging (e.g. "yahoo").
    fn name(&self) -> &'static str;

    /// Fetch the fundamental snapshot for a symbol.
    async fn fetch_snapshot(&self, symbol: &str) -> Result<InstrumentSnapshot, ProviderError>;

    /// Fetch trailing one-year daily price history for a symbol.
    ///
    /// Returns candles in ascending date order.
    async fn fetch_daily_history(&self, symbol: &str) -> Result<Vec<Candle>, ProviderError>;
}

// ============================================================================
// Tests
// ============================================================================
