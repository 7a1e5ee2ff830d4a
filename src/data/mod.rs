//! Market data domain types and the quote provider abstraction.
//!
//! The rating engine never performs I/O itself; it consumes an
//! [`InstrumentSnapshot`] (named fundamental fields) and daily [`Candle`]
//! history supplied by a [`QuoteProvider`] implementation.

mod provider;
mod yahoo;

pub use provider::{ProviderError, QuoteProvider};
pub use yahoo::YahooProvider;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Candle
// ============================================================================

/// A single daily price bar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// Trading date
    pub date: NaiveDate,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
}

// ============================================================================
// Quote Type
// ============================================================================

/// The instrument class reported by the quote source.
///
/// Only equities and ETFs are scorable; anything else yields an unratable
/// result rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteType {
    /// A common stock
    Equity,
    /// An exchange-traded fund
    Etf,
    /// Any other quote type (index, currency, mutual fund, ...)
    Other(String),
}

impl QuoteType {
    /// Parse the quote type string used by the quote source
    /// (e.g. "EQUITY", "ETF").
    pub fn parse(raw: &str) -> Self {
        match raw.to_uppercase().as_str() {
            "EQUITY" => Self::Equity,
            "ETF" => Self::Etf,
            _ => Self::Other(raw.to_string()),
        }
    }
}

impl fmt::Display for QuoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equity => write!(f, "EQUITY"),
            Self::Etf => write!(f, "ETF"),
            Self::Other(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// Instrument Snapshot
// ============================================================================

/// A point-in-time bag of named fundamental fields for one instrument.
///
/// Metric names match the threshold-table keys (e.g. "PE", "ROE",
/// "ETF_Yield"). Absent fields are simply not present in the map; the scorer
/// records them as missing and excludes them from averaging. The rating
/// engine never mutates a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentSnapshot {
    /// Ticker symbol (e.g. "2330.TW")
    pub symbol: String,
    /// Display name
    pub short_name: String,
    /// Instrument class
    pub quote_type: QuoteType,
    /// Named numeric fundamental fields
    pub metrics: HashMap<String, f64>,
}

impl InstrumentSnapshot {
    /// Create an empty snapshot.
    pub fn new(symbol: impl Into<String>, short_name: impl Into<String>, quote_type: QuoteType) -> Self {
        Self {
            symbol: symbol.into(),
            short_name: short_name.into(),
            quote_type,
            metrics: HashMap::new(),
        }
    }

    /// Builder-style metric insertion; `None` values are skipped.
    pub fn with_metric(mut self, name: &str, value: Option<f64>) -> Self {
        if let Some(v) = value {
            self.metrics.insert(name.to_string(), v);
        }
        self
    }

    /// Look up a metric value by name.
    pub fn metric(&self, name: &str) -> Option<f64> {
        self.metrics.get(name).copied()
    }
}

// ============================================================================
// Tests
// ============================================================================
