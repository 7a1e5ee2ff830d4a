//! Yahoo Finance adapter.
//!
//! Fetches fundamental snapshots from the public `quoteSummary` endpoint and
//! daily price history from the `chart` endpoint. Field names follow the
//! quoteSummary modules (price, summaryDetail, defaultKeyStatistics,
//! financialData); numeric fields arrive wrapped as `{"raw": ..., "fmt": ...}`
//! objects.

use async_trait::async_trait;
use chrono::DateTime;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::provider::{ProviderError, QuoteProvider};
use super::{Candle, InstrumentSnapshot, QuoteType};

// ============================================================================
// Constants
// ============================================================================

/// quoteSummary endpoint (fundamentals)
const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";

/// chart endpoint (price history)
const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Modules requested from quoteSummary
const MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData";

// ============================================================================
// Response Models
// ============================================================================

/// Numeric field wrapper used throughout quoteSummary responses.
#[derive(Debug, Clone, Copy, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn unwrap_raw(v: Option<RawValue>) -> Option<f64> {
    v.and_then(|r| r.raw)
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<QuoteSummaryResult>>,
}

#[derive(Debug, Deserialize)]
struct QuoteSummaryResult {
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetailModule>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatisticsModule>,
    #[serde(rename = "financialData")]
    financial_data: Option<FinancialDataModule>,
}

#[derive(Debug, Deserialize)]
struct PriceModule {
    symbol: Option<String>,
    #[serde(rename = "shortName")]
    short_name: Option<String>,
    #[serde(rename = "quoteType")]
    quote_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryDetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    beta: Option<RawValue>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<RawValue>,
    /// ETF distribution yield; `yield` is a keyword
    #[serde(rename = "yield")]
    fund_yield: Option<RawValue>,
    #[serde(rename = "totalAssets")]
    total_assets: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct KeyStatisticsModule {
    #[serde(rename = "priceToBook")]
    price_to_book: Option<RawValue>,
    #[serde(rename = "pegRatio")]
    peg_ratio: Option<RawValue>,
    #[serde(rename = "trailingPegRatio")]
    trailing_peg_ratio: Option<RawValue>,
    #[serde(rename = "beta3Year")]
    beta_3y: Option<RawValue>,
    #[serde(rename = "threeYearAverageReturn")]
    three_year_average_return: Option<RawValue>,
    #[serde(rename = "fiveYearAverageReturn")]
    five_year_average_return: Option<RawValue>,
    #[serde(rename = "earningsQuarterlyGrowth")]
    earnings_quarterly_growth: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct FinancialDataModule {
    #[serde(rename = "returnOnEquity")]
    return_on_equity: Option<RawValue>,
    #[serde(rename = "operatingMargins")]
    operating_margins: Option<RawValue>,
    #[serde(rename = "debtToEquity")]
    debt_to_equity: Option<RawValue>,
    #[serde(rename = "currentRatio")]
    current_ratio: Option<RawValue>,
    #[serde(rename = "quickRatio")]
    quick_ratio: Option<RawValue>,
    #[serde(rename = "revenueGrowth")]
    revenue_growth: Option<RawValue>,
    #[serde(rename = "earningsGrowth")]
    earnings_growth: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
struct ChartQuote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<f64>>>,
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance quote provider.
pub struct YahooProvider {
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a provider with the given request timeout.
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7)")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self { client }
    }
}

impl Default for YahooProvider {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_snapshot(&self, symbol: &str) -> Result<InstrumentSnapshot, ProviderError> {
        let url = format!("{}/{}?modules={}", QUOTE_SUMMARY_URL, symbol, MODULES);
        debug!(symbol, "Fetching quote summary");

        let response = self.client.get(&url).send().await?;
        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimited {
                retry_after_secs: None,
            });
        }
        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "quoteSummary returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_quote_summary(symbol, &body)
    }

    async fn fetch_daily_history(&self, symbol: &str) -> Result<Vec<Candle>, ProviderError> {
        let url = format!("{}/{}?range=1y&interval=1d", CHART_URL, symbol);
        debug!(symbol, "Fetching daily history");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "chart returned HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        parse_chart(symbol, &body)
    }
}

// ============================================================================
// Response Parsing
// ============================================================================

/// Parse a quoteSummary response body into an instrument snapshot.
fn parse_quote_summary(symbol: &str, body: &str) -> Result<InstrumentSnapshot, ProviderError> {
    let envelope: QuoteSummaryEnvelope =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let result = envelope
        .quote_summary
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| ProviderError::DataNotAvailable(symbol.to_string()))?;

    let price = result.price.as_ref();
    let resolved_symbol = price
        .and_then(|p| p.symbol.clone())
        .unwrap_or_else(|| symbol.to_string());
    let short_name = price.and_then(|p| p.short_name.clone()).unwrap_or_default();
    let quote_type = price
        .and_then(|p| p.quote_type.as_deref())
        .map(QuoteType::parse)
        .unwrap_or_else(|| QuoteType::Other(String::new()));

    let detail = result.summary_detail.as_ref();
    let stats = result.key_statistics.as_ref();
    let financial = result.financial_data.as_ref();

    let snapshot = match quote_type {
        QuoteType::Equity => {
            // PEG has two possible source keys; earnings growth prefers the
            // quarterly figure
            let peg = unwrap_raw(stats.and_then(|s| s.trailing_peg_ratio))
                .or_else(|| unwrap_raw(stats.and_then(|s| s.peg_ratio)));
            let earnings_growth = unwrap_raw(stats.and_then(|s| s.earnings_quarterly_growth))
                .or_else(|| unwrap_raw(financial.and_then(|f| f.earnings_growth)));

            InstrumentSnapshot::new(resolved_symbol, short_name, quote_type)
                .with_metric("PE", unwrap_raw(detail.and_then(|d| d.trailing_pe)))
                .with_metric("PB", unwrap_raw(stats.and_then(|s| s.price_to_book)))
                .with_metric("Beta", unwrap_raw(detail.and_then(|d| d.beta)))
                .with_metric("ROE", unwrap_raw(financial.and_then(|f| f.return_on_equity)))
                .with_metric(
                    "DividendYield",
                    unwrap_raw(detail.and_then(|d| d.dividend_yield)).map(|v| v * 100.0),
                )
                .with_metric("PEG", peg)
                .with_metric(
                    "OperatingMargin",
                    unwrap_raw(financial.and_then(|f| f.operating_margins)),
                )
                .with_metric(
                    "DebtToEquity",
                    unwrap_raw(financial.and_then(|f| f.debt_to_equity)),
                )
                .with_metric(
                    "CurrentRatio",
                    unwrap_raw(financial.and_then(|f| f.current_ratio)),
                )
                .with_metric("QuickRatio", unwrap_raw(financial.and_then(|f| f.quick_ratio)))
                .with_metric(
                    "RevenueGrowth",
                    unwrap_raw(financial.and_then(|f| f.revenue_growth)),
                )
                .with_metric("EarningsGrowth", earnings_growth)
        }
        QuoteType::Etf => InstrumentSnapshot::new(resolved_symbol, short_name, quote_type)
            .with_metric("ETF_PE", unwrap_raw(detail.and_then(|d| d.trailing_pe)))
            .with_metric(
                "ETF_Yield",
                unwrap_raw(detail.and_then(|d| d.fund_yield)).map(|v| v * 100.0),
            )
            .with_metric("totalAssets", unwrap_raw(detail.and_then(|d| d.total_assets)))
            .with_metric("ETF_Beta3Y", unwrap_raw(stats.and_then(|s| s.beta_3y)))
            .with_metric(
                "threeYearAverageReturn",
                unwrap_raw(stats.and_then(|s| s.three_year_average_return)),
            )
            .with_metric(
                "fiveYearAverageReturn",
                unwrap_raw(stats.and_then(|s| s.five_year_average_return)),
            ),
        other => InstrumentSnapshot::new(resolved_symbol, short_name, other),
    };

    Ok(snapshot)
}

/// Parse a chart response body into ascending daily candles.
fn parse_chart(symbol: &str, body: &str) -> Result<Vec<Candle>, ProviderError> {
    let envelope: ChartEnvelope =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let result = envelope
        .chart
        .result
        .and_then(|mut r| if r.is_empty() { None } else { Some(r.remove(0)) })
        .ok_or_else(|| ProviderError::DataNotAvailable(symbol.to_string()))?;

    let timestamps = result.timestamp.unwrap_or_default();
    let quote = result
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::DataNotAvailable(symbol.to_string()))?;

    let opens = quote.open.unwrap_or_default();
    let highs = quote.high.unwrap_or_default();
    let lows = quote.low.unwrap_or_default();
    let closes = quote.close.unwrap_or_default();
    let volumes = quote.volume.unwrap_or_default();

    let mut candles = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let date = match DateTime::from_timestamp(*ts, 0) {
            Some(dt) => dt.date_naive(),
            None => continue,
        };
        // Bars with any missing component (halted sessions) are dropped
        let (open, high, low, close, volume) = match (
            opens.get(i).copied().flatten(),
            highs.get(i).copied().flatten(),
            lows.get(i).copied().flatten(),
            closes.get(i).copied().flatten(),
            volumes.get(i).copied().flatten(),
        ) {
            (Some(o), Some(h), Some(l), Some(c), Some(v)) => (o, h, l, c, v),
            _ => continue,
        };

        candles.push(Candle {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    if candles.is_empty() {
        return Err(ProviderError::DataNotAvailable(format!(
            "{}: no usable price bars",
            symbol
        )));
    }

    Ok(candles)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const EQUITY_BODY: &str = r#"{
        "quoteSummary": {
            "result": [{
                "price": {"symbol": "2330.TW", "shortName": "TSMC", "quoteType": "EQUITY"},
                "summaryDetail": {
                    "trailingPE": {"raw": 18.2, "fmt": "18.20"},
                    "beta": {"raw": 1.1, "fmt": "1.10"},
                    "dividendYield": {"raw": 0.021, "fmt": "2.10%"}
                },
                "defaultKeyStatistics": {
                    "priceToBook": {"raw": 4.5},
                    "pegRatio": {"raw": 1.4},
                    "earningsQuarterlyGrowth": {"raw": 0.54}
                },
                "financialData": {
                    "returnOnEquity": {"raw": 0.28},
                    "operatingMargins": {"raw": 0.42},
                    "debtToEquity": {"raw": 28.0},
                    "currentRatio": {"raw": 2.1},
                    "quickRatio": {"raw": 1.9},
                    "revenueGrowth": {"raw": 0.39}
                }
            }]
        }
    }"#;

    const ETF_BODY: &str = r#"{
        "quoteSummary": {
            "result": [{
                "price": {"symbol": "0050.TW", "shortName": "Yuanta Taiwan 50", "quoteType": "ETF"},
                "summaryDetail": {
                    "trailingPE": {"raw": 16.0},
                    "yield": {"raw": 0.032},
                    "totalAssets": {"raw": 435205963776.0}
                },
                "defaultKeyStatistics": {
                    "beta3Year": {"raw": 0.95},
                    "threeYearAverageReturn": {"raw": 0.12},
                    "fiveYearAverageReturn": {"raw": 0.18}
                }
            }]
        }
    }"#;

    #[test]
    fn test_parse_equity_snapshot() {
        let snap = parse_quote_summary("2330.TW", EQUITY_BODY).unwrap();
        assert_eq!(snap.symbol, "2330.TW");
        assert_eq!(snap.short_name, "TSMC");
        assert_eq!(snap.quote_type, QuoteType::Equity);
        assert_eq!(snap.metric("PE"), Some(18.2));
        assert_eq!(snap.metric("ROE"), Some(0.28));
        // dividendYield arrives as a ratio and is stored as a percentage
        assert!((snap.metric("DividendYield").unwrap() - 2.1).abs() < 1e-9);
        assert_eq!(snap.metric("PEG"), Some(1.4));
        assert_eq!(snap.metric("EarningsGrowth"), Some(0.54));
        // QuickRatio present, no ETF keys
        assert_eq!(snap.metric("QuickRatio"), Some(1.9));
        assert_eq!(snap.metric("ETF_PE"), None);
    }

    #[test]
    fn test_parse_etf_snapshot() {
        let snap = parse_quote_summary("0050.TW", ETF_BODY).unwrap();
        assert_eq!(snap.quote_type, QuoteType::Etf);
        assert_eq!(snap.metric("ETF_PE"), Some(16.0));
        assert!((snap.metric("ETF_Yield").unwrap() - 3.2).abs() < 1e-9);
        assert_eq!(snap.metric("ETF_Beta3Y"), Some(0.95));
        assert_eq!(snap.metric("totalAssets"), Some(435205963776.0));
    }

    #[test]
    fn test_parse_missing_fields_are_skipped() {
        let body = r#"{
            "quoteSummary": {
                "result": [{
                    "price": {"symbol": "X", "quoteType": "EQUITY"},
                    "summaryDetail": {"trailingPE": {"raw": 12.0}}
                }]
            }
        }"#;
        let snap = parse_quote_summary("X", body).unwrap();
        assert_eq!(snap.metric("PE"), Some(12.0));
        assert_eq!(snap.metric("ROE"), None);
        assert_eq!(snap.metric("DividendYield"), None);
    }

    #[test]
    fn test_parse_empty_result_is_not_available() {
        let body = r#"{"quoteSummary": {"result": []}}"#;
        let err = parse_quote_summary("NOPE", body).unwrap_err();
        assert!(matches!(err, ProviderError::DataNotAvailable(_)));
    }

    #[test]
    fn test_parse_chart() {
        let body = r#"{
            "chart": {
                "result": [{
                    "timestamp": [1704067200, 1704153600, 1704240000],
                    "indicators": {
                        "quote": [{
                            "open": [100.0, 101.0, null],
                            "high": [102.0, 103.0, 104.0],
                            "low": [99.0, 100.0, 101.0],
                            "close": [101.0, 102.0, 103.0],
                            "volume": [1000.0, 1100.0, 1200.0]
                        }]
                    }
                }]
            }
        }"#;
        let candles = parse_chart("2330.TW", body).unwrap();
        // The third bar has a null open and is dropped
        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].close, 101.0);
        assert_eq!(candles[1].volume, 1100.0);
    }

    #[test]
    fn test_parse_chart_no_result() {
        let body = r#"{"chart": {"result": null}}"#;
        assert!(matches!(
            parse_chart("X", body).unwrap_err(),
            ProviderError::DataNotAvailable(_)
        ));
    }
}
