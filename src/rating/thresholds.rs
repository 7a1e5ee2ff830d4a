//! Fixed reference bands per metric.
//!
//! Two tables exist: one for equity metrics, one for ETF metrics. Each entry
//! carries the `[low, high]` band, the direction of goodness, and display
//! conventions for narrative output. Tables are process-wide constants and
//! are never mutated.

use serde::{Deserialize, Serialize};

// ============================================================================
// Band & Direction
// ============================================================================

/// Reference `[low, high]` interval for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBand {
    /// Lower reference bound
    pub low: f64,
    /// Upper reference bound
    pub high: f64,
}

/// Which side of the band is favorable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Values below the band are favorable (valuation-style metrics)
    LessIsBetter,
    /// Values above the band are favorable (profitability/growth metrics)
    MoreIsBetter,
    /// The band interior is favorable (volatility-style metrics)
    MidIsBetter,
}

/// How a metric value is rendered in narrative lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayStyle {
    /// Two decimal places, as-is (PE, PB, Beta, ratios)
    Plain,
    /// Value already expressed in percent, rendered with a `%` suffix
    Percent,
    /// Ratio value, multiplied by 100 and rendered with a `%` suffix
    RatioPercent,
    /// Large magnitude, rendered with thousands separators (fund assets)
    Thousands,
}

// ============================================================================
// Threshold Entry & Table
// ============================================================================

/// One metric's reference data.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdEntry {
    /// Metric key, matching snapshot field names
    pub name: &'static str,
    /// Reference band
    pub band: MetricBand,
    /// Direction of goodness
    pub direction: Direction,
    /// Multiplier applied to band bounds when quoted inside notes
    /// (ratio-style bands are quoted in percent)
    pub note_scale: f64,
    /// Narrative rendering of the metric value
    pub display: DisplayStyle,
}

/// An ordered, immutable set of threshold entries for one instrument class.
///
/// Entry order is the fixed enumeration order used for scoring and
/// narrative output.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdTable {
    entries: &'static [ThresholdEntry],
}

const fn entry(
    name: &'static str,
    low: f64,
    high: f64,
    direction: Direction,
    note_scale: f64,
    display: DisplayStyle,
) -> ThresholdEntry {
    ThresholdEntry {
        name,
        band: MetricBand { low, high },
        direction,
        note_scale,
        display,
    }
}

static EQUITY_ENTRIES: [ThresholdEntry; 12] = [
    entry("PE", 10.0, 25.0, Direction::LessIsBetter, 1.0, DisplayStyle::Plain),
    entry("PB", 1.0, 5.0, Direction::LessIsBetter, 1.0, DisplayStyle::Plain),
    entry("Beta", 0.8, 1.2, Direction::LessIsBetter, 1.0, DisplayStyle::Plain),
    entry("ROE", 0.10, 0.20, Direction::MoreIsBetter, 100.0, DisplayStyle::RatioPercent),
    entry("DividendYield", 2.0, 6.0, Direction::MoreIsBetter, 1.0, DisplayStyle::Percent),
    entry("PEG", 1.0, 2.0, Direction::LessIsBetter, 1.0, DisplayStyle::Plain),
    entry("OperatingMargin", 0.10, 0.30, Direction::MoreIsBetter, 100.0, DisplayStyle::RatioPercent),
    entry("DebtToEquity", 50.0, 100.0, Direction::LessIsBetter, 1.0, DisplayStyle::Plain),
    entry("CurrentRatio", 1.0, 2.0, Direction::MoreIsBetter, 1.0, DisplayStyle::Plain),
    entry("QuickRatio", 1.0, 2.0, Direction::MoreIsBetter, 1.0, DisplayStyle::Plain),
    entry("RevenueGrowth", 0.05, 0.20, Direction::MoreIsBetter, 100.0, DisplayStyle::RatioPercent),
    entry("EarningsGrowth", 0.05, 0.20, Direction::MoreIsBetter, 100.0, DisplayStyle::RatioPercent),
];

static ETF_ENTRIES: [ThresholdEntry; 6] = [
    entry("ETF_PE", 10.0, 25.0, Direction::LessIsBetter, 1.0, DisplayStyle::Plain),
    entry("ETF_Yield", 2.0, 6.0, Direction::MoreIsBetter, 1.0, DisplayStyle::Percent),
    entry("totalAssets", 1e11, 5e11, Direction::MoreIsBetter, 1.0, DisplayStyle::Thousands),
    entry("ETF_Beta3Y", 0.8, 1.2, Direction::MidIsBetter, 1.0, DisplayStyle::Plain),
    entry("threeYearAverageReturn", 0.03, 0.10, Direction::MoreIsBetter, 100.0, DisplayStyle::RatioPercent),
    entry("fiveYearAverageReturn", 0.03, 0.10, Direction::MoreIsBetter, 100.0, DisplayStyle::RatioPercent),
];

static EQUITY_TABLE: ThresholdTable = ThresholdTable {
    entries: &EQUITY_ENTRIES,
};

static ETF_TABLE: ThresholdTable = ThresholdTable {
    entries: &ETF_ENTRIES,
};

impl ThresholdTable {
    /// The equity metric table.
    pub fn equity() -> &'static ThresholdTable {
        &EQUITY_TABLE
    }

    /// The ETF metric table.
    pub fn etf() -> &'static ThresholdTable {
        &ETF_TABLE
    }

    /// Entries in fixed enumeration order.
    pub fn entries(&self) -> &'static [ThresholdEntry] {
        self.entries
    }

    /// Look up an entry by metric name.
    pub fn get(&self, name: &str) -> Option<&'static ThresholdEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}

// ============================================================================
// Number Formatting
// ============================================================================

/// Format a band bound for use in notes: integers render without decimals,
/// large magnitudes with thousands separators.
pub fn format_bound(value: f64) -> String {
    if value.abs() >= 1_000_000.0 {
        group_thousands(value)
    } else if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        // Trim to at most two decimals without trailing zeros
        let s = format!("{:.2}", value);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

/// Format a value with comma thousands separators (e.g. `435,205,963,776`).
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round() as i128;
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if negative {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equity_table_values() {
        let table = ThresholdTable::equity();
        assert_eq!(table.entries().len(), 12);

        let pe = table.get("PE").unwrap();
        assert_eq!(pe.band, MetricBand { low: 10.0, high: 25.0 });
        assert_eq!(pe.direction, Direction::LessIsBetter);

        let roe = table.get("ROE").unwrap();
        assert_eq!(roe.band, MetricBand { low: 0.10, high: 0.20 });
        assert_eq!(roe.direction, Direction::MoreIsBetter);

        let d2e = table.get("DebtToEquity").unwrap();
        assert_eq!(d2e.band, MetricBand { low: 50.0, high: 100.0 });
    }

    #[test]
    fn test_etf_table_values() {
        let table = ThresholdTable::etf();
        assert_eq!(table.entries().len(), 6);

        let beta = table.get("ETF_Beta3Y").unwrap();
        assert_eq!(beta.band, MetricBand { low: 0.8, high: 1.2 });
        assert_eq!(beta.direction, Direction::MidIsBetter);

        let assets = table.get("totalAssets").unwrap();
        assert_eq!(assets.band, MetricBand { low: 1e11, high: 5e11 });
        assert_eq!(assets.direction, Direction::MoreIsBetter);
    }

    #[test]
    fn test_enumeration_order_is_fixed() {
        let names: Vec<&str> = ThresholdTable::equity()
            .entries()
            .iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names[0], "PE");
        assert_eq!(names[3], "ROE");
        assert_eq!(names[11], "EarningsGrowth");
    }

    #[test]
    fn test_unknown_metric_lookup() {
        assert!(ThresholdTable::equity().get("ExpenseRatio").is_none());
        // Equity metrics are not visible through the ETF table
        assert!(ThresholdTable::etf().get("PE").is_none());
    }

    #[test]
    fn test_format_bound() {
        assert_eq!(format_bound(10.0), "10");
        assert_eq!(format_bound(0.8), "0.8");
        assert_eq!(format_bound(0.05), "0.05");
        assert_eq!(format_bound(1e11), "100,000,000,000");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(435205963776.0), "435,205,963,776");
        assert_eq!(group_thousands(999.0), "999");
        assert_eq!(group_thousands(1000.0), "1,000");
        assert_eq!(group_thousands(-1234567.0), "-1,234,567");
    }
}
