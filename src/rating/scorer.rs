//! Instrument scorer.
//!
//! Orchestrates classification over all fundamental metrics for one
//! instrument, evaluates its technical indicators, and produces per-category
//! totals, averages, letter ratings, and a human-readable narrative.
//!
//! A missing metric is recorded and excluded; an unsupported instrument
//! class yields an all-zero unratable result. Nothing here can fail the
//! batch.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::{InstrumentSnapshot, QuoteType};

use super::classifier::classify_entry;
use super::technical::{evaluate_technical, TechnicalSnapshot};
use super::thresholds::{group_thousands, DisplayStyle, ThresholdTable};

// ============================================================================
// Rating
// ============================================================================

/// Letter rating derived from an average score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rating {
    A,
    B,
    C,
    D,
    /// No valid metrics were available to compute an average
    Unratable,
}

impl Rating {
    /// Map an average score onto a letter grade.
    ///
    /// Bounds are inclusive at the lower end of each band: exactly 8.0 is an
    /// A, exactly 5.0 a B, exactly 3.0 a C.
    pub fn from_average(average: f64) -> Self {
        if average >= 8.0 {
            Self::A
        } else if average >= 5.0 {
            Self::B
        } else if average >= 3.0 {
            Self::C
        } else {
            Self::D
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
            Self::D => write!(f, "D"),
            Self::Unratable => write!(f, "unratable"),
        }
    }
}

// ============================================================================
// Score Types
// ============================================================================

/// Score aggregate for one category (fundamental or technical).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Sum of metric scores
    pub total: f64,
    /// `total / valid_count`, 0 when nothing was evaluable
    pub average: f64,
    /// Letter rating, `Unratable` when nothing was evaluable
    pub rating: Rating,
    /// Per-metric narrative lines (including missing-data lines)
    pub lines: Vec<String>,
}

impl CategoryScore {
    fn rated(total: f64, valid_count: usize, lines: Vec<String>) -> Self {
        if valid_count > 0 {
            let average = total / valid_count as f64;
            Self {
                total,
                average,
                rating: Rating::from_average(average),
                lines,
            }
        } else {
            Self {
                total: 0.0,
                average: 0.0,
                rating: Rating::Unratable,
                lines,
            }
        }
    }

    fn unratable(lines: Vec<String>) -> Self {
        Self::rated(0.0, 0, lines)
    }
}

/// Blended overall score across both categories.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallScore {
    /// `fundamental.total + technical.total`
    pub total: f64,
    /// `(fundamental.average + technical.average) / 2`
    pub average: f64,
    /// Letter rating of the blended average
    pub rating: Rating,
}

impl OverallScore {
    /// Blend the two category scores. Both categories unratable makes the
    /// overall unratable too.
    pub fn blend(fundamental: &CategoryScore, technical: &CategoryScore) -> Self {
        let total = fundamental.total + technical.total;
        let average = (fundamental.average + technical.average) / 2.0;
        let rating = if fundamental.rating == Rating::Unratable
            && technical.rating == Rating::Unratable
        {
            Rating::Unratable
        } else {
            Rating::from_average(average)
        };

        Self {
            total,
            average,
            rating,
        }
    }
}

/// Complete scoring result for one instrument. Created fresh per scoring
/// call and immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentScore {
    /// Ticker symbol
    pub symbol: String,
    /// Display name
    pub short_name: String,
    /// Fundamental category score
    pub fundamental: CategoryScore,
    /// Technical category score
    pub technical: CategoryScore,
    /// Blended overall score
    pub overall: OverallScore,
    /// Human-readable narrative
    pub narrative: String,
}

// ============================================================================
// Instrument Scorer
// ============================================================================

/// Scores one instrument against the fixed threshold tables.
#[derive(Debug, Clone, Copy, Default)]
pub struct InstrumentScorer;

impl InstrumentScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score an instrument from its fundamental snapshot and optional
    /// technical indicators.
    pub fn score(
        &self,
        snapshot: &InstrumentSnapshot,
        technical: Option<&TechnicalSnapshot>,
    ) -> InstrumentScore {
        let (table, header) = match &snapshot.quote_type {
            QuoteType::Equity => (ThresholdTable::equity(), "进阶个股分析"),
            QuoteType::Etf => (ThresholdTable::etf(), "进阶ETF分析"),
            QuoteType::Other(raw) => return self.unsupported(snapshot, raw),
        };

        let fundamental = self.score_fundamentals(snapshot, table);
        let technical = self.score_technical(technical);
        let overall = OverallScore::blend(&fundamental, &technical);
        let narrative = self.compose_narrative(snapshot, header, &fundamental, &technical, overall);

        InstrumentScore {
            symbol: snapshot.symbol.clone(),
            short_name: snapshot.short_name.clone(),
            fundamental,
            technical,
            overall,
            narrative,
        }
    }

    // ========================================================================
    // Category Scoring
    // ========================================================================

    fn score_fundamentals(
        &self,
        snapshot: &InstrumentSnapshot,
        table: &ThresholdTable,
    ) -> CategoryScore {
        let mut lines = Vec::with_capacity(table.entries().len());
        let mut total = 0.0;
        let mut valid_count = 0usize;

        for entry in table.entries() {
            let value = match snapshot.metric(entry.name) {
                Some(v) => v,
                None => {
                    lines.push(format!("- {}: 数据缺失", entry.name));
                    continue;
                }
            };

            let classification = classify_entry(value, entry);
            lines.push(format!(
                "- {}: {} => {} (score={})",
                entry.name,
                format_metric_value(value, entry.display),
                classification.note,
                classification.score
            ));

            total += classification.score as f64;
            valid_count += 1;
        }

        CategoryScore::rated(total, valid_count, lines)
    }

    fn score_technical(&self, technical: Option<&TechnicalSnapshot>) -> CategoryScore {
        match technical {
            Some(snapshot) => {
                let eval = evaluate_technical(snapshot);
                CategoryScore::rated(eval.total, eval.valid_count, eval.lines)
            }
            None => CategoryScore::unratable(vec!["- 技术指标: 数据缺失（无历史行情）".to_string()]),
        }
    }

    // ========================================================================
    // Narrative
    // ========================================================================

    fn compose_narrative(
        &self,
        snapshot: &InstrumentSnapshot,
        header: &str,
        fundamental: &CategoryScore,
        technical: &CategoryScore,
        overall: OverallScore,
    ) -> String {
        let mut parts = Vec::new();
        parts.push(format!(
            "**[{}] {} / {}**",
            header, snapshot.symbol, snapshot.short_name
        ));

        parts.extend(fundamental.lines.iter().cloned());
        parts.push(rating_line("基本面评级", fundamental.average, fundamental.rating));

        parts.extend(technical.lines.iter().cloned());
        parts.push(rating_line("技术面评级", technical.average, technical.rating));

        if snapshot.quote_type == QuoteType::Etf {
            if snapshot.symbol.contains("0050") {
                parts.push("→ 追踪台湾前 50 大权值股，大盘联动度高。".to_string());
            } else if snapshot.symbol.contains("0056") {
                parts.push("→ 高股息策略，殖利率偏高，股价波动与大盘略有差异。".to_string());
            }
            parts.push(
                "【综合建议】ETF 可作为分散投资的核心或卫星标的，建议定期定额并留意成分股调整。"
                    .to_string(),
            );
        }

        parts.push(rating_line("综合评级", overall.average, overall.rating));

        parts.join("\n")
    }

    fn unsupported(&self, snapshot: &InstrumentSnapshot, raw_type: &str) -> InstrumentScore {
        tracing::warn!(
            symbol = %snapshot.symbol,
            quote_type = raw_type,
            "Unsupported instrument class, result is unratable"
        );

        let fundamental = CategoryScore::unratable(Vec::new());
        let technical = CategoryScore::unratable(Vec::new());
        let overall = OverallScore::blend(&fundamental, &technical);
        let narrative = format!(
            "{} quoteType={}，暂不支持进阶分析。",
            snapshot.symbol, raw_type
        );

        InstrumentScore {
            symbol: snapshot.symbol.clone(),
            short_name: snapshot.short_name.clone(),
            fundamental,
            technical,
            overall,
            narrative,
        }
    }
}

fn rating_line(label: &str, average: f64, rating: Rating) -> String {
    if rating == Rating::Unratable {
        format!("【{}】指标不足，无法评级", label)
    } else {
        format!("【{}】平均分数 {:.1} → 等级 {}", label, average, rating)
    }
}

fn format_metric_value(value: f64, display: DisplayStyle) -> String {
    match display {
        DisplayStyle::Plain => format!("{:.2}", value),
        DisplayStyle::Percent => format!("{:.2}%", value),
        DisplayStyle::RatioPercent => format!("{:.2}%", value * 100.0),
        DisplayStyle::Thousands => group_thousands(value),
    }
}

// ============================================================================
// Tests
// ============================================================================
