//! Technical evaluator.
//!
//! Classifies a fixed set of derived indicator values with hard-coded rule
//! logic. Five independent signals contribute to the technical score: an
//! RSI-style oscillator, the MACD/signal pair, the 50/200-period moving
//! average pair, an ADX trend-strength value, and a volume-trend category.
//!
//! Every assessment carries its score directly; aggregation never re-derives
//! scores from display text.

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Technical Snapshot
// ============================================================================

/// Volume trend category, computed externally by comparing the trailing
/// 20-period average volume against the preceding 20-period average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeTrend {
    /// Recent volume meaningfully above the preceding window
    Increasing,
    /// Recent volume meaningfully below the preceding window
    Decreasing,
    /// No meaningful change
    Stable,
}

impl fmt::Display for VolumeTrend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increasing => write!(f, "increasing"),
            Self::Decreasing => write!(f, "decreasing"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// Derived technical-indicator values for one instrument.
///
/// All fields are optional; each missing field excludes that signal from
/// scoring. The whole snapshot may be absent when no price history exists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSnapshot {
    /// RSI oscillator value (0-100)
    pub rsi: Option<f64>,
    /// MACD line value
    pub macd: Option<f64>,
    /// MACD signal line value
    pub macd_signal: Option<f64>,
    /// 50-period simple moving average
    pub sma50: Option<f64>,
    /// 200-period simple moving average
    pub sma200: Option<f64>,
    /// ADX trend-strength value (0-100)
    pub adx: Option<f64>,
    /// Volume trend category
    pub volume_trend: Option<VolumeTrend>,
}

// ============================================================================
// Evaluation
// ============================================================================

/// One indicator's structured assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorAssessment {
    /// Indicator name
    pub indicator: &'static str,
    /// Narrative note
    pub note: String,
    /// Score contribution (5-9)
    pub score: u8,
}

/// Aggregated technical evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TechnicalEvaluation {
    /// Structured per-indicator assessments (present signals only)
    pub assessments: Vec<IndicatorAssessment>,
    /// Narrative lines, one per signal including missing ones
    pub lines: Vec<String>,
    /// Sum of assessment scores
    pub total: f64,
    /// `total / valid_count`, or 0 when no signal was evaluable
    pub average: f64,
    /// Number of signals that produced an assessment
    pub valid_count: usize,
}

/// Evaluate the five technical signals.
pub fn evaluate_technical(snapshot: &TechnicalSnapshot) -> TechnicalEvaluation {
    let mut assessments = Vec::with_capacity(5);
    let mut lines = Vec::with_capacity(5);

    // Oscillator
    match snapshot.rsi {
        Some(rsi) => {
            let (note, score) = if rsi < 30.0 {
                ("超卖区，存在反弹机会", 8)
            } else if rsi > 70.0 {
                ("超买区，留意回调风险", 6)
            } else {
                ("处于正常区间", 7)
            };
            lines.push(format!("- RSI: {:.2} => {} (score={})", rsi, note, score));
            assessments.push(IndicatorAssessment {
                indicator: "RSI",
                note: note.to_string(),
                score,
            });
        }
        None => lines.push("- RSI: 数据缺失".to_string()),
    }

    // Trend/signal-line pair; requires both components
    match (snapshot.macd, snapshot.macd_signal) {
        (Some(macd), Some(signal)) => {
            let (note, score) = if macd > signal {
                ("MACD 在信号线上方，偏多头", 8)
            } else {
                ("MACD 在信号线下方，偏空头", 6)
            };
            lines.push(format!(
                "- MACD: {:.2} / 信号线 {:.2} => {} (score={})",
                macd, signal, note, score
            ));
            assessments.push(IndicatorAssessment {
                indicator: "MACD",
                note: note.to_string(),
                score,
            });
        }
        _ => lines.push("- MACD: 数据缺失".to_string()),
    }

    // Moving-average pair; requires both components
    match (snapshot.sma50, snapshot.sma200) {
        (Some(short), Some(long)) => {
            let (note, score) = if short > long {
                ("黄金交叉形态，中长期趋势向上", 9)
            } else {
                ("死亡交叉形态，中长期趋势向下", 5)
            };
            lines.push(format!(
                "- MA50/MA200: {:.2} / {:.2} => {} (score={})",
                short, long, note, score
            ));
            assessments.push(IndicatorAssessment {
                indicator: "MA",
                note: note.to_string(),
                score,
            });
        }
        _ => lines.push("- MA50/MA200: 数据缺失".to_string()),
    }

    // Trend strength
    match snapshot.adx {
        Some(adx) => {
            let (note, score) = if adx < 20.0 {
                ("趋势较弱", 5)
            } else if adx > 40.0 {
                ("趋势强劲", 8)
            } else {
                ("趋势中等", 6)
            };
            lines.push(format!("- ADX: {:.2} => {} (score={})", adx, note, score));
            assessments.push(IndicatorAssessment {
                indicator: "ADX",
                note: note.to_string(),
                score,
            });
        }
        None => lines.push("- ADX: 数据缺失".to_string()),
    }

    // Volume trend
    match snapshot.volume_trend {
        Some(trend) => {
            let (note, score) = match trend {
                VolumeTrend::Increasing => ("量能放大", 7),
                VolumeTrend::Decreasing => ("量能萎缩", 5),
                _ => ("量能平稳", 6),
            };
            lines.push(format!("- 量能趋势: {} => {} (score={})", trend, note, score));
            assessments.push(IndicatorAssessment {
                indicator: "Volume",
                note: note.to_string(),
                score,
            });
        }
        None => lines.push("- 量能趋势: 数据缺失".to_string()),
    }

    let valid_count = assessments.len();
    let total: f64 = assessments.iter().map(|a| a.score as f64).sum();
    let average = if valid_count > 0 {
        total / valid_count as f64
    } else {
        0.0
    };

    TechnicalEvaluation {
        assessments,
        lines,
        total,
        average,
        valid_count,
    }
}

// ============================================================================
// Tests
// ============================================================================
