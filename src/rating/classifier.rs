//! Metric classifier.
//!
//! Classifies a single metric value against its reference band, producing a
//! qualitative level, a narrative note, and a score. One parameterized
//! classifier serves both instrument classes; polarity comes from the
//! table's direction metadata.
//!
//! Score contract:
//! - `LessIsBetter`: below band 10, inside 5, above 2
//! - `MoreIsBetter`: below band 2, inside 5, above 10
//! - `MidIsBetter`:  below band 6, inside 8, above 4

use serde::{Deserialize, Serialize};
use std::fmt;

use super::thresholds::{format_bound, Direction, ThresholdEntry, ThresholdTable};

// ============================================================================
// Classification Result
// ============================================================================

/// Qualitative position of a value relative to its band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    /// Below the lower bound
    Low,
    /// Within the band
    Mid,
    /// Above the upper bound
    High,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Mid => write!(f, "MID"),
            Self::High => write!(f, "HIGH"),
        }
    }
}

/// Result of classifying one metric value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Band position
    pub level: Level,
    /// Narrative note summarizing the band relation
    pub note: String,
    /// Score contribution
    pub score: u8,
}

// ============================================================================
// Classification
// ============================================================================

/// Classify `value` against the band for `metric` in `table`.
///
/// Returns `None` when the value is absent or the metric has no band in the
/// table; such metrics are excluded from scoring entirely.
pub fn classify(value: Option<f64>, metric: &str, table: &ThresholdTable) -> Option<Classification> {
    let entry = table.get(metric)?;
    let value = value?;
    Some(classify_entry(value, entry))
}

/// Classify a value against a resolved threshold entry.
pub fn classify_entry(value: f64, entry: &ThresholdEntry) -> Classification {
    let low = entry.band.low;
    let high = entry.band.high;
    let low_note = format_bound(low * entry.note_scale);
    let high_note = format_bound(high * entry.note_scale);

    match entry.direction {
        Direction::LessIsBetter => {
            if value < low {
                Classification {
                    level: Level::Low,
                    note: format!("明显低于参考值({})，对投资人相对有利", low_note),
                    score: 10,
                }
            } else if value > high {
                Classification {
                    level: Level::High,
                    note: format!("高于参考值({})，需留意高估风险", high_note),
                    score: 2,
                }
            } else {
                Classification {
                    level: Level::Mid,
                    note: format!("介于 {} ~ {} 的区间", low_note, high_note),
                    score: 5,
                }
            }
        }
        Direction::MoreIsBetter => {
            if value < low {
                Classification {
                    level: Level::Low,
                    note: format!("低于参考值({})", low_note),
                    score: 2,
                }
            } else if value > high {
                Classification {
                    level: Level::High,
                    note: format!("高于参考值({})，值得肯定", high_note),
                    score: 10,
                }
            } else {
                Classification {
                    level: Level::Mid,
                    note: format!("在 {} ~ {} 的合理范围", low_note, high_note),
                    score: 5,
                }
            }
        }
        Direction::MidIsBetter => {
            if value < low {
                Classification {
                    level: Level::Low,
                    note: format!("波动低于市场平均({})", low_note),
                    score: 6,
                }
            } else if value > high {
                Classification {
                    level: Level::High,
                    note: format!("波动高于市场平均({})，风险也较高", high_note),
                    score: 4,
                }
            } else {
                Classification {
                    level: Level::Mid,
                    note: format!("在 {} ~ {} 的波动区间", low_note, high_note),
                    score: 8,
                }
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
