//! Batch ranking.
//!
//! Collects per-instrument scores into a report ordered by blended overall
//! average, best first. Ties keep the caller's submission order so a run is
//! reproducible for the same inputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::scorer::{InstrumentScore, OverallScore};

/// A scored batch in descending overall order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedReport {
    /// Scores sorted by `overall.average`, descending, ties in input order
    pub entries: Vec<InstrumentScore>,
    /// When the ranking was produced
    pub generated_at: DateTime<Utc>,
}

impl RankedReport {
    /// The best `n` entries (fewer when the batch is smaller).
    pub fn top(&self, n: usize) -> &[InstrumentScore] {
        &self.entries[..self.entries.len().min(n)]
    }

    /// One line per instrument: rank, symbol, average, rating.
    pub fn summary(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, score)| {
                format!(
                    "{}. {} 平均 {:.2} 评级 {}",
                    i + 1,
                    score.symbol,
                    score.overall.average,
                    score.overall.rating
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Rank a batch of scores, best overall average first.
///
/// The overall blend is recomputed from the category scores so the ordering
/// cannot drift from what each entry reports. The sort is stable; instruments
/// with equal averages keep their submission order.
pub fn rank_batch(mut scores: Vec<InstrumentScore>) -> RankedReport {
    for score in &mut scores {
        score.overall = OverallScore::blend(&score.fundamental, &score.technical);
    }

    scores.sort_by(|a, b| {
        b.overall
            .average
            .partial_cmp(&a.overall.average)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    RankedReport {
        entries: scores,
        generated_at: Utc::now(),
    }
}
