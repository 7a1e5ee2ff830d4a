//! The rating engine.
//!
//! Pure decision logic, no I/O:
//! - [`thresholds`]: fixed reference bands and direction-of-goodness per metric
//! - [`classifier`]: classifies one metric value against its band
//! - [`technical`]: rule-based evaluation of derived technical indicators
//! - [`scorer`]: per-instrument orchestration, letter ratings, narrative
//! - [`ranker`]: batch ranking by blended overall score

pub mod classifier;
pub mod ranker;
pub mod scorer;
pub mod technical;
pub mod thresholds;

pub use classifier::{classify, Classification, Level};
pub use ranker::{rank_batch, RankedReport};
pub use scorer::{CategoryScore, InstrumentScore, InstrumentScorer, OverallScore, Rating};
pub use technical::{
    evaluate_technical, IndicatorAssessment, TechnicalEvaluation, TechnicalSnapshot, VolumeTrend,
};
pub use thresholds::{Direction, MetricBand, ThresholdEntry, ThresholdTable};
