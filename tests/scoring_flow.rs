//! End-to-end tests for the scoring pipeline.
//!
//! Snapshot construction → scoring → ranking → report generation, over
//! synthetic instruments. No network access; the provider layer is covered
//! by its own parsing tests.

use stock_grader::data::{InstrumentSnapshot, QuoteType};
use stock_grader::indicators;
use stock_grader::rating::{
    rank_batch, InstrumentScorer, Rating, TechnicalSnapshot, VolumeTrend,
};
use stock_grader::report::{RatingReport, ReportFormat};

// ============================================================================
// Test Data Generators
// ============================================================================

/// Equity with uniformly favorable fundamentals.
fn strong_equity() -> InstrumentSnapshot {
    InstrumentSnapshot::new("2330.TW", "台积电", QuoteType::Equity)
        .with_metric("PE", Some(9.0))
        .with_metric("PB", Some(0.8))
        .with_metric("Beta", Some(0.7))
        .with_metric("ROE", Some(0.25))
        .with_metric("DividendYield", Some(7.0))
        .with_metric("PEG", Some(0.8))
        .with_metric("OperatingMargin", Some(0.35))
        .with_metric("DebtToEquity", Some(40.0))
        .with_metric("CurrentRatio", Some(2.5))
        .with_metric("QuickRatio", Some(2.2))
        .with_metric("RevenueGrowth", Some(0.25))
        .with_metric("EarningsGrowth", Some(0.22))
}

/// Equity with uniformly unfavorable fundamentals.
fn weak_equity() -> InstrumentSnapshot {
    InstrumentSnapshot::new("9105.TW", "弱势股", QuoteType::Equity)
        .with_metric("PE", Some(40.0))
        .with_metric("PB", Some(8.0))
        .with_metric("Beta", Some(1.8))
        .with_metric("ROE", Some(0.02))
        .with_metric("DividendYield", Some(0.5))
        .with_metric("PEG", Some(3.5))
        .with_metric("OperatingMargin", Some(0.03))
        .with_metric("DebtToEquity", Some(180.0))
        .with_metric("CurrentRatio", Some(0.6))
        .with_metric("QuickRatio", Some(0.4))
        .with_metric("RevenueGrowth", Some(0.01))
        .with_metric("EarningsGrowth", Some(-0.05))
}

fn etf_0050() -> InstrumentSnapshot {
    InstrumentSnapshot::new("0050.TW", "元大台湾50", QuoteType::Etf)
        .with_metric("ETF_PE", Some(16.0))
        .with_metric("ETF_Yield", Some(3.2))
        .with_metric("ETF_Beta3Y", Some(1.0))
        .with_metric("threeYearAverageReturn", Some(0.12))
        .with_metric("fiveYearAverageReturn", Some(0.11))
        .with_metric("totalAssets", Some(4.3e11))
}

fn neutral_technical() -> TechnicalSnapshot {
    TechnicalSnapshot {
        rsi: Some(55.0),
        macd: Some(0.4),
        macd_signal: Some(0.6),
        sma50: Some(98.0),
        sma200: Some(100.0),
        adx: Some(25.0),
        volume_trend: Some(VolumeTrend::Stable),
    }
}

// ============================================================================
// Pipeline Tests
// ============================================================================

#[test]
fn strong_fundamentals_outrank_weak_ones() {
    let scorer = InstrumentScorer::new();
    // Submit in worst-first order; ranking must invert it
    let scores = vec![
        scorer.score(&weak_equity(), None),
        scorer.score(&etf_0050(), None),
        scorer.score(&strong_equity(), None),
    ];

    let ranked = rank_batch(scores);
    let order: Vec<&str> = ranked.entries.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(order, vec!["2330.TW", "0050.TW", "9105.TW"]);

    // All twelve equity metrics at their best side
    let best = &ranked.entries[0];
    assert!((best.fundamental.total - 120.0).abs() < 1e-9);
    assert!((best.fundamental.average - 10.0).abs() < 1e-9);
    assert_eq!(best.fundamental.rating, Rating::A);

    // All twelve at their worst side
    let worst = &ranked.entries[2];
    assert!((worst.fundamental.total - 24.0).abs() < 1e-9);
    assert!((worst.fundamental.average - 2.0).abs() < 1e-9);
    assert_eq!(worst.fundamental.rating, Rating::D);
}

#[test]
fn etf_scores_against_its_own_table() {
    let scorer = InstrumentScorer::new();
    let score = scorer.score(&etf_0050(), None);

    // ETF_PE mid 5, ETF_Yield mid 5, ETF_Beta3Y interior 8,
    // three/five-year returns above band 10 each, totalAssets mid 5
    assert!((score.fundamental.total - 43.0).abs() < 1e-9);
    assert!((score.fundamental.average - 43.0 / 6.0).abs() < 1e-9);
    assert_eq!(score.fundamental.rating, Rating::B);
    assert!(score.narrative.contains("进阶ETF分析"));
    assert!(score.narrative.contains("【综合建议】"));
}

#[test]
fn technical_category_blends_into_overall() {
    let scorer = InstrumentScorer::new();
    let technical = neutral_technical();
    let score = scorer.score(&strong_equity(), Some(&technical));

    // RSI mid 7, MACD below signal 6, death cross 5, ADX mid 6, stable 6 = 30
    assert!((score.technical.total - 30.0).abs() < 1e-9);
    assert!((score.technical.average - 6.0).abs() < 1e-9);
    assert_eq!(score.technical.rating, Rating::B);

    assert!((score.overall.total - 150.0).abs() < 1e-9);
    assert!((score.overall.average - 8.0).abs() < 1e-9);
    assert_eq!(score.overall.rating, Rating::A);
}

#[test]
fn failure_isolation_leaves_other_instruments_intact() {
    let scorer = InstrumentScorer::new();
    let unsupported =
        InstrumentSnapshot::new("USDTWD=X", "美元/台币", QuoteType::Other("CURRENCY".into()));

    let ranked = rank_batch(vec![
        scorer.score(&unsupported, None),
        scorer.score(&strong_equity(), Some(&neutral_technical())),
    ]);

    assert_eq!(ranked.entries.len(), 2);
    assert_eq!(ranked.entries[0].symbol, "2330.TW");
    assert_eq!(ranked.entries[1].overall.rating, Rating::Unratable);
}

#[test]
fn ties_preserve_submission_order() {
    let scorer = InstrumentScorer::new();
    let twin = |symbol: &str| {
        let snap = InstrumentSnapshot::new(symbol, symbol, QuoteType::Equity)
            .with_metric("PE", Some(15.0));
        scorer.score(&snap, None)
    };

    let ranked = rank_batch(vec![
        twin("X.TW"),
        scorer.score(&strong_equity(), None),
        twin("Z.TW"),
    ]);

    let order: Vec<&str> = ranked.entries.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(order, vec!["2330.TW", "X.TW", "Z.TW"]);
}

#[test]
fn repeated_runs_are_identical() {
    let scorer = InstrumentScorer::new();
    let run = || {
        let scores = vec![
            scorer.score(&weak_equity(), Some(&neutral_technical())),
            scorer.score(&strong_equity(), Some(&neutral_technical())),
            scorer.score(&etf_0050(), None),
        ];
        RatingReport::new(rank_batch(scores)).to_csv()
    };

    assert_eq!(run(), run());
}

// ============================================================================
// Report Output
// ============================================================================

#[test]
fn csv_report_is_ranked_and_complete() {
    let scorer = InstrumentScorer::new();
    let scores = vec![
        scorer.score(&weak_equity(), None),
        scorer.score(&strong_equity(), None),
        scorer.score(&etf_0050(), None),
    ];
    let report = RatingReport::new(rank_batch(scores));
    let csv = report.to_csv();

    let lines: Vec<&str> = csv.lines().collect();
    assert!(lines[0].starts_with("symbol,shortName,fundamentalTotal"));
    assert!(lines[1].starts_with("2330.TW,"));
    assert!(lines[1].contains(",A,"));
    // Quoted multi-line narratives mean raw line count exceeds row count
    assert!(csv.matches("数据缺失").count() > 0 || csv.contains("进阶"));
}

#[test]
fn reports_write_to_disk() {
    let scorer = InstrumentScorer::new();
    let report = RatingReport::new(rank_batch(vec![scorer.score(&strong_equity(), None)]));
    let dir = tempfile::tempdir().unwrap();

    for format in [ReportFormat::Csv, ReportFormat::Markdown, ReportFormat::Json] {
        let path = report
            .save_to_file(&dir.path().join("ratings"), format)
            .unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(!content.is_empty(), "empty {} report", format);
    }
}

// ============================================================================
// Indicators to Scoring Handoff
// ============================================================================

#[test]
fn computed_indicators_feed_the_scorer() {
    use chrono::NaiveDate;
    use stock_grader::data::Candle;

    // A year of steadily rising candles with a volume pickup at the end
    let candles: Vec<Candle> = (0..250)
        .map(|i| {
            let close = 100.0 + i as f64 * 0.3;
            Candle {
                date: NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .checked_add_days(chrono::Days::new(i))
                    .unwrap(),
                open: close - 0.2,
                high: close + 0.5,
                low: close - 0.5,
                close,
                volume: if i >= 230 { 2_000.0 } else { 1_000.0 },
            }
        })
        .collect();

    let technical = indicators::compute_snapshot(&candles).unwrap();
    assert_eq!(technical.volume_trend, Some(VolumeTrend::Increasing));

    let scorer = InstrumentScorer::new();
    let score = scorer.score(&strong_equity(), Some(&technical));
    assert_ne!(score.technical.rating, Rating::Unratable);
    assert!(score.technical.average > 0.0);
    assert!(score.narrative.contains("黄金交叉") || score.narrative.contains("SMA"));
}
