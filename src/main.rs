//! Stock Grader - threshold-based rating reports for a watchlist.
//!
//! Fetches fundamentals and daily history for each configured symbol,
//! scores them against fixed threshold tables, and writes ranked CSV and
//! Markdown reports.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;

use stock_grader::config::GraderConfig;
use stock_grader::data::{QuoteProvider, YahooProvider};
use stock_grader::indicators;
use stock_grader::logging::init_logging;
use stock_grader::rating::{rank_batch, InstrumentScorer, TechnicalSnapshot};
use stock_grader::report::{RatingReport, ReportFormat};

#[tokio::main]
async fn main() -> Result<()> {
    // Optional config path as the first argument
    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = GraderConfig::load(config_path.as_deref())?;

    init_logging(&config.log_level, &config.log_format);

    tracing::info!(
        watchlist = config.watchlist.len(),
        "Stock Grader v{}",
        env!("CARGO_PKG_VERSION")
    );

    let provider = YahooProvider::new(Duration::from_secs(config.request_timeout_secs));
    let scorer = InstrumentScorer::new();
    let mut scores = Vec::with_capacity(config.watchlist.len());

    for symbol in &config.watchlist {
        // A snapshot failure skips this instrument only
        let snapshot = match provider.fetch_snapshot(symbol).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(
                    symbol = %symbol,
                    error = %e,
                    recoverable = e.is_recoverable(),
                    "跳过标的: 基本面快照获取失败"
                );
                continue;
            }
        };

        let technical = fetch_technical(&provider, symbol).await;
        scores.push(scorer.score(&snapshot, technical.as_ref()));
    }

    if scores.is_empty() {
        tracing::warn!("观察清单没有任何可评分的标的");
    }

    let report = RatingReport::new(rank_batch(scores));

    let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let base = config.output_dir.join(format!("ratings_{}", stamp));
    let csv_path = report
        .save_to_file(&base, ReportFormat::Csv)
        .context("Failed to save CSV report")?;
    let md_path = report
        .save_to_file(&base, ReportFormat::Markdown)
        .context("Failed to save Markdown report")?;

    tracing::info!(
        csv = %csv_path.display(),
        markdown = %md_path.display(),
        "报告已生成"
    );

    println!("{}", report.ranked().summary());

    Ok(())
}

/// History or indicator failure degrades the technical category for this
/// instrument and nothing else.
async fn fetch_technical(provider: &YahooProvider, symbol: &str) -> Option<TechnicalSnapshot> {
    let candles = match provider.fetch_daily_history(symbol).await {
        Ok(candles) => candles,
        Err(e) => {
            tracing::warn!(symbol = %symbol, error = %e, "历史行情不可用，技术面不评分");
            return None;
        }
    };

    match indicators::compute_snapshot(&candles) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!(symbol = %symbol, error = %e, "技术指标计算失败，技术面不评分");
            None
        }
    }
}
