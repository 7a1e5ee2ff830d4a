//! Report generation for ranked rating results.
//!
//! Generates reports in various formats:
//! - CSV (for spreadsheets)
//! - Markdown (for documentation)
//! - JSON (for API/programmatic use)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::rating::{RankedReport, Rating};

// ============================================================================
// Report Format
// ============================================================================

/// Supported report formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    /// CSV format (spreadsheet-friendly)
    Csv,
    /// Markdown format (human-readable)
    Markdown,
    /// JSON format (machine-readable)
    Json,
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown report format: {}", s)),
        }
    }
}

// ============================================================================
// Rating Report
// ============================================================================

const CSV_HEADER: &str = "symbol,shortName,fundamentalTotal,fundamentalAverage,fundamentalRating,technicalTotal,technicalAverage,technicalRating,overallAverage,overallRating,narrative";

/// Report generator for a ranked rating batch.
pub struct RatingReport {
    ranked: RankedReport,
}

impl RatingReport {
    /// Create a new report from a ranked batch.
    pub fn new(ranked: RankedReport) -> Self {
        Self { ranked }
    }

    pub fn ranked(&self) -> &RankedReport {
        &self.ranked
    }

    /// Generate report in the specified format.
    pub fn generate(&self, format: ReportFormat) -> String {
        match format {
            ReportFormat::Csv => self.to_csv(),
            ReportFormat::Markdown => self.to_markdown(),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Save report to file.
    pub fn save_to_file(&self, path: &Path, format: ReportFormat) -> Result<PathBuf> {
        let content = self.generate(format);
        let extension = match format {
            ReportFormat::Csv => "csv",
            ReportFormat::Markdown => "md",
            ReportFormat::Json => "json",
        };

        let file_path = if path.extension().is_none() {
            path.with_extension(extension)
        } else {
            path.to_path_buf()
        };

        // Ensure directory exists
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create report directory")?;
        }

        std::fs::write(&file_path, content).context("Failed to write report file")?;

        Ok(file_path)
    }

    /// Generate CSV in ranked order, one row per instrument.
    pub fn to_csv(&self) -> String {
        let mut csv = String::from(CSV_HEADER);
        csv.push('\n');

        for score in &self.ranked.entries {
            let row = [
                csv_escape(&score.symbol),
                csv_escape(&score.short_name),
                format!("{:.2}", score.fundamental.total),
                format!("{:.4}", score.fundamental.average),
                score.fundamental.rating.to_string(),
                format!("{:.2}", score.technical.total),
                format!("{:.4}", score.technical.average),
                score.technical.rating.to_string(),
                format!("{:.4}", score.overall.average),
                score.overall.rating.to_string(),
                csv_escape(&score.narrative),
            ];
            csv.push_str(&row.join(","));
            csv.push('\n');
        }

        csv
    }

    /// Generate markdown report.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "# 观察清单评级报告\n\n**时间**: {}\n**标的数**: {}\n\n",
            self.ranked.generated_at.format("%Y-%m-%d %H:%M:%S"),
            self.ranked.entries.len()
        ));

        // Ranking table
        md.push_str("## 综合排名\n\n");
        md.push_str("| 排名 | 代码 | 名称 | 基本面 | 技术面 | 综合 | 评级 |\n");
        md.push_str("|------|------|------|--------|--------|------|------|\n");

        for (i, score) in self.ranked.entries.iter().enumerate() {
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                i + 1,
                score.symbol,
                score.short_name,
                rating_cell(score.fundamental.average, score.fundamental.rating),
                rating_cell(score.technical.average, score.technical.rating),
                format!("{:.2}", score.overall.average),
                score.overall.rating,
            ));
        }
        md.push('\n');

        // Per-instrument narratives
        md.push_str("## 个别分析\n\n");
        for score in &self.ranked.entries {
            md.push_str(&score.narrative);
            md.push_str("\n\n");
        }

        md
    }

    /// Generate JSON report ready for programmatic use.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self.ranked)
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

fn rating_cell(average: f64, rating: Rating) -> String {
    if rating == Rating::Unratable {
        "—".to_string()
    } else {
        format!("{:.2} ({})", average, rating)
    }
}

/// RFC 4180 quoting: wrap fields containing commas, quotes, or newlines in
/// double quotes and double embedded quotes.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================
