//! Runtime configuration for the grader.
//!
//! Configuration is loaded from a JSON file (default:
//! `~/.stock-grader/config.json`). A missing file falls back to defaults so
//! the tool works out of the box. Log filtering can still be overridden via
//! `RUST_LOG`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Grader configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraderConfig {
    /// Symbols to score, in ranking tie-break order
    pub watchlist: Vec<String>,
    /// Directory where reports are written
    pub output_dir: PathBuf,
    /// Base log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format: "pretty" or "json"
    pub log_format: String,
    /// HTTP request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            watchlist: vec![
                "2330.TW".to_string(),
                "0050.TW".to_string(),
                "0056.TW".to_string(),
            ],
            output_dir: config_dir().join("reports"),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Resolve the configuration directory (`~/.stock-grader`).
pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".stock-grader")
}

impl GraderConfig {
    /// Load configuration from the given path, or from the default location.
    ///
    /// A missing file is not an error; defaults are used instead.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => config_dir().join("config.json"),
        };

        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file found, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::debug!(path = %path.display(), symbols = config.watchlist.len(), "Loaded config");
        Ok(config)
    }
}

// ============================================================================
// Tests
// ============================================================================
