//! Stock Grader Library
//!
//! Scores equities and ETFs against fixed reference bands for fundamental
//! and technical metrics, producing a per-instrument letter rating (A-D)
//! and a ranked batch report.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         stock-grader                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐   ┌──────────────┐   ┌──────────────────┐    │
//! │  │  Quote       │──▶│  Rating      │──▶│  Report          │    │
//! │  │  Provider    │   │  Engine      │   │  (CSV/MD/JSON)   │    │
//! │  └──────────────┘   └──────────────┘   └──────────────────┘    │
//! │         │                  ▲                                    │
//! │         ▼                  │                                    │
//! │  ┌──────────────┐   ┌──────────────┐                           │
//! │  │  Price       │──▶│  Indicator   │                           │
//! │  │  History     │   │  Computation │                           │
//! │  └──────────────┘   └──────────────┘                           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Concepts
//!
//! ## Threshold bands
//! Every fundamental metric has a fixed `[low, high]` reference band and a
//! direction of goodness (lower is better, higher is better, or interior is
//! better for volatility-style metrics). Classifying a value against its band
//! yields a qualitative level (LOW/MID/HIGH), a narrative note, and a score.
//!
//! ## Letter ratings
//! Per-category average scores map onto coarse letter grades:
//! `avg >= 8` → A, `>= 5` → B, `>= 3` → C, otherwise D. An instrument with
//! zero valid metrics in a category is "unratable" rather than graded.
//!
//! ## Partial-failure isolation
//! A missing metric, an unsupported instrument type, or unavailable price
//! history degrades only the affected instrument or category. No single
//! instrument can abort the batch.

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod data;
pub mod indicators;
pub mod logging;
pub mod rating;
pub mod report;
