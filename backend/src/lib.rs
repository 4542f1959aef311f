//! # salespulse - Sales performance analysis with LLM-generated insights
//!
//! Salespulse loads a delimited sales-activity file into memory once,
//! aggregates it on demand, and forwards each summary to an external
//! language model for narrative commentary.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Data File  │────▶│   Loader    │────▶│  Reporter   │────▶│   Insight   │
//! │  (CSV)      │     │ (auto-enc)  │     │ (aggregate) │     │  Generator  │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!       load once        drop bad rows       pure reads          LLM prose
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use salespulse::{load_file, Reporter};
//! use std::sync::Arc;
//!
//! let result = load_file("sales_performance_data.csv")?;
//! let reporter = Reporter::new(Arc::new(result.dataset));
//! let summary = reporter.rep_summary(183)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Error types per concern
//! - [`models`] - Domain models (ActivityRecord, Dataset, Period)
//! - [`loader`] - Dataset loading with auto-detection
//! - [`report`] - Reporting engine (rep, team, trend summaries)
//! - [`insight`] - LLM insight generation
//! - [`api`] - HTTP API server

// Core modules
pub mod error;
pub mod models;

// Loading
pub mod loader;

// Reporting
pub mod report;

// Insights
pub mod insight;

// HTTP API
pub mod api;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    DataError, DataResult, InsightError, InsightResult, ReportError, ReportResult, ServerError,
    ServerResult,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{ActivityRecord, Dataset, Period, WeekdayTotals, WEEKDAY_KEYS};

// =============================================================================
// Re-exports - Loader
// =============================================================================

pub use loader::{detect_delimiter, detect_encoding, load_bytes, load_file, LoadResult};

// =============================================================================
// Re-exports - Reporting
// =============================================================================

pub use report::{RepSummary, Reporter, TeamSummary, TopPerformer, TrendBucket};

// =============================================================================
// Re-exports - Insights
// =============================================================================

pub use insight::{
    rep_prompt, system_prompt, team_prompt, trends_prompt, InsightGenerator, MistralClient,
};

// =============================================================================
// Re-exports - API
// =============================================================================

pub use api::server::{router, start_server, AppState};
pub use api::types::{
    error_response, RepPerformanceResponse, TeamPerformanceResponse, TrendsResponse,
};
