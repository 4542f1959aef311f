//! Error types for the salespulse service.
//!
//! This module defines one error enum per concern:
//!
//! - [`DataError`] - Dataset loading errors (fatal at startup)
//! - [`ReportError`] - Reporting engine errors
//! - [`InsightError`] - Insight generator (LLM) errors
//! - [`ServerError`] - Request-level errors wrapping the above
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Dataset Loading Errors
// =============================================================================

/// Errors while loading the activity dataset.
///
/// Any of these at startup means the process must not serve traffic.
#[derive(Debug, Error)]
pub enum DataError {
    /// Failed to read the data file.
    #[error("Failed to read data file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode file contents.
    #[error("Failed to decode file contents: {0}")]
    Encoding(String),

    /// Empty data file.
    #[error("Data file is empty")]
    EmptyFile,

    /// A required column is missing from the header row.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Malformed delimited data.
    #[error("Invalid data format: {0}")]
    Parse(String),
}

// =============================================================================
// Reporting Errors
// =============================================================================

/// Errors from the reporting engine.
#[derive(Debug, Error)]
pub enum ReportError {
    /// No records exist for the requested rep.
    #[error("Rep not found: {0}")]
    RepNotFound(i64),

    /// Unsupported trend period.
    #[error("Invalid time_period '{0}'. Use 'monthly' or 'quarterly'.")]
    InvalidPeriod(String),
}

// =============================================================================
// Insight Generator Errors
// =============================================================================

/// Errors from the insight generator.
#[derive(Debug, Error)]
pub enum InsightError {
    /// Missing API key.
    #[error("Missing MISTRAL_API_KEY environment variable")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("LLM request failed: {0}")]
    RequestFailed(String),

    /// The provider rejected the request.
    #[error("LLM API error: {0}")]
    ApiError(String),

    /// Unusable completion payload.
    #[error("Invalid LLM response: {0}")]
    InvalidResponse(String),
}

// =============================================================================
// Server Errors (request-level)
// =============================================================================

/// Request-level errors.
///
/// Wraps everything a handler can fail with so the HTTP layer
/// can map each variant to a status code in one place.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Reporting error.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Insight generation error.
    #[error("Insight generation failed: {0}")]
    Insight(#[from] InsightError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for dataset loading.
pub type DataResult<T> = Result<T, DataError>;

/// Result type for reporting operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type for insight generation.
pub type InsightResult<T> = Result<T, InsightError>;

/// Result type for request handling.
pub type ServerResult<T> = Result<T, ServerError>;
