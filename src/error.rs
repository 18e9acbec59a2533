//! Error types for the grantline pipelines.
//!
//! This module defines a hierarchy of error types:
//!
//! - [`CsvError`] - Delimited-table parsing errors
//! - [`WorkbookError`] - Excel workbook reading errors
//! - [`ReportError`] - HTML report rendering errors
//! - [`ValidationError`] - Output schema validation errors
//! - [`PipelineError`] - Top-level orchestration errors
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.
//!
//! Row-level problems (missing identifier, unparseable date or amount) are
//! not errors at all: the pipelines drop the row or default the value and
//! record the fact in a [`crate::transform::QualityReport`].

use thiserror::Error;

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during delimited-table parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to decode bytes with the detected encoding.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Invalid table format.
    #[error("Invalid table format: {0}")]
    ParseError(String),

    /// Empty file.
    #[error("Table file is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in table")]
    NoHeaders,
}

// =============================================================================
// Workbook Errors
// =============================================================================

/// Errors while reading an Excel workbook.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// Failed to open the workbook file.
    #[error("Failed to open workbook: {0}")]
    Open(String),

    /// The requested sheet does not exist.
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The sheet has no header row.
    #[error("Sheet '{0}' is empty")]
    EmptySheet(String),
}

// =============================================================================
// Report Errors
// =============================================================================

/// Errors during HTML report rendering.
#[derive(Debug, Error)]
pub enum ReportError {
    /// JSON serialization of an embedded payload failed.
    #[error("Failed to embed data: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Failed to write the output document.
    #[error("Failed to write report: {0}")]
    IoError(#[from] std::io::Error),
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Errors during output schema validation.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Schema validation failed.
    #[error("Validation failed: {errors:?}")]
    SchemaError { errors: Vec<String> },

    /// The document is not the expected JSON shape.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// IO error while reading a document to check.
    #[error("Validation IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parse error while reading a document to check.
    #[error("Validation JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline orchestration errors.
///
/// This is the main error type returned by [`crate::transform::pipeline`]
/// entry points. It wraps all lower-level errors and adds pipeline-specific
/// variants.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Table parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Workbook reading error.
    #[error("Workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// Report rendering error.
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// Output validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No usable rows in the input.
    #[error("No usable rows in input")]
    EmptyInput,
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for table parsing operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for workbook operations.
pub type WorkbookResult<T> = Result<T, WorkbookError>;

/// Result type for report rendering.
pub type ReportResult<T> = Result<T, ReportError>;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;
