//! # Grantline - grant award timeline and amendment extraction
//!
//! Grantline transforms spreadsheet/CSV exports of grant award trackers into
//! two artifacts: an identifier-grouped amendment JSON document, and a
//! self-contained HTML timeline with the award dataset embedded inline.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ Tracker CSV  │────▶│   Parser    │────▶│  Transform  │────▶│ HTML report  │
//! │ (cp1252/utf8)│     │ (auto-enc)  │     │ (group+ref) │     │ or JSON map  │
//! └──────────────┘     └─────────────┘     └─────────────┘     └──────────────┘
//!        ▲ also: Award Details workbook (.xlsx) via calamine
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use grantline::{build_timeline, TimelineOptions};
//! use std::path::Path;
//!
//! let result = build_timeline(
//!     Path::new("Master Tracker.csv"),
//!     Some(Path::new("Award_Details.xlsx")),
//!     &TimelineOptions::default(),
//! )?;
//! std::fs::write("award_timeline.html", &result.html)?;
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Hierarchical error types
//! - [`models`] - Domain models (AwardRecord, AwardStatus, TimelineRecord)
//! - [`normalize`] - Date and currency normalization
//! - [`parser`] - Delimited-table parsing with auto-detection
//! - [`workbook`] - Excel sheet reading
//! - [`transform`] - Grouping, timeline computation, and pipelines
//! - [`report`] - HTML document rendering
//! - [`validation`] - Output schema validation
//! - [`logs`] - Pipeline progress logging

// Core modules
pub mod error;
pub mod logs;
pub mod models;

// Normalization
pub mod normalize;

// Parsing
pub mod parser;
pub mod workbook;

// Transformation
pub mod transform;

// Rendering
pub mod report;

// Validation
pub mod validation;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    CsvError, PipelineError, ReportError, ValidationError, WorkbookError,
};

// =============================================================================
// Re-exports - Models
// =============================================================================

pub use models::{
    AwardRecord, AwardStatus, TimelineRecord, TimelineSummary, UNKNOWN_AMENDMENT_TYPE,
};

// =============================================================================
// Re-exports - Normalization
// =============================================================================

pub use normalize::{parse_currency, parse_currency_checked, parse_date};

// =============================================================================
// Re-exports - Parsing
// =============================================================================

pub use parser::{
    decode_content, detect_delimiter, detect_encoding, parse_bytes_auto, parse_file_auto,
    parse_table, ParseResult,
};

pub use workbook::{read_sheet, SheetData, DEFAULT_SHEET};

// =============================================================================
// Re-exports - Transformation
// =============================================================================

pub use transform::{
    amendment_visible, build_records, enrich, group_amendments, group_rows, summarize,
    QualityReport,
};

pub use transform::pipeline::{
    build_timeline, extract_amendments, ExtractResult, TimelineOptions, TimelineResult,
};

// =============================================================================
// Re-exports - Rendering & Validation
// =============================================================================

pub use report::render_timeline;

pub use validation::{
    is_valid_amendment_map, validate_amendment_map, validate_timeline_record,
    validate_timeline_records,
};
