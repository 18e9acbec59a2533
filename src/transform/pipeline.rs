//! High-level pipeline API.
//!
//! Two independent batch transforms share the parsing, grouping and
//! normalization layers:
//!
//! 1. Amendment extraction: workbook sheet → identifier-grouped JSON mapping.
//! 2. Timeline build: tracker table (+ optional workbook) → enriched dataset,
//!    aggregates, and the rendered HTML document.
//!
//! Both load everything into memory, transform, and hand the finished
//! document back to the caller; file writing stays with the CLI.

use chrono::{Local, NaiveDate};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::logs::{log_info, log_info_indent, log_success, log_warning};
use crate::models::{columns, TimelineRecord, TimelineSummary};
use crate::normalize::parse_date;
use crate::parser::parse_file_auto;
use crate::report::render_timeline;
use crate::transform::grouper::group_amendments;
use crate::transform::timeline::{build_records, enrich, summarize, QualityReport};
use crate::validation::{validate_amendment_map, validate_timeline_records};
use crate::workbook::read_sheet;

/// Options for the timeline build.
#[derive(Debug, Clone)]
pub struct TimelineOptions {
    /// Workbook sheet holding amendment rows.
    pub sheet: String,
    /// Reference date for status and aggregates; defaults to today.
    pub reference_date: Option<NaiveDate>,
    /// "Date of Source Data" label shown in the legend.
    pub source_label: Option<String>,
    /// Skip output schema validation.
    pub skip_validation: bool,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            sheet: crate::workbook::DEFAULT_SHEET.to_string(),
            reference_date: None,
            source_label: None,
            skip_validation: false,
        }
    }
}

/// Result of the amendment extraction pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractResult {
    /// Identifier → ordered list of `{date, type}` entries.
    pub grouped: Map<String, Value>,
    /// Source rows seen.
    pub row_count: usize,
    /// Identifiers with at least one amendment.
    pub group_count: usize,
    /// Total amendment entries kept.
    pub entry_count: usize,
    /// Dropped-row accounting.
    pub quality: QualityReport,
}

/// Result of the timeline build pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineResult {
    /// Enriched records, ascending by end date.
    pub records: Vec<TimelineRecord>,
    /// Amendment mapping embedded alongside the records.
    pub amendments: Map<String, Value>,
    /// Aggregates at the build reference date.
    pub summary: TimelineSummary,
    /// Dropped-row accounting for the tracker table.
    pub quality: QualityReport,
    /// The rendered document.
    pub html: String,
}

// =============================================================================
// Amendment extraction
// =============================================================================

/// Extract and group amendments from a workbook sheet.
pub fn extract_amendments(
    workbook: &Path,
    sheet: &str,
    skip_validation: bool,
) -> PipelineResult<ExtractResult> {
    log_info(format!("📖 Reading workbook: {}", workbook.display()));
    let data = read_sheet(workbook, sheet)?;
    log_success(format!("Read {} rows from sheet '{}'", data.records.len(), sheet));

    let grouped = group_amendments(&data.records);

    let quality = amendment_quality(&data.records);
    quality.log();

    let entry_count: usize = grouped
        .values()
        .filter_map(|v| v.as_array())
        .map(|a| a.len())
        .sum();

    log_success(format!("Identifiers with amendments: {}", grouped.len()));
    log_success(format!("Total amendments: {}", entry_count));

    // Sample of the grouping, matching the diagnostic the report consumers
    // are used to seeing.
    for (fain, entries) in grouped.iter().take(3) {
        let entries = entries.as_array().map(Vec::as_slice).unwrap_or(&[]);
        log_info(format!("FAIN: {}", fain));
        log_info_indent(format!("Amendments: {}", entries.len()), 1);
        if let Some(first) = entries.first() {
            log_info_indent(format!("First: {}", first), 1);
        }
    }

    if !skip_validation {
        validate_amendment_map(&Value::Object(grouped.clone()))?;
        log_success("Amendment mapping valid");
    }

    Ok(ExtractResult {
        row_count: data.records.len(),
        group_count: grouped.len(),
        entry_count,
        quality,
        grouped,
    })
}

/// Count why amendment rows were dropped.
fn amendment_quality(rows: &[Value]) -> QualityReport {
    let mut quality = QualityReport {
        rows_total: rows.len(),
        ..Default::default()
    };

    for row in rows {
        let fain = row
            .get(columns::FAIN)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or("");
        if fain.is_empty() {
            quality.dropped_missing_identifier += 1;
            continue;
        }

        let date = row
            .get(columns::ISSUE_DATE)
            .and_then(|v| v.as_str())
            .and_then(parse_date);
        if date.is_none() {
            quality.dropped_missing_date += 1;
            continue;
        }

        quality.rows_kept += 1;
    }

    quality
}

// =============================================================================
// Timeline build
// =============================================================================

/// Build the timeline dataset and render the HTML document.
///
/// A workbook that cannot be read degrades to an empty amendment mapping
/// with a warning; the timeline itself still builds.
pub fn build_timeline(
    tracker: &Path,
    workbook: Option<&Path>,
    options: &TimelineOptions,
) -> PipelineResult<TimelineResult> {
    log_info(format!("📖 Reading tracker: {}", tracker.display()));
    let parse_result = parse_file_auto(tracker)?;
    log_success(format!("Detected encoding: {}", parse_result.encoding));
    log_success(format!(
        "Detected delimiter: '{}'",
        format_delimiter(parse_result.delimiter)
    ));
    log_success(format!("Read {} rows", parse_result.records.len()));

    let (awards, quality) = build_records(&parse_result.records);
    quality.log();

    if awards.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let reference = options
        .reference_date
        .unwrap_or_else(|| Local::now().date_naive());
    log_info(format!("Reference date: {}", reference));

    let amendments = load_amendments(workbook, &options.sheet);

    let records = enrich(&awards, reference);
    let summary = summarize(&awards, &amendments, reference);

    log_success(format!("Total awards: {}", awards.len()));
    log_success(format!("All awards (started by {}): ${:.2}", reference, summary.grand_total));
    log_info_indent(format!("Closed: ${:.2}", summary.closed_total), 1);
    log_info_indent(format!("Active: ${:.2}", summary.active_total), 1);
    log_info_indent(format!("Amendments to date: {}", summary.amendment_count), 1);

    if !options.skip_validation {
        let as_values: Vec<Value> = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<_, _>>()?;
        validate_timeline_records(&as_values)?;
        log_success("Timeline dataset valid");
    }

    let source_label = options
        .source_label
        .clone()
        .unwrap_or_else(|| reference.format("%B %d, %Y").to_string());
    let html = render_timeline(&records, &amendments, reference, &source_label)?;

    Ok(TimelineResult {
        records,
        amendments,
        summary,
        quality,
        html,
    })
}

/// Read and group amendments for the timeline overlay.
///
/// Any failure here is absorbed: the overlay is optional and the run
/// continues with an empty mapping.
fn load_amendments(workbook: Option<&Path>, sheet: &str) -> Map<String, Value> {
    let Some(path) = workbook else {
        log_info("No amendment workbook supplied; overlay will be empty");
        return Map::new();
    };

    match read_sheet(path, sheet) {
        Ok(data) => {
            log_success(format!(
                "Read {} amendment rows from {}",
                data.records.len(),
                path.display()
            ));
            let grouped = group_amendments(&data.records);
            log_success(format!("Identifiers with amendments: {}", grouped.len()));
            grouped
        }
        Err(e) => {
            log_warning(format!("Could not read amendment data: {}", e));
            log_warning("Continuing with an empty amendment mapping");
            Map::new()
        }
    }
}

/// Format delimiter for display
fn format_delimiter(d: char) -> String {
    match d {
        '\t' => "\\t".to_string(),
        c => c.to_string(),
    }
}
