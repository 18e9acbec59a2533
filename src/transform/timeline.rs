//! Timeline dataset computation.
//!
//! Everything here is a pure function of its inputs. In particular status and
//! the aggregate figures take an explicit reference date; nothing captures
//! "now" at load time, because the client re-runs the same computations for
//! every position of the date slider.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::logs::{log_info, log_warning};
use crate::models::{columns, AwardRecord, AwardStatus, TimelineRecord, TimelineSummary};
use crate::normalize::{parse_currency_checked, parse_date};

// =============================================================================
// Quality Report
// =============================================================================

/// Accounting of rows the pipelines dropped or defaulted.
///
/// Row-level problems never raise; this report surfaces them so data
/// completeness issues are visible without changing the output shape.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct QualityReport {
    /// Rows seen in the source.
    pub rows_total: usize,
    /// Rows that made it into the output.
    pub rows_kept: usize,
    /// Rows dropped for a missing or unparseable date.
    pub dropped_missing_date: usize,
    /// Rows dropped for a blank identifier.
    pub dropped_missing_identifier: usize,
    /// Rows whose amount was non-numeric and defaulted to 0.
    pub defaulted_amounts: usize,
}

impl QualityReport {
    /// Narrate the report on stdout.
    pub fn log(&self) {
        log_info(format!("Rows kept: {}/{}", self.rows_kept, self.rows_total));
        if self.dropped_missing_date > 0 {
            log_warning(format!(
                "{} row(s) dropped: missing or unparseable date",
                self.dropped_missing_date
            ));
        }
        if self.dropped_missing_identifier > 0 {
            log_warning(format!(
                "{} row(s) dropped: blank identifier",
                self.dropped_missing_identifier
            ));
        }
        if self.defaulted_amounts > 0 {
            log_warning(format!(
                "{} row(s) with non-numeric amount defaulted to 0",
                self.defaulted_amounts
            ));
        }
    }
}

// =============================================================================
// Award set construction
// =============================================================================

/// Build the award set from parsed tracker rows.
///
/// Rows missing a parseable start or end date are excluded entirely. The
/// result is sorted ascending by end date.
pub fn build_records(rows: &[Value]) -> (Vec<AwardRecord>, QualityReport) {
    let mut quality = QualityReport {
        rows_total: rows.len(),
        ..Default::default()
    };

    let mut records = Vec::new();

    for row in rows {
        match AwardRecord::from_row(row) {
            Some(award) => {
                let raw_amount = row
                    .get(columns::AWARD_AMOUNT)
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                if !raw_amount.trim().is_empty() && parse_currency_checked(raw_amount).is_none() {
                    quality.defaulted_amounts += 1;
                }
                records.push(award);
            }
            None => quality.dropped_missing_date += 1,
        }
    }

    records.sort_by_key(|a| a.end_date);
    quality.rows_kept = records.len();

    (records, quality)
}

/// Enrich awards into timeline records as of `reference`.
pub fn enrich(records: &[AwardRecord], reference: NaiveDate) -> Vec<TimelineRecord> {
    records
        .iter()
        .map(|a| a.to_timeline_record(reference))
        .collect()
}

// =============================================================================
// Aggregates
// =============================================================================

/// Compute the aggregate figures for `reference`.
///
/// Closed/Active totals follow the status function; the grand total covers
/// awards whose start date is on or before the reference date; the amendment
/// count covers amendment entries dated on or before the reference date,
/// across all identifiers in the mapping.
pub fn summarize(
    records: &[AwardRecord],
    amendments: &Map<String, Value>,
    reference: NaiveDate,
) -> TimelineSummary {
    let mut closed_total = 0.0;
    let mut active_total = 0.0;
    let mut grand_total = 0.0;

    for award in records {
        match award.status_on(reference) {
            AwardStatus::Closed => closed_total += award.amount,
            AwardStatus::Active => active_total += award.amount,
        }
        if award.start_date <= reference {
            grand_total += award.amount;
        }
    }

    let amendment_count = amendments
        .values()
        .filter_map(|v| v.as_array())
        .flatten()
        .filter(|entry| {
            entry
                .get("date")
                .and_then(|d| d.as_str())
                .and_then(parse_date)
                .is_some_and(|d| d <= reference)
        })
        .count();

    TimelineSummary {
        closed_total,
        active_total,
        grand_total,
        amendment_count,
    }
}

/// Whether an amendment is drawn on an award's bar.
///
/// Shown only when the amendment date lies within the award's own span,
/// inclusive on both ends, and does not exceed the reference date. Amendments
/// outside the span stay in the embedded JSON but are not rendered.
pub fn amendment_visible(date: NaiveDate, award: &AwardRecord, reference: NaiveDate) -> bool {
    date >= award.start_date && date <= award.end_date && date <= reference
}
