//! Domain models for the grantline pipelines.
//!
//! This module contains the core data structures:
//!
//! - [`AwardRecord`] - A grant award from the master tracker
//! - [`AwardStatus`] - Active/Closed, derived against a reference date
//! - [`TimelineRecord`] - An enriched award as embedded in the HTML report
//! - [`TimelineSummary`] - Aggregate figures for a reference date

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::normalize::{non_blank, parse_currency, parse_date};

/// Source column names. These are part of the input contract: a row whose
/// cells do not appear under these exact headers silently fails to parse.
pub mod columns {
    /// Federal award identifier, the join key between trackers.
    pub const FAIN: &str = "FAIN";
    pub const TITLE: &str = "Title";
    pub const START_DATE: &str = "Project Start Date";
    pub const END_DATE: &str = "Project End Date";
    pub const AWARD_AMOUNT: &str = "Award Amount";
    pub const GRANT_LEAD: &str = "Grant Lead";
    pub const PROGRAMS_STAFF_LEAD: &str = "Programs Staff Lead";
    pub const ISSUE_DATE: &str = "Day of Award Issue Date";
    pub const AMENDMENT_TYPE: &str = "Amendment Type";
}

/// Amendment type label used when the source cell is blank.
pub const UNKNOWN_AMENDMENT_TYPE: &str = "Unknown";

// =============================================================================
// Award Status
// =============================================================================

/// Derived lifecycle status of an award.
///
/// Status is never stored: it is a pure function of the award's end date and
/// a caller-supplied reference date, and must be recomputable for any
/// reference date.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AwardStatus {
    Active,
    Closed,
}

impl AwardStatus {
    /// Compute status as of `reference`: `Closed` if the award ended strictly
    /// before the reference date, else `Active`.
    pub fn on(end_date: NaiveDate, reference: NaiveDate) -> Self {
        if end_date < reference {
            Self::Closed
        } else {
            Self::Active
        }
    }

    /// Display color used by the timeline chart.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Closed => "grey",
            Self::Active => "rgb(30, 144, 255)",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Closed => "Closed",
        }
    }
}

// =============================================================================
// Award Record
// =============================================================================

/// A grant award from the master tracker.
///
/// Constructed once per source row at load time and immutable thereafter.
/// Status and color are derived via [`AwardStatus`], never stored here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AwardRecord {
    /// Federal award identifier (FAIN).
    pub fain: String,
    /// Award title.
    pub title: String,
    /// Project start date.
    pub start_date: NaiveDate,
    /// Project end date.
    pub end_date: NaiveDate,
    /// Award amount in dollars; missing or unparseable amounts become 0.
    pub amount: f64,
    /// Grant lead, if assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_lead: Option<String>,
    /// Programs staff lead, if assigned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programs_staff_lead: Option<String>,
}

impl AwardRecord {
    /// Build an award from a parsed tracker row.
    ///
    /// Returns `None` when either project date is missing or unparseable;
    /// such rows are excluded from the award set entirely.
    pub fn from_row(row: &Value) -> Option<Self> {
        let start_date = parse_date(cell(row, columns::START_DATE))?;
        let end_date = parse_date(cell(row, columns::END_DATE))?;

        Some(Self {
            fain: cell(row, columns::FAIN).trim().to_string(),
            title: cell(row, columns::TITLE).trim().to_string(),
            start_date,
            end_date,
            amount: parse_currency(cell(row, columns::AWARD_AMOUNT)),
            grant_lead: non_blank(cell(row, columns::GRANT_LEAD)),
            programs_staff_lead: non_blank(cell(row, columns::PROGRAMS_STAFF_LEAD)),
        })
    }

    /// Status of this award as of `reference`.
    pub fn status_on(&self, reference: NaiveDate) -> AwardStatus {
        AwardStatus::on(self.end_date, reference)
    }

    /// Enrich into the shape embedded in the HTML report.
    pub fn to_timeline_record(&self, reference: NaiveDate) -> TimelineRecord {
        let status = self.status_on(reference);
        TimelineRecord {
            fain: self.fain.clone(),
            title: self.title.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            amount: self.amount,
            grant_lead: self.grant_lead.clone(),
            programs_staff_lead: self.programs_staff_lead.clone(),
            status: status.as_str().to_string(),
            color: status.color().to_string(),
        }
    }
}

/// Fetch a string cell from a row object, defaulting to "".
fn cell<'a>(row: &'a Value, column: &str) -> &'a str {
    row.get(column).and_then(|v| v.as_str()).unwrap_or("")
}

// =============================================================================
// Timeline Record (embedded in the report)
// =============================================================================

/// An enriched award record as embedded in the timeline HTML.
///
/// `status` and `color` reflect the reference date the document was built
/// with; the client recomputes both whenever the date slider moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRecord {
    pub fain: String,
    pub title: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_lead: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub programs_staff_lead: Option<String>,
    pub status: String,
    pub color: String,
}

// =============================================================================
// Timeline Summary
// =============================================================================

/// Aggregate figures for a reference date.
///
/// Recomputed from scratch on every reference-date change; see
/// [`crate::transform::summarize`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TimelineSummary {
    /// Sum of amounts for awards Closed as of the reference date.
    pub closed_total: f64,
    /// Sum of amounts for awards Active as of the reference date.
    pub active_total: f64,
    /// Sum of amounts for awards whose start date is on or before the
    /// reference date.
    pub grand_total: f64,
    /// Count of amendments dated on or before the reference date.
    pub amendment_count: usize,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_status_pure_in_reference_date() {
        let end = date(2025, 6, 30);

        assert_eq!(AwardStatus::on(end, date(2025, 7, 1)), AwardStatus::Closed);
        assert_eq!(AwardStatus::on(end, date(2025, 6, 30)), AwardStatus::Active);
        assert_eq!(AwardStatus::on(end, date(2024, 1, 1)), AwardStatus::Active);
        // No memory of prior evaluations: same inputs, same answer.
        assert_eq!(AwardStatus::on(end, date(2025, 7, 1)), AwardStatus::Closed);
    }

    #[test]
    fn test_status_colors() {
        assert_eq!(AwardStatus::Closed.color(), "grey");
        assert_eq!(AwardStatus::Active.color(), "rgb(30, 144, 255)");
    }

    #[test]
    fn test_award_from_row() {
        let row = json!({
            "FAIN": " GNEMC21GG0001 ",
            "Title": "Coastal Restoration",
            "Project Start Date": "1/15/2021",
            "Project End Date": "2026-01-14",
            "Award Amount": "$1,500,000.00",
            "Grant Lead": "Smith",
            "Programs Staff Lead": ""
        });

        let award = AwardRecord::from_row(&row).unwrap();
        assert_eq!(award.fain, "GNEMC21GG0001");
        assert_eq!(award.start_date, date(2021, 1, 15));
        assert_eq!(award.end_date, date(2026, 1, 14));
        assert_eq!(award.amount, 1_500_000.0);
        assert_eq!(award.grant_lead.as_deref(), Some("Smith"));
        assert_eq!(award.programs_staff_lead, None);
    }

    #[test]
    fn test_award_from_row_missing_dates_dropped() {
        let no_end = json!({
            "FAIN": "GNEMC21GG0002",
            "Title": "Test",
            "Project Start Date": "1/15/2021",
            "Project End Date": "",
            "Award Amount": "$10"
        });
        assert!(AwardRecord::from_row(&no_end).is_none());

        let bad_start = json!({
            "FAIN": "GNEMC21GG0003",
            "Title": "Test",
            "Project Start Date": "TBD",
            "Project End Date": "2026-01-14",
            "Award Amount": "$10"
        });
        assert!(AwardRecord::from_row(&bad_start).is_none());
    }

    #[test]
    fn test_award_from_row_bad_amount_is_zero() {
        let row = json!({
            "FAIN": "GNEMC21GG0004",
            "Title": "Test",
            "Project Start Date": "2021-01-01",
            "Project End Date": "2022-01-01",
            "Award Amount": "pending"
        });
        assert_eq!(AwardRecord::from_row(&row).unwrap().amount, 0.0);
    }

    #[test]
    fn test_timeline_record_serialization() {
        let row = json!({
            "FAIN": "GNEMC21GG0001",
            "Title": "Coastal Restoration",
            "Project Start Date": "2021-01-15",
            "Project End Date": "2026-01-14",
            "Award Amount": "$100.00"
        });
        let award = AwardRecord::from_row(&row).unwrap();
        let record = award.to_timeline_record(date(2025, 5, 1));

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["fain"], "GNEMC21GG0001");
        assert_eq!(json["startDate"], "2021-01-15");
        assert_eq!(json["status"], "Active");
        assert_eq!(json["color"], "rgb(30, 144, 255)");
        // Unassigned leads are omitted, not null.
        assert!(json.get("grantLead").is_none());
    }
}
