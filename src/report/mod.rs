//! Timeline HTML report generation.
//!
//! The report is a single self-contained document: a static shell with the
//! award dataset and amendment mapping embedded as inline JSON, plus the D3
//! chart and control logic that recomputes status, colors and totals whenever
//! the date slider or a filter changes. Templates are embedded at compile
//! time and stitched together by placeholder substitution.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::ReportResult;
use crate::models::TimelineRecord;

const TEMPLATE: &str = include_str!("../../templates/timeline.html");
const CSS: &str = include_str!("../../templates/timeline.css");
const JS: &str = include_str!("../../templates/timeline.js");

/// Default output file name for the timeline document.
pub const DEFAULT_OUTPUT: &str = "award_timeline.html";

/// Render the timeline document.
///
/// `reference` seeds the slider position; the client recomputes everything
/// from it, so the document itself carries no baked-in "now".
pub fn render_timeline(
    records: &[TimelineRecord],
    amendments: &Map<String, Value>,
    reference: NaiveDate,
    source_label: &str,
) -> ReportResult<String> {
    let award_json = serde_json::to_string(records)?;
    let amendment_json = serde_json::to_string(amendments)?;

    let js = JS
        .replace("__AWARD_DATA__", &award_json)
        .replace("__AMENDMENT_DATA__", &amendment_json)
        .replace("__REFERENCE_DATE__", &reference.format("%Y-%m-%d").to_string())
        .replace("__SOURCE_LABEL__", &escape_js(source_label));

    Ok(TEMPLATE.replace("__CSS__", CSS).replace("__JS__", &js))
}

/// Escape a label for embedding inside a single-quoted JS string.
fn escape_js(label: &str) -> String {
    label
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AwardRecord;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_records(reference: NaiveDate) -> Vec<TimelineRecord> {
        let rows = vec![
            json!({
                "FAIN": "GNEMC21GG0001",
                "Title": "Coastal Restoration",
                "Project Start Date": "2021-01-15",
                "Project End Date": "2026-01-14",
                "Award Amount": "$1,500,000.00"
            }),
            json!({
                "FAIN": "GNEMC19GG0002",
                "Title": "Water Quality",
                "Project Start Date": "2019-06-01",
                "Project End Date": "2022-05-31",
                "Award Amount": "$250,000.00"
            }),
        ];
        rows.iter()
            .map(|r| AwardRecord::from_row(r).unwrap().to_timeline_record(reference))
            .collect()
    }

    #[test]
    fn test_render_embeds_both_payloads() {
        let reference = date(2025, 5, 1);
        let records = sample_records(reference);

        let mut amendments = Map::new();
        amendments.insert(
            "GNEMC21GG0001".to_string(),
            json!([{ "date": "2021-09-01", "type": "Extension" }]),
        );

        let html = render_timeline(&records, &amendments, reference, "April 19, 2025").unwrap();

        assert!(html.contains("GNEMC21GG0001"));
        assert!(html.contains("Coastal Restoration"));
        assert!(html.contains("\"date\":\"2021-09-01\""));
        assert!(html.contains("2025-05-01"));
        assert!(html.contains("April 19, 2025"));
        // All placeholders resolved.
        assert!(!html.contains("__CSS__"));
        assert!(!html.contains("__JS__"));
        assert!(!html.contains("__AWARD_DATA__"));
        assert!(!html.contains("__AMENDMENT_DATA__"));
        assert!(!html.contains("__REFERENCE_DATE__"));
        assert!(!html.contains("__SOURCE_LABEL__"));
    }

    #[test]
    fn test_render_marks_status_against_reference() {
        let reference = date(2025, 5, 1);
        let records = sample_records(reference);
        let html = render_timeline(&records, &Map::new(), reference, "").unwrap();

        // 2026 end date is still active, 2022 end date has closed.
        assert!(html.contains("\"status\":\"Active\""));
        assert!(html.contains("\"status\":\"Closed\""));
        assert!(html.contains("rgb(30, 144, 255)"));
        assert!(html.contains("\"color\":\"grey\""));
    }

    #[test]
    fn test_source_label_is_escaped() {
        let html = render_timeline(&[], &Map::new(), date(2025, 1, 1), "O'Brien's export").unwrap();
        assert!(html.contains("O\\'Brien\\'s export"));
    }

    #[test]
    fn test_document_is_self_contained() {
        let html = render_timeline(&[], &Map::new(), date(2025, 1, 1), "x").unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<style>"));
        assert!(html.contains("dateSlider"));
        assert!(html.contains("grantLeadFilter"));
    }
}
