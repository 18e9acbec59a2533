//! Group flat rows by an identifier column.
//!
//! Both pipelines need the same operation: walk source rows, pull a key and
//! an entry out of each, and collect entries into per-key lists.
//!
//! ```text
//! Flat rows                        →  Grouped output
//! ┌──────────────────────────┐       ┌──────────────────────────┐
//! │ FAIN: A1, date: 2021-03  │       │ A1: [2021-03, 2022-07]   │
//! │ FAIN: A1, date: 2022-07  │  →    ├──────────────────────────┤
//! │ FAIN: B2, date: 2021-09  │       │ B2: [2021-09]            │
//! └──────────────────────────┘       └──────────────────────────┘
//! ```
//!
//! Ordering is part of the contract: keys appear in first-appearance order,
//! entries within a key in source row order. Rows with a blank key, or for
//! which the extractor returns `None`, are dropped; the caller accounts for
//! drops separately.

use serde_json::{json, Map, Value};

use crate::models::{columns, UNKNOWN_AMENDMENT_TYPE};
use crate::normalize::{non_blank, parse_date};

/// Group rows by the value of `key_column`, extracting one entry per row.
///
/// `extract` returns the entry to file under the row's key, or `None` to
/// drop the row.
pub fn group_rows<F>(rows: &[Value], key_column: &str, mut extract: F) -> Map<String, Value>
where
    F: FnMut(&Value) -> Option<Value>,
{
    let mut groups = Map::new();

    for row in rows {
        let key = row
            .get(key_column)
            .and_then(|v| v.as_str())
            .map(str::trim)
            .unwrap_or("");
        if key.is_empty() {
            continue;
        }

        let Some(entry) = extract(row) else {
            continue;
        };

        if let Value::Array(entries) = groups
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()))
        {
            entries.push(entry);
        }
    }

    groups
}

/// Group amendment rows by FAIN.
///
/// Each entry is `{"date": "YYYY-MM-DD", "type": <label>}` with the type
/// defaulting to `"Unknown"` when the source cell is blank. Rows missing a
/// FAIN or a parseable issue date produce no entry.
pub fn group_amendments(rows: &[Value]) -> Map<String, Value> {
    group_rows(rows, columns::FAIN, |row| {
        let raw_date = row
            .get(columns::ISSUE_DATE)
            .and_then(|v| v.as_str())
            .unwrap_or("");
        let date = parse_date(raw_date)?;

        let kind = row
            .get(columns::AMENDMENT_TYPE)
            .and_then(|v| v.as_str())
            .and_then(non_blank)
            .unwrap_or_else(|| UNKNOWN_AMENDMENT_TYPE.to_string());

        Some(json!({
            "date": date.format("%Y-%m-%d").to_string(),
            "type": kind,
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_one_entry_per_valid_row_in_source_order() {
        let rows = vec![
            json!({
                "FAIN": "GNEMC21GG0001",
                "Day of Award Issue Date": "2021-03-01",
                "Amendment Type": "Cost Extension"
            }),
            json!({
                "FAIN": "GNEMC21GG0001",
                "Day of Award Issue Date": "2022-07-15",
                "Amendment Type": "No-Cost Extension"
            }),
            json!({
                "FAIN": "GNEMC21GG0002",
                "Day of Award Issue Date": "2021-09-30",
                "Amendment Type": ""
            }),
        ];

        let grouped = group_amendments(&rows);

        assert_eq!(grouped.len(), 2);
        let first = grouped["GNEMC21GG0001"].as_array().unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[0]["date"], "2021-03-01");
        assert_eq!(first[0]["type"], "Cost Extension");
        assert_eq!(first[1]["date"], "2022-07-15");
    }

    #[test]
    fn test_blank_type_defaults_to_unknown() {
        let rows = vec![json!({
            "FAIN": "GNEMC21GG0002",
            "Day of Award Issue Date": "2021-09-30",
            "Amendment Type": "  "
        })];

        let grouped = group_amendments(&rows);
        assert_eq!(grouped["GNEMC21GG0002"][0]["type"], "Unknown");
    }

    #[test]
    fn test_missing_identifier_or_date_drops_row() {
        let rows = vec![
            json!({
                "FAIN": "",
                "Day of Award Issue Date": "2021-03-01",
                "Amendment Type": "Extension"
            }),
            json!({
                "FAIN": "GNEMC21GG0001",
                "Day of Award Issue Date": "not a date",
                "Amendment Type": "Extension"
            }),
            json!({
                "FAIN": "GNEMC21GG0001",
                "Day of Award Issue Date": "",
                "Amendment Type": "Extension"
            }),
        ];

        let grouped = group_amendments(&rows);
        assert!(grouped.is_empty());
    }

    #[test]
    fn test_keys_keep_first_appearance_order() {
        let rows = vec![
            json!({ "FAIN": "ZZZ", "Day of Award Issue Date": "2021-01-01" }),
            json!({ "FAIN": "AAA", "Day of Award Issue Date": "2021-02-01" }),
            json!({ "FAIN": "ZZZ", "Day of Award Issue Date": "2021-03-01" }),
        ];

        let grouped = group_amendments(&rows);
        let keys: Vec<&String> = grouped.keys().collect();
        assert_eq!(keys, vec!["ZZZ", "AAA"]);
    }

    #[test]
    fn test_generic_grouper_with_custom_extractor() {
        let rows = vec![
            json!({ "id": "x", "v": "1" }),
            json!({ "id": "x", "v": "skip" }),
            json!({ "id": "y", "v": "2" }),
        ];

        let grouped = group_rows(&rows, "id", |row| {
            let v = row.get("v").and_then(|v| v.as_str())?;
            v.parse::<i64>().ok().map(|n| json!(n))
        });

        assert_eq!(grouped["x"].as_array().unwrap().len(), 1);
        assert_eq!(grouped["y"][0], 2);
    }
}
