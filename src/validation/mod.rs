//! JSON Schema validation for pipeline outputs.
//!
//! The output documents are consumed elsewhere (the amendment JSON by other
//! tooling, the embedded award dataset by the chart), so both are checked
//! against Draft-7 schemas before writing.
//!
//! # Embedded Schemas
//!
//! Schemas are embedded at compile time from the `schemas/` directory:
//! - `amendment-map.json` — identifier → ordered list of `{date, type}`
//! - `timeline-record.json` — enriched award record shape
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use grantline::validation::is_valid_amendment_map;
//!
//! let map = json!({
//!     "GNEMC21GG0001": [ { "date": "2021-03-01", "type": "Extension" } ]
//! });
//! assert!(is_valid_amendment_map(&map));
//! ```

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::error::{ValidationError, ValidationResult};

static AMENDMENT_MAP_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(include_str!("../../schemas/amendment-map.json"))
        .expect("Invalid embedded schema");
    jsonschema::draft7::new(&schema).expect("Invalid embedded schema")
});

static TIMELINE_RECORD_SCHEMA: Lazy<Validator> = Lazy::new(|| {
    let schema: Value = serde_json::from_str(include_str!("../../schemas/timeline-record.json"))
        .expect("Invalid embedded schema");
    jsonschema::draft7::new(&schema).expect("Invalid embedded schema")
});

/// Validate a document against a compiled schema.
fn validate_with(validator: &Validator, data: &Value) -> ValidationResult<()> {
    let errors: Vec<String> = validator.iter_errors(data).map(|e| e.to_string()).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::SchemaError { errors })
    }
}

/// Validate an amendment mapping document.
pub fn validate_amendment_map(data: &Value) -> ValidationResult<()> {
    validate_with(&AMENDMENT_MAP_SCHEMA, data)
}

/// Quick check of an amendment mapping document.
pub fn is_valid_amendment_map(data: &Value) -> bool {
    AMENDMENT_MAP_SCHEMA.is_valid(data)
}

/// Validate a single enriched timeline record.
pub fn validate_timeline_record(data: &Value) -> ValidationResult<()> {
    validate_with(&TIMELINE_RECORD_SCHEMA, data)
}

/// Validate every record in a timeline dataset, reporting the index of each
/// failure.
pub fn validate_timeline_records(records: &[Value]) -> ValidationResult<()> {
    let mut errors = Vec::new();

    for (i, record) in records.iter().enumerate() {
        for err in TIMELINE_RECORD_SCHEMA.iter_errors(record) {
            errors.push(format!("record {}: {}", i, err));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::SchemaError { errors })
    }
}
