//! Delimited-table parsing with encoding and delimiter auto-detection.
//!
//! Tracker exports arrive in whatever encoding the reporting tool last used;
//! windows-1252 is the norm for the master tracker. Rows are parsed into JSON
//! objects keyed by the trimmed column headers, so downstream code addresses
//! cells by the source column names. Field splitting goes through the `csv`
//! crate so quoted currency values containing commas survive intact.

use serde_json::{json, Map, Value};
use std::path::Path;

use crate::error::{CsvError, CsvResult};

/// Result of parsing with metadata
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Parsed rows as JSON objects
    pub records: Vec<Value>,
    /// Detected or used encoding
    pub encoding: String,
    /// Detected or used delimiter
    pub delimiter: char,
    /// Column headers
    pub headers: Vec<String>,
}

/// Detect the encoding of raw bytes using chardet
pub fn detect_encoding(bytes: &[u8]) -> String {
    let result = chardet::detect(bytes);
    let charset = result.0;

    // Normalize charset names
    match charset.to_lowercase().as_str() {
        "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decode bytes to string using the specified encoding
pub fn decode_content(bytes: &[u8], encoding: &str) -> CsvResult<String> {
    match encoding.to_lowercase().as_str() {
        "utf-8" | "utf8" | "ascii" => Ok(String::from_utf8_lossy(bytes).to_string()),
        "iso-8859-1" | "latin-1" | "latin1" => {
            Ok(encoding_rs::ISO_8859_15.decode(bytes).0.to_string())
        }
        "windows-1252" | "cp1252" => Ok(encoding_rs::WINDOWS_1252.decode(bytes).0.to_string()),
        _ => {
            // Fallback: UTF-8 with lossy conversion
            Ok(String::from_utf8_lossy(bytes).to_string())
        }
    }
}

/// Detect the delimiter by counting occurrences in the first line
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [',', ';', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}

/// Parse table content with an explicit delimiter.
///
/// Each row becomes a JSON object where keys are column headers.
///
/// # Example
/// ```
/// use grantline::parser::parse_table;
///
/// let csv = "FAIN,Title\nABC123,Restoration";
/// let rows = parse_table(csv, ',').unwrap();
///
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0]["FAIN"], "ABC123");
/// ```
pub fn parse_table(content: &str, delimiter: char) -> CsvResult<Vec<Value>> {
    parse_with_metadata(content, delimiter, "utf-8".to_string()).map(|r| r.records)
}

/// Parse table content with an explicit delimiter and return metadata.
pub fn parse_with_metadata(
    content: &str,
    delimiter: char,
    encoding: String,
) -> CsvResult<ParseResult> {
    if content.trim().is_empty() {
        return Err(CsvError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter as u8)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| CsvError::ParseError(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(CsvError::NoHeaders);
    }

    let mut records = Vec::new();

    for row in reader.records() {
        let row = row.map_err(|e| CsvError::ParseError(e.to_string()))?;

        if row.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut obj = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let raw_value = row.get(i).map(|s| s.trim()).unwrap_or("");
            obj.insert(header.clone(), json!(raw_value));
        }
        records.push(Value::Object(obj));
    }

    Ok(ParseResult {
        records,
        encoding,
        delimiter,
        headers,
    })
}

/// Parse a table file with auto-detection of encoding and delimiter.
///
/// # Example
/// ```ignore
/// let result = parse_file_auto("/path/to/tracker.csv")?;
/// println!("Encoding: {}, Delimiter: '{}'", result.encoding, result.delimiter);
/// println!("Rows: {}", result.records.len());
/// ```
pub fn parse_file_auto<P: AsRef<Path>>(path: P) -> CsvResult<ParseResult> {
    let bytes = std::fs::read(path.as_ref())?;
    parse_bytes_auto(&bytes)
}

/// Parse table bytes with auto-detection of encoding and delimiter.
pub fn parse_bytes_auto(bytes: &[u8]) -> CsvResult<ParseResult> {
    let encoding = detect_encoding(bytes);
    let content = decode_content(bytes, &encoding)?;
    let delimiter = detect_delimiter(&content);
    parse_with_metadata(&content, delimiter, encoding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_table() {
        let csv = "FAIN,Title\nABC1,Alpha\nABC2,Beta";
        let rows = parse_table(csv, ',').unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["FAIN"], "ABC1");
        assert_eq!(rows[0]["Title"], "Alpha");
        assert_eq!(rows[1]["FAIN"], "ABC2");
    }

    #[test]
    fn test_quoted_currency_with_commas() {
        let csv = "FAIN,Award Amount\nABC1,\"$1,500,000.00\"";
        let rows = parse_table(csv, ',').unwrap();

        assert_eq!(rows[0]["Award Amount"], "$1,500,000.00");
    }

    #[test]
    fn test_semicolon_delimiter() {
        let csv = "a;b;c\n1;2;3";
        let rows = parse_table(csv, ';').unwrap();

        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["c"], "3");
    }

    #[test]
    fn test_empty_rows_skipped() {
        let csv = "a,b\n1,2\n,\n3,4\n";
        let rows = parse_table(csv, ',').unwrap();

        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_missing_values() {
        let csv = "a,b,c\n1,,3";
        let rows = parse_table(csv, ',').unwrap();

        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["b"], "");
        assert_eq!(rows[0]["c"], "3");
    }

    #[test]
    fn test_short_rows_padded() {
        let csv = "a,b,c\n1,2";
        let rows = parse_table(csv, ',').unwrap();

        assert_eq!(rows[0]["c"], "");
    }

    #[test]
    fn test_empty_table_error() {
        let result = parse_table("", ',');
        assert!(matches!(result, Err(CsvError::EmptyFile)));
    }

    #[test]
    fn test_detect_delimiter_comma() {
        assert_eq!(detect_delimiter("a,b,c\n1,2,3"), ',');
    }

    #[test]
    fn test_detect_delimiter_semicolon() {
        assert_eq!(detect_delimiter("a;b;c\n1;2;3"), ';');
    }

    #[test]
    fn test_detect_delimiter_tab() {
        assert_eq!(detect_delimiter("a\tb\tc\n1\t2\t3"), '\t');
    }

    #[test]
    fn test_auto_parse() {
        let csv = "FAIN,Title\nABC1,Alpha\nABC2,Beta";
        let result = parse_bytes_auto(csv.as_bytes()).unwrap();

        assert_eq!(result.delimiter, ',');
        assert_eq!(result.records.len(), 2);
        assert_eq!(result.headers, vec!["FAIN", "Title"]);
    }

    #[test]
    fn test_windows_1252_decoding() {
        // "Señor" with 0xF1 for ñ, as windows-1252 encodes it
        let bytes: &[u8] = &[0x53, 0x65, 0xF1, 0x6F, 0x72];
        let decoded = decode_content(bytes, "windows-1252").unwrap();
        assert_eq!(decoded, "Señor");
    }
}
