//! Header canonicalization.
//!
//! Spreadsheet exports often carry doubled spaces, tabs or trailing blanks
//! in their headers. Lookups downstream are exact and case-sensitive, so
//! every header is collapsed to single spaces and trimmed first.

use crate::error::SchemaError;
use csv::StringRecord;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// Collapse runs of whitespace to one space and trim. Idempotent.
pub fn normalize_header(header: &str) -> String {
    WHITESPACE.replace_all(header, " ").trim().to_string()
}

pub fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers.iter().map(normalize_header).collect()
}

/// Accepted spellings and the header each one stands for.
pub const HEADER_ALIASES: &[(&str, &str)] = &[
    ("contract type", "Contract type"),
    ("total salary", "total slary"),
    ("net income", "Net"),
];

/// Normalized headers after alias resolution and de-duplication.
#[derive(Debug, Clone)]
pub struct CanonicalHeaders {
    pub record: StringRecord,
    /// Original spellings of later columns that repeated an earlier one.
    pub dropped: Vec<String>,
}

/// Map aliases to their canonical header and blank out every column whose
/// canonical header already appeared further left. The first occurrence
/// wins; blanked columns are read as unknown and ignored.
pub fn canonical_headers(headers: &StringRecord) -> CanonicalHeaders {
    let mut seen: Vec<&str> = Vec::new();
    let mut dropped = Vec::new();
    let mut record = StringRecord::new();
    for header in headers.iter() {
        let canonical = HEADER_ALIASES
            .iter()
            .find(|(alias, _)| *alias == header)
            .map_or(header, |&(_, canonical)| canonical);
        if !canonical.is_empty() && seen.contains(&canonical) {
            dropped.push(header.to_string());
            record.push_field("");
        } else {
            seen.push(canonical);
            record.push_field(canonical);
        }
    }
    CanonicalHeaders { record, dropped }
}

/// Check that `column` exists among already-normalized headers.
pub fn require_column(headers: &StringRecord, column: &str) -> Result<(), SchemaError> {
    if headers.iter().any(|h| h == column) {
        Ok(())
    } else {
        Err(SchemaError {
            column: column.to_string(),
            found: headers.iter().map(str::to_string).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapses_inner_whitespace_and_trims() {
        assert_eq!(normalize_header("  total   hours "), "total hours");
        assert_eq!(normalize_header("Operation\ttotal\n number"), "Operation total number");
        assert_eq!(normalize_header("department"), "department");
    }

    #[test]
    fn test_normalize_headers_keeps_order() {
        let raw = StringRecord::from(vec![" department", "staff  name", "x"]);
        let normalized = normalize_headers(&raw);
        assert_eq!(
            normalized.iter().collect::<Vec<_>>(),
            vec!["department", "staff name", "x"]
        );
    }

    #[test]
    fn test_require_column_is_case_sensitive() {
        let headers = StringRecord::from(vec!["Department", "staff name"]);
        let err = require_column(&headers, "department").unwrap_err();
        assert_eq!(err.column, "department");
        assert_eq!(err.found, vec!["Department", "staff name"]);

        let headers = StringRecord::from(vec!["department"]);
        assert!(require_column(&headers, "department").is_ok());
    }

    #[test]
    fn test_aliases_map_to_canonical_headers() {
        let raw = StringRecord::from(vec!["department", "net income", "total salary", "x"]);
        let headers = canonical_headers(&raw);
        assert_eq!(
            headers.record.iter().collect::<Vec<_>>(),
            vec!["department", "Net", "total slary", "x"]
        );
        assert!(headers.dropped.is_empty());
    }

    #[test]
    fn test_later_duplicates_are_blanked() {
        let raw = StringRecord::from(vec![
            "department",
            "Net",
            "net income",
            "Contract type",
            "contract type",
            "total hours",
            "total hours",
        ]);
        let headers = canonical_headers(&raw);
        assert_eq!(
            headers.record.iter().collect::<Vec<_>>(),
            vec!["department", "Net", "", "Contract type", "", "total hours", ""]
        );
        assert_eq!(headers.dropped, vec!["net income", "contract type", "total hours"]);
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(h in "[ \\t\\na-zA-Z_]{0,24}") {
            let once = normalize_header(&h);
            prop_assert_eq!(normalize_header(&once), once.clone());
            prop_assert!(!once.contains("  "));
            prop_assert_eq!(once.trim(), once.as_str());
        }
    }
}
