//! Comma-delimited text parsing.
//!
//! The first non-blank line holds the headers; every following non-blank
//! line is one row. Double quotes wrap fields that contain commas. Escaped
//! quotes inside a quoted field are not supported.

use crate::models::RawRow;

/// Parse delimited text into rows keyed by header.
///
/// Returns an empty vector when the text has fewer than two non-blank
/// lines. Short rows are padded with empty strings; values beyond the
/// last header are dropped.
pub fn parse_delimited(text: &str) -> Vec<RawRow> {
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect();

    if lines.len() < 2 {
        return Vec::new();
    }

    let headers = split_line(lines[0]);

    lines[1..]
        .iter()
        .map(|line| {
            let mut values = split_line(line).into_iter();
            headers
                .iter()
                .map(|header| (header.clone(), values.next().unwrap_or_default()))
                .collect()
        })
        .collect()
}

/// Split one line on commas outside double quotes.
fn split_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_comma_is_not_a_delimiter() {
        let rows = parse_delimited("name,note\n\"Doe, John\",\"ok\"");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("name").map(String::as_str), Some("Doe, John"));
        assert_eq!(rows[0].get("note").map(String::as_str), Some("ok"));
    }

    #[test]
    fn test_quote_mid_field_toggles_quoting() {
        let rows = parse_delimited("a,b\nx\"y,z\"w,tail");

        assert_eq!(rows[0]["a"], "xy,zw");
        assert_eq!(rows[0]["b"], "tail");
    }

    #[test]
    fn test_header_only_and_empty_yield_no_rows() {
        assert!(parse_delimited("").is_empty());
        assert!(parse_delimited("\n\n  \n").is_empty());
        assert!(parse_delimited("a,b,c\n").is_empty());
        assert!(parse_delimited("\n  a,b,c  \n\n").is_empty());
    }

    #[test]
    fn test_missing_trailing_values_are_padded() {
        let rows = parse_delimited("a,b,c\n1");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["a"], "1");
        assert_eq!(rows[0]["b"], "");
        assert_eq!(rows[0]["c"], "");
    }

    #[test]
    fn test_extra_values_are_dropped() {
        let rows = parse_delimited("a,b\n1,2,3");

        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[0]["b"], "2");
    }

    #[test]
    fn test_blank_lines_and_crlf() {
        let rows = parse_delimited("doc_type,score\r\n\r\nCheck,0.8\r\n\nPaystub,0.2\r\n");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["score"], "0.8");
        assert_eq!(rows[1]["doc_type"], "Paystub");
    }
}
