mod headers;

pub use headers::normalize_headers;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

/// One parsed CSV row: normalized header name → raw cell value.
///
/// Key order follows the header line (`serde_json` is compiled with
/// `preserve_order`), and every present value is a `Value::String`;
/// no numeric or boolean coercion ever happens here.
pub type Record = Map<String, Value>;

/// The only structural error the converter raises: the input needs at
/// least a header line and one data row. Everything else (ragged rows,
/// duplicate headers, blank interior lines) degrades best-effort.
#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "invalid input CSV: expected at least one header line and one data row, e.g.\n\
     \n\
     date,product,quantity,revenue\n\
     2022-01-01,Widget A,10,100.00\n\
     2022-01-02,Widget B,5,75.00\n\
     2022-01-03,Widget A,8,80.00\n\
     2022-01-04,Widget C,3,45.00"
)]
pub struct InvalidInputError;

/// Convert raw CSV text into an ordered sequence of [`Record`]s.
///
/// The first raw line is the header row; each subsequent row is zipped
/// against the headers positionally. A row with fewer cells than headers
/// leaves the missing trailing keys absent; extra cells are dropped.
/// Duplicate header names overwrite earlier keys within each record.
///
/// Data rows are read from the *unfiltered* line array by absolute index,
/// while the loop bound is the count of non-empty lines. Blank lines
/// before the end therefore shift which rows are read; each such row is
/// logged as a warning.
pub fn convert(raw: &str) -> Result<Vec<Record>, InvalidInputError> {
    let lines: Vec<&str> = raw.split('\n').collect();
    let non_empty = lines.iter().filter(|l| !l.trim().is_empty()).count();

    // The second clause can never fire: splitting any string on a
    // delimiter yields at least one token.
    if non_empty < 2 || lines[0].split(',').count() < 1 {
        return Err(InvalidInputError);
    }

    let headers = normalize_headers(lines[0]);

    let mut records = Vec::with_capacity(non_empty - 1);
    for i in 1..non_empty {
        let line = lines[i];
        if line.trim().is_empty() {
            warn!(row = i, "blank line read as a data row (absolute indexing)");
        }
        let values: Vec<&str> = line.split(',').collect();
        if values.len() < headers.len() {
            warn!(
                row = i,
                expected = headers.len(),
                got = values.len(),
                "row has fewer cells than headers; trailing keys left absent"
            );
        } else if values.len() > headers.len() {
            warn!(
                row = i,
                expected = headers.len(),
                got = values.len(),
                "row has more cells than headers; extras dropped"
            );
        }

        let mut record = Record::new();
        for (j, header) in headers.iter().enumerate() {
            match values.get(j) {
                Some(v) => {
                    record.insert(header.clone(), Value::String((*v).to_string()));
                }
                // A duplicate header whose second occurrence has no cell
                // knocks out the earlier value, like an undefined assignment.
                None => {
                    record.remove(header);
                }
            }
        }
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    fn keys(record: &Record) -> Vec<&str> {
        record.keys().map(|k| k.as_str()).collect()
    }

    #[test]
    fn converts_two_rows() -> Result<()> {
        let records = convert("h1,h2\na,b\nc,d")?;
        assert_eq!(records.len(), 2);
        assert_eq!(serde_json::to_value(&records[0])?, json!({"h1": "a", "h2": "b"}));
        assert_eq!(serde_json::to_value(&records[1])?, json!({"h1": "c", "h2": "d"}));
        Ok(())
    }

    #[test]
    fn normalizes_headers() -> Result<()> {
        let records = convert("Full Name,Age\nJohn,30")?;
        assert_eq!(keys(&records[0]), vec!["full_name", "age"]);
        assert_eq!(records[0]["full_name"], json!("John"));
        assert_eq!(records[0]["age"], json!("30"));
        Ok(())
    }

    #[test]
    fn empty_input_is_invalid() {
        assert_eq!(convert(""), Err(InvalidInputError));
    }

    #[test]
    fn single_line_is_invalid() {
        assert_eq!(convert("h1,h2"), Err(InvalidInputError));
        assert_eq!(convert("h1,h2\n\n  \n"), Err(InvalidInputError));
    }

    #[test]
    fn ragged_row_leaves_trailing_keys_absent() -> Result<()> {
        let records = convert("a,b,c\n1,2")?;
        assert_eq!(serde_json::to_value(&records[0])?, json!({"a": "1", "b": "2"}));
        assert!(!records[0].contains_key("c"));
        Ok(())
    }

    #[test]
    fn extra_values_are_dropped() -> Result<()> {
        let records = convert("a\n1,2,3")?;
        assert_eq!(serde_json::to_value(&records[0])?, json!({"a": "1"}));
        Ok(())
    }

    #[test]
    fn key_order_follows_header_line() -> Result<()> {
        let records = convert("Zulu,alpha,Mike\n1,2,3")?;
        assert_eq!(keys(&records[0]), vec!["zulu", "alpha", "mike"]);
        assert_eq!(
            serde_json::to_string(&records[0])?,
            r#"{"zulu":"1","alpha":"2","mike":"3"}"#
        );
        Ok(())
    }

    #[test]
    fn duplicate_headers_overwrite_earlier_keys() -> Result<()> {
        let records = convert("a,a\n1,2")?;
        assert_eq!(serde_json::to_value(&records[0])?, json!({"a": "2"}));
        Ok(())
    }

    #[test]
    fn duplicate_header_with_missing_cell_removes_the_key() -> Result<()> {
        // Second `a` has no cell, so it knocks out the first value.
        let records = convert("a,b,a\n1,2")?;
        assert_eq!(serde_json::to_value(&records[0])?, json!({"b": "2"}));
        Ok(())
    }

    #[test]
    fn values_stay_raw_strings() -> Result<()> {
        let records = convert("n,flag\n30,true")?;
        assert_eq!(records[0]["n"], json!("30"));
        assert_eq!(records[0]["flag"], json!("true"));
        Ok(())
    }

    #[test]
    fn json_round_trip_is_exact() -> Result<()> {
        let records = convert("h1,h2\na,b\nc,d")?;
        let text = serde_json::to_string(&records)?;
        let reparsed: Vec<Record> = serde_json::from_str(&text)?;
        assert_eq!(records, reparsed);
        assert_eq!(text, serde_json::to_string(&reparsed)?);
        Ok(())
    }

    #[test]
    fn interior_blank_line_shifts_rows() -> Result<()> {
        // Three non-empty lines bound the loop at rows 1..3, but row 1 of
        // the raw array is the blank line: it becomes a record with a
        // single empty cell, and the last data row is never read.
        let records = convert("a,b\n\n1,2\n3,4")?;
        assert_eq!(records.len(), 2);
        assert_eq!(serde_json::to_value(&records[0])?, json!({"a": ""}));
        assert_eq!(serde_json::to_value(&records[1])?, json!({"a": "1", "b": "2"}));
        Ok(())
    }

    #[test]
    fn trailing_blank_lines_are_harmless() -> Result<()> {
        let records = convert("a,b\n1,2\n\n\n")?;
        assert_eq!(records.len(), 1);
        assert_eq!(serde_json::to_value(&records[0])?, json!({"a": "1", "b": "2"}));
        Ok(())
    }

    #[test]
    fn pretty_output_uses_two_space_indent() -> Result<()> {
        let records = convert("h1\na")?;
        assert_eq!(
            serde_json::to_string_pretty(&records)?,
            "[\n  {\n    \"h1\": \"a\"\n  }\n]"
        );
        Ok(())
    }
}
