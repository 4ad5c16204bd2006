use rusqlite::types::Value;
use thiserror::Error;

/// A single result record that cannot be used.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecordError {
    #[error("{field} is not a number: {raw:?}")]
    NotNumeric { field: &'static str, raw: String },

    #[error("{field} is missing")]
    Missing { field: &'static str },

    #[error("shooter name is blank")]
    BlankName,
}

/// Parses a results-sheet number such as `"512.40"`, `" 87.5 % "` or `"1,204.5"`.
pub fn parse_numeric(field: &'static str, raw: &str) -> Result<f64, RecordError> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(RecordError::Missing { field });
    }

    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| RecordError::NotNumeric {
            field,
            raw: raw.to_string(),
        })
}

/// Reads a stored numeric column that may hold text written by older tools.
/// `Ok(None)` is SQL NULL.
pub fn stored_numeric(field: &'static str, value: Value) -> Result<Option<f64>, RecordError> {
    match value {
        Value::Null => Ok(None),
        Value::Integer(i) => Ok(Some(i as f64)),
        Value::Real(r) if r.is_finite() => Ok(Some(r)),
        Value::Real(r) => Err(RecordError::NotNumeric {
            field,
            raw: r.to_string(),
        }),
        Value::Text(text) => parse_numeric(field, &text).map(Some),
        Value::Blob(_) => Err(RecordError::NotNumeric {
            field,
            raw: "<blob>".to_string(),
        }),
    }
}
