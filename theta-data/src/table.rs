use crate::error::DataError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{borrow::Cow, fmt};

/// Uniform JSON envelope returned by every terminal REST endpoint.
///
/// ### Raw Payload Examples
/// ```json
/// {
///     "header": { "latency_ms": 3, "format": ["date", "open"] },
///     "response": [["20240101", "100.0"]]
/// }
/// ```
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct Envelope {
    pub header: EnvelopeHeader,
    pub response: Vec<Vec<Value>>,
}

#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
pub struct EnvelopeHeader {
    /// Column names, positionally aligned with every response row.
    pub format: Vec<String>,
}

/// Shaped response: ordered columns and ordered rows of raw values.
///
/// Values are kept exactly as delivered. A string `"100.0"` stays a string.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Construct a [`Table`], rejecting any row whose width differs from the column count.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, DataError> {
        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(DataError::RowWidth {
                row,
                expected: columns.len(),
                actual: values.len(),
            });
        }

        Ok(Self { columns, rows })
    }

    pub fn from_envelope(envelope: Envelope) -> Result<Self, DataError> {
        Self::new(envelope.header.format, envelope.response)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|name| name == column)
    }

    /// Value at `(row, column)`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    pub fn into_parts(self) -> (Vec<String>, Vec<Vec<Value>>) {
        (self.columns, self.rows)
    }
}

/// Text form of a raw cell: strings unquoted, `null` empty, everything else as JSON.
pub fn cell_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(text) => Cow::Borrowed(text),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self
            .rows
            .iter()
            .map(|row| row.iter().map(cell_text).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        let widths = self
            .columns
            .iter()
            .enumerate()
            .map(|(index, column)| {
                cells
                    .iter()
                    .map(|row| row[index].chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect::<Vec<_>>();

        let header = self
            .columns
            .iter()
            .zip(&widths)
            .map(|(column, &width)| format!("{column:>width$}"))
            .join("  ");
        write!(f, "{}", header.trim_end())?;

        for row in &cells {
            let line = row
                .iter()
                .zip(&widths)
                .map(|(cell, &width)| format!("{cell:>width$}"))
                .join("  ");
            write!(f, "\n{}", line.trim_end())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(value: Value) -> Envelope {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_table_from_envelope_preserves_string_values() {
        let table = Table::from_envelope(envelope(json!({
            "header": {"format": ["date", "open"]},
            "response": [["20240101", "100.0"]]
        })))
        .unwrap();

        assert_eq!(table.columns(), ["date", "open"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "open"), Some(&json!("100.0")));
    }

    #[test]
    fn test_table_from_envelope_with_zero_rows_is_empty_not_absent() {
        let table = Table::from_envelope(envelope(json!({
            "header": {"format": ["date", "open"]},
            "response": []
        })))
        .unwrap();

        assert!(table.is_empty());
        assert_eq!(table.columns().len(), 2);
    }

    #[test]
    fn test_table_new_rejects_ragged_rows() {
        let actual = Table::new(
            vec!["date".to_string(), "open".to_string()],
            vec![
                vec![json!(20240101), json!(100.0)],
                vec![json!(20240102)],
            ],
        );

        assert_eq!(
            actual,
            Err(DataError::RowWidth {
                row: 1,
                expected: 2,
                actual: 1
            })
        );
    }

    #[test]
    fn test_envelope_ignores_unknown_header_fields() {
        let actual = serde_json::from_value::<Envelope>(json!({
            "header": {"latency_ms": 4, "error_type": "null", "format": ["ms_of_day"]},
            "response": [[34200000]]
        }));
        assert!(actual.is_ok());
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&json!("C")), "C");
        assert_eq!(cell_text(&json!(null)), "");
        assert_eq!(cell_text(&json!(170000)), "170000");
        assert_eq!(cell_text(&json!(1.25)), "1.25");
        assert_eq!(cell_text(&json!(true)), "true");
    }

    #[test]
    fn test_table_display_aligns_columns() {
        let table = Table::new(
            vec!["date".to_string(), "close".to_string()],
            vec![
                vec![json!(20240102), json!("185.64")],
                vec![json!(20240103), json!("9.5")],
            ],
        )
        .unwrap();

        let expected = "    date   close\n20240102  185.64\n20240103     9.5";

        assert_eq!(table.to_string(), expected);
    }
}
