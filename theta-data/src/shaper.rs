use crate::{
    error::DataError,
    sink::CsvSink,
    table::{Envelope, Table},
};
use serde_json::Value;
use tracing::error;

/// Turns raw terminal responses into [`Table`]s, optionally exporting them via a [`CsvSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseShaper {
    sink: CsvSink,
}

impl ResponseShaper {
    pub fn new(sink: CsvSink) -> Self {
        Self { sink }
    }

    pub fn sink(&self) -> &CsvSink {
        &self.sink
    }

    /// Shape a transport result.
    ///
    /// An absent response stays absent without side effects. A body that is not a
    /// `{header.format, response}` envelope is logged and treated as absent. A row whose width
    /// differs from the header is a [`DataError::RowWidth`].
    pub fn shape(
        &self,
        response: Option<Value>,
        write_csv: bool,
        category: &str,
        identifier: &str,
    ) -> Result<Option<Table>, DataError> {
        let Some(response) = response else {
            return Ok(None);
        };

        let envelope = match serde_json::from_value::<Envelope>(response) {
            Ok(envelope) => envelope,
            Err(error) => {
                error!(category, identifier, %error, "malformed terminal response envelope");
                return Ok(None);
            }
        };

        let table = Table::from_envelope(envelope)?;

        if write_csv {
            self.sink.write(&table, category, identifier)?;
        }

        Ok(Some(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn shaper(dir: &std::path::Path) -> ResponseShaper {
        ResponseShaper::new(CsvSink::new(dir))
    }

    #[test]
    fn test_shape() {
        struct TestCase {
            input: Option<Value>,
            expected: Result<Option<usize>, DataError>,
        }

        let tests = vec![
            TestCase {
                // TC0: absent stays absent
                input: None,
                expected: Ok(None),
            },
            TestCase {
                // TC1: two row envelope
                input: Some(json!({
                    "header": {"format": ["date", "open"]},
                    "response": [["20240101", "100.0"], ["20240102", "101.5"]]
                })),
                expected: Ok(Some(2)),
            },
            TestCase {
                // TC2: empty result set is a zero row table
                input: Some(json!({"header": {"format": ["date"]}, "response": []})),
                expected: Ok(Some(0)),
            },
            TestCase {
                // TC3: missing response key is treated as absent
                input: Some(json!({"header": {"format": ["date"]}})),
                expected: Ok(None),
            },
            TestCase {
                // TC4: missing header key is treated as absent
                input: Some(json!({"response": [["20240101"]]})),
                expected: Ok(None),
            },
            TestCase {
                // TC5: ragged row is a data-integrity error
                input: Some(json!({
                    "header": {"format": ["date", "open"]},
                    "response": [["20240101"]]
                })),
                expected: Err(DataError::RowWidth {
                    row: 0,
                    expected: 2,
                    actual: 1,
                }),
            },
        ];

        let dir = tempfile::tempdir().unwrap();
        let shaper = shaper(dir.path());

        for (index, test) in tests.into_iter().enumerate() {
            let actual = shaper
                .shape(test.input, false, "eod", "AAPL")
                .map(|table| table.map(|table| table.len()));
            assert_eq!(actual, test.expected, "TC{} failed", index);
        }
    }

    #[test]
    fn test_shape_writes_csv_only_when_requested() {
        let dir = tempfile::tempdir().unwrap();
        let shaper = shaper(dir.path());
        let response = json!({"header": {"format": ["date"]}, "response": [["20240101"]]});

        shaper
            .shape(Some(response.clone()), false, "eod", "AAPL")
            .unwrap();
        assert!(!shaper.sink().path("eod", "AAPL").exists());

        shaper.shape(Some(response), true, "eod", "AAPL").unwrap();
        assert!(shaper.sink().path("eod", "AAPL").exists());
    }

    #[test]
    fn test_shape_absent_never_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let shaper = shaper(dir.path());

        assert_eq!(shaper.shape(None, true, "eod", "AAPL"), Ok(None));
        assert!(!shaper.sink().path("eod", "AAPL").exists());
    }
}
