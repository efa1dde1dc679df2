use crate::{
    error::DataError,
    table::{Table, cell_text},
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes shaped [`Table`]s to `{output_dir}/{category}_{identifier}.csv`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvSink {
    output_dir: PathBuf,
}

impl CsvSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a table with this `category` and `identifier` is written to.
    pub fn path(&self, category: &str, identifier: &str) -> PathBuf {
        self.output_dir.join(format!("{category}_{identifier}.csv"))
    }

    /// Write `table`, overwriting any previous export with the same name.
    pub fn write(
        &self,
        table: &Table,
        category: &str,
        identifier: &str,
    ) -> Result<PathBuf, DataError> {
        ensure_dir(&self.output_dir)?;

        let path = self.path(category, identifier);
        write_table(table, &path)?;

        debug!(path = %path.display(), rows = table.len(), "wrote CSV export");
        Ok(path)
    }
}

/// Create `dir` if it does not exist yet.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), DataError> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        info!(dir = %dir.display(), "Created output directory");
    }
    Ok(())
}

/// Write `table` with a header line to `path`, truncating existing content.
pub fn write_table(table: &Table, path: &Path) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)?;

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|value| cell_text(value).into_owned()))?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn eod_table(rows: usize) -> Table {
        Table::new(
            vec!["date".to_string(), "close".to_string(), "note".to_string()],
            (0..rows)
                .map(|row| vec![json!(20240102 + row), json!("185.64"), json!(null)])
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_csv_sink_creates_missing_output_dir() {
        let root = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(root.path().join("nested").join("out"));

        let path = sink.write(&eod_table(1), "eod", "AAPL_20240101_20240131").unwrap();

        assert_eq!(
            path,
            root.path()
                .join("nested")
                .join("out")
                .join("eod_AAPL_20240101_20240131.csv")
        );
        assert!(path.exists());
    }

    #[test]
    fn test_csv_sink_writes_values_as_held() {
        let root = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(root.path());

        let path = sink.write(&eod_table(2), "eod", "AAPL").unwrap();
        let content = std::fs::read_to_string(path).unwrap();

        assert_eq!(
            content,
            "date,close,note\n20240102,185.64,\n20240103,185.64,\n"
        );
    }

    #[test]
    fn test_csv_sink_overwrites_previous_export() {
        let root = tempfile::tempdir().unwrap();
        let sink = CsvSink::new(root.path());

        sink.write(&eod_table(3), "eod", "AAPL").unwrap();
        let path = sink.write(&eod_table(1), "eod", "AAPL").unwrap();

        let lines = std::fs::read_to_string(path).unwrap().lines().count();
        assert_eq!(lines, 2);
    }
}
