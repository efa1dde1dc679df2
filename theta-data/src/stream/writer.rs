use super::{
    event::{StreamRecord, header},
    subscription::ReqType,
};
use crate::error::DataError;
use std::{
    fs::OpenOptions,
    path::{Path, PathBuf},
};

/// Appends [`StreamRecord`]s to `{output_dir}/{trades|quotes}/{stocks|options}/{root}.csv`.
///
/// Each append opens, writes and closes the file so no handle outlives a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamWriter {
    output_dir: PathBuf,
    req_type: ReqType,
}

impl StreamWriter {
    pub fn new(output_dir: impl Into<PathBuf>, req_type: ReqType) -> Self {
        Self {
            output_dir: output_dir.into(),
            req_type,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File a record for `root` of this security class is appended to.
    pub fn path(&self, record: &StreamRecord) -> PathBuf {
        self.output_dir
            .join(self.req_type.mode())
            .join(record.sec_type.folder())
            .join(format!("{}.csv", record.root))
    }

    /// Append `record`, writing the header line first if the file is new.
    pub fn append(&self, record: &StreamRecord) -> Result<PathBuf, DataError> {
        let path = self.path(record);
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let is_new = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if is_new {
            writer.write_record(header(record.sec_type, self.req_type))?;
        }
        writer.write_record(&record.fields)?;
        writer.flush()?;

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stream::subscription::SecType;

    fn record(sec_type: SecType, root: &str, fields: &[&str]) -> StreamRecord {
        StreamRecord {
            sec_type,
            root: root.to_string(),
            fields: fields.iter().map(|field| field.to_string()).collect(),
        }
    }

    #[test]
    fn test_append_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let writer = StreamWriter::new(dir.path(), ReqType::Trade);
        let trade = record(
            SecType::Stock,
            "TSLA",
            &["20240102", "34200000", "101", "100", "0", "248.5", "57"],
        );

        writer.append(&trade).unwrap();
        let path = writer.append(&trade).unwrap();

        assert_eq!(path, dir.path().join("trades").join("stocks").join("TSLA.csv"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "date,ms_of_day,sequence,size,condition,price,exchange\n\
             20240102,34200000,101,100,0,248.5,57\n\
             20240102,34200000,101,100,0,248.5,57\n"
        );
    }

    #[test]
    fn test_append_routes_options_to_their_own_folder() {
        let dir = tempfile::tempdir().unwrap();
        let writer = StreamWriter::new(dir.path(), ReqType::Quote);
        let quote = record(
            SecType::Option,
            "SPY",
            &[
                "20240102", "34200500", "10", "1", "1.05", "50", "12", "1", "1.1", "50",
                "20240119", "470000", "P",
            ],
        );

        let path = writer.append(&quote).unwrap();

        assert_eq!(path, dir.path().join("quotes").join("options").join("SPY.csv"));
        let content = std::fs::read_to_string(path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some(
                "date,ms_of_day,bid_size,bid_exchange,bid,bid_condition,ask_size,ask_exchange,\
                 ask,ask_condition,expiration,strike,right"
            )
        );
        assert_eq!(
            lines.next(),
            Some("20240102,34200500,10,1,1.05,50,12,1,1.1,50,20240119,470000,P")
        );
        assert_eq!(lines.next(), None);
    }
}
