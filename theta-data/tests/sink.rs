use serde_json::json;
use theta_data::{shaper::ResponseShaper, sink::CsvSink};

#[test]
fn test_exported_csv_reads_back_as_the_same_table() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("nested").join("exports");
    let shaper = ResponseShaper::new(CsvSink::new(&output_dir));

    let envelope = json!({
        "header": {"format": ["ms_of_day", "root", "price", "condition", "note"]},
        "response": [
            [34200000, "AAPL", 185.64, 0, "odd lot, late"],
            [34200001, "AAPL", 185.7, 115, null]
        ]
    });

    let table = shaper
        .shape(Some(envelope), true, "trades", "AAPL_20240102_20240102")
        .unwrap()
        .expect("table");

    let path = output_dir.join("trades_AAPL_20240102_20240102.csv");
    let mut reader = csv::Reader::from_path(&path).unwrap();

    let headers = reader.headers().unwrap().clone();
    assert_eq!(headers.iter().collect::<Vec<_>>(), table.columns());

    let records = reader
        .records()
        .map(|record| record.unwrap().iter().map(str::to_string).collect::<Vec<_>>())
        .collect::<Vec<_>>();

    assert_eq!(
        records,
        vec![
            vec!["34200000", "AAPL", "185.64", "0", "odd lot, late"],
            vec!["34200001", "AAPL", "185.7", "115", ""],
        ]
    );
}

#[test]
fn test_repeated_export_overwrites_previous_file() {
    let dir = tempfile::tempdir().unwrap();
    let shaper = ResponseShaper::new(CsvSink::new(dir.path()));

    let first = json!({"header": {"format": ["date"]}, "response": [[20240102], [20240103]]});
    let second = json!({"header": {"format": ["date"]}, "response": [[20240104]]});

    shaper.shape(Some(first), true, "splits", "AAPL").unwrap();
    shaper.shape(Some(second), true, "splits", "AAPL").unwrap();

    let content = std::fs::read_to_string(dir.path().join("splits_AAPL.csv")).unwrap();
    assert_eq!(content, "date\n20240104\n");
}

#[test]
fn test_shaping_without_export_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("untouched");
    let shaper = ResponseShaper::new(CsvSink::new(&output_dir));

    let envelope = json!({"header": {"format": ["date"]}, "response": [[20240102]]});
    let table = shaper.shape(Some(envelope), false, "eod", "AAPL").unwrap();

    assert_eq!(table.map(|table| table.len()), Some(1));
    assert!(!output_dir.exists());
}
