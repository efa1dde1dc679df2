use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::{future::Future, path::Path, process::ExitCode, time::Duration};
use theta_data::{sink::write_table, table::Table};

/// Await `request` behind a transient "Loading data..." spinner.
pub async fn with_spinner<F>(request: F) -> F::Output
where
    F: Future,
{
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message("Loading data...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let output = request.await;

    spinner.finish_and_clear();
    output
}

/// Print or save `table`, mapping an absent result to a failure exit code.
pub fn emit(table: Option<Table>, output_file: Option<&Path>) -> Result<ExitCode> {
    let Some(table) = table else {
        println!("Failed to retrieve data");
        return Ok(ExitCode::FAILURE);
    };

    match output_file {
        Some(path) => {
            write_table(&table, path)?;
            println!("Data saved to {}", path.display());
        }
        None => println!("{table}"),
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_emit_absent_table_fails() {
        assert_eq!(emit(None, None).unwrap(), ExitCode::FAILURE);
    }

    #[test]
    fn test_emit_saves_table_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("splits.csv");
        let table = Table::new(
            vec!["date".to_string(), "ratio".to_string()],
            vec![vec![json!(20200831), json!("4:1")]],
        )
        .unwrap();

        assert_eq!(emit(Some(table), Some(&path)).unwrap(), ExitCode::SUCCESS);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "date,ratio\n20200831,4:1\n"
        );
    }
}
