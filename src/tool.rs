//! Tool bindings
//!
//! Shared plumbing for the per-operation binaries in `src/bin/`: logging setup,
//! opening the table, running one calculator, saving the table in place.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::table::{PolarsTable, TableOptions};

/// Install the tracing subscriber (`RUST_LOG` overrides the default filter)
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "summary_utilities=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Open `table`, apply `calculation`, and save the table back to the same file
///
/// Nothing is saved if the calculation fails.
pub fn run_on_table<F>(tool: &str, table: &Path, calculation: F) -> Result<usize>
where
    F: FnOnce(&mut PolarsTable) -> crate::error::Result<usize>,
{
    info!("{}: {:?}", tool, table);

    let mut polars_table = PolarsTable::open(table, &TableOptions::default())
        .with_context(|| format!("Failed to open table: {:?}", table))?;

    let written = calculation(&mut polars_table).with_context(|| format!("{} failed", tool))?;

    polars_table
        .save()
        .with_context(|| format!("Failed to save table: {:?}", table))?;

    info!("{}: {} rows updated", tool, written);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::{add_calculate_zscore, calculate_zscore};
    use crate::table::TableAccess;
    use std::fs;

    #[test]
    fn test_run_on_table_saves_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        fs::write(&path, "score\n2\n4\n4\n4\n5\n5\n7\n9\n").unwrap();

        let written = run_on_table("add_calculate_zscore", &path, |table| {
            add_calculate_zscore(table, "score", "score_z", "Score Z-Score")
        })
        .unwrap();
        assert_eq!(written, 8);

        let reopened = PolarsTable::open(&path, &TableOptions::default()).unwrap();
        let z = reopened.values("score_z").unwrap();
        assert_eq!(z[0], Some(-1.5));
        assert_eq!(z[7], Some(2.0));
        assert_eq!(reopened.field("score_z").unwrap().unwrap().alias, "Score Z-Score");
    }

    #[test]
    fn test_run_on_table_failure_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.csv");
        let original = "score,z\n1,0\n2,0\n";
        fs::write(&path, original).unwrap();

        // `z` is an integer field
        let err = run_on_table("calculate_zscore", &path, |table| {
            calculate_zscore(table, "score", "z")
        })
        .unwrap_err();

        assert!(format!("{:#}", err).contains("calculate_zscore failed"));
        assert_eq!(fs::read_to_string(&path).unwrap(), original);
    }
}
