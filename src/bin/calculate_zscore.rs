//! Calculate the Z-score of a numeric field into an existing float or double field
//!
//! Usage:
//!   calculate_zscore <TABLE> <DATA_FIELD> <ZSCORE_FIELD>

use clap::Parser;
use std::path::PathBuf;
use summary_utilities::{calculate_zscore, tool};

#[derive(Parser, Debug)]
#[command(name = "calculate_zscore", about = "Calculate the Z-score of a field")]
struct Args {
    /// Table file (.csv or .parquet)
    table: PathBuf,
    /// Field containing the data values
    data_field: String,
    /// Existing float or double field to be populated with the Z-score
    zscore_field: String,
}

fn main() -> anyhow::Result<()> {
    tool::init_tracing();
    let args = Args::parse();

    tool::run_on_table("calculate_zscore", &args.table, |table| {
        calculate_zscore(table, &args.data_field, &args.zscore_field)
    })?;

    Ok(())
}
