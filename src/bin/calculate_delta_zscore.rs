//! Calculate the percent delta between two period fields, then its Z-score
//!
//! Usage:
//!   calculate_delta_zscore <TABLE> <DATA_FIELD_ONE> <DATA_FIELD_TWO> <DELTA_FIELD> <ZSCORE_FIELD>

use clap::Parser;
use std::path::PathBuf;
use summary_utilities::{calculate_delta_zscore, tool};

#[derive(Parser, Debug)]
#[command(
    name = "calculate_delta_zscore",
    about = "Calculate the percent change between two fields and its Z-score"
)]
struct Args {
    /// Table file (.csv or .parquet)
    table: PathBuf,
    /// Metric for the first time period
    data_field_one: String,
    /// Metric for the second time period
    data_field_two: String,
    /// Existing float or double field for the percent delta
    delta_field: String,
    /// Existing float or double field for the Z-score of the delta
    zscore_field: String,
}

fn main() -> anyhow::Result<()> {
    tool::init_tracing();
    let args = Args::parse();

    tool::run_on_table("calculate_delta_zscore", &args.table, |table| {
        calculate_delta_zscore(
            table,
            &args.data_field_one,
            &args.data_field_two,
            &args.delta_field,
            &args.zscore_field,
        )
    })?;

    Ok(())
}
