//! Add and calculate a percent delta field, then add and calculate its Z-score field
//!
//! Usage:
//!   add_calculate_delta_zscore <TABLE> <DATA_FIELD_ONE> <DATA_FIELD_TWO>
//!                              <DELTA_FIELD_NAME> <DELTA_FIELD_ALIAS>
//!                              <ZSCORE_FIELD_NAME> <ZSCORE_FIELD_ALIAS>

use clap::Parser;
use std::path::PathBuf;
use summary_utilities::{add_calculate_delta_zscore, tool};

#[derive(Parser, Debug)]
#[command(
    name = "add_calculate_delta_zscore",
    about = "Add fields for the percent change between two fields and its Z-score"
)]
struct Args {
    /// Table file (.csv or .parquet)
    table: PathBuf,
    /// Metric for the first time period
    data_field_one: String,
    /// Metric for the second time period
    data_field_two: String,
    /// Name of the new percent delta field
    delta_field_name: String,
    /// Human readable name for the percent delta field
    delta_field_alias: String,
    /// Name of the new Z-score field
    zscore_field_name: String,
    /// Human readable name for the Z-score field
    zscore_field_alias: String,
}

fn main() -> anyhow::Result<()> {
    tool::init_tracing();
    let args = Args::parse();

    tool::run_on_table("add_calculate_delta_zscore", &args.table, |table| {
        add_calculate_delta_zscore(
            table,
            &args.data_field_one,
            &args.data_field_two,
            &args.delta_field_name,
            &args.delta_field_alias,
            &args.zscore_field_name,
            &args.zscore_field_alias,
        )
    })?;

    Ok(())
}
