//! Calculate the percent delta between two period fields into an existing field
//!
//! delta = 1 - (DATA_FIELD_ONE / DATA_FIELD_TWO)
//!
//! Usage:
//!   calculate_percent_delta <TABLE> <DATA_FIELD_ONE> <DATA_FIELD_TWO> <DELTA_FIELD>

use clap::Parser;
use std::path::PathBuf;
use summary_utilities::{calculate_percent_delta, tool};

#[derive(Parser, Debug)]
#[command(name = "calculate_percent_delta", about = "Calculate the percent change between two fields")]
struct Args {
    /// Table file (.csv or .parquet)
    table: PathBuf,
    /// Metric for the first time period
    data_field_one: String,
    /// Metric for the second time period
    data_field_two: String,
    /// Existing float or double field where the results are saved
    delta_field: String,
}

fn main() -> anyhow::Result<()> {
    tool::init_tracing();
    let args = Args::parse();

    tool::run_on_table("calculate_percent_delta", &args.table, |table| {
        calculate_percent_delta(
            table,
            &args.data_field_one,
            &args.data_field_two,
            &args.delta_field,
        )
    })?;

    Ok(())
}
