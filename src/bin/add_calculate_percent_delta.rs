//! Add a percent delta field and calculate it from two period fields
//!
//! Usage:
//!   add_calculate_percent_delta <TABLE> <DATA_FIELD_ONE> <DATA_FIELD_TWO>
//!                               <DELTA_FIELD_NAME> <DELTA_FIELD_ALIAS>

use clap::Parser;
use std::path::PathBuf;
use summary_utilities::{add_calculate_percent_delta, tool};

#[derive(Parser, Debug)]
#[command(
    name = "add_calculate_percent_delta",
    about = "Add a field and calculate the percent change between two fields into it"
)]
struct Args {
    /// Table file (.csv or .parquet)
    table: PathBuf,
    /// Metric for the first time period
    data_field_one: String,
    /// Metric for the second time period
    data_field_two: String,
    /// Name of the new field (must not exist yet)
    delta_field_name: String,
    /// Human readable name for the new field
    delta_field_alias: String,
}

fn main() -> anyhow::Result<()> {
    tool::init_tracing();
    let args = Args::parse();

    tool::run_on_table("add_calculate_percent_delta", &args.table, |table| {
        add_calculate_percent_delta(
            table,
            &args.data_field_one,
            &args.data_field_two,
            &args.delta_field_name,
            &args.delta_field_alias,
        )
    })?;

    Ok(())
}
