//! Add a Z-score field and calculate it from a numeric field
//!
//! Usage:
//!   add_calculate_zscore <TABLE> <DATA_FIELD> <ZSCORE_FIELD_NAME> <ZSCORE_FIELD_ALIAS>

use clap::Parser;
use std::path::PathBuf;
use summary_utilities::{add_calculate_zscore, tool};

#[derive(Parser, Debug)]
#[command(name = "add_calculate_zscore", about = "Add a field and calculate the Z-score into it")]
struct Args {
    /// Table file (.csv or .parquet)
    table: PathBuf,
    /// Field containing the data values
    data_field: String,
    /// Name of the new field (must not exist yet)
    zscore_field_name: String,
    /// Human readable name for the new field
    zscore_field_alias: String,
}

fn main() -> anyhow::Result<()> {
    tool::init_tracing();
    let args = Args::parse();

    tool::run_on_table("add_calculate_zscore", &args.table, |table| {
        add_calculate_zscore(
            table,
            &args.data_field,
            &args.zscore_field_name,
            &args.zscore_field_alias,
        )
    })?;

    Ok(())
}
