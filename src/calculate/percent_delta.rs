//! PERCENT DELTA
//!
//! Given two fields holding the same metric for two time periods, scores the
//! fractional change between them:
//!
//!   delta = 1 - (data_field_one / data_field_two)
//!
//! `data_field_one` is the first (earlier) period and `data_field_two` the second
//! (later) period. Only rows where both fields are non-null are scored; all other
//! rows are left untouched.

use tracing::info;

use super::guards::{add_decimal_field, ensure_decimal};
use super::write_field;
use crate::error::Result;
use crate::table::{FieldType, RowFilter, TableAccess};
use crate::utils::statistics;

/// Populate an existing float or double field with the percent delta
///
/// Returns the number of rows written.
///
/// # Errors
/// - `NotFound` / `TypeMismatch` if `delta_field` is missing or not decimal
/// - `ArithmeticFault` if any qualifying row has a zero `data_field_two`
///   (raised before any row is written)
pub fn calculate_percent_delta<T: TableAccess + ?Sized>(
    table: &mut T,
    data_field_one: &str,
    data_field_two: &str,
    delta_field: &str,
) -> Result<usize> {
    ensure_decimal(table, delta_field)?;

    // exclude rows where either the first or second data field is null
    let filter = RowFilter::not_null([data_field_one, data_field_two]);

    let deltas = table
        .scan(&filter, &[data_field_one, data_field_two])?
        .into_iter()
        .filter_map(|row| match (row[0], row[1]) {
            (Some(one), Some(two)) => Some(statistics::percent_delta(one, two)),
            _ => None,
        })
        .collect::<Result<Vec<f64>>>()?;

    let written = write_field(table, &filter, delta_field, &deltas)?;

    info!(
        "Percent delta of '{}' over '{}' into '{}': {} rows",
        data_field_one, data_field_two, delta_field, written
    );
    Ok(written)
}

/// Add a float field named `delta_field_name`, then populate it with `calculate_percent_delta`
///
/// # Errors
/// `AlreadyExists` if the field name is taken (nothing is created or written)
pub fn add_calculate_percent_delta<T: TableAccess + ?Sized>(
    table: &mut T,
    data_field_one: &str,
    data_field_two: &str,
    delta_field_name: &str,
    delta_field_alias: &str,
) -> Result<usize> {
    add_decimal_field(table, delta_field_name, delta_field_alias, FieldType::Float)?;
    calculate_percent_delta(table, data_field_one, data_field_two, delta_field_name)
}
