//! Z-SCORE
//!
//! Standardizes a numeric field: `(value - mean) / population_std_dev`, computed
//! over every row where the data field is not null. Rows with a null data value
//! are left untouched.

use tracing::info;

use super::guards::{add_decimal_field, ensure_decimal};
use super::write_field;
use crate::error::Result;
use crate::table::{FieldType, RowFilter, TableAccess};
use crate::utils::statistics;

/// Populate an existing float or double field with Z-scores of `data_field`
///
/// Returns the number of rows written.
///
/// # Errors
/// - `NotFound` / `TypeMismatch` if `zscore_field` is missing or not decimal
/// - `ArithmeticFault` if the non-null values have no spread (no row is written)
pub fn calculate_zscore<T: TableAccess + ?Sized>(
    table: &mut T,
    data_field: &str,
    zscore_field: &str,
) -> Result<usize> {
    ensure_decimal(table, zscore_field)?;

    // exclude records with null values
    let filter = RowFilter::not_null([data_field]);

    let values: Vec<f64> = table
        .scan(&filter, &[data_field])?
        .into_iter()
        .filter_map(|row| row[0])
        .collect();

    let zscores = statistics::zscores(&values)?;
    let written = write_field(table, &filter, zscore_field, &zscores)?;

    info!("Z-score of '{}' into '{}': {} rows", data_field, zscore_field, written);
    Ok(written)
}

/// Add a double field named `zscore_field_name`, then populate it with `calculate_zscore`
///
/// # Errors
/// `AlreadyExists` if the field name is taken (nothing is created or written)
pub fn add_calculate_zscore<T: TableAccess + ?Sized>(
    table: &mut T,
    data_field: &str,
    zscore_field_name: &str,
    zscore_field_alias: &str,
) -> Result<usize> {
    add_decimal_field(table, zscore_field_name, zscore_field_alias, FieldType::Double)?;
    calculate_zscore(table, data_field, zscore_field_name)
}
