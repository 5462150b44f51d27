//! DELTA Z-SCORE
//!
//! Chains the two calculators: percent delta between two periods, then the
//! Z-score of that delta. Both target fields are validated before the delta step
//! writes anything, and the Z-score step only runs once the delta step has fully
//! succeeded.

use super::guards::{ensure_absent, ensure_decimal};
use super::percent_delta::{add_calculate_percent_delta, calculate_percent_delta};
use super::zscore::{add_calculate_zscore, calculate_zscore};
use crate::error::{FieldError, Result};
use crate::table::TableAccess;

/// Populate existing `delta_field` and `zscore_field` (both float or double)
///
/// Returns the number of rows written to `zscore_field`.
///
/// # Errors
/// `NotFound` / `TypeMismatch` if either field is missing or not decimal, raised
/// before the delta field is touched
pub fn calculate_delta_zscore<T: TableAccess + ?Sized>(
    table: &mut T,
    data_field_one: &str,
    data_field_two: &str,
    delta_field: &str,
    zscore_field: &str,
) -> Result<usize> {
    ensure_decimal(table, delta_field)?;
    ensure_decimal(table, zscore_field)?;

    calculate_percent_delta(table, data_field_one, data_field_two, delta_field)?;
    calculate_zscore(table, delta_field, zscore_field)
}

/// Add and populate the delta field, then add and populate its Z-score field
///
/// Both names are checked up front: if either is taken, or they are the same
/// name, nothing is created. If the delta step fails the Z-score field is never
/// created.
pub fn add_calculate_delta_zscore<T: TableAccess + ?Sized>(
    table: &mut T,
    data_field_one: &str,
    data_field_two: &str,
    delta_field_name: &str,
    delta_field_alias: &str,
    zscore_field_name: &str,
    zscore_field_alias: &str,
) -> Result<usize> {
    ensure_absent(table, delta_field_name)?;
    ensure_absent(table, zscore_field_name)?;
    if delta_field_name == zscore_field_name {
        return Err(FieldError::AlreadyExists(zscore_field_name.to_string()));
    }

    add_calculate_percent_delta(
        table,
        data_field_one,
        data_field_two,
        delta_field_name,
        delta_field_alias,
    )?;
    add_calculate_zscore(table, delta_field_name, zscore_field_name, zscore_field_alias)
}
