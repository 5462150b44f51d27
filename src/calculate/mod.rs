//! Field calculators
//!
//! Each calculator comes in two forms:
//! - `calculate_*` populates a field that already exists (must be float or double)
//! - `add_calculate_*` adds the field first (fails if the name is taken), then populates it
//!
//! Every calculator makes one filtered read pass, computes all values in memory,
//! then makes one filtered write pass with the same filter. Arithmetic faults are
//! raised between the two passes, so a failed calculation writes no rows.

pub mod delta_zscore;
pub mod guards;
pub mod percent_delta;
pub mod zscore;

pub use delta_zscore::{add_calculate_delta_zscore, calculate_delta_zscore};
pub use guards::{ensure_absent, ensure_decimal};
pub use percent_delta::{add_calculate_percent_delta, calculate_percent_delta};
pub use zscore::{add_calculate_zscore, calculate_zscore};

use tracing::debug;

use crate::error::{FieldError, Result};
use crate::table::{RowFilter, TableAccess};

/// Write `values` into `target`, one per row matching `filter`, in table order
///
/// Returns the number of rows written.
pub(crate) fn write_field<T: TableAccess + ?Sized>(
    table: &mut T,
    filter: &RowFilter,
    target: &str,
    values: &[f64],
) -> Result<usize> {
    debug!("Writing {} values to '{}' where {}", values.len(), target, filter);

    let mut pending = values.iter();
    let written = table.update(filter, &[target], &mut |row| match pending.next() {
        Some(&value) => {
            row.set(0, Some(value));
            Ok(())
        }
        None => Err(FieldError::CursorMismatch {
            expected: values.len(),
            actual: row.position() + 1,
        }),
    })?;

    if written != values.len() {
        return Err(FieldError::CursorMismatch {
            expected: values.len(),
            actual: written,
        });
    }

    Ok(written)
}
