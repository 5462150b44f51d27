//! Field validation shared by every calculator
//!
//! Checks always run before any field is created or any row is written.

use crate::error::{FieldError, Result};
use crate::table::{FieldType, TableAccess};

/// Fail with `AlreadyExists` if `name` is already a field of `table`
pub fn ensure_absent<T: TableAccess + ?Sized>(table: &T, name: &str) -> Result<()> {
    match table.field(name)? {
        Some(_) => Err(FieldError::AlreadyExists(name.to_string())),
        None => Ok(()),
    }
}

/// Fail unless `name` exists and is float or double, a decimal data type
pub fn ensure_decimal<T: TableAccess + ?Sized>(table: &T, name: &str) -> Result<FieldType> {
    let field = table
        .field(name)?
        .ok_or_else(|| FieldError::NotFound(name.to_string()))?;

    if field.field_type.is_decimal() {
        Ok(field.field_type)
    } else {
        Err(FieldError::not_decimal(name, field.field_type))
    }
}

/// `ensure_absent`, then create the field
pub(crate) fn add_decimal_field<T: TableAccess + ?Sized>(
    table: &mut T,
    name: &str,
    alias: &str,
    field_type: FieldType,
) -> Result<()> {
    ensure_absent(table, name)?;
    table.add_field(name, alias, field_type)
}
