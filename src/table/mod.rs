//! Table Access
//!
//! The calculators never touch storage directly. They go through `TableAccess`,
//! which supplies field introspection, field creation, a filtered read pass and a
//! scoped update pass.
//!
//! Adapters:
//! - `MemoryTable` - columns held in memory (tests, library callers)
//! - `PolarsTable` - Polars DataFrame loaded from / saved to CSV or Parquet

mod memory;
mod polars_table;

pub use memory::MemoryTable;
pub use polars_table::{PolarsTable, TableFormat, TableOptions};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Storage type of a field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Integer,
    /// 32-bit floating point
    Float,
    /// 64-bit floating point
    Double,
    Text,
    Other(String),
}

impl FieldType {
    /// Float or double, a decimal data type
    pub fn is_decimal(&self) -> bool {
        matches!(self, FieldType::Float | FieldType::Double)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldType::Integer | FieldType::Float | FieldType::Double)
    }

    /// Apply the storage precision of this type to a computed value
    pub(crate) fn coerce(&self, value: f64) -> f64 {
        match self {
            FieldType::Integer => value.round(),
            FieldType::Float => value as f32 as f64,
            _ => value,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Integer => write!(f, "integer"),
            FieldType::Float => write!(f, "float"),
            FieldType::Double => write!(f, "double"),
            FieldType::Text => write!(f, "text"),
            FieldType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Field metadata: name, human readable alias, storage type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldInfo {
    pub name: String,
    pub alias: String,
    pub field_type: FieldType,
}

impl FieldInfo {
    /// Field whose alias is its name
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        let name = name.into();
        FieldInfo {
            alias: name.clone(),
            name,
            field_type,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }
}

/// Row selection for a read or update pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFilter {
    All,
    /// Rows where every listed field is non-null
    NotNull(Vec<String>),
}

impl RowFilter {
    pub fn not_null<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        RowFilter::NotNull(fields.into_iter().map(Into::into).collect())
    }

    /// Fields the filter reads
    pub fn fields(&self) -> &[String] {
        match self {
            RowFilter::All => &[],
            RowFilter::NotNull(fields) => fields,
        }
    }

    /// Evaluate against the values of `fields()`, in the same order
    pub fn matches(&self, values: &[Option<f64>]) -> bool {
        match self {
            RowFilter::All => true,
            RowFilter::NotNull(_) => values.iter().all(Option::is_some),
        }
    }
}

impl fmt::Display for RowFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowFilter::All => write!(f, "all rows"),
            RowFilter::NotNull(fields) => {
                let clauses: Vec<String> =
                    fields.iter().map(|name| format!("{} IS NOT NULL", name)).collect();
                write!(f, "{}", clauses.join(" AND "))
            }
        }
    }
}

/// One row of an update pass
///
/// Values are addressed by their position in the field list handed to
/// `TableAccess::update`. Only values passed to `set` are written back.
#[derive(Debug)]
pub struct RowMut {
    values: Vec<Option<f64>>,
    dirty: Vec<bool>,
    position: usize,
}

impl RowMut {
    pub(crate) fn new(values: Vec<Option<f64>>, position: usize) -> Self {
        let dirty = vec![false; values.len()];
        RowMut {
            values,
            dirty,
            position,
        }
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn set(&mut self, index: usize, value: Option<f64>) {
        self.values[index] = value;
        self.dirty[index] = true;
    }

    /// Zero-based position of this row within the filtered pass
    pub fn position(&self) -> usize {
        self.position
    }

    /// Values assigned during the visit: (field index, value)
    pub(crate) fn changes(&self) -> impl Iterator<Item = (usize, Option<f64>)> + '_ {
        self.dirty
            .iter()
            .enumerate()
            .filter(|(_, dirty)| **dirty)
            .map(|(index, _)| (index, self.values[index]))
    }
}

/// Table Access Provider
///
/// Rows are always visited in stable table order, so a `scan` followed by an
/// `update` with the same filter lines up row for row.
pub trait TableAccess {
    /// All fields with their aliases and types
    fn fields(&self) -> Result<Vec<FieldInfo>>;

    fn field(&self, name: &str) -> Result<Option<FieldInfo>> {
        Ok(self.fields()?.into_iter().find(|field| field.name == name))
    }

    /// Add an empty (all-null) field
    ///
    /// # Errors
    /// `AlreadyExists` if a field with this name is present
    fn add_field(&mut self, name: &str, alias: &str, field_type: FieldType) -> Result<()>;

    /// Values of `fields` for every row matching `filter`
    ///
    /// # Errors
    /// `NotFound` for a missing field, `TypeMismatch` for a non-numeric one
    fn scan(&self, filter: &RowFilter, fields: &[&str]) -> Result<Vec<Vec<Option<f64>>>>;

    /// Visit every row matching `filter` with a mutable view of `fields`
    ///
    /// The cursor lives only for the duration of the call. An error returned by
    /// `visit` stops the pass and is returned unchanged.
    ///
    /// Returns the number of rows visited.
    fn update(
        &mut self,
        filter: &RowFilter,
        fields: &[&str],
        visit: &mut dyn FnMut(&mut RowMut) -> Result<()>,
    ) -> Result<usize>;
}
