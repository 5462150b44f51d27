//! Error types for field calculations
//!
//! Every failure is raised to the caller immediately. Composite operations never
//! catch errors from their sub-steps.

use std::path::PathBuf;
use thiserror::Error;

use crate::table::FieldType;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, FieldError>;

#[derive(Debug, Error)]
pub enum FieldError {
    /// Target field has the wrong data type (e.g. a Z-score written to an integer field)
    #[error("Field '{field}' is {actual}, expected {expected}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: FieldType,
    },

    #[error("Field '{0}' already exists")]
    AlreadyExists(String),

    #[error("Field '{0}' not found")]
    NotFound(String),

    /// Zero standard deviation, zero denominator, empty value set or non-finite result
    #[error("Arithmetic fault: {0}")]
    ArithmeticFault(String),

    /// Write pass visited a different number of rows than the read pass produced
    #[error("Update cursor visited {actual} rows, expected {expected}")]
    CursorMismatch { expected: usize, actual: usize },

    #[error("Field '{field}' has {actual} values, table has {expected} rows")]
    LengthMismatch {
        field: String,
        expected: usize,
        actual: usize,
    },

    #[error("Unsupported table format: {0:?} (expected .csv or .parquet)")]
    UnsupportedFormat(PathBuf),

    #[error(transparent)]
    Polars(#[from] polars::error::PolarsError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl FieldError {
    pub(crate) fn not_decimal(field: &str, actual: FieldType) -> Self {
        FieldError::TypeMismatch {
            field: field.to_string(),
            expected: "float or double, a decimal data type".to_string(),
            actual,
        }
    }

    pub(crate) fn not_numeric(field: &str, actual: FieldType) -> Self {
        FieldError::TypeMismatch {
            field: field.to_string(),
            expected: "a numeric data type".to_string(),
            actual,
        }
    }
}
