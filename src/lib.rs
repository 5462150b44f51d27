//! Summary Utilities
//!
//! Field calculators for attribute tables: Z-score of a numeric field, percent
//! change between two period fields, and the Z-score of that percent change.
//!
//! - `calculate/`: The calculators and the field guards they share
//! - `table/`: Table access trait with in-memory and Polars (CSV/Parquet) tables
//! - `utils/`: Pure statistics (mean, population standard deviation, Z-scores)
//! - `tool`: Plumbing for the one-binary-per-operation command line tools

pub mod calculate;
pub mod error;
pub mod table;
pub mod tool;
pub mod utils;

// Re-export commonly used types
pub use calculate::{
    add_calculate_delta_zscore, add_calculate_percent_delta, add_calculate_zscore,
    calculate_delta_zscore, calculate_percent_delta, calculate_zscore,
};
pub use error::{FieldError, Result};
pub use table::{
    FieldInfo, FieldType, MemoryTable, PolarsTable, RowFilter, RowMut, TableAccess,
    TableOptions,
};
