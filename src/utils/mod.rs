//! Utility modules for field calculations
//!
//! - Statistics: mean, population standard deviation, Z-scores, percent delta

pub mod statistics;

// Re-export commonly used functions
pub use statistics::{mean, percent_delta, population_std_dev, zscores};
