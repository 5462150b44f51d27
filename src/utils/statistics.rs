//! Statistics Utilities
//!
//! Pure arithmetic behind the field calculators: population mean and standard
//! deviation, Z-scores, and the two-period percent delta.
//!
//! Degenerate inputs (empty value sets, zero spread, zero denominators) are reported
//! as `FieldError::ArithmeticFault` instead of leaking NaN or infinity into a table.

use crate::error::{FieldError, Result};

/// Arithmetic mean of a value set
pub fn mean(values: &[f64]) -> Result<f64> {
    let (pivot, offset) = centered(values)?;
    finite(pivot + offset, "mean")
}

/// Population standard deviation (divisor `n`, not `n - 1`)
pub fn population_std_dev(values: &[f64]) -> Result<f64> {
    let deviations = deviations(values)?;
    Ok(root_mean_square(&deviations))
}

/// Z-score of every value: `(value - mean) / population_std_dev`
///
/// Output order matches input order.
///
/// # Errors
/// `ArithmeticFault` when the set is empty or has no spread (constant or single value).
pub fn zscores(values: &[f64]) -> Result<Vec<f64>> {
    let deviations = deviations(values)?;

    let sd = if values.iter().all(|v| *v == values[0]) {
        0.0
    } else {
        root_mean_square(&deviations)
    };
    if sd == 0.0 {
        return Err(FieldError::ArithmeticFault(format!(
            "standard deviation is zero across {} value(s); Z-scores are undefined",
            values.len()
        )));
    }

    deviations
        .iter()
        .map(|d| finite(d / sd, "Z-score"))
        .collect()
}

/// First value and the mean offset of every value from it
///
/// Offsets stay small when the values are large but close together, so the
/// spread survives even when it is a few ulps of the mean.
fn centered(values: &[f64]) -> Result<(f64, f64)> {
    let pivot = *values.first().ok_or_else(|| {
        FieldError::ArithmeticFault("cannot take the mean of an empty value set".to_string())
    })?;

    let sum: f64 = values.iter().map(|v| v - pivot).sum();
    let offset = finite(sum / values.len() as f64, "mean")?;
    Ok((pivot, offset))
}

/// `value - mean` for every value
fn deviations(values: &[f64]) -> Result<Vec<f64>> {
    let (pivot, offset) = centered(values)?;
    values
        .iter()
        .map(|v| finite((v - pivot) - offset, "deviation from the mean"))
        .collect()
}

fn root_mean_square(values: &[f64]) -> f64 {
    let sum_sq: f64 = values.iter().map(|v| v * v).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// Percent delta between two observations of the same metric
///
/// `1 - (earlier / later)`: `earlier` is the first period value, `later` the second.
/// The result is positive when `later` exceeds `earlier`.
pub fn percent_delta(earlier: f64, later: f64) -> Result<f64> {
    if later == 0.0 {
        return Err(FieldError::ArithmeticFault(format!(
            "percent delta denominator is zero (earlier = {})",
            earlier
        )));
    }

    finite(1.0 - earlier / later, "percent delta")
}

fn finite(value: f64, what: &str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(FieldError::ArithmeticFault(format!("{} is not finite ({})", what, value)))
    }
}
