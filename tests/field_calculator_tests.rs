//! Field Calculator Integration Tests
//!
//! Runs the calculators end to end against both table implementations, and
//! against CSV/Parquet files on disk.

use approx::assert_relative_eq;
use polars::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::fs;
use summary_utilities::utils::{mean, population_std_dev};
use summary_utilities::*;

/// Two-period table from the percent delta worked example
fn memory_periods() -> MemoryTable {
    MemoryTable::new(3)
        .with_field("a", FieldType::Integer, vec![Some(10.0), None, Some(30.0)])
        .unwrap()
        .with_field("b", FieldType::Integer, vec![Some(20.0), Some(5.0), Some(10.0)])
        .unwrap()
}

fn polars_periods() -> PolarsTable {
    let df = df![
        "a" => &[Some(10i64), None, Some(30)],
        "b" => &[20i64, 5, 10],
    ]
    .unwrap();
    PolarsTable::new(df)
}

fn field_values<T: TableAccess>(table: &T, name: &str) -> Vec<Option<f64>> {
    table
        .scan(&RowFilter::All, &[name])
        .unwrap()
        .into_iter()
        .map(|row| row[0])
        .collect()
}

fn check_percent_delta_example<T: TableAccess>(mut table: T) {
    let written = add_calculate_percent_delta(&mut table, "a", "b", "delta", "Delta").unwrap();
    assert_eq!(written, 2);

    let delta = field_values(&table, "delta");
    assert_relative_eq!(delta[0].unwrap(), 0.5);
    assert_eq!(delta[1], None);
    assert_relative_eq!(delta[2].unwrap(), -2.0);
}

#[test]
fn test_percent_delta_example_memory() {
    check_percent_delta_example(memory_periods());
}

#[test]
fn test_percent_delta_example_polars() {
    check_percent_delta_example(polars_periods());
}

fn check_zscore_example<T: TableAccess>(mut table: T) {
    add_calculate_zscore(&mut table, "v", "z", "Z-Score").unwrap();

    let expected = [-1.5, -0.5, -0.5, -0.5, 0.0, 0.0, 1.0, 2.0];
    for (actual, expected) in field_values(&table, "z").iter().zip(expected.iter()) {
        assert_relative_eq!(actual.unwrap(), *expected, epsilon = 1e-12);
    }
}

#[test]
fn test_zscore_example_both_tables() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];

    let memory = MemoryTable::new(values.len())
        .with_field("v", FieldType::Double, values.iter().map(|v| Some(*v)).collect())
        .unwrap();
    check_zscore_example(memory);

    let polars = PolarsTable::new(df!["v" => &values].unwrap());
    check_zscore_example(polars);
}

#[test]
fn test_random_zscores_are_standardized() {
    let mut rng = StdRng::seed_from_u64(2016);

    for _ in 0..20 {
        let n = rng.gen_range(2..200);
        let mut values: Vec<Option<f64>> = (0..n)
            .map(|_| {
                if rng.gen_bool(0.1) {
                    None
                } else {
                    Some(rng.gen_range(-1_000.0..1_000.0))
                }
            })
            .collect();
        // guarantee at least two distinct values
        values[0] = Some(-5_000.0);
        values[1] = Some(5_000.0);

        let mut table = MemoryTable::new(n)
            .with_field("v", FieldType::Double, values.clone())
            .unwrap();
        add_calculate_zscore(&mut table, "v", "z", "z").unwrap();

        let z: Vec<f64> = table.values("z").unwrap().iter().flatten().copied().collect();
        assert_eq!(z.len(), values.iter().flatten().count());
        assert_relative_eq!(mean(&z).unwrap(), 0.0, epsilon = 1e-9);
        assert_relative_eq!(population_std_dev(&z).unwrap(), 1.0, epsilon = 1e-9);

        // null inputs stay null
        for (input, output) in values.iter().zip(table.values("z").unwrap()) {
            assert_eq!(input.is_none(), output.is_none());
        }
    }
}

#[test]
fn test_delta_zscore_failure_leaves_zscore_untouched() {
    let mut table = memory_periods()
        .with_field("delta", FieldType::Integer, vec![None; 3])
        .unwrap()
        .with_field("z", FieldType::Double, vec![Some(3.0); 3])
        .unwrap();

    let err = calculate_delta_zscore(&mut table, "a", "b", "delta", "z").unwrap_err();
    assert!(matches!(err, FieldError::TypeMismatch { ref field, .. } if field == "delta"));
    assert_eq!(table.values("z").unwrap(), vec![Some(3.0); 3].as_slice());
}

#[test]
fn test_add_delta_zscore_csv_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tracts.csv");
    fs::write(
        &path,
        "tract,pop_2010,pop_2020\nA,100,125\nB,NA,90\nC,80,80\nD,60,50\n",
    )
    .unwrap();

    let written = tool::run_on_table("add_calculate_delta_zscore", &path, |table| {
        add_calculate_delta_zscore(
            table,
            "pop_2010",
            "pop_2020",
            "pop_delta",
            "Population Change",
            "pop_delta_z",
            "Population Change Z-Score",
        )
    })
    .unwrap();
    assert_eq!(written, 3);

    let table = PolarsTable::open(&path, &TableOptions::default()).unwrap();
    let delta = table.values("pop_delta").unwrap();
    assert_relative_eq!(delta[0].unwrap(), 0.2, epsilon = 1e-6);
    assert_eq!(delta[1], None);
    assert_relative_eq!(delta[2].unwrap(), 0.0, epsilon = 1e-6);
    assert_relative_eq!(delta[3].unwrap(), -0.2, epsilon = 1e-6);

    // deltas 0.2, 0.0, -0.2 -> mean 0, population sd sqrt(0.08 / 3)
    let sd = (0.08f64 / 3.0).sqrt();
    let z = table.values("pop_delta_z").unwrap();
    assert_relative_eq!(z[0].unwrap(), 0.2 / sd, epsilon = 1e-4);
    assert_eq!(z[1], None);
    assert_relative_eq!(z[2].unwrap(), 0.0, epsilon = 1e-4);
    assert_relative_eq!(z[3].unwrap(), -0.2 / sd, epsilon = 1e-4);

    let fields = table.fields().unwrap();
    let delta_info = fields.iter().find(|f| f.name == "pop_delta").unwrap();
    assert_eq!(delta_info.field_type, FieldType::Float);
    assert_eq!(delta_info.alias, "Population Change");
    let z_info = fields.iter().find(|f| f.name == "pop_delta_z").unwrap();
    assert_eq!(z_info.field_type, FieldType::Double);
}

#[test]
fn test_parquet_calculate_into_existing_field() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("scores.parquet");

    let mut table = PolarsTable::new(
        df![
            "v" => &[Some(1.0f64), Some(2.0), None, Some(3.0)],
            "z" => &[Some(-9.0f64), Some(-9.0), Some(-9.0), Some(-9.0)],
        ]
        .unwrap(),
    );
    table.save_as(&path).unwrap();

    tool::run_on_table("calculate_zscore", &path, |table| {
        calculate_zscore(table, "v", "z")
    })
    .unwrap();

    let table = PolarsTable::open(&path, &TableOptions::default()).unwrap();
    let z = table.values("z").unwrap();
    let sd = (2.0f64 / 3.0).sqrt();
    assert_relative_eq!(z[0].unwrap(), -1.0 / sd, epsilon = 1e-12);
    assert_relative_eq!(z[1].unwrap(), 0.0, epsilon = 1e-12);
    assert_eq!(z[2], Some(-9.0));
    assert_relative_eq!(z[3].unwrap(), 1.0 / sd, epsilon = 1e-12);
}
