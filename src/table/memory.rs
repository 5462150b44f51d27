//! In-memory table
//!
//! Numeric columns held as `Vec<Option<f64>>`. Text and other non-numeric fields can
//! be declared (they carry no values) so type validation can be exercised.

use rustc_hash::FxHashMap;

use super::{FieldInfo, FieldType, RowFilter, RowMut, TableAccess};
use crate::error::{FieldError, Result};

#[derive(Debug, Clone, Default)]
pub struct MemoryTable {
    fields: Vec<FieldInfo>,
    columns: Vec<Vec<Option<f64>>>,
    index: FxHashMap<String, usize>,
    row_count: usize,
}

impl MemoryTable {
    /// Empty table with a fixed number of rows
    pub fn new(row_count: usize) -> Self {
        MemoryTable {
            row_count,
            ..Default::default()
        }
    }

    /// Builder form of `push_field` with the alias set to the name
    pub fn with_field(
        mut self,
        name: &str,
        field_type: FieldType,
        values: Vec<Option<f64>>,
    ) -> Result<Self> {
        self.push_field(FieldInfo::new(name, field_type), values)?;
        Ok(self)
    }

    /// Add a populated field
    ///
    /// Non-numeric fields must be given an all-null column.
    pub fn push_field(&mut self, info: FieldInfo, values: Vec<Option<f64>>) -> Result<()> {
        if self.index.contains_key(&info.name) {
            return Err(FieldError::AlreadyExists(info.name));
        }
        if values.len() != self.row_count {
            return Err(FieldError::LengthMismatch {
                field: info.name,
                expected: self.row_count,
                actual: values.len(),
            });
        }
        if !info.field_type.is_numeric() && values.iter().any(Option::is_some) {
            return Err(FieldError::not_numeric(&info.name, info.field_type));
        }

        self.index.insert(info.name.clone(), self.fields.len());
        self.fields.push(info);
        self.columns.push(values);
        Ok(())
    }

    /// Current values of a field, all rows
    pub fn values(&self, name: &str) -> Result<&[Option<f64>]> {
        let position = self.position(name)?;
        Ok(&self.columns[position])
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| FieldError::NotFound(name.to_string()))
    }

    /// Resolve field names to column positions, rejecting non-numeric fields
    fn numeric_positions<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                let position = self.position(name)?;
                let field_type = &self.fields[position].field_type;
                if field_type.is_numeric() {
                    Ok(position)
                } else {
                    Err(FieldError::not_numeric(name, field_type.clone()))
                }
            })
            .collect()
    }

    /// Row indices matching `filter`, in table order
    fn matching_rows(&self, filter: &RowFilter) -> Result<Vec<usize>> {
        let filter_positions = self.numeric_positions(filter.fields())?;
        let mut filter_values = Vec::with_capacity(filter_positions.len());

        let rows = (0..self.row_count)
            .filter(|&row| {
                filter_values.clear();
                filter_values.extend(filter_positions.iter().map(|&p| self.columns[p][row]));
                filter.matches(&filter_values)
            })
            .collect();

        Ok(rows)
    }
}

impl TableAccess for MemoryTable {
    fn fields(&self) -> Result<Vec<FieldInfo>> {
        Ok(self.fields.clone())
    }

    fn field(&self, name: &str) -> Result<Option<FieldInfo>> {
        Ok(self.index.get(name).map(|&position| self.fields[position].clone()))
    }

    fn add_field(&mut self, name: &str, alias: &str, field_type: FieldType) -> Result<()> {
        let values = vec![None; self.row_count];
        self.push_field(FieldInfo::new(name, field_type).with_alias(alias), values)
    }

    fn scan(&self, filter: &RowFilter, fields: &[&str]) -> Result<Vec<Vec<Option<f64>>>> {
        let positions = self.numeric_positions(fields)?;
        let rows = self.matching_rows(filter)?;

        Ok(rows
            .into_iter()
            .map(|row| positions.iter().map(|&p| self.columns[p][row]).collect())
            .collect())
    }

    fn update(
        &mut self,
        filter: &RowFilter,
        fields: &[&str],
        visit: &mut dyn FnMut(&mut RowMut) -> Result<()>,
    ) -> Result<usize> {
        let positions = self.numeric_positions(fields)?;
        let rows = self.matching_rows(filter)?;

        for (visited, &row) in rows.iter().enumerate() {
            let values = positions.iter().map(|&p| self.columns[p][row]).collect();
            let mut cursor_row = RowMut::new(values, visited);
            visit(&mut cursor_row)?;

            // Written in place: an error on a later row keeps earlier writes
            for (index, value) in cursor_row.changes() {
                let position = positions[index];
                let field_type = &self.fields[position].field_type;
                self.columns[position][row] = value.map(|v| field_type.coerce(v));
            }
        }

        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MemoryTable {
        MemoryTable::new(3)
            .with_field("a", FieldType::Integer, vec![Some(10.0), None, Some(30.0)])
            .unwrap()
            .with_field("b", FieldType::Double, vec![Some(20.0), Some(5.0), Some(10.0)])
            .unwrap()
    }

    #[test]
    fn test_scan_filters_nulls_in_order() {
        let table = sample();
        let rows = table.scan(&RowFilter::not_null(["a"]), &["a", "b"]).unwrap();
        assert_eq!(
            rows,
            vec![vec![Some(10.0), Some(20.0)], vec![Some(30.0), Some(10.0)]]
        );

        let all = table.scan(&RowFilter::All, &["b"]).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_scan_missing_field() {
        let table = sample();
        let err = table.scan(&RowFilter::All, &["nope"]).unwrap_err();
        assert!(matches!(err, FieldError::NotFound(name) if name == "nope"));
    }

    #[test]
    fn test_scan_text_field_rejected() {
        let mut table = sample();
        table.add_field("label", "Label", FieldType::Text).unwrap();
        let err = table.scan(&RowFilter::All, &["label"]).unwrap_err();
        assert!(matches!(err, FieldError::TypeMismatch { .. }));
    }

    #[test]
    fn test_add_field_duplicate() {
        let mut table = sample();
        let err = table.add_field("b", "B", FieldType::Double).unwrap_err();
        assert!(matches!(err, FieldError::AlreadyExists(name) if name == "b"));
    }

    #[test]
    fn test_add_field_alias_and_nulls() {
        let mut table = sample();
        table.add_field("z", "Z-Score", FieldType::Double).unwrap();

        let info = table.field("z").unwrap().unwrap();
        assert_eq!(info.alias, "Z-Score");
        assert_eq!(table.values("z").unwrap(), &[None::<f64>, None, None]);
    }

    #[test]
    fn test_update_writes_only_matching_rows() {
        let mut table = sample();
        let visited = table
            .update(&RowFilter::not_null(["a"]), &["b"], &mut |row| {
                row.set(0, Some(row.position() as f64));
                Ok(())
            })
            .unwrap();

        assert_eq!(visited, 2);
        assert_eq!(table.values("b").unwrap(), &[Some(0.0), Some(5.0), Some(1.0)]);
    }

    #[test]
    fn test_update_error_keeps_earlier_writes() {
        let mut table = sample();
        let result = table.update(&RowFilter::All, &["b"], &mut |row| {
            if row.position() == 1 {
                return Err(FieldError::ArithmeticFault("boom".to_string()));
            }
            row.set(0, Some(-1.0));
            Ok(())
        });

        assert!(matches!(result, Err(FieldError::ArithmeticFault(_))));
        assert_eq!(table.values("b").unwrap(), &[Some(-1.0), Some(5.0), Some(10.0)]);
    }

    #[test]
    fn test_push_field_length_mismatch() {
        let mut table = MemoryTable::new(2);
        let err = table
            .push_field(FieldInfo::new("a", FieldType::Double), vec![Some(1.0)])
            .unwrap_err();
        assert!(matches!(err, FieldError::LengthMismatch { expected: 2, actual: 1, .. }));
    }
}
