//! Polars-backed table
//!
//! Loads a CSV or Parquet file into a DataFrame, exposes it through `TableAccess`,
//! and writes it back in the same format.
//!
//! CSV and Parquet carry no field aliases, and CSV loses the float/double
//! distinction, so field metadata is kept in a sidecar JSON file next to the
//! table (`<table file>.fields.json`).

use polars::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::{FieldInfo, FieldType, RowFilter, RowMut, TableAccess};
use crate::error::{FieldError, Result};

/// On-disk table format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match extension.as_deref() {
            Some("csv") => Ok(TableFormat::Csv),
            Some("parquet") | Some("pq") => Ok(TableFormat::Parquet),
            _ => Err(FieldError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// CSV reading/writing options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Tokens read as null (empty cells are always null for numeric fields)
    pub null_values: Vec<String>,
    /// Single-byte field separator
    pub separator: u8,
    /// Rows used for schema inference; `None` scans the entire file
    pub infer_schema_length: Option<usize>,
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            null_values: vec!["NA".to_string()],
            separator: b',',
            infer_schema_length: None,
        }
    }
}

/// DataFrame table with an optional backing file
#[derive(Debug, Clone)]
pub struct PolarsTable {
    df: DataFrame,
    aliases: FxHashMap<String, String>,
    source: Option<(PathBuf, TableFormat)>,
    options: TableOptions,
}

impl PolarsTable {
    /// Wrap an in-memory DataFrame (no backing file until `save_as`)
    pub fn new(df: DataFrame) -> Self {
        PolarsTable {
            df,
            aliases: FxHashMap::default(),
            source: None,
            options: TableOptions::default(),
        }
    }

    /// Load a `.csv` or `.parquet` table
    pub fn open(path: impl AsRef<Path>, options: &TableOptions) -> Result<Self> {
        let path = path.as_ref();
        let format = TableFormat::from_path(path)?;

        let df = match format {
            TableFormat::Csv => read_csv(path, options)?,
            TableFormat::Parquet => ParquetReader::new(File::open(path)?).finish()?,
        };

        let mut table = PolarsTable {
            df,
            aliases: FxHashMap::default(),
            source: Some((path.to_path_buf(), format)),
            options: options.clone(),
        };
        table.apply_sidecar(&sidecar_path(path))?;

        info!(
            "Loaded {:?}: {} rows, {} fields",
            path,
            table.df.height(),
            table.df.width()
        );
        Ok(table)
    }

    /// Write back to the file the table was opened from
    pub fn save(&mut self) -> Result<()> {
        let (path, format) = self.source.clone().ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, "table has no backing file")
        })?;
        self.write(&path, format)
    }

    /// Write to a new file and make it the backing file
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = TableFormat::from_path(path)?;
        self.write(path, format)?;
        self.source = Some((path.to_path_buf(), format));
        Ok(())
    }

    pub fn data_frame(&self) -> &DataFrame {
        &self.df
    }

    /// Current values of a numeric field, all rows
    pub fn values(&self, name: &str) -> Result<Vec<Option<f64>>> {
        self.require_numeric(name)?;
        numeric_values(&self.df, name)
    }

    fn write(&mut self, path: &Path, format: TableFormat) -> Result<()> {
        match format {
            TableFormat::Csv => {
                let mut file = File::create(path)?;
                CsvWriter::new(&mut file)
                    .include_header(true)
                    .with_separator(self.options.separator)
                    .finish(&mut self.df)?;
            }
            TableFormat::Parquet => {
                let file = File::create(path)?;
                ParquetWriter::new(file)
                    .with_compression(ParquetCompression::Zstd(None))
                    .finish(&mut self.df)?;
            }
        }

        let fields = self.fields()?;
        fs::write(sidecar_path(path), serde_json::to_string_pretty(&fields)?)?;

        info!("Saved {:?}: {} rows, {} fields", path, self.df.height(), self.df.width());
        Ok(())
    }

    /// Restore aliases and declared types recorded by a previous save
    fn apply_sidecar(&mut self, sidecar: &Path) -> Result<()> {
        if !sidecar.exists() {
            return Ok(());
        }

        let declared: Vec<FieldInfo> = serde_json::from_str(&fs::read_to_string(sidecar)?)?;
        debug!("Applying {} field definitions from {:?}", declared.len(), sidecar);

        for field in declared {
            if self.df.get_column_index(&field.name).is_none() {
                continue;
            }
            if field.alias != field.name {
                self.aliases.insert(field.name.clone(), field.alias.clone());
            }

            let Some(dtype) = dtype_of(&field.field_type) else {
                continue;
            };
            let column = self.df.column(&field.name)?;
            if column.dtype() != &dtype {
                let cast = column.cast(&dtype)?;
                self.df.with_column(cast)?;
            }
        }

        Ok(())
    }

    fn require_numeric(&self, name: &str) -> Result<()> {
        let column = self
            .df
            .column(name)
            .map_err(|_| FieldError::NotFound(name.to_string()))?;

        let field_type = field_type_of(column.dtype());
        if field_type.is_numeric() {
            Ok(())
        } else {
            Err(FieldError::not_numeric(name, field_type))
        }
    }

    /// Per-row filter result, in table order
    fn filter_mask(&self, filter: &RowFilter) -> Result<Vec<bool>> {
        let filter_columns = filter
            .fields()
            .iter()
            .map(|name| {
                self.require_numeric(name)?;
                numeric_values(&self.df, name)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut row_values = Vec::with_capacity(filter_columns.len());
        let mask = (0..self.df.height())
            .map(|row| {
                row_values.clear();
                row_values.extend(filter_columns.iter().map(|column| column[row]));
                filter.matches(&row_values)
            })
            .collect();

        Ok(mask)
    }
}

impl TableAccess for PolarsTable {
    fn fields(&self) -> Result<Vec<FieldInfo>> {
        Ok(self
            .df
            .get_columns()
            .iter()
            .map(|column| {
                let name = column.name().to_string();
                let alias = self.aliases.get(&name).cloned().unwrap_or_else(|| name.clone());
                FieldInfo {
                    name,
                    alias,
                    field_type: field_type_of(column.dtype()),
                }
            })
            .collect())
    }

    fn add_field(&mut self, name: &str, alias: &str, field_type: FieldType) -> Result<()> {
        if self.df.get_column_index(name).is_some() {
            return Err(FieldError::AlreadyExists(name.to_string()));
        }

        let dtype = dtype_of(&field_type).ok_or_else(|| FieldError::TypeMismatch {
            field: name.to_string(),
            expected: "integer, float, double or text".to_string(),
            actual: field_type.clone(),
        })?;

        let column = Series::full_null(name.into(), self.df.height(), &dtype);
        self.df.with_column(column)?;
        if alias != name {
            self.aliases.insert(name.to_string(), alias.to_string());
        }

        debug!("Added {} field '{}' ({})", field_type, name, alias);
        Ok(())
    }

    fn scan(&self, filter: &RowFilter, fields: &[&str]) -> Result<Vec<Vec<Option<f64>>>> {
        for name in fields {
            self.require_numeric(name)?;
        }

        let mask: BooleanChunked = self.filter_mask(filter)?.into_iter().collect();
        let selected = self.df.select(fields.iter().copied())?.filter(&mask)?;

        let columns = fields
            .iter()
            .map(|name| numeric_values(&selected, name))
            .collect::<Result<Vec<_>>>()?;

        Ok((0..selected.height())
            .map(|row| columns.iter().map(|column| column[row]).collect())
            .collect())
    }

    fn update(
        &mut self,
        filter: &RowFilter,
        fields: &[&str],
        visit: &mut dyn FnMut(&mut RowMut) -> Result<()>,
    ) -> Result<usize> {
        for name in fields {
            self.require_numeric(name)?;
        }

        let mask = self.filter_mask(filter)?;
        let mut columns = fields
            .iter()
            .map(|name| numeric_values(&self.df, name))
            .collect::<Result<Vec<_>>>()?;
        let types = fields
            .iter()
            .map(|name| Ok(field_type_of(self.df.column(name)?.dtype())))
            .collect::<Result<Vec<_>>>()?;
        let mut dirty = vec![false; fields.len()];

        let mut visited = 0;
        for row in (0..mask.len()).filter(|&row| mask[row]) {
            let values = columns.iter().map(|column| column[row]).collect();
            let mut cursor_row = RowMut::new(values, visited);
            visit(&mut cursor_row)?;

            for (index, value) in cursor_row.changes() {
                columns[index][row] = value.map(|v| types[index].coerce(v));
                dirty[index] = true;
            }
            visited += 1;
        }

        // Changed columns are committed only once the whole pass has succeeded
        for (index, name) in fields.iter().enumerate() {
            if !dirty[index] {
                continue;
            }
            let dtype = self.df.column(name)?.dtype().clone();
            let series = Series::new((*name).into(), std::mem::take(&mut columns[index]))
                .cast(&dtype)?;
            self.df.with_column(series)?;
        }

        Ok(visited)
    }
}

fn read_csv(path: &Path, options: &TableOptions) -> Result<DataFrame> {
    let null_values = if options.null_values.is_empty() {
        None
    } else {
        Some(NullValues::AllColumns(
            options.null_values.iter().map(|token| token.as_str().into()).collect(),
        ))
    };

    let parse_options = CsvParseOptions::default()
        .with_separator(options.separator)
        .with_null_values(null_values);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(options.infer_schema_length)
        .with_parse_options(parse_options)
        .try_into_reader_with_file_path(Some(path.into()))?
        .finish()?;

    Ok(df)
}

fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.into_iter().collect())
}

fn field_type_of(dtype: &DataType) -> FieldType {
    match dtype {
        DataType::Float32 => FieldType::Float,
        DataType::Float64 => FieldType::Double,
        DataType::String => FieldType::Text,
        dtype if dtype.is_integer() => FieldType::Integer,
        other => FieldType::Other(other.to_string()),
    }
}

fn dtype_of(field_type: &FieldType) -> Option<DataType> {
    match field_type {
        FieldType::Integer => Some(DataType::Int64),
        FieldType::Float => Some(DataType::Float32),
        FieldType::Double => Some(DataType::Float64),
        FieldType::Text => Some(DataType::String),
        FieldType::Other(_) => None,
    }
}

fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".fields.json");
    PathBuf::from(name)
}
