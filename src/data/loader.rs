use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{
    DataType, Float16Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt16Type, UInt32Type, UInt64Type, UInt8Type,
};
use arrow::error::ArrowError;
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Dataset, Row, Table, Value};
use crate::error::EvaluateError;

/// File extensions a split can be stored with, in lookup order.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["parquet", "pq", "json", "csv"];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – kept columnar; rows are decoded on access
/// * `.json`    – `[{ "prediction": ..., "reference": ... }, ...]`
/// * `.csv`     – header row, one column per field
pub fn load_file(path: &Path) -> Result<Box<dyn Dataset>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset: Box<dyn Dataset> = match ext.as_str() {
        "parquet" | "pq" => Box::new(load_parquet(path)?),
        "json" => Box::new(load_json(path)?),
        "csv" => Box::new(load_csv(path)?),
        _ => {
            return Err(EvaluateError::UnsupportedFormat {
                path: path.to_path_buf(),
            }
            .into())
        }
    };
    log::info!("Loaded {} rows from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Position of the file's extension in [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().position(|e| *e == ext)
}

/// Locate `<dir>/<split>.<ext>`, preferring extensions listed first.
pub fn split_path(dir: &Path, split: &str) -> Result<PathBuf> {
    let entries =
        std::fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;

    let mut best: Option<(usize, PathBuf)> = None;
    for entry in entries {
        let path = entry
            .with_context(|| format!("listing {}", dir.display()))?
            .path();
        if !path.is_file() || path.file_stem().and_then(|s| s.to_str()) != Some(split) {
            continue;
        }
        if let Some(rank) = extension_rank(&path) {
            if best.as_ref().map_or(true, |(current, _)| rank < *current) {
                best = Some((rank, path));
            }
        }
    }

    best.map(|(_, path)| path)
        .with_context(|| format!("No data file for split '{split}' in {}", dir.display()))
}

/// Load one split of a dataset stored as `<dir>/<split>.<ext>`.
pub fn load_split(dir: &Path, split: &str) -> Result<Box<dyn Dataset>> {
    let path = split_path(dir, split)?;
    load_file(&path)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "prediction": "the cat", "reference": "a cat", "label": 1 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_value(val)))
                .collect::<Row>())
        })
        .collect::<Result<Vec<Row>>>()?;

    Ok(Table::from_rows(rows))
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, cell types guessed per value.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.clone(), guess_value_type(cell)))
            .collect();
        rows.push(row);
    }

    Ok(Table::from_rows(rows))
}

fn guess_value_type(s: &str) -> Value {
    if s.is_empty() {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    if s == "true" || s == "false" {
        return Value::Bool(s == "true");
    }
    Value::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file into a single Arrow batch.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). Nothing is converted to [`Row`]s here.
fn load_parquet(path: &Path) -> Result<RecordBatch> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("reading parquet record batch")?;

    concat_batches(&schema, &batches).context("concatenating parquet record batches")
}

// ---------------------------------------------------------------------------
// Arrow-backed rows
// ---------------------------------------------------------------------------

impl Dataset for RecordBatch {
    fn len(&self) -> usize {
        self.num_rows()
    }

    fn row(&self, index: usize) -> crate::error::Result<Cow<'_, Row>> {
        if index >= self.num_rows() {
            return Err(EvaluateError::IndexOutOfRange {
                index,
                len: self.num_rows(),
            });
        }
        let schema = self.schema();
        let row = schema
            .fields()
            .iter()
            .zip(self.columns())
            .map(|(field, col)| extract_value(col, index).map(|v| (field.name().clone(), v)))
            .collect::<crate::error::Result<BTreeMap<_, _>>>()?;
        Ok(Cow::Owned(row))
    }
}

/// Extract a single cell from an Arrow column at a given row.
///
/// Types without a [`Value`] counterpart (dates, decimals, nested types, ...)
/// come back as their Arrow display string.
fn extract_value(col: &ArrayRef, row: usize) -> crate::error::Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Utf8View => Value::String(col.as_string_view().value(row).to_string()),
        DataType::Int8 => Value::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => Value::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => Value::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => Value::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            // Past i64::MAX the value only fits as a float.
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v)
                .map(Value::Integer)
                .unwrap_or(Value::Float(v as f64))
        }
        DataType::Float16 => Value::Float(col.as_primitive::<Float16Type>().value(row).to_f64()),
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        DataType::Dictionary(_, value_type) => {
            let cell = cast(&col.slice(row, 1), value_type)
                .map_err(|e| decode_error(col.data_type(), e))?;
            return extract_value(&cell, 0);
        }
        other => {
            let formatter = ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default())
                .map_err(|e| decode_error(other, e))?;
            Value::String(formatter.value(row).to_string())
        }
    };
    Ok(value)
}

fn decode_error(data_type: &DataType, err: ArrowError) -> EvaluateError {
    EvaluateError::Dataset {
        message: format!("cannot decode {data_type} cell: {err}"),
    }
}
