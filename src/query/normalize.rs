use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type, UInt8Type,
    UInt16Type, UInt32Type, UInt64Type,
};
use arrow::record_batch::RecordBatch;
use arrow::util::display::{ArrayFormatter, FormatOptions};
use serde_json::{Number, Value};

use crate::core::{ColumnMeta, Row, SiftError};

/// Largest integer a JSON consumer can hold in an IEEE-754 double.
pub const MAX_SAFE_INTEGER: i64 = (1 << 53) - 1;

/// Type tags used when columns have to be guessed from a row.
pub const NUMERIC_TYPE: &str = "Float64";
pub const TEXT_TYPE: &str = "Utf8";

#[derive(Debug, PartialEq)]
pub struct Normalized {
    pub columns: Vec<ColumnMeta>,
    pub rows: Vec<Row>,
    pub truncated: bool,
}

/// Converts engine batches into at most `max_rows` JSON-safe rows.
///
/// `columns` comes from the engine's result schema; when it is empty the
/// columns are guessed from the first row instead.
pub fn normalize(
    columns: Vec<ColumnMeta>,
    batches: &[RecordBatch],
    max_rows: usize,
) -> Result<Normalized, SiftError> {
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    let rows = to_rows(batches, max_rows)?;

    // An engine schema with no fields yields rows with no keys, so the
    // fallback can only produce an empty column list. That is still `Ok`;
    // the error is reserved for no columns and no rows.
    let columns = if !columns.is_empty() {
        columns
    } else if let Some(first) = rows.first() {
        infer_columns(first)
    } else {
        return Err(SiftError::EmptyResultSchema);
    };

    Ok(Normalized {
        columns,
        rows,
        truncated: total > max_rows,
    })
}

/// Best-effort column types from one row's values. A null or non-numeric
/// first value is reported as text even if later rows are numeric.
pub fn infer_columns(row: &Row) -> Vec<ColumnMeta> {
    row.iter()
        .map(|(name, value)| {
            let dtype = match value {
                Value::Number(_) => NUMERIC_TYPE,
                _ => TEXT_TYPE,
            };
            ColumnMeta::new(name, dtype)
        })
        .collect()
}

fn to_rows(batches: &[RecordBatch], limit: usize) -> Result<Vec<Row>, SiftError> {
    let options = FormatOptions::default();
    let total: usize = batches.iter().map(|b| b.num_rows()).sum();
    let mut rows = Vec::with_capacity(total.min(limit));

    for batch in batches {
        if rows.len() >= limit {
            break;
        }
        let schema = batch.schema();
        let formatters = batch
            .columns()
            .iter()
            .map(|array| ArrayFormatter::try_new(array.as_ref(), &options))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| SiftError::QueryExecution(e.to_string()))?;

        let take = (limit - rows.len()).min(batch.num_rows());
        for i in 0..take {
            let mut row = Row::with_capacity(batch.num_columns());
            for (c, field) in schema.fields().iter().enumerate() {
                row.insert(
                    field.name().clone(),
                    cell_value(batch.column(c), &formatters[c], i),
                );
            }
            rows.push(row);
        }
    }

    Ok(rows)
}

fn cell_value(array: &ArrayRef, formatter: &ArrayFormatter, i: usize) -> Value {
    if array.is_null(i) {
        return Value::Null;
    }
    match array.data_type() {
        DataType::Boolean => Value::Bool(array.as_boolean().value(i)),
        DataType::Int8 => Value::from(array.as_primitive::<Int8Type>().value(i)),
        DataType::Int16 => Value::from(array.as_primitive::<Int16Type>().value(i)),
        DataType::Int32 => Value::from(array.as_primitive::<Int32Type>().value(i)),
        DataType::UInt8 => Value::from(array.as_primitive::<UInt8Type>().value(i)),
        DataType::UInt16 => Value::from(array.as_primitive::<UInt16Type>().value(i)),
        DataType::UInt32 => Value::from(array.as_primitive::<UInt32Type>().value(i)),
        DataType::Int64 => int_value(array.as_primitive::<Int64Type>().value(i)),
        DataType::UInt64 => uint_value(array.as_primitive::<UInt64Type>().value(i)),
        DataType::Float32 => float_value(f64::from(array.as_primitive::<Float32Type>().value(i))),
        DataType::Float64 => float_value(array.as_primitive::<Float64Type>().value(i)),
        DataType::Utf8 => Value::String(array.as_string::<i32>().value(i).to_string()),
        DataType::LargeUtf8 => Value::String(array.as_string::<i64>().value(i).to_string()),
        DataType::Utf8View => Value::String(array.as_string_view().value(i).to_string()),
        _ => Value::String(formatter.value(i).to_string()),
    }
}

fn int_value(v: i64) -> Value {
    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&v) {
        Value::from(v)
    } else {
        Value::String(v.to_string())
    }
}

fn uint_value(v: u64) -> Value {
    if v <= MAX_SAFE_INTEGER as u64 {
        Value::from(v)
    } else {
        Value::String(v.to_string())
    }
}

fn float_value(v: f64) -> Value {
    Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(v.to_string()))
}
