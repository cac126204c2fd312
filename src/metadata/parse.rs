// Copyright (c) 2025 ADBC Drivers Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Result parsing for the column metadata query.
//!
//! Decodes query results into [`RawRow`]s, either from JSON objects
//! (Druid SQL API, `resultFormat=object`) or from Arrow record batches.
//! Columns are looked up by the aliases defined in [`crate::metadata::sql`].
//! A missing column, a null value or a value of the wrong type is an
//! `invalid_data` error.

use crate::error::{ExtractorErrorHelper, Result};
use crate::metadata::sql::{
    COLUMN_NAME_COLUMN, COLUMN_TYPE_COLUMN, SCHEMA_COLUMN, SORT_ORDER_COLUMN, TABLE_NAME_COLUMN,
};
use crate::metadata::types::RawRow;
use arrow_array::cast::AsArray;
use arrow_array::types::{Int32Type, Int64Type};
use arrow_array::{Array, RecordBatch};
use arrow_schema::DataType;
use serde_json::{Map, Value};

/// Parse one row returned by the Druid SQL API as a JSON object.
pub fn parse_json_row(row: &Map<String, Value>) -> Result<RawRow> {
    Ok(RawRow {
        schema: json_string_field(row, SCHEMA_COLUMN)?,
        table_name: json_string_field(row, TABLE_NAME_COLUMN)?,
        column_name: json_string_field(row, COLUMN_NAME_COLUMN)?,
        column_type: json_string_field(row, COLUMN_TYPE_COLUMN)?,
        ordinal_position: json_int_field(row, SORT_ORDER_COLUMN)?,
    })
}

fn json_field<'a>(row: &'a Map<String, Value>, name: &str) -> Result<&'a Value> {
    match row.get(name) {
        None | Some(Value::Null) => Err(ExtractorErrorHelper::invalid_data()
            .message(format!("Expected column '{}' in metadata result", name))),
        Some(value) => Ok(value),
    }
}

fn json_string_field(row: &Map<String, Value>, name: &str) -> Result<String> {
    match json_field(row, name)? {
        Value::String(s) => Ok(s.clone()),
        other => Err(ExtractorErrorHelper::invalid_data().message(format!(
            "Expected string for column '{}', got {}",
            name, other
        ))),
    }
}

/// Older Druid versions report `ORDINAL_POSITION` as VARCHAR, so numeric
/// strings are accepted alongside JSON integers.
fn json_int_field(row: &Map<String, Value>, name: &str) -> Result<i64> {
    let value = json_field(row, name)?;
    let parsed = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        ExtractorErrorHelper::invalid_data().message(format!(
            "Expected integer for column '{}', got {}",
            name, value
        ))
    })
}

/// Parse every row of an Arrow record batch.
pub fn parse_batch(batch: &RecordBatch) -> Result<Vec<RawRow>> {
    let schema_idx = column_index(batch, SCHEMA_COLUMN)?;
    let table_idx = column_index(batch, TABLE_NAME_COLUMN)?;
    let name_idx = column_index(batch, COLUMN_NAME_COLUMN)?;
    let type_idx = column_index(batch, COLUMN_TYPE_COLUMN)?;
    let order_idx = column_index(batch, SORT_ORDER_COLUMN)?;

    let mut rows = Vec::with_capacity(batch.num_rows());
    for row in 0..batch.num_rows() {
        rows.push(RawRow {
            schema: get_string_value(batch, schema_idx, row)?,
            table_name: get_string_value(batch, table_idx, row)?,
            column_name: get_string_value(batch, name_idx, row)?,
            column_type: get_string_value(batch, type_idx, row)?,
            ordinal_position: get_int_value(batch, order_idx, row)?,
        });
    }
    Ok(rows)
}

/// Get the index of a column by name, or return an error.
fn column_index(batch: &RecordBatch, name: &str) -> Result<usize> {
    batch.schema().index_of(name).map_err(|_| {
        ExtractorErrorHelper::invalid_data()
            .message(format!("Expected column '{}' in metadata result", name))
    })
}

fn null_value_error(batch: &RecordBatch, col_idx: usize, row: usize) -> crate::error::Error {
    ExtractorErrorHelper::invalid_data().message(format!(
        "Unexpected null in column '{}' at row {}",
        batch.schema().field(col_idx).name(),
        row
    ))
}

fn get_string_value(batch: &RecordBatch, col_idx: usize, row: usize) -> Result<String> {
    let array = batch.column(col_idx);
    if array.is_null(row) {
        return Err(null_value_error(batch, col_idx, row));
    }
    match array.data_type() {
        DataType::Utf8 => Ok(array.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Ok(array.as_string::<i64>().value(row).to_string()),
        dt => Err(ExtractorErrorHelper::invalid_data()
            .message(format!("Expected string column, got {:?}", dt))),
    }
}

fn get_int_value(batch: &RecordBatch, col_idx: usize, row: usize) -> Result<i64> {
    let array = batch.column(col_idx);
    if array.is_null(row) {
        return Err(null_value_error(batch, col_idx, row));
    }
    match array.data_type() {
        DataType::Int32 => Ok(array.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Ok(array.as_primitive::<Int64Type>().value(row)),
        DataType::Utf8 | DataType::LargeUtf8 => {
            let text = get_string_value(batch, col_idx, row)?;
            text.trim().parse().map_err(|_| {
                ExtractorErrorHelper::invalid_data()
                    .message(format!("Expected integer value, got '{}'", text))
            })
        }
        dt => Err(ExtractorErrorHelper::invalid_data()
            .message(format!("Expected int column, got {:?}", dt))),
    }
}
