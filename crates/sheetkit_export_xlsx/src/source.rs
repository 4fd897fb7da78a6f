//! Record sources: JSON documents and Polars dataframes.

use std::io::Cursor;

use chrono::NaiveDate;
use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};
use serde_json::Value;

use crate::spec::{EnumRecordValue, SpecRecord};

/// Days from 0001-01-01 (day 1) to 1970-01-01.
const N_DAYS_CE_TO_UNIX_EPOCH: i32 = 719_163;

////////////////////////////////////////////////////////////////////////////////
// #region Json

/// Parse a JSON array of objects into records, keeping each object's key order.
pub fn records_from_json(c_json: &str) -> Result<Vec<SpecRecord>, String> {
    let value: Value = serde_json::from_str(c_json)
        .map_err(|err| format!("Failed to parse JSON records: {err}"))?;
    let Value::Array(l_items) = value else {
        return Err("JSON records must be an array of objects.".to_string());
    };

    l_items
        .into_iter()
        .enumerate()
        .map(|(n_idx, item)| match item {
            Value::Object(dict_fields) => Ok(dict_fields
                .into_iter()
                .map(|(c_key, value)| (c_key, derive_record_value_from_json(value)))
                .collect()),
            _ => Err(format!("JSON record {n_idx} is not an object.")),
        })
        .collect()
}

fn derive_record_value_from_json(value: Value) -> EnumRecordValue {
    match value {
        Value::Null => EnumRecordValue::Empty,
        Value::Bool(val) => EnumRecordValue::Boolean(val),
        Value::Number(val) => match val.as_f64() {
            Some(n) => EnumRecordValue::Number(n),
            None => EnumRecordValue::Text(val.to_string()),
        },
        Value::String(val) => EnumRecordValue::Text(val),
        other => EnumRecordValue::Text(other.to_string()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region DataFrame

/// Convert every dataframe row into a record keyed by column name.
pub fn records_from_dataframe(df: &DataFrame) -> Result<Vec<SpecRecord>, String> {
    let l_colnames: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let l_cols = df.get_columns();

    let mut l_records = Vec::with_capacity(df.height());
    for n_idx_row in 0..df.height() {
        let mut record = SpecRecord::new();
        for (c_name, col) in l_colnames.iter().zip(l_cols) {
            let value = col
                .get(n_idx_row)
                .map_err(|err| format!("Failed to access cell value: {err}"))?;
            record.insert(c_name.clone(), derive_record_value_from_any_value(value));
        }
        l_records.push(record);
    }
    Ok(l_records)
}

/// Decode Polars IPC bytes and convert rows into records.
pub fn records_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<Vec<SpecRecord>, String> {
    let df = derive_dataframe_from_ipc_bytes(v_ipc_df)?;
    records_from_dataframe(&df)
}

fn derive_dataframe_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<DataFrame, String> {
    IpcReader::new(Cursor::new(v_ipc_df))
        .finish()
        .map_err(|err| format!("Failed to read IPC DataFrame bytes: {err}"))
}

fn derive_record_value_from_any_value(value: AnyValue<'_>) -> EnumRecordValue {
    match value {
        AnyValue::Null => EnumRecordValue::Empty,
        AnyValue::String(val) => EnumRecordValue::Text(val.to_string()),
        AnyValue::StringOwned(val) => EnumRecordValue::Text(val.to_string()),
        AnyValue::Boolean(val) => EnumRecordValue::Boolean(val),
        AnyValue::UInt8(val) => EnumRecordValue::Number(val as f64),
        AnyValue::UInt16(val) => EnumRecordValue::Number(val as f64),
        AnyValue::UInt32(val) => EnumRecordValue::Number(val as f64),
        AnyValue::UInt64(val) => EnumRecordValue::Number(val as f64),
        AnyValue::Int8(val) => EnumRecordValue::Number(val as f64),
        AnyValue::Int16(val) => EnumRecordValue::Number(val as f64),
        AnyValue::Int32(val) => EnumRecordValue::Number(val as f64),
        AnyValue::Int64(val) => EnumRecordValue::Number(val as f64),
        AnyValue::Float32(val) => EnumRecordValue::Number(val as f64),
        AnyValue::Float64(val) => EnumRecordValue::Number(val),
        AnyValue::Date(n_days) => n_days
            .checked_add(N_DAYS_CE_TO_UNIX_EPOCH)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map_or_else(
                || EnumRecordValue::Text(n_days.to_string()),
                EnumRecordValue::from,
            ),
        _ => EnumRecordValue::Text(value.to_string()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
