//! Row helpers shared by the store adapters.

use serde_json::{Map, Value};

use crate::infrastructure::ports::{StoreError, USER_ID_COLUMN};

/// The `user_id` a row is keyed by.
pub fn row_user_id(table: &str, row: &Value) -> Result<String, StoreError> {
    row.get(USER_ID_COLUMN)
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| StoreError::serialization(format!("{table} row has no {USER_ID_COLUMN}")))
}

/// Upsert semantics: columns present in `incoming` replace the stored ones,
/// columns it omits keep their stored values.
pub fn merge_columns(existing: Option<Value>, incoming: Value) -> Result<Value, StoreError> {
    let Value::Object(incoming) = incoming else {
        return Err(StoreError::serialization("row must be a JSON object"));
    };
    let mut merged = match existing {
        Some(Value::Object(existing)) => existing,
        _ => Map::new(),
    };
    for (column, value) in incoming {
        merged.insert(column, value);
    }
    Ok(Value::Object(merged))
}
