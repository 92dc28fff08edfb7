//! JSON ⇄ database value conversion for dynamically described columns.
//!
//! Row values of runtime-described entities are `serde_json::Value` maps;
//! the described [`FieldKind`] decides how each value is bound into a
//! statement and how it is read back out of a query result.

use crate::field::FieldKind;
use chrono::{DateTime, Utc};
use sea_orm::{QueryResult, Value};
use seaorm_i18n_error::{storage::StorageError, I18nResult};
use serde_json::Value as JsonValue;

/// Convert an in-memory JSON value into a bind value for a column kind.
pub fn to_db_value(kind: FieldKind, value: &JsonValue) -> I18nResult<Value> {
    if value.is_null() {
        return Ok(null_value(kind));
    }
    let bound = match kind {
        FieldKind::Text => value.as_str().map(|s| Value::from(s.to_owned())),
        FieldKind::Integer => value.as_i64().map(|v| Value::from(v as i32)),
        FieldKind::BigInteger => value.as_i64().map(Value::from),
        FieldKind::Double => value.as_f64().map(Value::from),
        FieldKind::Boolean => value.as_bool().map(Value::from),
        FieldKind::Json => Some(Value::from(value.clone())),
        FieldKind::Timestamp => value
            .as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| Value::from(dt.with_timezone(&Utc))),
    };
    bound.ok_or_else(|| {
        StorageError::Decode(format!("value {value} does not fit a {kind:?} column")).into()
    })
}

fn null_value(kind: FieldKind) -> Value {
    match kind {
        FieldKind::Text => Value::String(None),
        FieldKind::Integer => Value::Int(None),
        FieldKind::BigInteger => Value::BigInt(None),
        FieldKind::Double => Value::Double(None),
        FieldKind::Boolean => Value::Bool(None),
        FieldKind::Json => Value::Json(None),
        FieldKind::Timestamp => Value::ChronoDateTimeUtc(None),
    }
}

/// Read one dynamically described column out of a query result row.
pub fn from_query_result(
    row: &QueryResult,
    name: &str,
    kind: FieldKind,
) -> I18nResult<JsonValue> {
    let value = match kind {
        FieldKind::Text => row
            .try_get::<Option<String>>("", name)?
            .map(JsonValue::from),
        FieldKind::Integer => row.try_get::<Option<i32>>("", name)?.map(JsonValue::from),
        FieldKind::BigInteger => row.try_get::<Option<i64>>("", name)?.map(JsonValue::from),
        FieldKind::Double => row.try_get::<Option<f64>>("", name)?.map(JsonValue::from),
        FieldKind::Boolean => row.try_get::<Option<bool>>("", name)?.map(JsonValue::from),
        FieldKind::Json => row.try_get::<Option<JsonValue>>("", name)?,
        FieldKind::Timestamp => row
            .try_get::<Option<DateTime<Utc>>>("", name)?
            .map(|dt| JsonValue::from(dt.to_rfc3339())),
    };
    Ok(value.unwrap_or(JsonValue::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_value_binds_as_string() {
        let value = to_db_value(FieldKind::Text, &json!("hello")).unwrap();
        assert_eq!(value, Value::from("hello".to_owned()));
    }

    #[test]
    fn null_binds_as_typed_null() {
        let value = to_db_value(FieldKind::Text, &JsonValue::Null).unwrap();
        assert_eq!(value, Value::String(None));
    }

    #[test]
    fn mismatched_kind_is_rejected() {
        assert!(to_db_value(FieldKind::Integer, &json!("not a number")).is_err());
    }
}
