//! Bridge between JSON documents and the value model.
//!
//! JSON input converts structurally: objects become tables, arrays stay
//! arrays, numbers become integers when they fit `i64` and floats otherwise.
//! Strings stay strings even when they look like dates or numbers. `null` has
//! no counterpart and is rejected with its path.
//!
//! In the other direction, temporal values serialize as ISO 8601 text
//! (RFC 3339 for offset datetimes).

use serde::ser::{Serialize, Serializer};
use serde_json::Value as Json;

use crate::error::{GetError, Result};
use crate::value::{Table, Value, ValueKind};

impl TryFrom<Json> for Value {
    type Error = GetError;

    fn try_from(json: Json) -> Result<Self> {
        from_json(json, "$")
    }
}

fn from_json(json: Json, path: &str) -> Result<Value> {
    let kind = match json {
        Json::Null => {
            return Err(GetError::JsonNull {
                path: path.to_string(),
            })
        }
        Json::Bool(b) => ValueKind::Boolean(b),
        Json::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => ValueKind::Integer(i),
            (None, Some(x)) => ValueKind::Float(x),
            (None, None) => {
                return Err(GetError::OutOfRange {
                    target: "float",
                    value: n.to_string(),
                    location: None,
                })
            }
        },
        Json::String(s) => ValueKind::String(s),
        Json::Array(items) => ValueKind::Array(
            items
                .into_iter()
                .enumerate()
                .map(|(i, item)| from_json(item, &format!("{path}[{i}]")))
                .collect::<Result<_>>()?,
        ),
        Json::Object(map) => {
            let mut table = Table::new();
            for (key, item) in map {
                let child = from_json(item, &format!("{path}.{key}"))?;
                table.insert(key, child);
            }
            ValueKind::Table(table)
        }
    };
    Ok(Value::new(kind))
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self.kind() {
            ValueKind::Boolean(b) => serializer.serialize_bool(*b),
            ValueKind::Integer(n) => serializer.serialize_i64(*n),
            ValueKind::Float(x) => serializer.serialize_f64(*x),
            ValueKind::String(s) => serializer.serialize_str(s),
            ValueKind::LocalDate(d) => serializer.collect_str(d),
            ValueKind::LocalTime(t) => serializer.collect_str(t),
            ValueKind::LocalDateTime(dt) => {
                serializer.collect_str(&dt.format("%Y-%m-%dT%H:%M:%S%.f"))
            }
            ValueKind::OffsetDateTime(dt) => serializer.serialize_str(&dt.to_rfc3339()),
            ValueKind::Array(items) => serializer.collect_seq(items),
            ValueKind::Table(table) => table.serialize(serializer),
        }
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Render a node as JSON.
pub fn to_json(value: &Value) -> Result<Json> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueType;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn numbers_split_into_integer_and_float() {
        let node = Value::try_from(json!([1, 1.5, u64::MAX])).unwrap();
        let types: Vec<ValueType> = node
            .as_array()
            .unwrap()
            .iter()
            .map(Value::value_type)
            .collect();
        assert_eq!(
            types,
            vec![ValueType::Integer, ValueType::Float, ValueType::Float]
        );
    }

    #[test]
    fn null_is_rejected_with_its_path() {
        let err = Value::try_from(json!({"a": [1, null]})).unwrap_err();
        match err {
            GetError::JsonNull { path } => assert_eq!(path, "$.a[1]"),
            other => panic!("expected JsonNull, got {other:?}"),
        }
    }

    #[test]
    fn strings_are_not_reinterpreted() {
        let node = Value::try_from(json!("1979-05-27")).unwrap();
        assert_eq!(node.value_type(), ValueType::String);
    }

    #[test]
    fn table_order_survives_the_roundtrip() {
        let input = json!({"z": 1, "a": {"m": true, "b": "x"}});
        let node = Value::try_from(input.clone()).unwrap();
        assert_eq!(
            serde_json::to_string(&to_json(&node).unwrap()).unwrap(),
            serde_json::to_string(&input).unwrap()
        );
    }

    #[test]
    fn dates_serialize_as_text() {
        let node = Value::from(NaiveDate::from_ymd_opt(1979, 5, 27).unwrap());
        assert_eq!(to_json(&node).unwrap(), json!("1979-05-27"));
    }
}
