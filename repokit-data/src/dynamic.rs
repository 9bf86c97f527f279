//! Records whose shape is only known at runtime.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value as Json;

use crate::error::{DataError, DataResult};
use crate::record::{FieldDescriptor, FlatField, Record};
use crate::value::Value;

/// A condition record built from a JSON object.
///
/// Members keep their JSON order. Nested objects are flattened in place
/// (like embedded records), `null` members are dropped, numbers map to `I64`, `U64` or `F64`, and strings
/// that parse as RFC 3339 become timestamps. Arrays are rejected.
///
/// ```
/// use repokit_data::dynamic::DynamicRecord;
/// use repokit_data::filter::QueryMap;
///
/// let cond = DynamicRecord::from_json(&serde_json::json!({ "Age": 20 })).unwrap();
/// assert_eq!(QueryMap::from_record(&cond).len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DynamicRecord {
    fields: Vec<(String, Value)>,
}

impl DynamicRecord {
    pub fn from_json(json: &Json) -> DataResult<Self> {
        let Json::Object(map) = json else {
            return Err(DataError::Shape(format!(
                "expected a JSON object, got {}",
                json_type(json)
            )));
        };
        let mut fields = Vec::with_capacity(map.len());
        collect(map, &mut fields)?;
        Ok(Self { fields })
    }

    /// Serialize `value` to JSON and read it back as a record.
    pub fn from_serialize<S: Serialize + ?Sized>(value: &S) -> DataResult<Self> {
        let json = serde_json::to_value(value).map_err(|e| DataError::Shape(e.to_string()))?;
        Self::from_json(&json)
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn collect(map: &serde_json::Map<String, Json>, out: &mut Vec<(String, Value)>) -> DataResult<()> {
    for (key, member) in map {
        let value = match member {
            Json::Null => continue,
            Json::Object(inner) => {
                collect(inner, out)?;
                continue;
            }
            Json::Array(_) => {
                return Err(DataError::Shape(format!(
                    "member {key:?} is an array; only scalar members are supported"
                )));
            }
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::I64(i)
                } else if let Some(u) = n.as_u64() {
                    Value::U64(u)
                } else {
                    Value::F64(n.as_f64().unwrap_or_default())
                }
            }
            Json::String(s) => match DateTime::parse_from_rfc3339(s) {
                Ok(ts) => Value::Timestamp(ts.with_timezone(&Utc)),
                Err(_) => Value::Text(s.clone()),
            },
        };
        out.push((key.clone(), value));
    }
    Ok(())
}

fn json_type(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

impl Record for DynamicRecord {
    /// No static shape.
    fn describe(_out: &mut Vec<FieldDescriptor>) {}

    fn flatten_into(&self, out: &mut Vec<FlatField>) {
        for (name, value) in &self.fields {
            out.push(FlatField {
                descriptor: FieldDescriptor {
                    name: Cow::Owned(name.clone()),
                    column: None,
                    kind: value.kind(),
                    primary_key: false,
                },
                zero: value.is_zero(),
                value: value.clone(),
            });
        }
    }
}
