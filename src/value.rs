//! Cell values and rows.
//!
//! A row is a plain mapping from field name to [`CellValue`]. Rows are owned
//! by the caller; the engine only ever reads them and derives index views.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One record of the table's dataset.
pub type Row = HashMap<String, CellValue>;

/// Dynamically typed cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<CellValue>),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[CellValue]> {
        match self {
            CellValue::List(v) => Some(v),
            _ => None,
        }
    }

    /// Numeric projection used for ordering; booleans count as 0 and 1.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Int(v) => Some(*v as f64),
            CellValue::Float(v) => Some(*v),
            CellValue::Bool(v) => Some(if *v { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    /// Text form of the value as shown in a cell, `None` for null.
    ///
    /// Integral floats print without a fractional part and lists join their
    /// elements with commas, so `10.0` and `10` both read as `"10"`.
    pub fn display_string(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Bool(v) => write!(f, "{}", v),
            CellValue::Int(v) => write!(f, "{}", v),
            CellValue::Float(v) => {
                if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 {
                    write!(f, "{}", *v as i64)
                } else {
                    write!(f, "{}", v)
                }
            }
            CellValue::String(v) => f.write_str(v),
            CellValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::String(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::String(v)
    }
}

impl<T: Into<CellValue>> From<Vec<T>> for CellValue {
    fn from(v: Vec<T>) -> Self {
        CellValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for CellValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value;
        match v {
            Value::Null => CellValue::Null,
            Value::Bool(b) => CellValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => CellValue::Int(i),
                None => CellValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => CellValue::String(s),
            Value::Array(items) => CellValue::List(items.into_iter().map(CellValue::from).collect()),
            // Nested objects are carried as their JSON text
            obj @ Value::Object(_) => CellValue::String(obj.to_string()),
        }
    }
}

/// Stable identity of a row: the stringified value of the key field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowKey(String);

impl RowKey {
    pub fn new(key: impl Into<String>) -> Self {
        RowKey(key.into())
    }

    /// Key of `row` under `key_field`. Rows without the field get an empty key.
    pub fn of(row: &Row, key_field: &str) -> Self {
        RowKey(
            row.get(key_field)
                .and_then(CellValue::display_string)
                .unwrap_or_default(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowKey {
    fn from(v: &str) -> Self {
        RowKey(v.to_string())
    }
}

impl From<i64> for RowKey {
    fn from(v: i64) -> Self {
        RowKey(v.to_string())
    }
}

/// Build a row from `(field, value)` pairs.
pub fn make_row<I, K, V>(fields: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<CellValue>,
{
    fields
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Parse a JSON array of objects into rows.
///
/// Cells go through `From<serde_json::Value>`, so nested objects are kept as
/// their JSON text instead of failing the parse.
pub fn rows_from_json(json: &str) -> crate::Result<Vec<Row>> {
    let raw: Vec<HashMap<String, serde_json::Value>> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|fields| fields.into_iter().map(|(k, v)| (k, CellValue::from(v))).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_string() {
        assert_eq!(CellValue::Int(10).display_string().as_deref(), Some("10"));
        assert_eq!(CellValue::Float(10.0).display_string().as_deref(), Some("10"));
        assert_eq!(CellValue::Float(2.5).display_string().as_deref(), Some("2.5"));
        assert_eq!(CellValue::Bool(true).display_string().as_deref(), Some("true"));
        assert_eq!(CellValue::Null.display_string(), None);
        assert_eq!(
            CellValue::from(vec!["a", "b"]).display_string().as_deref(),
            Some("a,b")
        );
    }

    #[test]
    fn test_as_number() {
        assert_eq!(CellValue::Bool(true).as_number(), Some(1.0));
        assert_eq!(CellValue::Bool(false).as_number(), Some(0.0));
        assert_eq!(CellValue::Int(3).as_number(), Some(3.0));
        assert_eq!(CellValue::from("3").as_number(), None);
    }

    #[test]
    fn test_rows_from_json() {
        let rows = rows_from_json(
            r#"[{"id": 1, "name": "b", "price": 10.5, "tags": ["x", "y"], "note": null}]"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.get("id"), Some(&CellValue::Int(1)));
        assert_eq!(row.get("price"), Some(&CellValue::Float(10.5)));
        assert_eq!(row.get("tags").unwrap().as_list().map(|l| l.len()), Some(2));
        assert!(row.get("note").unwrap().is_null());
    }

    #[test]
    fn test_rows_from_json_nested_objects() {
        let rows = rows_from_json(
            r#"[{"id": 1, "owner": {"name": "ann"}, "parts": [{"n": 1}, 2]}]"#,
        )
        .unwrap();
        let row = &rows[0];
        assert_eq!(row["owner"], CellValue::from(r#"{"name":"ann"}"#));
        let parts = row["parts"].as_list().unwrap();
        assert_eq!(parts[0].as_str(), Some(r#"{"n":1}"#));
        assert_eq!(parts[1], CellValue::Int(2));
    }

    #[test]
    fn test_rows_from_json_rejects_non_array() {
        assert!(rows_from_json(r#"{"id": 1}"#).is_err());
    }

    #[test]
    fn test_row_key() {
        let row = make_row([("id", CellValue::Int(7)), ("name", "x".into())]);
        assert_eq!(RowKey::of(&row, "id"), RowKey::from("7"));
        assert_eq!(RowKey::of(&row, "missing"), RowKey::from(""));
    }

    #[test]
    fn test_from_json_value() {
        let v: CellValue = serde_json::json!({"a": 1}).into();
        assert_eq!(v.as_str(), Some(r#"{"a":1}"#));
        let v: CellValue = serde_json::json!(1.25).into();
        assert_eq!(v.as_f64(), Some(1.25));
    }
}
