//! Flat field mapping shared by every instrument decoder.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Flat mapping from prefixed field name to decoded value.
///
/// Merging two maps uses [`Extend`], so the later map wins on an exact key
/// collision. Instrument prefixes keep collisions from happening in practice.
pub type FieldMap = BTreeMap<String, FieldValue>;

/// One decoded value.
///
/// `Number(NaN)` marks a field whose hex text could not be decoded; it
/// serializes as JSON `null`.
///
/// # Examples
/// ```
/// use xdata_core::FieldValue;
///
/// let value = FieldValue::from(Some(7i64));
/// assert_eq!(value.as_f64(), Some(7.0));
/// assert!(FieldValue::from(None::<i64>).as_f64().unwrap().is_nan());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(value) => Some(*value as f64),
            FieldValue::Number(value) => Some(*value),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<Option<i64>> for FieldValue {
    fn from(value: Option<i64>) -> Self {
        value.map_or(FieldValue::Number(f64::NAN), FieldValue::Integer)
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

/// Flattens a typed instrument record into prefixed fields.
pub trait XdataFields {
    fn write_fields(&self, out: &mut FieldMap);

    fn to_fields(&self) -> FieldMap {
        let mut out = FieldMap::new();
        self.write_fields(&mut out);
        out
    }
}

/// Insert helper used by the `write_fields` implementations.
pub(crate) fn put(out: &mut FieldMap, key: impl Into<String>, value: impl Into<FieldValue>) {
    out.insert(key.into(), value.into());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_serializes_as_null() {
        let mut map = FieldMap::new();
        put(&mut map, "cfh_battery", f64::NAN);
        let value = serde_json::to_value(&map).expect("json");
        assert!(value["cfh_battery"].is_null());
    }

    #[test]
    fn integers_stay_integers() {
        let value = serde_json::to_value(FieldValue::from(42i64)).expect("json");
        assert_eq!(value, serde_json::json!(42));
    }

    #[test]
    fn later_map_wins_on_extend() {
        let mut first = FieldMap::new();
        put(&mut first, "k", 1i64);
        let mut second = FieldMap::new();
        put(&mut second, "k", 2i64);
        first.extend(second);
        assert_eq!(first["k"], FieldValue::Integer(2));
    }
}
