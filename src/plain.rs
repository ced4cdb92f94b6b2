//! Plain data produced by the codec.
//!
//! A [`Plain`] value is a tree: it owns its children and cannot contain cycles. It keeps the
//! per-field [`Visibility`] flags so the deserializer can carry them into a heap, and it
//! converts to JSON with the same rules a `JSON.stringify`-style consumer applies:
//!
//! - hidden fields are skipped;
//! - `undefined` and symbol fields are omitted from objects and become `null` in arrays;
//! - non-finite numbers become `null`;
//! - integral numbers are written without a fractional part.

use std::ops::Index;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::Result;
use crate::graph::Visibility;

/// Sentinel written in place of a reference back to an ancestor.
pub const CIRCULAR_SENTINEL: &str = "[Circular]";

static NULL: Plain = Plain::Null;

/// A self-contained plain value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Plain {
    /// The absent value.
    #[default]
    Undefined,
    /// Null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// A big integer.
    BigInt(i128),
    /// A string. Cycle sentinels and function placeholders are strings too.
    String(String),
    /// A symbol with an optional description.
    Symbol(Option<String>),
    /// An ordered sequence.
    Array(Vec<Plain>),
    /// A mapping with visibility flags.
    Object(PlainObject),
}

impl Plain {
    /// Returns true for `Plain::Object`.
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Returns true for `Plain::Array`.
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Returns true when this is the cycle sentinel.
    pub fn is_circular(&self) -> bool {
        self.as_str() == Some(CIRCULAR_SENTINEL)
    }

    /// Returns the string for `Plain::String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the object for `Plain::Object`.
    pub fn as_object(&self) -> Option<&PlainObject> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the items for `Plain::Array`.
    pub fn as_array(&self) -> Option<&[Plain]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Field lookup on objects (hidden fields included).
    pub fn get(&self, key: &str) -> Option<&Plain> {
        self.as_object().and_then(|o| o.get(key))
    }

    /// Converts to a `serde_json::Value` using the rules in the module docs.
    ///
    /// # Errors
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if `serde_json`
    /// rejects the value.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Renders compact JSON text.
    ///
    /// # Errors
    /// See [`Plain::to_json`].
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    fn omitted_from_objects(&self) -> bool {
        matches!(self, Self::Undefined | Self::Symbol(_))
    }
}

impl From<&serde_json::Value> for Plain {
    fn from(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(*b),
            serde_json::Value::Number(n) => number_from_json(n),
            serde_json::Value::String(s) => Self::String(s.clone()),
            serde_json::Value::Array(items) => Self::Array(items.iter().map(Self::from).collect()),
            serde_json::Value::Object(map) => {
                let mut object = PlainObject::new();
                for (key, value) in map {
                    object.assign(key.clone(), Self::from(value));
                }
                Self::Object(object)
            }
        }
    }
}

pub(crate) fn number_from_json(n: &serde_json::Number) -> Plain {
    if let Some(i) = n.as_i64() {
        Plain::Number(i as f64)
    } else if let Some(u) = n.as_u64() {
        Plain::Number(u as f64)
    } else {
        Plain::Number(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl PartialEq<&str> for Plain {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl Index<&str> for Plain {
    type Output = Plain;

    /// Returns `Plain::Null` for missing keys and non-objects, like `serde_json::Value`.
    fn index(&self, key: &str) -> &Plain {
        self.get(key).unwrap_or(&NULL)
    }
}

impl Index<usize> for Plain {
    type Output = Plain;

    fn index(&self, idx: usize) -> &Plain {
        self.as_array().and_then(|a| a.get(idx)).unwrap_or(&NULL)
    }
}

/// One field of a [`PlainObject`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlainField {
    /// Field name.
    pub key: String,
    /// Field value.
    pub value: Plain,
    /// Whether the field is enumerable.
    pub visibility: Visibility,
}

/// Ordered mapping with per-field visibility.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlainObject {
    fields: Vec<PlainField>,
}

impl PlainObject {
    /// Creates an empty object.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Looks up a field of any visibility.
    pub fn get(&self, key: &str) -> Option<&Plain> {
        self.field(key).map(|f| &f.value)
    }

    /// Looks up a field entry of any visibility.
    pub fn field(&self, key: &str) -> Option<&PlainField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Returns true when `key` exists (hidden or not).
    pub fn contains_key(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Plain assignment: an existing key keeps its position and visibility, a new key is
    /// appended as visible.
    pub fn assign(&mut self, key: impl Into<String>, value: Plain) {
        let key = key.into();
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(existing) => existing.value = value,
            None => self.fields.push(PlainField {
                key,
                value,
                visibility: Visibility::Visible,
            }),
        }
    }

    /// Defines a field with an explicit visibility. An existing key keeps its position.
    pub fn define(&mut self, key: impl Into<String>, value: Plain, visibility: Visibility) {
        let key = key.into();
        match self.fields.iter_mut().find(|f| f.key == key) {
            Some(existing) => {
                existing.value = value;
                existing.visibility = visibility;
            }
            None => self.fields.push(PlainField {
                key,
                value,
                visibility,
            }),
        }
    }

    /// Iterates over all fields in order.
    pub fn iter(&self) -> impl Iterator<Item = &PlainField> {
        self.fields.iter()
    }

    /// Names of the enumerable fields.
    pub fn keys(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.visibility.is_visible())
            .map(|f| f.key.as_str())
            .collect()
    }

    /// Number of fields, hidden ones included.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true when there are no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn emitted(&self) -> impl Iterator<Item = &PlainField> {
        self.fields
            .iter()
            .filter(|f| f.visibility.is_visible() && !f.value.omitted_from_objects())
    }
}

impl IntoIterator for PlainObject {
    type Item = PlainField;
    type IntoIter = std::vec::IntoIter<PlainField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for Plain {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Undefined | Self::Null | Self::Symbol(_) => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serialize_number(*n, serializer),
            Self::BigInt(i) => serializer.serialize_i128(*i),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(object) => object.serialize(serializer),
        }
    }
}

impl Serialize for PlainObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.emitted().count()))?;
        for field in self.emitted() {
            map.serialize_entry(&field.key, &field.value)?;
        }
        map.end()
    }
}

/// Largest integer a double represents exactly (2^53 - 1).
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn serialize_number<S: Serializer>(n: f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if !n.is_finite() {
        serializer.serialize_unit()
    } else if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        serializer.serialize_i64(n as i64)
    } else {
        serializer.serialize_f64(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_skips_hidden_and_undefined() -> Result<()> {
        let mut object = PlainObject::new();
        object.define("name", Plain::String("Error".into()), Visibility::Hidden);
        object.assign("missing", Plain::Undefined);
        object.assign("sym", Plain::Symbol(Some("s".into())));
        object.assign("code", Plain::String("E1".into()));

        assert_eq!(Plain::Object(object).to_json()?, json!({ "code": "E1" }));
        Ok(())
    }

    #[test]
    fn json_numbers_follow_stringify() -> Result<()> {
        let plain = Plain::Array(vec![
            Plain::Number(1.0),
            Plain::Number(1.5),
            Plain::Number(f64::NAN),
            Plain::Number(f64::INFINITY),
            Plain::Undefined,
        ]);
        assert_eq!(plain.to_json()?, json!([1, 1.5, null, null, null]));
        assert_eq!(plain.to_json_string()?, "[1,1.5,null,null,null]");
        Ok(())
    }

    #[test]
    fn index_is_lenient() {
        let plain = Plain::from(&json!({ "a": { "b": [10, "x"] } }));
        assert_eq!(plain["a"]["b"][1], "x");
        assert_eq!(plain["a"]["missing"], Plain::Null);
        assert_eq!(plain["a"]["b"][7], Plain::Null);
    }

    #[test]
    fn from_json_preserves_order() {
        let plain = Plain::from(&json!({ "z": 1, "a": 2, "m": 3 }));
        let keys = plain.as_object().map(PlainObject::keys).unwrap_or_default();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
