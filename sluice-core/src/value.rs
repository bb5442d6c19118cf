//! The dynamic [`Value`] data model that steps consume and produce.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;

/// An ordered mapping of field names to [`Value`]s.
///
/// Insertion order is preserved, which is what keeps hash-schema output
/// keys in declaration order.
pub type Object = IndexMap<String, Value>;

/// A dynamic value.
///
/// `Undefined` is the sentinel for "no value provided" and is distinct
/// from `Null`; absent hash fields resolve to it, and only
/// [`Nothing`](crate::step::Nothing) matches it.
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// No value was provided.
    #[default]
    Undefined,
    /// An explicit null.
    Null,
    /// A boolean.
    Bool(bool),
    /// A 64-bit integer.
    Int(i64),
    /// A 64-bit float.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// An ordered sequence.
    Array(Vec<Value>),
    /// An ordered mapping.
    Object(Object),
}

impl Value {
    /// Returns the [`Kind`] of this value.
    #[must_use]
    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Int(_) => Kind::Integer,
            Value::Float(_) => Kind::Decimal,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Hash,
        }
    }

    /// Returns `true` if this value is the `Undefined` sentinel.
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns `true` if this value is `Null`.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the string slice if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns a float for either numeric variant.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the elements if this is an `Array`.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the mapping if this is an `Object`.
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Looks up `key` in an `Object`, yielding `Undefined` when the key
    /// is absent or the value is not an object.
    #[must_use]
    pub fn get(&self, key: &str) -> &Value {
        const UNDEFINED: &Value = &Value::Undefined;
        match self {
            Value::Object(o) => o.get(key).unwrap_or(UNDEFINED),
            _ => UNDEFINED,
        }
    }

    /// The number of entries for sized values (strings count characters).
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Array(a) => Some(a.len()),
            Value::Object(o) => Some(o.len()),
            _ => None,
        }
    }

    /// Returns `true` for the values [`Present`](crate::types::present)
    /// rejects: `Undefined`, `Null`, and empty sized values.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => true,
            _ => self.responds_to("empty") && self.size() == Some(0),
        }
    }

    /// Capability check: whether this value supports the named
    /// operation. Backs [`Interface`](crate::step::Interface) and the
    /// `respond_to` rule.
    #[must_use]
    pub fn responds_to(&self, name: &str) -> bool {
        self.kind().capabilities().contains(&name)
    }
}

/// The variant name of a [`Value`], used for type matching, rule
/// applicability and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
pub enum Kind {
    Undefined,
    Null,
    Boolean,
    Integer,
    Decimal,
    String,
    Array,
    Hash,
}

impl Kind {
    /// The operations values of this kind support.
    #[must_use]
    pub fn capabilities(self) -> &'static [&'static str] {
        match self {
            Kind::String => &["size", "empty", "chars", "concat"],
            Kind::Array => &["size", "empty", "each", "first", "last", "concat"],
            Kind::Hash => &["size", "empty", "each", "keys", "values"],
            Kind::Integer | Kind::Decimal => &["abs"],
            Kind::Undefined | Kind::Null | Kind::Boolean => &[],
        }
    }

    /// The indefinite article for error messages ("a String", "an Array").
    #[must_use]
    pub fn article(self) -> &'static str {
        match self {
            Kind::Integer | Kind::Array | Kind::Undefined => "an",
            _ => "a",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            // numbers compare across representations: 42 == 42.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            _ => false,
        }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::String(a), Value::String(b)) => a.partial_cmp(b),
            (Value::Array(a), Value::Array(b)) => a.partial_cmp(b),
            _ => {
                let (a, b) = (self.as_f64()?, other.as_f64()?);
                a.partial_cmp(&b)
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => write!(f, "Undefined"),
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Object(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k:?}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            // Undefined has no JSON form
            Value::Undefined | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(v) => serializer.serialize_f64(*v),
            Value::String(s) => serializer.serialize_str(s),
            Value::Array(a) => a.serialize(serializer),
            Value::Object(o) => o.serialize(serializer),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => Value::Array(a.into_iter().map(Into::into).collect()),
            serde_json::Value::Object(o) => {
                Value::Object(o.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Undefined | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::Number(i.into()),
            Value::Float(v) => serde_json::Number::from_f64(v)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Value::String(s) => serde_json::Value::String(s),
            Value::Array(a) => serde_json::Value::Array(a.into_iter().map(Into::into).collect()),
            Value::Object(o) => serde_json::Value::Object(
                o.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(value: Vec<T>) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize, T: Into<Value>> From<[T; N]> for Value {
    fn from(value: [T; N]) -> Self {
        Value::Array(value.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_round_trip() {
        let v: Value = json!({"name": "Ismael", "age": 42, "tags": ["a", "b"]}).into();
        let obj = v.as_object().unwrap();
        assert_eq!(obj.get("name"), Some(&Value::from("Ismael")));
        assert_eq!(obj.get("age"), Some(&Value::Int(42)));
        let back: serde_json::Value = v.clone().into();
        assert_eq!(back, json!({"name": "Ismael", "age": 42, "tags": ["a", "b"]}));
    }

    #[test]
    fn test_numeric_equality_crosses_variants() {
        assert_eq!(Value::Int(42), Value::Float(42.0));
        assert_ne!(Value::Int(42), Value::Float(42.5));
        assert_ne!(Value::Int(0), Value::Null);
    }

    #[test]
    fn test_undefined_is_not_null() {
        assert_ne!(Value::Undefined, Value::Null);
        assert!(Value::Undefined.is_undefined());
        assert!(!Value::Null.is_undefined());
    }

    #[test]
    fn test_get_absent_key_is_undefined() {
        let v: Value = json!({"a": 1}).into();
        assert_eq!(v.get("a"), &Value::Int(1));
        assert!(v.get("b").is_undefined());
        assert!(Value::Null.get("a").is_undefined());
    }

    #[test]
    fn test_blankness() {
        assert!(Value::Undefined.is_blank());
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(Value::Array(vec![]).is_blank());
        assert!(Value::Object(Object::new()).is_blank());
        assert!(!Value::from("x").is_blank());
        assert!(!Value::Int(0).is_blank());
        assert!(!Value::Bool(false).is_blank());
    }

    #[test]
    fn test_capabilities() {
        assert!(Value::from("hi").responds_to("size"));
        assert!(Value::Array(vec![]).responds_to("each"));
        assert!(!Value::Int(1).responds_to("size"));
        assert!(Value::from(json!({})).responds_to("keys"));
    }

    #[test]
    fn test_ordering() {
        assert!(Value::Int(1) < Value::Float(1.5));
        assert!(Value::from("a") < Value::from("b"));
        assert!(Value::Int(1).partial_cmp(&Value::from("a")).is_none());
    }

    #[test]
    fn test_display_inspection() {
        let v: Value = json!({"a": [1, "x"]}).into();
        assert_eq!(v.to_string(), r#"{"a": [1, "x"]}"#);
        assert_eq!(Value::Undefined.to_string(), "Undefined");
    }
}
