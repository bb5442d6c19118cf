//! Hash schemas: declared keys, projection, merging.

use crate::ast::{Node, Tag};
use crate::error::TypeError;
use crate::outcome::{Errors, Outcome};
use crate::step::{Static, Step, Type};
use crate::value::{Object, Value};
use indexmap::IndexMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A declared field: a name plus whether it may be absent.
///
/// Equality and hashing ignore `optional`, so `foo` and `foo?` refer
/// to the same slot across merges.
#[derive(Debug, Clone, Eq)]
pub struct Key {
    /// The field name.
    pub name: String,
    /// Whether the field may be absent from the input.
    pub optional: bool,
}

impl Key {
    /// Parses a declaration: a trailing `?` marks the key optional.
    #[must_use]
    pub fn parse(decl: &str) -> Self {
        match decl.strip_suffix('?') {
            Some(name) => Self {
                name: name.to_string(),
                optional: true,
            },
            None => Self {
                name: decl.to_string(),
                optional: false,
            },
        }
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Hash for Key {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, if self.optional { "?" } else { "" })
    }
}

/// A hash with declared, typed keys.
///
/// Output preserves declaration order and projects away undeclared
/// input keys. A schema with no declared keys is the "any hash": it
/// accepts any mapping and passes it through unchanged (the base of
/// tagged unions).
#[derive(Debug, Clone, Default)]
pub struct HashSchema {
    fields: Vec<(Key, Type)>,
}

impl HashSchema {
    /// The schema with no declared keys.
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Builds a schema from `(declaration, type)` pairs; see
    /// [`Key::parse`] for declarations. Prefer the [`schema!`] macro.
    ///
    /// [`schema!`]: macro@crate::schema
    #[must_use]
    pub fn build(fields: Vec<(&str, Type)>) -> Self {
        Self {
            fields: fields
                .into_iter()
                .map(|(decl, ty)| (Key::parse(decl), ty))
                .collect(),
        }
    }

    /// The declared keys, in order.
    #[must_use]
    pub fn keys(&self) -> Vec<&Key> {
        self.fields.iter().map(|(k, _)| k).collect()
    }

    /// The declared type of `name`, if any.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Type> {
        self.fields
            .iter()
            .find(|(k, _)| k.name == name)
            .map(|(_, ty)| ty)
    }

    /// Merge: the union of both key sets. The right schema wins on
    /// conflicting field types; a merged key stays optional only when
    /// it is optional on both sides. Also available as `s1 + s2`.
    #[must_use]
    pub fn merge(&self, other: &HashSchema) -> HashSchema {
        let mut fields = self.fields.clone();
        for (key, ty) in &other.fields {
            match fields.iter().position(|(k, _)| k == key) {
                Some(i) => {
                    let optional = fields[i].0.optional && key.optional;
                    fields[i] = (
                        Key {
                            name: key.name.clone(),
                            optional,
                        },
                        ty.clone(),
                    );
                }
                None => fields.push((key.clone(), ty.clone())),
            }
        }
        HashSchema { fields }
    }

    /// Intersection: only keys declared on both sides, typed by the
    /// right schema. Also available as `s1 & s2`.
    #[must_use]
    pub fn intersect(&self, other: &HashSchema) -> HashSchema {
        let fields = self
            .fields
            .iter()
            .filter_map(|(key, _)| {
                other
                    .fields
                    .iter()
                    .find(|(k, _)| k == key)
                    .map(|(k, ty)| (k.clone(), ty.clone()))
            })
            .collect();
        HashSchema { fields }
    }

    /// Builds a discriminated union over `variants`, dispatching on the
    /// literal value each variant declares at `key`; `self` runs first
    /// as the base. See [`TaggedHash`](crate::TaggedHash).
    pub fn tagged_by(
        &self,
        key: &str,
        variants: Vec<HashSchema>,
    ) -> Result<Type, crate::error::BuildError> {
        crate::tagged_hash::TaggedHash::new(self.clone(), key, variants).map(Type::new)
    }

    /// Freezes this schema into a [`Type`].
    #[must_use]
    pub fn to_type(&self) -> Type {
        Type::new(self.clone())
    }

    /// Wraps `value` and applies the schema.
    #[must_use]
    pub fn resolve(&self, value: impl Into<Value>) -> Outcome {
        self.call(Outcome::wrap(value))
    }

    /// Resolves and unwraps, surfacing a halt as a [`TypeError`].
    pub fn parse(&self, value: impl Into<Value>) -> Result<Value, TypeError> {
        match self.resolve(value) {
            Outcome::Valid(value) => Ok(value),
            Outcome::Halt { value, errors } => Err(TypeError { errors, value }),
        }
    }
}

impl Step for HashSchema {
    fn call(&self, outcome: Outcome) -> Outcome {
        let Some(input) = outcome.value().as_object() else {
            return outcome.halt("Must be a Hash");
        };
        if self.fields.is_empty() {
            return outcome;
        }
        let mut output = Object::new();
        let mut errors: IndexMap<String, Errors> = IndexMap::new();
        for (key, ty) in &self.fields {
            let provided = input.get(&key.name);
            let raw = provided.cloned().unwrap_or(Value::Undefined);
            match ty.call(Outcome::wrap(raw)) {
                Outcome::Valid(value) => {
                    if value.is_undefined() {
                        continue;
                    }
                    output.insert(key.name.clone(), value);
                }
                Outcome::Halt { errors: e, .. } => {
                    if key.optional && provided.is_none() {
                        continue;
                    }
                    errors.insert(key.name.clone(), e);
                }
            }
        }
        if errors.is_empty() {
            outcome.valid(Value::Object(output))
        } else {
            outcome.halt_with(Value::Object(output), Errors::Keyed(errors))
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Hash).attr("type", "Hash").children(
            self.fields.iter().map(|(key, ty)| {
                ty.ast()
                    .attr("name", key.name.as_str())
                    .attr("optional", key.optional)
            }),
        )
    }
}

impl std::ops::Add for HashSchema {
    type Output = HashSchema;

    fn add(self, rhs: HashSchema) -> HashSchema {
        self.merge(&rhs)
    }
}

impl std::ops::BitAnd for HashSchema {
    type Output = HashSchema;

    fn bitand(self, rhs: HashSchema) -> HashSchema {
        self.intersect(&rhs)
    }
}

impl std::ops::BitOr for HashSchema {
    type Output = Type;

    fn bitor(self, rhs: HashSchema) -> Type {
        self.to_type() | rhs.to_type()
    }
}

impl From<HashSchema> for Type {
    fn from(schema: HashSchema) -> Self {
        Type::new(schema)
    }
}

/// Anything that can sit in a schema's value position: a type, a
/// nested schema, or a literal (which desugars to [`Static`]).
pub trait IntoFieldType {
    /// Converts into the field's [`Type`].
    fn into_field_type(self) -> Type;
}

impl IntoFieldType for Type {
    fn into_field_type(self) -> Type {
        self
    }
}

impl IntoFieldType for HashSchema {
    fn into_field_type(self) -> Type {
        Type::new(self)
    }
}

impl IntoFieldType for crate::Array {
    fn into_field_type(self) -> Type {
        Type::new(self)
    }
}

macro_rules! literal_field {
    ($($ty:ty),*) => {
        $(impl IntoFieldType for $ty {
            fn into_field_type(self) -> Type {
                Type::new(Static::new(self))
            }
        })*
    };
}
literal_field!(&str, String, i64, i32, f64, bool);

/// Declares a [`HashSchema`]: `schema! { "name" => types::string(),
/// "age?" => types::integer() }`. Values may be types, nested schemas,
/// or literals.
#[macro_export]
macro_rules! schema {
    ($($key:literal => $value:expr),* $(,)?) => {
        $crate::hash::HashSchema::build(vec![
            $(($key, $crate::hash::IntoFieldType::into_field_type($value))),*
        ])
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;
    use serde_json::json;

    fn user() -> HashSchema {
        schema! {
            "name" => types::string(),
            "age?" => types::lax::integer(),
        }
    }

    #[test]
    fn test_projects_declared_keys() {
        let outcome = user().resolve(Value::from(json!({
            "name": "Ismael", "age": "42", "extra": true
        })));
        assert!(outcome.is_valid());
        assert_eq!(
            outcome.value(),
            &Value::from(json!({"name": "Ismael", "age": 42}))
        );
    }

    #[test]
    fn test_optional_absent_is_omitted() {
        let outcome = user().resolve(Value::from(json!({"name": "Joe"})));
        assert_eq!(outcome.value(), &Value::from(json!({"name": "Joe"})));
    }

    #[test]
    fn test_required_absent_is_an_error() {
        let outcome = user().resolve(Value::from(json!({"age": 42})));
        let Some(Errors::Keyed(by_key)) = outcome.errors() else {
            panic!("expected keyed errors, got {outcome:?}");
        };
        assert_eq!(by_key["name"].to_string(), "Must be a String");
        // the halt carries the partially built output
        assert_eq!(outcome.value(), &Value::from(json!({"age": 42})));
    }

    #[test]
    fn test_literals_desugar_to_static() {
        let stamped = schema! {
            "v" => 2i64,
            "name" => types::string(),
        };
        let outcome = stamped.resolve(Value::from(json!({"name": "a"})));
        assert_eq!(outcome.value(), &Value::from(json!({"v": 2, "name": "a"})));
    }

    #[test]
    fn test_any_hash_passes_through() {
        let outcome = HashSchema::any().resolve(Value::from(json!({"free": "form"})));
        assert_eq!(outcome.value(), &Value::from(json!({"free": "form"})));
        assert!(HashSchema::any().resolve(1).is_halt());
    }

    #[test]
    fn test_merge_right_wins() {
        let left = schema! { "a" => types::string(), "b?" => types::string() };
        let right = schema! { "b" => types::integer(), "c" => types::boolean() };
        let merged = left + right;
        let keys: Vec<String> = merged.keys().iter().map(ToString::to_string).collect();
        assert_eq!(keys, ["a", "b", "c"]);
        assert!(merged
            .resolve(Value::from(json!({"a": "x", "b": 2, "c": true})))
            .is_valid());
        // b became required: optional on the left only
        assert!(merged.resolve(Value::from(json!({"a": "x", "c": true}))).is_halt());
    }

    #[test]
    fn test_merge_optional_on_both_stays_optional() {
        let left = schema! { "b?" => types::string() };
        let right = schema! { "b?" => types::integer() };
        let merged = left + right;
        assert!(merged.resolve(Value::from(json!({}))).is_valid());
        assert!(merged.resolve(Value::from(json!({"b": 2}))).is_valid());
        assert!(merged.resolve(Value::from(json!({"b": "x"}))).is_halt());
    }

    #[test]
    fn test_intersect_keeps_common_keys_right_types() {
        let left = schema! { "a" => types::string(), "b" => types::string() };
        let right = schema! { "b" => types::integer(), "c" => types::boolean() };
        let both = left & right;
        let keys: Vec<String> = both.keys().iter().map(ToString::to_string).collect();
        assert_eq!(keys, ["b"]);
        assert_eq!(
            both.resolve(Value::from(json!({"a": "x", "b": 2}))).value(),
            &Value::from(json!({"b": 2}))
        );
    }

    #[test]
    fn test_union_of_schemas() {
        let either = schema! { "a" => types::string() } | schema! { "b" => types::integer() };
        assert!(either.resolve(Value::from(json!({"a": "x"}))).is_valid());
        assert!(either.resolve(Value::from(json!({"b": 2}))).is_valid());
        assert!(either.resolve(Value::from(json!({"c": true}))).is_halt());
    }

    #[test]
    fn test_nested_errors_nest_by_name() {
        let outer = schema! {
            "friend" => schema! { "name" => types::string() },
        };
        let outcome = outer.resolve(Value::from(json!({"friend": {"name": 1}})));
        let json = serde_json::to_value(outcome.errors().unwrap()).unwrap();
        assert_eq!(json, json!({"friend": {"name": "Must be a String"}}));
    }
}
