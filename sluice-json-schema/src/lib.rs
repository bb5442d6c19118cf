//! JSON Schema generation.
//!
//! [`JsonSchemaVisitor`] walks a type's AST and emits a draft-08
//! compatible schema object; [`ToJsonSchema`] adds the top-level
//! `$schema` marker for hash schemas, the usual document root.

#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::unused_self
)]

use serde_json::{json, Map, Value};
use sluice_core::{HashSchema, Node, Step, Tag};

/// The draft-08 meta-schema marker added at the document root.
pub const SCHEMA_URI: &str = "https://json-schema.org/draft-08/schema#";

/// Emits a JSON Schema object per AST node.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaVisitor;

impl JsonSchemaVisitor {
    /// Emits the schema object for `node`.
    #[must_use]
    pub fn visit_node(&self, node: &Node) -> Value {
        match node.tag {
            Tag::Boolean => json!({"type": "boolean"}),
            Tag::Match => self.visit_match(node),
            Tag::Value => self.visit_const(node, false),
            Tag::Static => self.visit_const(node, true),
            Tag::And | Tag::Pipeline => node
                .children
                .iter()
                .map(|child| self.visit_node(child))
                .fold(json!({}), deep_merge),
            Tag::Or => self.visit_union(node),
            Tag::Not => {
                let child = node.children.first().map(|c| self.visit_node(c));
                json!({"not": child.unwrap_or_else(|| json!({}))})
            }
            Tag::Default => {
                let mut schema = node
                    .children
                    .first()
                    .map(|c| self.visit_node(c))
                    .unwrap_or_else(|| json!({}));
                if let Some(fallback) = node.attrs.get("default") {
                    insert(&mut schema, "default", fallback.clone().into());
                }
                schema
            }
            Tag::Transform => {
                let mut schema = json!({});
                if let Some(ty) = type_attr(node) {
                    insert(&mut schema, "type", ty.into());
                }
                schema
            }
            Tag::Policy => self.visit_policy(node),
            Tag::Hash => self.visit_hash(node),
            Tag::HashMap => {
                let value_schema = node
                    .children
                    .get(1)
                    .map(|c| self.visit_node(c))
                    .unwrap_or_else(|| json!({}));
                json!({"type": "object", "patternProperties": {".*": value_schema}})
            }
            Tag::Array | Tag::Stream => {
                let items = node
                    .children
                    .first()
                    .map(|c| self.visit_node(c))
                    .unwrap_or_else(|| json!({}));
                json!({"type": "array", "items": items})
            }
            Tag::Tuple => {
                let prefix: Vec<Value> = node
                    .children
                    .iter()
                    .map(|c| self.visit_node(c))
                    .collect();
                json!({"type": "array", "prefixItems": prefix})
            }
            Tag::TaggedHash => self.visit_tagged(node),
            Tag::Any
            | Tag::Step
            | Tag::Undefined
            | Tag::Metadata
            | Tag::Interface
            | Tag::Build
            | Tag::Constructor => json!({}),
        }
    }

    fn visit_match(&self, node: &Node) -> Value {
        if let Some(value) = node.attrs.get("value") {
            return json!({"const": Value::from(value.clone())});
        }
        let mut schema = json!({});
        if let Some(ty) = type_attr(node) {
            insert(&mut schema, "type", ty.into());
        }
        if let Some(pattern) = node.attrs.get("pattern") {
            insert(&mut schema, "type", "string".into());
            insert(&mut schema, "pattern", pattern.clone().into());
        }
        if let Some(min) = node.attrs.get("min") {
            insert(&mut schema, "minimum", min.clone().into());
        }
        if let Some(max) = node.attrs.get("max") {
            insert(&mut schema, "maximum", max.clone().into());
        }
        schema
    }

    fn visit_const(&self, node: &Node, with_default: bool) -> Value {
        let value: Value = node
            .attrs
            .get("value")
            .cloned()
            .map(Into::into)
            .unwrap_or(Value::Null);
        if with_default {
            json!({"const": value.clone(), "default": value})
        } else {
            json!({"const": value})
        }
    }

    fn visit_union(&self, node: &Node) -> Value {
        let mut branches: Vec<Value> = Vec::new();
        for child in &node.children {
            let emitted = self.visit_node(child);
            // nested unions flatten into one anyOf
            match emitted {
                Value::Object(ref obj) if obj.len() == 1 && obj.contains_key("anyOf") => {
                    if let Some(Value::Array(nested)) = obj.get("anyOf") {
                        branches.extend(nested.clone());
                    }
                }
                other => branches.push(other),
            }
        }
        let defaulted: Vec<usize> = branches
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.get("default").map(|_| i))
            .collect();
        if branches.len() == 2 && defaulted.len() == 1 {
            // a defaulted branch collapses into its alternative
            let default = branches[defaulted[0]]
                .get("default")
                .cloned()
                .unwrap_or(Value::Null);
            let mut schema = branches.remove(1 - defaulted[0]);
            insert(&mut schema, "default", default);
            return schema;
        }
        json!({ "anyOf": branches })
    }

    fn visit_policy(&self, node: &Node) -> Value {
        let mut schema = node
            .children
            .first()
            .map(|c| self.visit_node(c))
            .unwrap_or_else(|| json!({}));
        let Some(name) = node.attrs.get("policy_name").and_then(|n| n.as_str()) else {
            return schema;
        };
        let arg: Value = node
            .attrs
            .get("arg")
            .cloned()
            .map(Into::into)
            .unwrap_or(Value::Null);
        match name {
            "included_in" => insert(&mut schema, "enum", arg),
            "eq" => insert(&mut schema, "const", arg),
            "gt" => insert(&mut schema, "exclusiveMinimum", arg),
            "gte" => insert(&mut schema, "minimum", arg),
            "lt" => insert(&mut schema, "exclusiveMaximum", arg),
            "lte" => insert(&mut schema, "maximum", arg),
            "match" => {
                if arg.is_string() {
                    insert(&mut schema, "pattern", arg);
                }
            }
            _ => {}
        }
        schema
    }

    fn visit_hash(&self, node: &Node) -> Value {
        if node.children.is_empty() {
            return json!({"type": "object"});
        }
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in &node.children {
            let Some(name) = field.attrs.get("name").and_then(|n| n.as_str()) else {
                continue;
            };
            let optional = field
                .attrs
                .get("optional")
                .map_or(false, |o| o == &sluice_core::Value::Bool(true));
            if !optional {
                required.push(Value::from(name));
            }
            properties.insert(name.to_string(), self.visit_node(field));
        }
        let mut schema = json!({"type": "object", "properties": properties});
        if !required.is_empty() {
            insert(&mut schema, "required", Value::Array(required));
        }
        schema
    }

    fn visit_tagged(&self, node: &Node) -> Value {
        let Some(key) = node.attrs.get("key").and_then(|k| k.as_str()) else {
            return json!({"type": "object"});
        };
        let mut literals = Vec::new();
        let mut branches = Vec::new();
        for variant in &node.children {
            let literal = variant
                .children
                .iter()
                .find(|field| {
                    field.attrs.get("name").and_then(|n| n.as_str()) == Some(key)
                })
                .and_then(|field| {
                    field
                        .find(Tag::Static)
                        .or_else(|| field.find(Tag::Value))
                        .and_then(|n| n.attrs.get("value").cloned())
                });
            let Some(literal) = literal else { continue };
            let literal: Value = literal.into();
            branches.push(json!({
                "if": {"properties": {key: {"const": literal}}},
                "then": self.visit_node(variant),
            }));
            literals.push(literal);
        }
        let tag_type = literals
            .first()
            .map_or("string", |l| json_type_name(l));
        json!({
            "type": "object",
            "properties": {key: {"type": tag_type, "enum": literals}},
            "required": [key],
            "allOf": branches,
        })
    }
}

impl sluice_core::Visitor for JsonSchemaVisitor {
    type Output = Value;

    fn visit(&self, node: &Node) -> Value {
        self.visit_node(node)
    }
}

fn type_attr(node: &Node) -> Option<&'static str> {
    let ty = node.attrs.get("type")?.as_str()?.to_string();
    match ty.as_str() {
        "String" => Some("string"),
        "Integer" => Some("integer"),
        "Decimal" => Some("number"),
        "Boolean" => Some("boolean"),
        "Null" => Some("null"),
        "Array" | "Tuple" | "Stream" => Some("array"),
        "Hash" => Some("object"),
        _ => None,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn insert(schema: &mut Value, key: &str, value: Value) {
    if let Value::Object(obj) = schema {
        obj.insert(key.to_string(), value);
    }
}

/// Merges `right` into `left`, recursing through objects; scalars and
/// arrays from the right win.
fn deep_merge(left: Value, right: Value) -> Value {
    match (left, right) {
        (Value::Object(mut l), Value::Object(r)) => {
            for (key, rv) in r {
                let merged = match l.remove(&key) {
                    Some(lv) => deep_merge(lv, rv),
                    None => rv,
                };
                l.insert(key, merged);
            }
            Value::Object(l)
        }
        (_, right) => right,
    }
}

/// Adds the `$schema` marker on top of a visited AST.
pub trait ToJsonSchema {
    /// The document-root JSON Schema of this type.
    fn json_schema(&self) -> Value;
}

impl ToJsonSchema for HashSchema {
    fn json_schema(&self) -> Value {
        let mut schema = JsonSchemaVisitor.visit_node(&Step::ast(self));
        insert(&mut schema, "$schema", Value::from(SCHEMA_URI));
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sluice_core::{schema, types, HashSchema};

    fn visit(ty: &sluice_core::Type) -> Value {
        JsonSchemaVisitor.visit_node(&ty.ast())
    }

    #[test]
    fn test_primitives() {
        assert_eq!(visit(&types::string()), json!({"type": "string"}));
        assert_eq!(visit(&types::integer()), json!({"type": "integer"}));
        assert_eq!(visit(&types::decimal()), json!({"type": "number"}));
        assert_eq!(visit(&types::boolean()), json!({"type": "boolean"}));
        assert_eq!(visit(&types::null()), json!({"type": "null"}));
        assert_eq!(visit(&types::any()), json!({}));
    }

    #[test]
    fn test_const_and_static() {
        assert_eq!(visit(&types::value("ok")), json!({"const": "ok"}));
        assert_eq!(
            visit(&types::static_value("Mr")),
            json!({"const": "Mr", "default": "Mr"})
        );
    }

    #[test]
    fn test_sequence_merges_right_type_wins() {
        let coerced = types::string().transform(sluice_core::Kind::Integer, |_| {
            sluice_core::Value::Int(0)
        });
        assert_eq!(visit(&coerced), json!({"type": "integer"}));
    }

    #[test]
    fn test_union() {
        let either = types::string() | types::integer();
        assert_eq!(
            visit(&either),
            json!({"anyOf": [{"type": "string"}, {"type": "integer"}]})
        );
    }

    #[test]
    fn test_defaulted_union_flattens() {
        let titled = types::string().default("Mr");
        assert_eq!(
            visit(&titled),
            json!({"type": "string", "default": "Mr"})
        );
    }

    #[test]
    fn test_hash_schema_document() {
        let user = schema! {
            "name" => types::string(),
            "age?" => types::integer(),
        };
        assert_eq!(
            user.json_schema(),
            json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "age": {"type": "integer"},
                },
                "required": ["name"],
                "$schema": SCHEMA_URI,
            })
        );
    }

    #[test]
    fn test_hash_map() {
        let counts = types::hash_map(types::string(), types::integer());
        assert_eq!(
            visit(&counts),
            json!({
                "type": "object",
                "patternProperties": {".*": {"type": "integer"}},
            })
        );
    }

    #[test]
    fn test_array_and_tuple() {
        assert_eq!(
            visit(&types::array(types::integer())),
            json!({"type": "array", "items": {"type": "integer"}})
        );
        assert_eq!(
            visit(&types::tuple([types::boolean(), types::string()])),
            json!({
                "type": "array",
                "prefixItems": [{"type": "boolean"}, {"type": "string"}],
            })
        );
    }

    #[test]
    fn test_enum_policy() {
        let status = types::string().options(vec!["on", "off"]).unwrap();
        assert_eq!(
            visit(&status),
            json!({"type": "string", "enum": ["on", "off"]})
        );
    }

    #[test]
    fn test_numeric_bound_policies() {
        let bounded = types::integer()
            .rule("gte", 1)
            .unwrap()
            .rule("lt", 100)
            .unwrap();
        assert_eq!(
            visit(&bounded),
            json!({"type": "integer", "minimum": 1, "exclusiveMaximum": 100})
        );
    }

    #[test]
    fn test_tagged_hash() {
        let tagged = HashSchema::any()
            .tagged_by(
                "kind",
                vec![
                    schema! { "kind" => "t1", "name" => types::string() },
                    schema! { "kind" => "t2", "size" => types::integer() },
                ],
            )
            .unwrap();
        let emitted = visit(&tagged);
        assert_eq!(
            emitted["properties"]["kind"],
            json!({"type": "string", "enum": ["t1", "t2"]})
        );
        assert_eq!(emitted["required"], json!(["kind"]));
        assert_eq!(
            emitted["allOf"][0]["if"],
            json!({"properties": {"kind": {"const": "t1"}}})
        );
        assert_eq!(
            emitted["allOf"][1]["then"]["properties"]["size"],
            json!({"type": "integer"})
        );
    }

    #[test]
    fn test_not() {
        assert_eq!(
            visit(&!types::string()),
            json!({"not": {"type": "string"}})
        );
    }

    #[test]
    fn test_deferred_stays_finite() {
        let node = sluice_core::defer(types::string).ast();
        assert_eq!(JsonSchemaVisitor.visit_node(&node), json!({}));
    }
}
