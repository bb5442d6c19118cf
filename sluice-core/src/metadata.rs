//! Metadata computed from the AST.

use crate::ast::{Node, Tag, Visitor};
use crate::value::Value;
use indexmap::IndexMap;

/// The merged attribute mapping of a type.
pub type Metadata = IndexMap<String, Value>;

/// Walks an AST, merging attributes leaf-to-root.
///
/// Sequences merge left-to-right with the right side winning on
/// conflicts (so a transform's target `type` shadows its source).
/// Unions flatten both sides' `type` into a list. Policies contribute
/// their `{rule_name: argument}` pair. Structural nodes (hash, array,
/// tuple, ...) contribute their own attributes without descending into
/// their children, which describe fields and elements, not the
/// compound itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataVisitor;

impl MetadataVisitor {
    /// Computes the metadata of `node`.
    #[must_use]
    pub fn visit_node(&self, node: &Node) -> Metadata {
        match node.tag {
            Tag::And | Tag::Pipeline => {
                let mut merged = Metadata::new();
                for child in &node.children {
                    merge(&mut merged, self.visit_node(child));
                }
                merged
            }
            Tag::Or => self.visit_union(node),
            Tag::Policy => {
                let mut merged = node
                    .children
                    .first()
                    .map(|child| self.visit_node(child))
                    .unwrap_or_default();
                if let (Some(Value::String(name)), Some(arg)) =
                    (node.attrs.get("policy_name"), node.attrs.get("arg"))
                {
                    merged.insert(name.clone(), arg.clone());
                }
                merged
            }
            Tag::Default => {
                let mut merged = node
                    .children
                    .first()
                    .map(|child| self.visit_node(child))
                    .unwrap_or_default();
                if let Some(fallback) = node.attrs.get("default") {
                    merged.insert("default".to_string(), fallback.clone());
                }
                merged
            }
            Tag::Not => node
                .children
                .first()
                .map(|child| self.visit_node(child))
                .unwrap_or_default(),
            _ => node.attrs.clone(),
        }
    }

    fn visit_union(&self, node: &Node) -> Metadata {
        let mut merged = Metadata::new();
        let mut types: Vec<Value> = Vec::new();
        for child in &node.children {
            let child_meta = self.visit_node(child);
            for (key, value) in child_meta {
                if key == "type" {
                    for t in flatten(value) {
                        if !types.contains(&t) {
                            types.push(t);
                        }
                    }
                } else {
                    merged.insert(key, value);
                }
            }
        }
        match types.len() {
            0 => {}
            1 => {
                merged.insert("type".to_string(), types.remove(0));
            }
            _ => {
                merged.insert("type".to_string(), Value::Array(types));
            }
        }
        merged
    }
}

fn merge(into: &mut Metadata, from: Metadata) {
    for (key, value) in from {
        into.insert(key, value);
    }
}

fn flatten(value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => vec![other],
    }
}

impl Visitor for MetadataVisitor {
    type Output = Metadata;

    fn visit(&self, node: &Node) -> Metadata {
        self.visit_node(node)
    }
}
