//! The shallow AST every step yields.
//!
//! A [`Node`] is `(tag, attrs, children)`; visitors walk it to compute
//! merged metadata and to emit JSON Schema. Steps emit one level and
//! delegate to their children's `ast()`, except [`Deferred`], which
//! emits a leaf [`Tag::Any`] so traversals of recursive types stay
//! finite.
//!
//! [`Deferred`]: crate::step::Deferred

use crate::value::Value;
use indexmap::IndexMap;

/// The node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Tag {
    Any,
    Step,
    Pipeline,
    Hash,
    HashMap,
    Array,
    Stream,
    Tuple,
    TaggedHash,
    And,
    Or,
    Not,
    Value,
    Static,
    Undefined,
    Transform,
    Metadata,
    Policy,
    Match,
    Interface,
    Build,
    Constructor,
    Default,
    Boolean,
}

/// A shallow AST node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// The node kind.
    pub tag: Tag,
    /// Node attributes (e.g. `type`, `value`, `policy_name`).
    pub attrs: IndexMap<String, Value>,
    /// Child nodes, in evaluation order.
    pub children: Vec<Node>,
}

impl Node {
    /// Builds a bare node.
    #[must_use]
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Adds a child.
    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Adds children in order.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Depth-first search for the first node with `tag`, including self.
    #[must_use]
    pub fn find(&self, tag: Tag) -> Option<&Node> {
        if self.tag == tag {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(tag))
    }
}

/// An AST walker producing a value per node.
pub trait Visitor {
    /// The result of visiting a node.
    type Output;

    /// Visits `node`, dispatching on its tag.
    fn visit(&self, node: &Node) -> Self::Output;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_display_is_snake_case() {
        assert_eq!(Tag::TaggedHash.to_string(), "tagged_hash");
        assert_eq!(Tag::HashMap.to_string(), "hash_map");
        assert_eq!(Tag::Static.to_string(), "static");
    }

    #[test]
    fn test_find_is_depth_first() {
        let node = Node::new(Tag::And)
            .child(Node::new(Tag::Any))
            .child(Node::new(Tag::Static).attr("value", "t1"));
        let found = node.find(Tag::Static).unwrap();
        assert_eq!(found.attrs.get("value"), Some(&Value::from("t1")));
        assert!(node.find(Tag::Hash).is_none());
    }
}
