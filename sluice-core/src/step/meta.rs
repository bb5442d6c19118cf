//! The no-op metadata carrier.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::Step;
use crate::value::Value;
use indexmap::IndexMap;

/// Passes outcomes through untouched; exists only to contribute
/// attributes to computed metadata.
#[derive(Debug, Clone, Default)]
pub struct Meta {
    attrs: IndexMap<String, Value>,
}

impl Meta {
    /// Builds a metadata step from key/value pairs.
    pub fn new<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            attrs: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl Step for Meta {
    fn call(&self, outcome: Outcome) -> Outcome {
        outcome
    }

    fn ast(&self) -> Node {
        let mut node = Node::new(Tag::Metadata);
        node.attrs = self.attrs.clone();
        node
    }
}
