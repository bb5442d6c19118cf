//! Uniformly-typed mappings.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::{Step, Type};
use crate::value::Value;

/// Validates every entry of a mapping against a key type and a value
/// type.
///
/// Entries are checked lazily and the first failure halts, so a large
/// input stops at the first offending entry. On success the input
/// passes through unchanged.
#[derive(Debug, Clone)]
pub struct HashMap {
    key: Type,
    value: Type,
}

impl HashMap {
    /// Builds a mapping of `key` to `value` types.
    #[must_use]
    pub fn new(key: Type, value: Type) -> Self {
        Self { key, value }
    }
}

impl Step for HashMap {
    fn call(&self, outcome: Outcome) -> Outcome {
        let Some(entries) = outcome.value().as_object() else {
            return outcome.halt("Must be a Hash");
        };
        let mut failure = None;
        for (name, value) in entries {
            let key = Value::from(name.as_str());
            if let Outcome::Halt { errors, .. } = self.key.call(Outcome::wrap(key.clone())) {
                failure = Some(format!("key {key} {errors}"));
                break;
            }
            if let Outcome::Halt { errors, .. } = self.value.call(Outcome::wrap(value.clone())) {
                failure = Some(format!("value {value} {errors}"));
                break;
            }
        }
        match failure {
            Some(message) => outcome.halt(message),
            None => outcome,
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::HashMap)
            .attr("type", "Hash")
            .child(self.key.ast())
            .child(self.value.ast())
    }
}

impl From<HashMap> for Type {
    fn from(map: HashMap) -> Self {
        Type::new(map)
    }
}
