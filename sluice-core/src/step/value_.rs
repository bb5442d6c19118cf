//! Exact-equality matching.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::Step;
use crate::value::Value;

/// Halts unless the value equals the expected one.
#[derive(Debug, Clone)]
pub struct ValueEq {
    expected: Value,
}

impl ValueEq {
    /// Builds an exact match against `expected`.
    #[must_use]
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }
}

impl Step for ValueEq {
    fn call(&self, outcome: Outcome) -> Outcome {
        if outcome.value() == &self.expected {
            outcome
        } else {
            outcome.halt(format!("Must be equal to {}", self.expected))
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Value)
            .attr("type", self.expected.kind().to_string())
            .attr("value", self.expected.clone())
    }
}
