//! The constant step.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::Step;
use crate::value::Value;

/// Replaces whatever value comes in with a fixed one; never halts.
#[derive(Debug, Clone)]
pub struct Static {
    value: Value,
}

impl Static {
    /// Builds a constant step.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl Step for Static {
    fn call(&self, outcome: Outcome) -> Outcome {
        outcome.valid(self.value.clone())
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Static)
            .attr("type", self.value.kind().to_string())
            .attr("value", self.value.clone())
    }
}
