//! The boolean leaf step.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::Step;
use crate::value::Value;

/// Matches `true` or `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Boolean;

impl Step for Boolean {
    fn call(&self, outcome: Outcome) -> Outcome {
        match outcome.value() {
            Value::Bool(_) => outcome,
            _ => outcome.halt("Must be a Boolean"),
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Boolean).attr("type", "Boolean")
    }
}
