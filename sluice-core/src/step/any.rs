//! The identity step.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::Step;

/// Passes every outcome through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl Step for Any {
    fn call(&self, outcome: Outcome) -> Outcome {
        outcome
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Any)
    }
}
