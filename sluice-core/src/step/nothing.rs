//! The step matching only the `Undefined` sentinel.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::Step;

/// Valid only when the value is `Undefined`; the building block of
/// [`default`](crate::Type::default).
#[derive(Debug, Clone, Copy, Default)]
pub struct Nothing;

impl Step for Nothing {
    fn call(&self, outcome: Outcome) -> Outcome {
        if outcome.value().is_undefined() {
            outcome
        } else {
            outcome.halt("Must be Undefined")
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Undefined)
    }
}
