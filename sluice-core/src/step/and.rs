//! Sequence composition: left then right, short-circuiting on halt.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::{Step, Type};

/// `a >> b`: applies `a`; if the outcome is still valid, applies `b`.
/// A halt from `a` is sticky and is returned untouched.
#[derive(Debug, Clone)]
pub struct And {
    left: Type,
    right: Type,
}

impl And {
    /// Composes two types in sequence.
    #[must_use]
    pub fn new(left: Type, right: Type) -> Self {
        Self { left, right }
    }
}

impl Step for And {
    fn call(&self, outcome: Outcome) -> Outcome {
        match self.left.call(outcome) {
            valid @ Outcome::Valid(_) => self.right.call(valid),
            halted => halted,
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::And)
            .child(self.left.ast())
            .child(self.right.ast())
    }
}
