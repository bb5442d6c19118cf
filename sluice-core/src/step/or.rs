//! Union composition: try left, recover with right, aggregate errors.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::{Step, Type};

/// `a | b`: applies `a`; on halt, retries the original input against
/// `b`. When both halt, the errors concatenate into an ordered list
/// and the value reverts to the input.
#[derive(Debug, Clone)]
pub struct Or {
    left: Type,
    right: Type,
}

impl Or {
    /// Composes two types as alternatives.
    #[must_use]
    pub fn new(left: Type, right: Type) -> Self {
        Self { left, right }
    }
}

impl Step for Or {
    fn call(&self, outcome: Outcome) -> Outcome {
        let input = outcome.value().clone();
        match self.left.call(outcome) {
            valid @ Outcome::Valid(_) => valid,
            Outcome::Halt {
                errors: left_errors,
                ..
            } => match self.right.call(Outcome::Valid(input.clone())) {
                valid @ Outcome::Valid(_) => valid,
                Outcome::Halt {
                    errors: right_errors,
                    ..
                } => Outcome::Halt {
                    value: input,
                    errors: left_errors.concat(right_errors),
                },
            },
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Or)
            .child(self.left.ast())
            .child(self.right.ast())
    }
}
