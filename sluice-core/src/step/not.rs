//! Negation: invert a step's success.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::{label, Step, Type};

/// Inverts the wrapped type: a valid outcome halts, a halt becomes
/// valid again (with the original input value).
#[derive(Debug, Clone)]
pub struct Not {
    inner: Type,
    error: String,
}

impl Not {
    /// Wraps `inner`, halting with `error` (or a derived message) when
    /// it succeeds.
    #[must_use]
    pub fn new(inner: Type, error: Option<String>) -> Self {
        let error = error.unwrap_or_else(|| format!("Must not match {}", label(&inner.ast())));
        Self { inner, error }
    }
}

impl Step for Not {
    fn call(&self, outcome: Outcome) -> Outcome {
        let input = outcome.value().clone();
        match self.inner.call(outcome) {
            Outcome::Valid(value) => Outcome::Valid(value).halt(self.error.as_str()),
            Outcome::Halt { .. } => Outcome::Valid(input),
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Not).child(self.inner.ast())
    }
}
