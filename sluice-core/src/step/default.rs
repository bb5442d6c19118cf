//! Default values for absent input.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::{Nothing, Static, Step, Type};
use crate::value::Value;

/// `(Nothing >> Static(fallback)) | child`: on `Undefined` input yields
/// the fallback, otherwise delegates. The AST wraps the child under a
/// `default` node instead of exposing the desugaring.
#[derive(Debug, Clone)]
pub struct DefaultStep {
    child: Type,
    fallback: Value,
    composed: Type,
}

impl DefaultStep {
    /// Wraps `child` with a fallback for `Undefined` input.
    #[must_use]
    pub fn new(child: Type, fallback: Value) -> Self {
        let composed =
            (Type::new(Nothing) >> Type::new(Static::new(fallback.clone()))) | child.clone();
        Self {
            child,
            fallback,
            composed,
        }
    }
}

impl Step for DefaultStep {
    fn call(&self, outcome: Outcome) -> Outcome {
        self.composed.call(outcome)
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Default)
            .attr("default", self.fallback.clone())
            .child(self.child.ast())
    }
}
