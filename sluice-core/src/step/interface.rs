//! Capability (duck-typing) checks.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::Step;
use crate::value::Value;

/// Valid iff the value supports every named operation, per the
/// capability table in [`Kind::capabilities`](crate::value::Kind).
#[derive(Debug, Clone)]
pub struct Interface {
    methods: Vec<String>,
}

impl Interface {
    /// Builds an interface check over `methods`.
    #[must_use]
    pub fn new<S: Into<String>>(methods: impl IntoIterator<Item = S>) -> Self {
        Self {
            methods: methods.into_iter().map(Into::into).collect(),
        }
    }
}

impl Step for Interface {
    fn call(&self, outcome: Outcome) -> Outcome {
        let value = outcome.value();
        let missing: Vec<&str> = self
            .methods
            .iter()
            .filter(|m| !value.responds_to(m))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            outcome
        } else {
            outcome.halt(format!("Must respond to {}", missing.join(", ")))
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Interface).attr(
            "methods",
            Value::Array(self.methods.iter().map(|m| Value::from(m.as_str())).collect()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_capabilities_required() {
        let sized = Interface::new(["size", "empty"]);
        assert!(sized.call(Outcome::wrap("hi")).is_valid());
        assert!(sized.call(Outcome::wrap(vec![1, 2])).is_valid());
        assert!(sized.call(Outcome::wrap(42)).is_halt());
    }

    #[test]
    fn test_missing_names_in_error() {
        let step = Interface::new(["keys"]);
        let halted = step.call(Outcome::wrap("hi"));
        assert_eq!(
            halted.errors().unwrap().to_string(),
            "Must respond to keys"
        );
    }
}
