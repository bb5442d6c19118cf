//! Fixed-arity heterogeneous sequences.

use crate::ast::{Node, Tag};
use crate::outcome::{Errors, Outcome};
use crate::step::{Step, Type};
use crate::value::Value;
use std::collections::BTreeMap;

/// Applies the i-th type to the i-th element of a sequence of exactly
/// matching length.
#[derive(Debug, Clone)]
pub struct Tuple {
    types: Vec<Type>,
}

impl Tuple {
    /// Builds a tuple of positional types.
    #[must_use]
    pub fn new(types: impl IntoIterator<Item = Type>) -> Self {
        Self {
            types: types.into_iter().collect(),
        }
    }
}

impl Step for Tuple {
    fn call(&self, outcome: Outcome) -> Outcome {
        let Some(items) = outcome.value().as_array() else {
            return outcome.halt("Must be an Array");
        };
        if items.len() != self.types.len() {
            return outcome.halt(format!("Must be an Array of size {}", self.types.len()));
        }
        let mut errors = BTreeMap::new();
        let mut output = Vec::with_capacity(items.len());
        for (index, (ty, item)) in self.types.iter().zip(items).enumerate() {
            match ty.call(Outcome::wrap(item.clone())) {
                Outcome::Valid(value) => output.push(value),
                Outcome::Halt { errors: e, .. } => {
                    errors.insert(index, e);
                }
            }
        }
        if errors.is_empty() {
            outcome.valid(Value::Array(output))
        } else {
            outcome.halt(Errors::Indexed(errors))
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Tuple)
            .attr("type", "Tuple")
            .children(self.types.iter().map(Type::ast))
    }
}

impl From<Tuple> for Type {
    fn from(tuple: Tuple) -> Self {
        Type::new(tuple)
    }
}
