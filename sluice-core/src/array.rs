//! Arrays of a uniform element type.

use crate::ast::{Node, Tag};
use crate::outcome::{Errors, Outcome};
use crate::step::{Step, Type};
use crate::value::Value;
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Applies an element type to every item of a sequence.
///
/// Halts with index-keyed errors when any element halts; the halt
/// value is the original sequence. The `concurrent` variant fans
/// element evaluations out to the rayon pool, worth it only when the
/// per-element work dominates dispatch cost. Element evaluations are
/// pure, so output order always matches input order, and a panicking
/// worker surfaces as a halt at that index.
#[derive(Debug, Clone)]
pub struct Array {
    element: Type,
    concurrent: bool,
}

impl Array {
    /// Builds an array of `element`.
    #[must_use]
    pub fn new(element: Type) -> Self {
        Self {
            element,
            concurrent: false,
        }
    }

    /// Evaluates elements on the worker pool.
    #[must_use]
    pub fn concurrent(mut self) -> Self {
        self.concurrent = true;
        self
    }

    fn run(&self, items: &[Value]) -> Vec<Outcome> {
        if self.concurrent {
            tracing::trace!(len = items.len(), "dispatching concurrent array batch");
            items
                .par_iter()
                .map(|item| {
                    catch_unwind(AssertUnwindSafe(|| {
                        self.element.call(Outcome::wrap(item.clone()))
                    }))
                    .unwrap_or_else(|payload| Outcome::Halt {
                        value: item.clone(),
                        errors: Errors::message(panic_message(payload.as_ref())),
                    })
                })
                .collect()
        } else {
            items
                .iter()
                .map(|item| self.element.call(Outcome::wrap(item.clone())))
                .collect()
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    let detail = payload
        .downcast_ref::<&str>()
        .map(ToString::to_string)
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    format!("element evaluation panicked: {detail}")
}

impl Step for Array {
    fn call(&self, outcome: Outcome) -> Outcome {
        let Some(items) = outcome.value().as_array() else {
            return outcome.halt("Must be an Array");
        };
        let results = self.run(items);
        let mut errors = BTreeMap::new();
        let mut output = Vec::with_capacity(results.len());
        for (index, result) in results.into_iter().enumerate() {
            match result {
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
        Node::new(Tag::Array)
            .attr("type", "Array")
            .child(self.element.ast())
    }
}

impl From<Array> for Type {
    fn from(array: Array) -> Self {
        Type::new(array)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;
    use serde_json::json;

    #[test]
    fn test_maps_elements() {
        let numbers = types::array(types::lax::integer());
        let outcome = numbers.resolve(Value::from(json!([1, "2", 3.0])));
        assert!(outcome.is_valid());
        assert_eq!(outcome.value(), &Value::from(json!([1, 2, 3])));
    }

    #[test]
    fn test_collects_errors_by_index() {
        let numbers = types::array(types::integer());
        let outcome = numbers.resolve(Value::from(json!([1, "x", 3, false])));
        let Some(Errors::Indexed(by_index)) = outcome.errors() else {
            panic!("expected indexed errors, got {outcome:?}");
        };
        assert_eq!(by_index.len(), 2);
        assert!(by_index.contains_key(&1));
        assert!(by_index.contains_key(&3));
        // the halt keeps the original sequence
        assert_eq!(outcome.value(), &Value::from(json!([1, "x", 3, false])));
    }

    #[test]
    fn test_rejects_non_sequences() {
        let numbers = types::array(types::integer());
        assert!(numbers.resolve("nope").is_halt());
    }

    #[test]
    fn test_concurrent_preserves_order() {
        let upcase = types::string().transform(crate::value::Kind::String, |v| {
            Value::from(v.as_str().unwrap_or_default().to_uppercase())
        });
        let letters: Type = Array::new(upcase).concurrent().into();
        let input = Value::from(json!(["a", "b", "c", "d", "e", "f", "g", "h"]));
        let outcome = letters.resolve(input);
        assert_eq!(
            outcome.value(),
            &Value::from(json!(["A", "B", "C", "D", "E", "F", "G", "H"]))
        );
    }

    #[test]
    fn test_concurrent_panic_becomes_halt() {
        let explosive = types::any().transform(crate::value::Kind::Integer, |v| {
            if v == &Value::Int(2) {
                panic!("boom");
            }
            v.clone()
        });
        let array: Type = Array::new(explosive).concurrent().into();
        let outcome = array.resolve(Value::from(json!([1, 2, 3])));
        let Some(Errors::Indexed(by_index)) = outcome.errors() else {
            panic!("expected indexed errors, got {outcome:?}");
        };
        assert_eq!(by_index.len(), 1);
        assert!(by_index[&1].to_string().contains("boom"));
    }
}
