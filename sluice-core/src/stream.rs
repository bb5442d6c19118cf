//! Lazy element-by-element validation.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::{Step, Type};
use crate::value::Value;
use either::Either;

/// Validates a sequence one pull at a time.
///
/// Unlike [`Array`](crate::Array), a stream never aggregates: each
/// pull of [`results`](Stream::results) applies the element type to
/// the next input element and yields its [`Outcome`], halts included.
/// The iterator is bounded by the input and not restartable; the
/// consumer decides whether an element failure stops the drain.
#[derive(Debug, Clone)]
pub struct Stream {
    element: Type,
}

impl Stream {
    /// Builds a stream of `element`.
    #[must_use]
    pub fn new(element: Type) -> Self {
        Self { element }
    }

    /// Consumes `value`, yielding one [`Outcome`] per element. A
    /// non-sequence input yields a single halt.
    pub fn results(&self, value: Value) -> impl Iterator<Item = Outcome> + '_ {
        match value {
            Value::Array(items) => Either::Right(
                items
                    .into_iter()
                    .map(move |item| self.element.call(Outcome::wrap(item))),
            ),
            other => Either::Left(std::iter::once(
                Outcome::wrap(other).halt("Must be an Array"),
            )),
        }
    }
}

impl Step for Stream {
    fn call(&self, outcome: Outcome) -> Outcome {
        if outcome.value().as_array().is_some() {
            outcome
        } else {
            outcome.halt("Must be an Array")
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Stream)
            .attr("type", "Stream")
            .child(self.element.ast())
    }
}

impl From<Stream> for Type {
    fn from(stream: Stream) -> Self {
        Type::new(stream)
    }
}
