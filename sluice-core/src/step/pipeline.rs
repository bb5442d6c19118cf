//! Ordered step lists with around middleware.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::{Step, Type};
use std::fmt;
use std::sync::Arc;

/// Middleware wrapping a step invocation: receives the step and the
/// incoming outcome, and decides how (or whether) to run it.
pub type AroundFn = Arc<dyn Fn(&Type, Outcome) -> Outcome + Send + Sync>;

/// An ordered list of steps executed like an `And` chain, with
/// registered `around` middleware wrapping every subsequently added
/// step. Later-registered arounds wrap earlier ones, innermost first.
#[derive(Debug, Clone)]
pub struct Pipeline {
    steps: Vec<Type>,
    shapes: Vec<Node>,
}

impl Pipeline {
    /// Builds a pipeline through the builder callback.
    pub fn build(f: impl FnOnce(&mut PipelineBuilder)) -> Type {
        let mut builder = PipelineBuilder::default();
        f(&mut builder);
        tracing::trace!(steps = builder.steps.len(), "pipeline assembled");
        Type::new(Pipeline {
            steps: builder.steps,
            shapes: builder.shapes,
        })
    }
}

impl Step for Pipeline {
    fn call(&self, outcome: Outcome) -> Outcome {
        let mut outcome = outcome;
        for step in &self.steps {
            outcome = step.call(outcome);
            if outcome.is_halt() {
                return outcome;
            }
        }
        outcome
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Pipeline).children(self.shapes.iter().cloned())
    }
}

/// Accumulates steps and around middleware for [`Pipeline::build`].
#[derive(Default)]
pub struct PipelineBuilder {
    steps: Vec<Type>,
    shapes: Vec<Node>,
    arounds: Vec<AroundFn>,
}

impl PipelineBuilder {
    /// Appends a step, wrapped by the arounds registered so far.
    pub fn step(&mut self, step: Type) -> &mut Self {
        let shape = step.ast();
        let wrapped = self.arounds.iter().fold(step, |inner, around| {
            Type::new(Around {
                f: around.clone(),
                inner,
            })
        });
        self.steps.push(wrapped);
        self.shapes.push(shape);
        self
    }

    /// Registers middleware for every subsequently added step.
    pub fn around(
        &mut self,
        f: impl Fn(&Type, Outcome) -> Outcome + Send + Sync + 'static,
    ) -> &mut Self {
        self.arounds.push(Arc::new(f));
        self
    }
}

struct Around {
    f: AroundFn,
    inner: Type,
}

impl Step for Around {
    fn call(&self, outcome: Outcome) -> Outcome {
        (self.f)(&self.inner, outcome)
    }

    fn ast(&self) -> Node {
        self.inner.ast()
    }
}

impl fmt::Debug for Around {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Around").field("inner", &self.inner).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;
    use crate::value::{Kind, Value};

    #[test]
    fn test_runs_in_order_and_short_circuits() {
        let pipeline = Pipeline::build(|p| {
            p.step(types::lax::integer());
            p.step(types::integer().check("must be small", |v| {
                v.as_int().is_some_and(|i| i < 100)
            }));
        });
        assert_eq!(pipeline.resolve("42").value(), &Value::Int(42));
        assert!(pipeline.resolve("200").is_halt());
        assert!(pipeline.resolve(true).is_halt());
    }

    #[test]
    fn test_around_wraps_subsequent_steps() {
        let pipeline = Pipeline::build(|p| {
            // doubles whatever the wrapped step produces
            p.around(|step, outcome| match step.call(outcome) {
                Outcome::Valid(Value::Int(i)) => Outcome::Valid(Value::Int(i * 2)),
                other => other,
            });
            p.step(types::integer());
        });
        assert_eq!(pipeline.resolve(21).value(), &Value::Int(42));
    }

    #[test]
    fn test_around_does_not_wrap_earlier_steps() {
        let pipeline = Pipeline::build(|p| {
            p.step(types::integer());
            p.around(|step, outcome| step.call(outcome).halt("wrapped"));
            p.step(types::any());
        });
        let halted = pipeline.resolve(1);
        assert_eq!(halted.errors().unwrap().to_string(), "wrapped");
    }

    #[test]
    fn test_later_arounds_wrap_earlier_ones() {
        let pipeline = Pipeline::build(|p| {
            p.around(|step, outcome| match step.call(outcome) {
                Outcome::Valid(Value::String(s)) => Outcome::Valid(Value::from(format!("{s}a"))),
                other => other,
            });
            p.around(|step, outcome| match step.call(outcome) {
                Outcome::Valid(Value::String(s)) => Outcome::Valid(Value::from(format!("{s}b"))),
                other => other,
            });
            p.step(types::string());
        });
        // the first-registered around runs innermost
        assert_eq!(pipeline.resolve("x").value(), &Value::from("xab"));
    }

    #[test]
    fn test_ast_lists_children() {
        let pipeline = Pipeline::build(|p| {
            p.step(types::string());
            p.step(types::string().transform(Kind::String, |v| v.clone()));
        });
        let node = pipeline.ast();
        assert_eq!(node.tag, Tag::Pipeline);
        assert_eq!(node.children.len(), 2);
    }
}
