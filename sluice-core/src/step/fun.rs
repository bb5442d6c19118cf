//! Function-applying steps: transforms, checks, factories, coercions.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::{Matcher, Step};
use crate::value::{Kind, Value};
use std::fmt;
use std::sync::Arc;

type MapFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;
type PredFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// An unconditional mapping, recording the target kind in metadata.
#[derive(Clone)]
pub struct Transform {
    target: Kind,
    f: MapFn,
}

impl Transform {
    /// Builds a transform towards `target`.
    pub fn new(target: Kind, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self {
            target,
            f: Arc::new(f),
        }
    }
}

impl Step for Transform {
    fn call(&self, outcome: Outcome) -> Outcome {
        let mapped = (self.f)(outcome.value());
        outcome.valid(mapped)
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Transform).attr("type", self.target.to_string())
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transform").field("target", &self.target).finish()
    }
}

/// A predicate gate: the value passes through unchanged or halts.
#[derive(Clone)]
pub struct Check {
    error: String,
    f: PredFn,
}

impl Check {
    /// Builds a check halting with `error`.
    pub fn new(error: String, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            error,
            f: Arc::new(f),
        }
    }
}

impl Step for Check {
    fn call(&self, outcome: Outcome) -> Outcome {
        if (self.f)(outcome.value()) {
            outcome
        } else {
            outcome.halt(self.error.as_str())
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Step)
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Check").field("error", &self.error).finish()
    }
}

/// A factory application, recording the produced type name. Emitted
/// under either the `build` or `constructor` AST tag.
#[derive(Clone)]
pub struct Build {
    tag: Tag,
    target: String,
    f: MapFn,
}

impl Build {
    /// Builds a factory step.
    pub fn new(
        tag: Tag,
        target: String,
        f: impl Fn(&Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        Self {
            tag,
            target,
            f: Arc::new(f),
        }
    }
}

impl Step for Build {
    fn call(&self, outcome: Outcome) -> Outcome {
        let built = (self.f)(outcome.value());
        outcome.valid(built)
    }

    fn ast(&self) -> Node {
        Node::new(self.tag).attr("type", self.target.as_str())
    }
}

impl fmt::Debug for Build {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Build").field("target", &self.target).finish()
    }
}

/// A guarded mapping: applies `f` when the matcher accepts the value,
/// halts with a coercion failure otherwise.
#[derive(Clone)]
pub struct Coerce {
    matcher: Matcher,
    f: MapFn,
}

impl Coerce {
    /// Builds a coercion step.
    pub fn new(matcher: Matcher, f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Self {
            matcher,
            f: Arc::new(f),
        }
    }
}

impl Step for Coerce {
    fn call(&self, outcome: Outcome) -> Outcome {
        if self.matcher.matches(outcome.value()) {
            let mapped = (self.f)(outcome.value());
            outcome.valid(mapped)
        } else {
            let error = format!("{} can't be coerced", outcome.value());
            outcome.halt(error)
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Step)
    }
}

impl fmt::Debug for Coerce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coerce").field("matcher", &self.matcher).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_maps() {
        let double = Transform::new(Kind::Integer, |v| {
            Value::Int(v.as_int().unwrap_or_default() * 2)
        });
        assert_eq!(double.call(Outcome::wrap(21)).value(), &Value::Int(42));
    }

    #[test]
    fn test_coerce_halts_outside_matcher() {
        let to_int = Coerce::new(Matcher::Kind(Kind::String), |v| {
            Value::Int(v.as_str().and_then(|s| s.parse().ok()).unwrap_or_default())
        });
        assert_eq!(to_int.call(Outcome::wrap("3")).value(), &Value::Int(3));
        let halted = to_int.call(Outcome::wrap(true));
        assert_eq!(
            halted.errors().unwrap().to_string(),
            "true can't be coerced"
        );
    }
}
