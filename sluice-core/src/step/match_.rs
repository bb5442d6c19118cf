//! Polymorphic predicate matching.
//!
//! [`Matcher`] is the explicit tagged union standing in for Ruby-style
//! case equality: kind membership, numeric/ordered range containment,
//! regex matching, callable invocation, and plain equality.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::Step;
use crate::value::{Kind, Value};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// What a [`Match`] step tests against.
#[derive(Clone)]
pub enum Matcher {
    /// Membership in a value kind.
    Kind(Kind),
    /// Containment in an inclusive range; either bound may be open.
    Range {
        /// Lower bound, if any.
        min: Option<Value>,
        /// Upper bound, if any.
        max: Option<Value>,
    },
    /// A regex over string values.
    Regex(Regex),
    /// Exact equality.
    Value(Value),
    /// An arbitrary predicate.
    Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
}

impl Matcher {
    /// Builds an inclusive range matcher.
    #[must_use]
    pub fn range(min: impl Into<Value>, max: impl Into<Value>) -> Self {
        Matcher::Range {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Compiles a regex matcher. Panics on an invalid pattern, so only
    /// call with literal patterns.
    #[must_use]
    pub fn regex(pattern: &str) -> Self {
        Matcher::Regex(Regex::new(pattern).expect("invalid regex pattern"))
    }

    /// Wraps a predicate function.
    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Matcher::Predicate(Arc::new(f))
    }

    /// Tests `value` against this matcher.
    #[must_use]
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Matcher::Kind(kind) => value.kind() == *kind,
            Matcher::Range { min, max } => {
                let above = min
                    .as_ref()
                    .map_or(true, |m| matches!(value.partial_cmp(m), Some(o) if o.is_ge()));
                let below = max
                    .as_ref()
                    .map_or(true, |m| matches!(value.partial_cmp(m), Some(o) if o.is_le()));
                above && below
            }
            Matcher::Regex(re) => value.as_str().is_some_and(|s| re.is_match(s)),
            Matcher::Value(expected) => value == expected,
            Matcher::Predicate(f) => f(value),
        }
    }
}

impl fmt::Display for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Matcher::Kind(kind) => write!(f, "{kind}"),
            Matcher::Range { min, max } => {
                if let Some(min) = min {
                    write!(f, "{min}")?;
                }
                write!(f, "..")?;
                if let Some(max) = max {
                    write!(f, "{max}")?;
                }
                Ok(())
            }
            Matcher::Regex(re) => write!(f, "/{}/", re.as_str()),
            Matcher::Value(value) => write!(f, "{value}"),
            Matcher::Predicate(_) => write!(f, "<predicate>"),
        }
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Matcher({self})")
    }
}

/// Halts unless the matcher accepts the value.
///
/// Kind matchers report a type mismatch (`"Must be a String"`); every
/// other matcher reports `"Must match <matcher>"`.
#[derive(Debug, Clone)]
pub struct Match {
    matcher: Matcher,
    error: String,
}

impl Match {
    /// Builds a match step.
    #[must_use]
    pub fn new(matcher: Matcher) -> Self {
        let error = match &matcher {
            Matcher::Kind(kind) => format!("Must be {} {kind}", kind.article()),
            other => format!("Must match {other}"),
        };
        Self { matcher, error }
    }
}

impl Step for Match {
    fn call(&self, outcome: Outcome) -> Outcome {
        if self.matcher.matches(outcome.value()) {
            outcome
        } else {
            outcome.halt(self.error.as_str())
        }
    }

    fn ast(&self) -> Node {
        let node = Node::new(Tag::Match);
        match &self.matcher {
            Matcher::Kind(kind) => node.attr("type", kind.to_string()),
            Matcher::Regex(re) => node
                .attr("type", Kind::String.to_string())
                .attr("pattern", re.as_str()),
            Matcher::Value(value) => node
                .attr("type", value.kind().to_string())
                .attr("value", value.clone()),
            Matcher::Range { min, max } => {
                let node = match min {
                    Some(min) => node.attr("min", min.clone()),
                    None => node,
                };
                match max {
                    Some(max) => node.attr("max", max.clone()),
                    None => node,
                }
            }
            Matcher::Predicate(_) => node,
        }
    }
}
