//! Named rules attached to base types.
//!
//! A rule is data: a predicate over `(value, argument)`, a message
//! formatter, and the set of base-type tags it applies to. The
//! registry is process-wide and read-mostly; built-ins install on
//! first touch and extensions register before types are published.

use crate::ast::{Node, Tag};
use crate::error::BuildError;
use crate::outcome::Outcome;
use crate::step::{Step, Type};
use crate::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

type Predicate = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;
type Formatter = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Which base-type tags a rule accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applicability {
    /// Any base type.
    Any,
    /// Only bases whose `type` metadata is one of these tags.
    Tags(&'static [&'static str]),
}

impl Applicability {
    fn accepts(self, tag: &str) -> bool {
        match self {
            Applicability::Any => true,
            Applicability::Tags(tags) => tags.contains(&tag),
        }
    }
}

/// A registered rule.
#[derive(Clone)]
pub struct RuleDef {
    name: String,
    applicable: Applicability,
    predicate: Predicate,
    message: Formatter,
}

impl RuleDef {
    /// Defines a rule.
    pub fn new(
        name: impl Into<String>,
        applicable: Applicability,
        predicate: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
        message: impl Fn(&Value) -> String + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            applicable,
            predicate: Arc::new(predicate),
            message: Arc::new(message),
        }
    }
}

impl fmt::Debug for RuleDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDef")
            .field("name", &self.name)
            .field("applicable", &self.applicable)
            .finish()
    }
}

static REGISTRY: Lazy<RwLock<HashMap<String, RuleDef>>> = Lazy::new(|| {
    let mut rules = HashMap::new();
    for rule in builtins() {
        rules.insert(rule.name.clone(), rule);
    }
    RwLock::new(rules)
});

/// Registers a rule, replacing any previous definition with the same
/// name. Expected to run during startup, before types are published.
pub fn register(rule: RuleDef) {
    tracing::debug!(name = %rule.name, "registering rule");
    REGISTRY
        .write()
        .expect("rule registry poisoned")
        .insert(rule.name.clone(), rule);
}

fn lookup(name: &str) -> Option<RuleDef> {
    REGISTRY
        .read()
        .expect("rule registry poisoned")
        .get(name)
        .cloned()
}

const ORDERED: &[&str] = &["Integer", "Decimal", "String", "Array"];
const SIZED: &[&str] = &["String", "Array", "Hash"];
const MATCHABLE: &[&str] = &["String", "Integer", "Decimal", "Array"];

fn compare(value: &Value, arg: &Value, accept: fn(std::cmp::Ordering) -> bool) -> bool {
    value.partial_cmp(arg).is_some_and(accept)
}

/// Tests `value` against `arg` interpreted as a pattern: a string
/// compiles to a regex over string values; a `[min, max]` pair (with
/// `null` as an open bound) is an inclusive range, compared against an
/// array's size and against any other value directly.
fn matches_pattern(value: &Value, arg: &Value) -> bool {
    match arg {
        Value::String(pattern) => {
            let Ok(re) = Regex::new(pattern) else {
                return false;
            };
            value.as_str().is_some_and(|s| re.is_match(s))
        }
        Value::Array(bounds) if bounds.len() == 2 => {
            let target = match value {
                Value::Array(items) => Value::from(items.len()),
                other => other.clone(),
            };
            in_bounds(&target, &bounds[0], &bounds[1])
        }
        other => value == other,
    }
}

fn in_bounds(value: &Value, min: &Value, max: &Value) -> bool {
    let above = min.is_null() || matches!(value.partial_cmp(min), Some(o) if o.is_ge());
    let below = max.is_null() || matches!(value.partial_cmp(max), Some(o) if o.is_le());
    above && below
}

fn size_matches(value: &Value, arg: &Value) -> bool {
    let Some(size) = value.size() else {
        return false;
    };
    let size = Value::from(size);
    match arg {
        Value::Array(bounds) if bounds.len() == 2 => in_bounds(&size, &bounds[0], &bounds[1]),
        other => &size == other,
    }
}

fn included(value: &Value, arg: &Value) -> bool {
    arg.as_array().is_some_and(|options| options.contains(value))
}

fn responds(value: &Value, arg: &Value) -> bool {
    match arg {
        Value::Array(names) => names
            .iter()
            .all(|n| n.as_str().is_some_and(|n| value.responds_to(n))),
        Value::String(name) => value.responds_to(name),
        _ => false,
    }
}

fn builtins() -> Vec<RuleDef> {
    use Applicability::{Any, Tags};
    vec![
        RuleDef::new("eq", Any, |v, a| v == a, |a| format!("must be equal to {a}")),
        RuleDef::new(
            "not_eq",
            Any,
            |v, a| v != a,
            |a| format!("must not be equal to {a}"),
        ),
        RuleDef::new(
            "gt",
            Tags(ORDERED),
            |v, a| compare(v, a, std::cmp::Ordering::is_gt),
            |a| format!("must be greater than {a}"),
        ),
        RuleDef::new(
            "gte",
            Tags(ORDERED),
            |v, a| compare(v, a, std::cmp::Ordering::is_ge),
            |a| format!("must be greater or equal to {a}"),
        ),
        RuleDef::new(
            "lt",
            Tags(ORDERED),
            |v, a| compare(v, a, std::cmp::Ordering::is_lt),
            |a| format!("must be less than {a}"),
        ),
        RuleDef::new(
            "lte",
            Tags(ORDERED),
            |v, a| compare(v, a, std::cmp::Ordering::is_le),
            |a| format!("must be less or equal to {a}"),
        ),
        RuleDef::new(
            "match",
            Tags(MATCHABLE),
            matches_pattern,
            |a| format!("must match {a}"),
        ),
        RuleDef::new(
            "included_in",
            Any,
            included,
            |a| format!("must be included in {a}"),
        ),
        RuleDef::new(
            "excluded_from",
            Any,
            |v, a| !included(v, a),
            |a| format!("must not be included in {a}"),
        ),
        RuleDef::new(
            "respond_to",
            Any,
            responds,
            |a| format!("must respond to {a}"),
        ),
        RuleDef::new(
            "size",
            Tags(SIZED),
            size_matches,
            |a| format!("must be of size {a}"),
        ),
    ]
}

/// A rule attached to a type: the inner type runs first, then the
/// predicate gates the value.
#[derive(Clone)]
pub struct Policy {
    inner: Type,
    name: String,
    arg: Value,
    predicate: Predicate,
    error: String,
}

impl fmt::Debug for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Policy")
            .field("name", &self.name)
            .field("arg", &self.arg)
            .finish()
    }
}

impl Step for Policy {
    fn call(&self, outcome: Outcome) -> Outcome {
        let outcome = self.inner.call(outcome);
        if outcome.is_halt() {
            return outcome;
        }
        if (self.predicate)(outcome.value(), &self.arg) {
            outcome
        } else {
            outcome.halt(self.error.as_str())
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Policy)
            .attr("policy_name", self.name.as_str())
            .attr("arg", self.arg.clone())
            .child(self.inner.ast())
    }
}

/// The base-type tags a type declares, read from its `type` metadata:
/// one tag for a plain base, several for a union, `Any` when untyped.
fn base_tags(ty: &Type) -> Vec<String> {
    match ty.metadata().get("type") {
        Some(Value::String(tag)) => vec![tag.clone()],
        Some(Value::Array(tags)) => tags
            .iter()
            .map(|t| t.as_str().unwrap_or("Any").to_string())
            .collect(),
        _ => vec!["Any".to_string()],
    }
}

impl Type {
    /// Attaches a named rule.
    ///
    /// Fails when the rule is unknown or when any base-type tag of
    /// `self` (every branch, for a union) is outside the rule's
    /// compatibility set.
    pub fn rule(self, name: &str, arg: impl Into<Value>) -> Result<Type, BuildError> {
        let rule = lookup(name).ok_or_else(|| BuildError::UnknownRule(name.to_string()))?;
        let tags = base_tags(&self);
        if let Some(bad) = tags.iter().find(|tag| !rule.applicable.accepts(tag)) {
            return Err(BuildError::UnsupportedRule {
                rule: name.to_string(),
                target: bad.clone(),
            });
        }
        let arg = arg.into();
        let error = (rule.message)(&arg);
        Ok(Type::new(Policy {
            inner: self,
            name: rule.name,
            arg,
            predicate: rule.predicate,
            error,
        }))
    }

    /// Restricts the value to an enumerated set; sugar for the
    /// `included_in` rule.
    pub fn options(self, values: impl Into<Value>) -> Result<Type, BuildError> {
        self.rule("included_in", values)
    }
}
