//! The [`Step`] contract and the [`Type`] handle.
//!
//! Everything in the engine satisfies a single contract: consume an
//! [`Outcome`], produce an [`Outcome`], and describe itself as an AST
//! [`Node`]. [`Type`] wraps a step behind an [`Arc`], freezing it;
//! every operator returns a new `Type`, so published types are
//! immutable and freely shared across threads.

use crate::ast::{Node, Tag};
use crate::error::TypeError;
use crate::metadata::MetadataVisitor;
use crate::outcome::{Errors, Outcome};
use crate::value::{Kind, Value};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

pub mod and;
pub mod any;
pub mod boolean;
pub mod default;
pub mod deferred;
pub mod fun;
pub mod interface;
pub mod match_;
pub mod meta;
pub mod not;
pub mod nothing;
pub mod or;
pub mod pipeline;
pub mod static_;
pub mod value_;

pub use and::And;
pub use any::Any;
pub use boolean::Boolean;
pub use default::DefaultStep;
pub use deferred::{defer, Deferred};
pub use fun::{Build, Check, Coerce, Transform};
pub use interface::Interface;
pub use match_::{Match, Matcher};
pub use meta::Meta;
pub use not::Not;
pub use nothing::Nothing;
pub use or::Or;
pub use pipeline::Pipeline;
pub use static_::Static;
pub use value_::ValueEq;

/// A single validation / transformation step.
///
/// Implementations must be pure with respect to the outer computation:
/// they carry no per-call state, and calling them concurrently from
/// multiple threads is safe.
pub trait Step: fmt::Debug + Send + Sync {
    /// Applies this step to an outcome.
    fn call(&self, outcome: Outcome) -> Outcome;

    /// This step's shallow AST node.
    fn ast(&self) -> Node;
}

/// A frozen, shareable handle to a [`Step`].
///
/// Cloning is cheap (an `Arc` bump). Operators never mutate; they
/// compose new types around the existing ones.
#[derive(Clone)]
pub struct Type {
    step: Arc<dyn Step>,
    name: Option<Arc<str>>,
}

impl Type {
    /// Freezes a step into a `Type`.
    pub fn new(step: impl Step + 'static) -> Self {
        Self {
            step: Arc::new(step),
            name: None,
        }
    }

    /// Assigns a stable display name. Display-only; the underlying
    /// step is unchanged.
    #[must_use]
    pub fn named(mut self, name: impl AsRef<str>) -> Self {
        self.name = Some(Arc::from(name.as_ref()));
        self
    }

    /// The display name: the assigned one, or a label derived from the
    /// AST.
    #[must_use]
    pub fn name(&self) -> String {
        self.name
            .as_deref()
            .map_or_else(|| label(&self.ast()), ToString::to_string)
    }

    /// Applies the underlying step.
    #[must_use]
    pub fn call(&self, outcome: Outcome) -> Outcome {
        self.step.call(outcome)
    }

    /// Wraps `value` and applies the step. Never fails; inspect the
    /// returned [`Outcome`].
    #[must_use]
    pub fn resolve(&self, value: impl Into<Value>) -> Outcome {
        self.call(Outcome::wrap(value))
    }

    /// Resolves and unwraps, surfacing a halt as a [`TypeError`]
    /// carrying the structured errors.
    pub fn parse(&self, value: impl Into<Value>) -> Result<Value, TypeError> {
        match self.resolve(value) {
            Outcome::Valid(value) => Ok(value),
            Outcome::Halt { value, errors } => Err(TypeError { errors, value }),
        }
    }

    /// The step's AST.
    #[must_use]
    pub fn ast(&self) -> Node {
        self.step.ast()
    }

    /// Merged metadata, computed from the AST.
    #[must_use]
    pub fn metadata(&self) -> IndexMap<String, Value> {
        MetadataVisitor.visit_node(&self.ast())
    }

    /// Sequence: `self` then `other`, short-circuiting on halt.
    /// Also available as `a >> b`.
    #[must_use]
    pub fn and(self, other: Type) -> Type {
        Type::new(And::new(self, other))
    }

    /// Union: `self`, or on halt `other`, aggregating both errors.
    /// Also available as `a | b`.
    #[must_use]
    pub fn or(self, other: Type) -> Type {
        Type::new(Or::new(self, other))
    }

    /// Inverts success. Also available as `!a`.
    #[must_use]
    pub fn negate(self) -> Type {
        Type::new(Not::new(self, None))
    }

    /// Inverts success with a custom halt message.
    #[must_use]
    pub fn negate_with(self, error: impl Into<String>) -> Type {
        Type::new(Not::new(self, Some(error.into())))
    }

    /// On `Undefined` input yields `fallback`; otherwise delegates to
    /// `self`. Desugars to `(Nothing >> Static(fallback)) | self`.
    #[must_use]
    pub fn default(self, fallback: impl Into<Value>) -> Type {
        Type::new(DefaultStep::new(self, fallback.into()))
    }

    /// Accepts `Null` in addition to whatever `self` accepts.
    #[must_use]
    pub fn nullable(self) -> Type {
        crate::types::null() | self
    }

    /// Alias for [`nullable`](Type::nullable).
    #[must_use]
    pub fn optional(self) -> Type {
        self.nullable()
    }

    /// Halts on blank input (`Undefined`, `Null`, empty sized values),
    /// then delegates.
    #[must_use]
    pub fn present(self) -> Type {
        crate::types::present() >> self
    }

    /// Unconditional mapping to `target`, recorded in metadata.
    pub fn transform<F>(self, target: Kind, f: F) -> Type
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self >> Type::new(Transform::new(target, f))
    }

    /// Predicate on the value: unchanged when it holds, halt with
    /// `error` when it does not.
    pub fn check<F>(self, error: impl Into<String>, f: F) -> Type
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self >> Type::new(Check::new(error.into(), f))
    }

    /// Applies a factory function, recording the produced type name.
    pub fn build<F>(self, target: impl Into<String>, f: F) -> Type
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self >> Type::new(Build::new(Tag::Build, target.into(), f))
    }

    /// Like [`build`](Type::build) under the `constructor` AST tag.
    pub fn construct<F>(self, target: impl Into<String>, f: F) -> Type
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self >> Type::new(Build::new(Tag::Constructor, target.into(), f))
    }

    /// If `matcher` matches the value, applies `f`; otherwise halts
    /// with a coercion failure.
    pub fn coerce<F>(self, matcher: Matcher, f: F) -> Type
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        self >> Type::new(Coerce::new(matcher, f))
    }

    /// Sequence with an exact-equality match.
    #[must_use]
    pub fn value(self, expected: impl Into<Value>) -> Type {
        self >> Type::new(ValueEq::new(expected.into()))
    }

    /// Attaches metadata attributes via a no-op step.
    #[must_use]
    pub fn meta<K, V>(self, pairs: impl IntoIterator<Item = (K, V)>) -> Type
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self >> Type::new(Meta::new(pairs))
    }

    /// Wraps such that any `Valid` becomes a `Halt` with `error`.
    #[must_use]
    pub fn halt(self, error: impl Into<String>) -> Type {
        self >> Type::new(AlwaysHalt {
            error: error.into(),
        })
    }

    /// Overrides the AST this type reports, leaving behavior intact.
    #[must_use]
    pub fn with_ast(self, node: Node) -> Type {
        Type::new(AstOverride { inner: self, node })
    }
}

impl Step for Type {
    fn call(&self, outcome: Outcome) -> Outcome {
        self.step.call(outcome)
    }

    fn ast(&self) -> Node {
        self.step.ast()
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Type").field("name", &self.name()).finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::ops::Shr for Type {
    type Output = Type;

    fn shr(self, rhs: Type) -> Type {
        self.and(rhs)
    }
}

impl std::ops::BitOr for Type {
    type Output = Type;

    fn bitor(self, rhs: Type) -> Type {
        self.or(rhs)
    }
}

impl std::ops::Not for Type {
    type Output = Type;

    fn not(self) -> Type {
        self.negate()
    }
}

/// Turns any `Valid` into a `Halt`.
#[derive(Debug, Clone)]
struct AlwaysHalt {
    error: String,
}

impl Step for AlwaysHalt {
    fn call(&self, outcome: Outcome) -> Outcome {
        match outcome {
            Outcome::Valid(value) => Outcome::Halt {
                value,
                errors: Errors::message(self.error.as_str()),
            },
            halted => halted,
        }
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Step)
    }
}

/// Reports an explicit AST in place of the wrapped type's own.
#[derive(Debug, Clone)]
struct AstOverride {
    inner: Type,
    node: Node,
}

impl Step for AstOverride {
    fn call(&self, outcome: Outcome) -> Outcome {
        self.inner.call(outcome)
    }

    fn ast(&self) -> Node {
        self.node.clone()
    }
}

/// Derives a display label from an AST.
#[must_use]
pub fn label(node: &Node) -> String {
    match node.tag {
        Tag::And => match node.children.as_slice() {
            [l, r] => format!("({} >> {})", label(l), label(r)),
            _ => "and".to_string(),
        },
        Tag::Or => match node.children.as_slice() {
            [l, r] => format!("({} | {})", label(l), label(r)),
            _ => "or".to_string(),
        },
        Tag::Not => node
            .children
            .first()
            .map_or_else(|| "Not".to_string(), |c| format!("Not({})", label(c))),
        Tag::Match | Tag::Transform => node
            .attrs
            .get("type")
            .map_or_else(|| node.tag.to_string(), ToString::to_string),
        Tag::Value | Tag::Static => node
            .attrs
            .get("value")
            .map_or_else(|| node.tag.to_string(), |v| format!("{}[{v}]", node.tag)),
        Tag::Array | Tag::Stream => node.children.first().map_or_else(
            || node.tag.to_string(),
            |c| format!("{}[{}]", node.tag, label(c)),
        ),
        tag => tag.to_string(),
    }
}
