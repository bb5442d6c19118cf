//! Lazy references for recursive types.

use crate::ast::{Node, Tag};
use crate::outcome::Outcome;
use crate::step::{Step, Type};
use once_cell::sync::OnceCell;
use std::fmt;
use std::sync::Arc;

/// A thunk that resolves to a type on first call and memoizes it.
///
/// The thunk may close over the outer type, enabling recursion; the
/// referenced type's construction must complete before the first call.
/// The AST deliberately reports a leaf [`Tag::Any`] instead of
/// expanding the thunk, keeping traversals of recursive types finite.
pub struct Deferred {
    thunk: Arc<dyn Fn() -> Type + Send + Sync>,
    cell: OnceCell<Type>,
}

impl Deferred {
    /// Wraps a thunk.
    pub fn new(thunk: impl Fn() -> Type + Send + Sync + 'static) -> Self {
        Self {
            thunk: Arc::new(thunk),
            cell: OnceCell::new(),
        }
    }

    fn target(&self) -> &Type {
        self.cell.get_or_init(|| (self.thunk)())
    }
}

impl Step for Deferred {
    fn call(&self, outcome: Outcome) -> Outcome {
        self.target().call(outcome)
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Any)
    }
}

impl fmt::Debug for Deferred {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("resolved", &self.cell.get().is_some())
            .finish()
    }
}

/// Builds a deferred type from a thunk.
pub fn defer(thunk: impl Fn() -> Type + Send + Sync + 'static) -> Type {
    Type::new(Deferred::new(thunk))
}
