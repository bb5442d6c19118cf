//! A thin builder over hash schemas with lifecycle hooks.
//!
//! Sugar only: everything a [`Schema`] does reduces to a
//! [`HashSchema`] inside a [`Pipeline`]. `before` hooks see the raw
//! input outcome ahead of field validation, `after` hooks see the
//! projected output; either may halt, which short-circuits the rest.

use sluice_core::ast::{Node, Tag};
use sluice_core::hash::HashSchema;
use sluice_core::step::{Pipeline, Step, Type};
use sluice_core::Outcome;
use std::fmt;
use std::sync::Arc;

type HookFn = Arc<dyn Fn(Outcome) -> Outcome + Send + Sync>;

/// Builds a hash schema with optional `before`/`after` hooks.
#[derive(Default)]
pub struct Schema {
    fields: Vec<(String, Type)>,
    before: Vec<HookFn>,
    after: Vec<HookFn>,
}

impl Schema {
    /// Builds a schema through the builder callback, freezing it into
    /// a [`Type`].
    pub fn build(f: impl FnOnce(&mut Schema)) -> Type {
        let mut builder = Schema::default();
        f(&mut builder);
        builder.finish()
    }

    /// Declares a field; a trailing `?` on `decl` marks it optional.
    pub fn field(&mut self, decl: &str, ty: impl Into<Type>) -> &mut Self {
        self.fields.push((decl.to_string(), ty.into()));
        self
    }

    /// Registers a hook over the raw input, ahead of field validation.
    pub fn before(&mut self, f: impl Fn(Outcome) -> Outcome + Send + Sync + 'static) -> &mut Self {
        self.before.push(Arc::new(f));
        self
    }

    /// Registers a hook over the projected output.
    pub fn after(&mut self, f: impl Fn(Outcome) -> Outcome + Send + Sync + 'static) -> &mut Self {
        self.after.push(Arc::new(f));
        self
    }

    fn finish(self) -> Type {
        let hash = HashSchema::build(
            self.fields
                .iter()
                .map(|(decl, ty)| (decl.as_str(), ty.clone()))
                .collect(),
        );
        if self.before.is_empty() && self.after.is_empty() {
            return hash.to_type();
        }
        let (before, after) = (self.before, self.after);
        Pipeline::build(move |p| {
            for hook in before {
                p.step(Type::new(Hook { f: hook }));
            }
            p.step(hash.to_type());
            for hook in after {
                p.step(Type::new(Hook { f: hook }));
            }
        })
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("fields", &self.fields.len())
            .field("before", &self.before.len())
            .field("after", &self.after.len())
            .finish()
    }
}

struct Hook {
    f: HookFn,
}

impl Step for Hook {
    fn call(&self, outcome: Outcome) -> Outcome {
        (self.f)(outcome)
    }

    fn ast(&self) -> Node {
        Node::new(Tag::Step)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Hook")
    }
}
