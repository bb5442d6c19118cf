//! Core step algebra and execution engine.
//!
//! Small *steps* (predicates, coercions, transforms, static values)
//! compose through algebraic operators (`>>`, `|`, negation, deferral)
//! into larger *types* that validate, coerce and reshape dynamic
//! input, producing either a typed [`Value`] or a structured error
//! tree. Every step also describes itself as a shallow AST [`Node`],
//! which visitors walk to compute metadata and to generate JSON
//! Schema.
//!
//! ```
//! use sluice_core::{schema, types, Value};
//!
//! let user = schema! {
//!     "name" => types::string(),
//!     "age?" => types::lax::integer(),
//! };
//! let outcome = user.resolve(Value::from(serde_json::json!({
//!     "name": "Ismael",
//!     "age": "42",
//! })));
//! assert!(outcome.is_valid());
//! ```

#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::result_large_err,
    clippy::large_enum_variant,
    clippy::enum_glob_use,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::needless_pass_by_value,
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::single_match_else,
    clippy::map_unwrap_or,
    clippy::return_self_not_must_use
)]
#![cfg_attr(test, allow(clippy::too_many_lines))]

pub mod value;
pub use value::{Kind, Value};

pub mod outcome;
pub use outcome::{Errors, Outcome};

pub mod error;
pub use error::{BuildError, TypeError};

pub mod ast;
pub use ast::{Node, Tag, Visitor};

pub mod step;
pub use step::{defer, Matcher, Pipeline, Step, Type};

pub mod array;
pub use array::Array;

pub mod tuple;
pub use tuple::Tuple;

pub mod stream;
pub use stream::Stream;

pub mod hash;
pub use hash::{HashSchema, Key};

pub mod hash_map;

pub mod tagged_hash;
pub use tagged_hash::TaggedHash;

pub mod rules;
pub use rules::{register, Applicability, RuleDef};

pub mod metadata;
pub use metadata::{Metadata, MetadataVisitor};

pub mod number;

pub mod types;
