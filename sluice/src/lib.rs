//! Composable data validation, coercion and transformation.
//!
//! The facade crate: re-exports the engine from `sluice-core`, JSON
//! Schema generation from `sluice-json-schema`, and adds the
//! [`Schema`] builder sugar.
//!
//! ```
//! use sluice::{schema, types, ToJsonSchema, Value};
//!
//! let user = schema! {
//!     "title" => types::string().default("Mr"),
//!     "name" => types::string(),
//!     "age?" => types::lax::integer(),
//! };
//!
//! let parsed = user
//!     .parse(Value::from(serde_json::json!({"name": "Ismael", "age": "42"})))
//!     .unwrap();
//! assert_eq!(
//!     serde_json::Value::from(parsed),
//!     serde_json::json!({"title": "Mr", "name": "Ismael", "age": 42}),
//! );
//!
//! let _doc = user.json_schema();
//! ```

#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub use sluice_core::{
    defer, register, schema, types, Applicability, Array, BuildError, Errors, HashSchema, Key,
    Kind, Matcher, Metadata, MetadataVisitor, Node, Outcome, Pipeline, RuleDef, Step, Stream, Tag,
    TaggedHash, Tuple, Type, TypeError, Value, Visitor,
};

pub use sluice_json_schema::{JsonSchemaVisitor, ToJsonSchema, SCHEMA_URI};

mod schema;
pub use schema::Schema;
