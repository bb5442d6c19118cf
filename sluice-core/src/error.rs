//! Construction-time and parse errors.
//!
//! Validation failures are not errors in this sense; they travel inside
//! [`Outcome::Halt`](crate::Outcome). The types here surface misuse of
//! the builders (synchronously, from the builder call) and the
//! [`parse`](crate::Type::parse) escape hatch.

use crate::outcome::Errors;
use crate::value::Value;
use thiserror::Error;

/// A type could not be constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// A rule was attached to a base type outside its compatibility set.
    #[error("rule \"{rule}\" does not support type {target}")]
    UnsupportedRule {
        /// The rule name.
        rule: String,
        /// The offending base type tag (or tags, for a union).
        target: String,
    },

    /// The rule name is not registered.
    #[error("unknown rule \"{0}\"")]
    UnknownRule(String),

    /// A tagged union was built with no variants.
    #[error("tagged unions require at least one variant")]
    EmptyTaggedUnion,

    /// A tagged-union variant does not declare the discriminator key.
    #[error("variant at position {index} does not declare key :{key}")]
    MissingTagKey {
        /// The discriminator key.
        key: String,
        /// The variant's position.
        index: usize,
    },

    /// A tagged-union variant's discriminator is not a static value.
    #[error("the type of :{key} in variant at position {index} must resolve to a static value")]
    NonStaticTag {
        /// The discriminator key.
        key: String,
        /// The variant's position.
        index: usize,
    },
}

/// A value failed to [`parse`](crate::Type::parse).
///
/// Carries the structured [`Errors`] payload alongside the offending
/// value; [`resolve`](crate::Type::resolve) never raises this.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{errors}")]
pub struct TypeError {
    /// The structured validation errors.
    pub errors: Errors,
    /// The value at the point of failure.
    pub value: Value,
}
