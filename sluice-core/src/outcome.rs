//! [`Outcome`] is the carrier every step consumes and produces: the
//! current value plus, when halted, a structured [`Errors`] tree.

use crate::value::Value;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// A structured validation error.
///
/// Compound types aggregate at structural positions: arrays and tuples
/// key by index, hash schemas by field name, unions collect the ordered
/// list of branch errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Errors {
    /// A single message.
    Message(String),
    /// Ordered branch errors from a failed union.
    List(Vec<Errors>),
    /// Field-name keyed errors from a hash schema.
    Keyed(IndexMap<String, Errors>),
    /// Index-keyed errors from an array or tuple.
    Indexed(BTreeMap<usize, Errors>),
}

impl Errors {
    /// Builds a `Message` error.
    pub fn message(msg: impl Into<String>) -> Self {
        Errors::Message(msg.into())
    }

    /// Concatenates two errors into an ordered list, flattening lists
    /// so that `((a | b) | c)` reports three branches, not a tree.
    #[must_use]
    pub fn concat(self, other: Errors) -> Errors {
        let mut list = match self {
            Errors::List(items) => items,
            err => vec![err],
        };
        match other {
            Errors::List(items) => list.extend(items),
            err => list.push(err),
        }
        Errors::List(list)
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Errors::Message(msg) => write!(f, "{msg}"),
            Errors::List(items) => {
                for (i, err) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{err}")?;
                }
                Ok(())
            }
            Errors::Keyed(entries) => {
                write!(f, "{{")?;
                for (i, (key, err)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {err}")?;
                }
                write!(f, "}}")
            }
            Errors::Indexed(entries) => {
                write!(f, "{{")?;
                for (i, (index, err)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{index}: {err}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Errors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Errors::Message(msg) => serializer.serialize_str(msg),
            Errors::List(items) => items.serialize(serializer),
            Errors::Keyed(entries) => entries.serialize(serializer),
            Errors::Indexed(entries) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (index, err) in entries {
                    map.serialize_entry(&index.to_string(), err)?;
                }
                map.end()
            }
        }
    }
}

impl From<&str> for Errors {
    fn from(msg: &str) -> Self {
        Errors::Message(msg.to_string())
    }
}

impl From<String> for Errors {
    fn from(msg: String) -> Self {
        Errors::Message(msg)
    }
}

/// The result carried between steps.
///
/// A `Halt` is terminal for an `And` chain but may be recovered by an
/// `Or`. Both variants carry the current value; a halt keeps the
/// offending (possibly partially built) value for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Validation has succeeded so far.
    Valid(Value),
    /// Validation has halted.
    Halt {
        /// The value at the point of failure.
        value: Value,
        /// What went wrong.
        errors: Errors,
    },
}

impl Outcome {
    /// Wraps a value into a `Valid` outcome.
    pub fn wrap(value: impl Into<Value>) -> Self {
        Outcome::Valid(value.into())
    }

    /// Returns `true` for `Valid`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Outcome::Valid(_))
    }

    /// Returns `true` for `Halt`.
    #[must_use]
    pub fn is_halt(&self) -> bool {
        matches!(self, Outcome::Halt { .. })
    }

    /// The current value, regardless of variant.
    #[must_use]
    pub fn value(&self) -> &Value {
        match self {
            Outcome::Valid(value) | Outcome::Halt { value, .. } => value,
        }
    }

    /// Consumes the outcome, yielding its value.
    #[must_use]
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Valid(value) | Outcome::Halt { value, .. } => value,
        }
    }

    /// The errors, when halted.
    #[must_use]
    pub fn errors(&self) -> Option<&Errors> {
        match self {
            Outcome::Valid(_) => None,
            Outcome::Halt { errors, .. } => Some(errors),
        }
    }

    /// Transitions to `Valid` with a new value.
    #[must_use]
    pub fn valid(self, value: impl Into<Value>) -> Self {
        Outcome::Valid(value.into())
    }

    /// Transitions to `Halt`, keeping the current value.
    #[must_use]
    pub fn halt(self, errors: impl Into<Errors>) -> Self {
        Outcome::Halt {
            value: self.into_value(),
            errors: errors.into(),
        }
    }

    /// Transitions to `Halt` with a replacement value.
    #[must_use]
    pub fn halt_with(self, value: impl Into<Value>, errors: impl Into<Errors>) -> Self {
        Outcome::Halt {
            value: value.into(),
            errors: errors.into(),
        }
    }
}
