//! Base type constructors.
//!
//! Everything here returns a frozen [`Type`] (or [`HashSchema`]) built
//! from the leaf steps; user code composes them with the operators.

use crate::array::Array;
use crate::hash::HashSchema;
use crate::hash_map::HashMap;
use crate::step::{
    Any, Boolean, Check, Interface, Match, Matcher, Nothing, Static, Type, ValueEq,
};
use crate::stream::Stream;
use crate::tuple::Tuple;
use crate::value::{Kind, Value};

/// The identity type: matches anything, changes nothing.
#[must_use]
pub fn any() -> Type {
    Type::new(Any).named("Any")
}

/// Matches only the `Undefined` sentinel.
#[must_use]
pub fn nothing() -> Type {
    Type::new(Nothing).named("Nothing")
}

/// Matches only `null`.
#[must_use]
pub fn null() -> Type {
    Type::new(Match::new(Matcher::Kind(Kind::Null))).named("Null")
}

/// Matches strings.
#[must_use]
pub fn string() -> Type {
    Type::new(Match::new(Matcher::Kind(Kind::String))).named("String")
}

/// Matches integers.
#[must_use]
pub fn integer() -> Type {
    Type::new(Match::new(Matcher::Kind(Kind::Integer))).named("Integer")
}

/// Matches decimals (floats).
#[must_use]
pub fn decimal() -> Type {
    Type::new(Match::new(Matcher::Kind(Kind::Decimal))).named("Decimal")
}

/// Matches any number.
#[must_use]
pub fn numeric() -> Type {
    (integer() | decimal()).named("Numeric")
}

/// Matches `true` or `false`.
#[must_use]
pub fn boolean() -> Type {
    Type::new(Boolean).named("Boolean")
}

/// Matches exactly `true`.
#[must_use]
pub fn true_() -> Type {
    Type::new(ValueEq::new(true)).named("True")
}

/// Matches exactly `false`.
#[must_use]
pub fn false_() -> Type {
    Type::new(ValueEq::new(false)).named("False")
}

/// Halts on blank values: `Undefined`, `null`, empty strings and empty
/// collections.
#[must_use]
pub fn present() -> Type {
    Type::new(Check::new("must be present".to_string(), |v: &Value| {
        !v.is_blank()
    }))
    .named("Present")
}

/// A constant: always yields `value`, whatever comes in.
#[must_use]
pub fn static_value(value: impl Into<Value>) -> Type {
    Type::new(Static::new(value))
}

/// An exact match against `value`.
#[must_use]
pub fn value(expected: impl Into<Value>) -> Type {
    Type::new(ValueEq::new(expected))
}

/// An arbitrary matcher; see [`Matcher`].
#[must_use]
pub fn match_(matcher: Matcher) -> Type {
    Type::new(Match::new(matcher))
}

/// A capability check; see [`Kind::capabilities`].
#[must_use]
pub fn interface<S: Into<String>>(methods: impl IntoIterator<Item = S>) -> Type {
    Type::new(Interface::new(methods))
}

/// An array of `element`; see [`Array`] for the concurrent variant.
#[must_use]
pub fn array(element: Type) -> Type {
    Type::new(Array::new(element))
}

/// A fixed-arity sequence of positional types.
#[must_use]
pub fn tuple(items: impl IntoIterator<Item = Type>) -> Type {
    Type::new(Tuple::new(items))
}

/// A lazy per-element stream; see [`Stream::results`].
#[must_use]
pub fn stream(element: Type) -> Type {
    Type::new(Stream::new(element))
}

/// The hash accepting any mapping; declare fields with
/// [`schema!`](macro@crate::schema).
#[must_use]
pub fn hash() -> HashSchema {
    HashSchema::any()
}

/// A uniformly-typed mapping, validated lazily.
#[must_use]
pub fn hash_map(key: Type, value: Type) -> Type {
    Type::new(HashMap::new(key, value))
}

/// Coercive types accepting broader inputs than their strict
/// counterparts.
pub mod lax {
    use super::{any, Kind, Matcher, Type, Value};
    use crate::number;

    fn numeric_string() -> Matcher {
        Matcher::predicate(|v| {
            v.as_str()
                .is_some_and(|s| number::parse_decimal(s).is_ok())
        })
    }

    /// Accepts integers, floats (truncated) and numeric strings such
    /// as `"113,222.10"`.
    #[must_use]
    pub fn integer() -> Type {
        let from_decimal = super::decimal().transform(Kind::Integer, |v| {
            Value::Int(v.as_f64().unwrap_or_default().trunc() as i64)
        });
        let from_string = any().coerce(numeric_string(), |v| {
            let rational = number::parse_decimal(v.as_str().unwrap_or_default())
                .expect("matcher admitted a parseable string");
            number::to_i64(&rational).map_or(Value::Undefined, Value::Int)
        });
        (super::integer() | from_decimal | from_string).named("LaxInteger")
    }

    /// Accepts floats, integers (widened) and numeric strings.
    #[must_use]
    pub fn decimal() -> Type {
        let from_integer = super::integer().transform(Kind::Decimal, |v| {
            Value::Float(v.as_f64().unwrap_or_default())
        });
        let from_string = any().coerce(numeric_string(), |v| {
            let rational = number::parse_decimal(v.as_str().unwrap_or_default())
                .expect("matcher admitted a parseable string");
            number::to_f64(&rational).map_or(Value::Undefined, Value::Float)
        });
        (super::decimal() | from_integer | from_string).named("LaxDecimal")
    }

    /// Accepts strings and stringifies numbers and booleans.
    #[must_use]
    pub fn string() -> Type {
        let scalar = Matcher::predicate(|v| {
            matches!(v, Value::Int(_) | Value::Float(_) | Value::Bool(_))
        });
        let from_scalar = any().coerce(scalar, |v| Value::from(v.to_string()));
        (super::string() | from_scalar).named("LaxString")
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_lax_integer() {
            let lax = integer();
            assert_eq!(lax.resolve(42).value(), &Value::Int(42));
            assert_eq!(lax.resolve(42.9).value(), &Value::Int(42));
            assert_eq!(lax.resolve("42").value(), &Value::Int(42));
            assert_eq!(lax.resolve("113,222.10").value(), &Value::Int(113_222));
            assert!(lax.resolve("nope").is_halt());
            assert!(lax.resolve(Value::Null).is_halt());
        }

        #[test]
        fn test_lax_decimal() {
            let lax = decimal();
            assert_eq!(lax.resolve(2.5).value(), &Value::Float(2.5));
            assert_eq!(lax.resolve(2).value(), &Value::Float(2.0));
            assert_eq!(lax.resolve("2.5").value(), &Value::Float(2.5));
            assert!(lax.resolve("x2").is_halt());
        }

        #[test]
        fn test_lax_string() {
            let lax = string();
            assert_eq!(lax.resolve("hi").value(), &Value::from("hi"));
            assert_eq!(lax.resolve(42).value(), &Value::from("42"));
            assert_eq!(lax.resolve(true).value(), &Value::from("true"));
            assert!(lax.resolve(Value::Null).is_halt());
        }
    }
}
