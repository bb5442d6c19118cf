//! Exact parsing of human-formatted decimal strings.
//!
//! The lax numeric types accept strings such as `"113,222.10"`; parsing
//! goes through [`BigRational`] so that truncation to an integer is
//! exact rather than a float round-trip.

use num::{pow, BigInt, BigRational, One, ToPrimitive, Zero};
use std::str::FromStr;
use thiserror::Error;

/// A string failed to parse as a decimal number.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberError {
    /// An unexpected character was encountered.
    #[error("failed to parse \"{value}\": unexpected character '{character}' at index {index}")]
    UnexpectedChar {
        /// The full input.
        value: String,
        /// The offending character.
        character: char,
        /// Its byte index.
        index: usize,
    },
    /// The input contained no digits.
    #[error("failed to parse \"{value}\": no digits")]
    NoDigits {
        /// The full input.
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Head,
    Negative,
    Integer,
    Separator,
    Fraction,
    Error,
}

impl State {
    fn next(self, c: char) -> State {
        use State::*;
        match self {
            Head => match c {
                '-' => Negative,
                '0'..='9' => Integer,
                '.' => Fraction,
                _ => Error,
            },
            Negative => match c {
                '0'..='9' => Integer,
                '.' => Fraction,
                _ => Error,
            },
            Integer => match c {
                '0'..='9' => Integer,
                ',' | '_' => Separator,
                '.' => Fraction,
                _ => Error,
            },
            // a separator must sit between digits
            Separator => match c {
                '0'..='9' => Integer,
                _ => Error,
            },
            Fraction => match c {
                '0'..='9' => Fraction,
                _ => Error,
            },
            Error => unreachable!(),
        }
    }
}

/// Parses `value` into a [`BigRational`], accepting `,` and `_` as
/// thousands separators in the integer part.
pub fn parse_decimal(value: &str) -> Result<BigRational, NumberError> {
    let trimmed = value.trim();
    let mut state = State::Head;
    let mut integer = String::new();
    let mut fraction = String::new();
    let mut negative = false;
    for (i, c) in trimmed.char_indices() {
        state = state.next(c);
        match state {
            State::Negative => negative = true,
            State::Integer => integer.push(c),
            State::Fraction => {
                if c != '.' {
                    fraction.push(c);
                }
            }
            State::Separator => {}
            State::Error => {
                return Err(NumberError::UnexpectedChar {
                    value: value.to_string(),
                    character: c,
                    index: i,
                })
            }
            State::Head => unreachable!(),
        }
    }
    if state == State::Separator {
        return Err(NumberError::UnexpectedChar {
            value: value.to_string(),
            character: trimmed.chars().last().expect("separator state implies input"),
            index: trimmed.len() - 1,
        });
    }
    if integer.is_empty() && fraction.is_empty() {
        return Err(NumberError::NoDigits {
            value: value.to_string(),
        });
    }
    let int_part = if integer.is_empty() {
        BigInt::zero()
    } else {
        BigInt::from_str(&integer).expect("digits only")
    };
    let mut rational = BigRational::from_integer(int_part);
    if !fraction.is_empty() {
        let numer = BigInt::from_str(&fraction).expect("digits only");
        let denom = pow(BigInt::from(10), fraction.len());
        rational += BigRational::new(numer, denom);
    }
    if negative {
        rational = -rational;
    }
    Ok(rational)
}

/// Truncates a rational towards zero into an `i64`, if it fits.
#[must_use]
pub fn to_i64(rational: &BigRational) -> Option<i64> {
    rational.to_integer().to_i64()
}

/// Converts a rational to the nearest `f64`, if finite.
#[must_use]
pub fn to_f64(rational: &BigRational) -> Option<f64> {
    let f = rational.to_f64()?;
    f.is_finite().then_some(f)
}

/// Returns `true` if the rational has no fractional part.
#[must_use]
pub fn is_integer(rational: &BigRational) -> bool {
    rational.denom().is_one()
}
