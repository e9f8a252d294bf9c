use std::fmt::{self, Display};

use thiserror::Error;

/// A non-finite value class with a configurable spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialValue {
    Infinity,
    NaN,
}

impl Display for SpecialValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpecialValue::Infinity => write!(f, "infinity"),
            SpecialValue::NaN => write!(f, "NaN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum FormatError {
    #[error("no symbol configured for {0}")]
    MissingSymbol(SpecialValue),
    #[error("{requested} digits requested, expected {min} to {max}")]
    DigitsOutOfRange { requested: i32, min: i32, max: i32 },
    #[error("{0:e} is too large for fixed notation")]
    TooLarge(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Nothing but (allowed) whitespace; `processed` bytes were consumed.
    #[error("empty input")]
    Empty { processed: usize },
    #[error("input is not a number")]
    Junk,
}
