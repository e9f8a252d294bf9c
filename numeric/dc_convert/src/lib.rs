#![allow(clippy::must_use_candidate)]

mod coord;
mod double_to_string;
mod radix;
mod string_to_double;

pub use coord::{format_coord_nice, format_coord_shortest, parse_coord, Coord};
pub use dc_dtoa::{Decimal, DigitBuffer, DtoaMode};
pub use dc_errors::{FormatError, ParseError, SpecialValue};
pub use double_to_string::{DoubleToStringConverter, DtoaFlags};
pub use string_to_double::{StringToDoubleConverter, StrtodFlags};
