//! Text forms of coordinates as written to and read from documents.

use dc_dtoa::{double_to_ascii, DtoaMode};

use crate::{DoubleToStringConverter, DtoaFlags, StringToDoubleConverter, StrtodFlags};

pub type Coord = f64;

static NICE_CONVERTER: DoubleToStringConverter<'static> =
    DoubleToStringConverter::new(DtoaFlags::UNIQUE_ZERO, Some("inf"), Some("NaN"), 'e', -6, 21, 0, 0);

static COORD_PARSER: StringToDoubleConverter<'static> = StringToDoubleConverter::new(
    StrtodFlags::ALLOW_LEADING_SPACES
        .union(StrtodFlags::ALLOW_TRAILING_SPACES)
        .union(StrtodFlags::ALLOW_SPACES_AFTER_SIGN),
    0.0,
    f64::NAN,
    Some("inf"),
    Some("NaN"),
);

/// The shortest text that reads back as `x`, as compact as possible.
///
/// Digits are printed plainly when they end at the decimal point, with the
/// point inserted when it falls inside them, with up to two padding zeros
/// after them, or with up to three zeros after a bare leading point
/// (`.0001`). Everything else becomes `<digits>e<exponent>` where the
/// exponent counts from the last digit (`1e-7`, `12e22`). Non-finite values
/// print as `inf`, `-inf` and `NaN`.
pub fn format_coord_shortest(x: Coord) -> String {
    if x.is_nan() {
        return "NaN".to_owned();
    }
    if x.is_infinite() {
        return if x < 0.0 { "-inf" } else { "inf" }.to_owned();
    }

    let (negative, decimal) = double_to_ascii(x, DtoaMode::Shortest);
    let digits = decimal.digits.to_string();
    let length = digits.len() as i32;
    let point = decimal.point;
    let exponent = point - length;

    let mut result = String::with_capacity(32);
    if negative {
        result.push('-');
    }

    if exponent == 0 {
        result.push_str(&digits);
    } else if 0 <= point && point <= length {
        let (integral, fractional) = digits.split_at(point as usize);
        result.push_str(integral);
        result.push('.');
        result.push_str(fractional);
    } else if 0 < exponent && exponent <= 2 {
        result.push_str(&digits);
        result.extend((0..exponent).map(|_| '0'));
    } else if -3 <= point && point <= -1 {
        result.push('.');
        result.extend((0..-point).map(|_| '0'));
        result.push_str(&digits);
    } else {
        result.push_str(&digits);
        result.push('e');
        result.push_str(&exponent.to_string());
    }
    result
}

/// The shortest text that reads back as `x` in conventional notation:
/// decimal for exponents from -6 to 20, exponential (`1.5e-7`) beyond, `0`
/// for negative zero, `inf`/`-inf`/`NaN` for the special values.
pub fn format_coord_nice(x: Coord) -> String {
    match NICE_CONVERTER.to_shortest(x) {
        Ok(text) => text,
        Err(error) => unreachable!("both symbols are configured: {}", error),
    }
}

/// Reads a coordinate written with optional surrounding spaces and spaces
/// after the sign. Empty input is `0.0`, anything unreadable `NaN`.
pub fn parse_coord(s: &str) -> Coord {
    COORD_PARSER.string_to_double(s).0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shortest_layouts() {
        assert_eq!(format_coord_shortest(100.0), "100");
        assert_eq!(format_coord_shortest(1000.0), "1e3");
        assert_eq!(format_coord_shortest(12.5), "12.5");
        assert_eq!(format_coord_shortest(0.5), ".5");
        assert_eq!(format_coord_shortest(0.05), ".05");
        assert_eq!(format_coord_shortest(0.0001), ".0001");
        assert_eq!(format_coord_shortest(0.00001), "1e-5");
        assert_eq!(format_coord_shortest(0.00012), ".00012");
        assert_eq!(format_coord_shortest(-1.25e-7), "-125e-9");
        assert_eq!(format_coord_shortest(1.2e23), "12e22");
    }

    #[test]
    fn shortest_special_values() {
        assert_eq!(format_coord_shortest(0.0), "0");
        assert_eq!(format_coord_shortest(-0.0), "-0");
        assert_eq!(format_coord_shortest(f64::INFINITY), "inf");
        assert_eq!(format_coord_shortest(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_coord_shortest(f64::NAN), "NaN");
    }
}
