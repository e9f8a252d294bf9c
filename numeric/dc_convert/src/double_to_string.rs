use bitflags::bitflags;
use dc_dtoa::{double_to_ascii, Decimal, DtoaMode};
use dc_errors::{FormatError, SpecialValue};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DtoaFlags: u32 {
        /// `1e+5` instead of `1e5`.
        const EMIT_POSITIVE_EXPONENT_SIGN = 1;
        /// `123.` instead of `123` when no digits follow the point.
        const EMIT_TRAILING_DECIMAL_POINT = 2;
        /// `123.0` instead of `123.`; needs `EMIT_TRAILING_DECIMAL_POINT`.
        const EMIT_TRAILING_ZERO_AFTER_POINT = 4;
        /// Prints `-0.0` as `0`.
        const UNIQUE_ZERO = 8;
    }
}

pub const MAX_FIXED_DIGITS_BEFORE_POINT: i32 = 60;
pub const MAX_FIXED_DIGITS_AFTER_POINT: i32 = 60;
pub const MAX_EXPONENTIAL_DIGITS: i32 = 120;
pub const MIN_PRECISION_DIGITS: i32 = 1;
pub const MAX_PRECISION_DIGITS: i32 = 120;

const FIRST_NON_FIXED: f64 = 1e60;

/// Formats doubles as decimal text in shortest, fixed, exponential or
/// precision style.
///
/// A converter is plain configuration and can live in a `static`:
///
/// ```ignore
/// static CONVERTER: DoubleToStringConverter<'static> = DoubleToStringConverter::new(
///     DtoaFlags::UNIQUE_ZERO, Some("inf"), Some("NaN"), 'e', -6, 21, 0, 0,
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DoubleToStringConverter<'s> {
    flags: DtoaFlags,
    infinity_symbol: Option<&'s str>,
    nan_symbol: Option<&'s str>,
    exponent_character: char,
    decimal_in_shortest_low: i32,
    decimal_in_shortest_high: i32,
    max_leading_padding_zeroes_in_precision_mode: i32,
    max_trailing_padding_zeroes_in_precision_mode: i32,
}

impl<'s> DoubleToStringConverter<'s> {
    /// `to_shortest` prints decimal notation when the decimal exponent `e`
    /// of the value (as in `d.ddd * 10^e`) satisfies
    /// `decimal_in_shortest_low <= e < decimal_in_shortest_high`, and
    /// exponential notation otherwise.
    ///
    /// `to_precision` switches to exponential notation when more than
    /// `max_leading_padding_zeroes_in_precision_mode` zeros would follow
    /// the point before the first digit, or more than
    /// `max_trailing_padding_zeroes_in_precision_mode` zeros would pad the
    /// integer part.
    ///
    /// # Panics
    /// if `EMIT_TRAILING_ZERO_AFTER_POINT` is set without
    /// `EMIT_TRAILING_DECIMAL_POINT`
    #[allow(clippy::too_many_arguments)]
    pub const fn new(
        flags: DtoaFlags,
        infinity_symbol: Option<&'s str>,
        nan_symbol: Option<&'s str>,
        exponent_character: char,
        decimal_in_shortest_low: i32,
        decimal_in_shortest_high: i32,
        max_leading_padding_zeroes_in_precision_mode: i32,
        max_trailing_padding_zeroes_in_precision_mode: i32,
    ) -> Self {
        assert!(
            flags.contains(DtoaFlags::EMIT_TRAILING_DECIMAL_POINT)
                || !flags.contains(DtoaFlags::EMIT_TRAILING_ZERO_AFTER_POINT),
            "a trailing zero after the point needs the trailing point"
        );
        DoubleToStringConverter {
            flags,
            infinity_symbol,
            nan_symbol,
            exponent_character,
            decimal_in_shortest_low,
            decimal_in_shortest_high,
            max_leading_padding_zeroes_in_precision_mode,
            max_trailing_padding_zeroes_in_precision_mode,
        }
    }

    pub fn flags(&self) -> DtoaFlags {
        self.flags
    }

    /// The shortest text that reads back as `value`.
    pub fn to_shortest(&self, value: f64) -> Result<String, FormatError> {
        if !value.is_finite() {
            return self.special_value(value);
        }

        let (negative, decimal) = double_to_ascii(value, DtoaMode::Shortest);
        let mut result = String::new();
        self.push_sign(negative, value, &mut result);

        let length = decimal.len() as i32;
        let exponent = decimal.point - 1;
        if self.decimal_in_shortest_low <= exponent && exponent < self.decimal_in_shortest_high {
            let digits_after_point = (length - decimal.point).max(0);
            self.create_decimal_representation(&decimal, digits_after_point, &mut result);
        } else {
            self.create_exponential_representation(decimal.digits.as_bytes(), exponent, &mut result);
        }
        Ok(result)
    }

    /// `value` rounded to `requested_digits` digits after the point, half-way
    /// cases rounding up. Never uses exponential notation.
    ///
    /// # Errors
    /// if `requested_digits` is outside `0..=60`, if `|value| >= 1e60`, or if
    /// `value` is not finite and no symbol is configured
    pub fn to_fixed(&self, value: f64, requested_digits: i32) -> Result<String, FormatError> {
        if !value.is_finite() {
            return self.special_value(value);
        }
        check_digits(requested_digits, 0, MAX_FIXED_DIGITS_AFTER_POINT)?;
        if value >= FIRST_NON_FIXED || value <= -FIRST_NON_FIXED {
            return Err(FormatError::TooLarge(value));
        }

        let (negative, decimal) = double_to_ascii(value, DtoaMode::Fixed(requested_digits as usize));
        let mut result = String::new();
        self.push_sign(negative, value, &mut result);
        self.create_decimal_representation(&decimal, requested_digits, &mut result);
        Ok(result)
    }

    /// `value` as `d.ddde±x` with `requested_digits` digits after the point,
    /// or with as many as needed to round-trip when `requested_digits` is
    /// -1.
    ///
    /// # Errors
    /// if `requested_digits` is outside `-1..=120`, or if `value` is not
    /// finite and no symbol is configured
    pub fn to_exponential(&self, value: f64, requested_digits: i32) -> Result<String, FormatError> {
        if !value.is_finite() {
            return self.special_value(value);
        }
        check_digits(requested_digits, -1, MAX_EXPONENTIAL_DIGITS)?;

        let (negative, decimal) = if requested_digits == -1 {
            double_to_ascii(value, DtoaMode::Shortest)
        } else {
            let count = requested_digits as usize + 1;
            let (negative, mut decimal) = double_to_ascii(value, DtoaMode::Precision(count));
            debug_assert!(decimal.len() <= count);
            decimal.digits.pad_zeros(count);
            (negative, decimal)
        };
        let mut result = String::new();
        self.push_sign(negative, value, &mut result);
        let exponent = decimal.point - 1;
        self.create_exponential_representation(decimal.digits.as_bytes(), exponent, &mut result);
        Ok(result)
    }

    /// `value` with `precision` significant digits, in decimal notation
    /// unless the padding limits given to [`Self::new`] are exceeded.
    ///
    /// # Errors
    /// if `precision` is outside `1..=120`, or if `value` is not finite and
    /// no symbol is configured
    pub fn to_precision(&self, value: f64, precision: i32) -> Result<String, FormatError> {
        if !value.is_finite() {
            return self.special_value(value);
        }
        check_digits(precision, MIN_PRECISION_DIGITS, MAX_PRECISION_DIGITS)?;

        let (negative, mut decimal) = double_to_ascii(value, DtoaMode::Precision(precision as usize));
        debug_assert!(decimal.len() <= precision as usize);
        let mut result = String::new();
        self.push_sign(negative, value, &mut result);

        let exponent = decimal.point - 1;
        let extra_zero = i32::from(self.flags.contains(DtoaFlags::EMIT_TRAILING_ZERO_AFTER_POINT));
        if -decimal.point + 1 > self.max_leading_padding_zeroes_in_precision_mode
            || decimal.point - precision + extra_zero > self.max_trailing_padding_zeroes_in_precision_mode
        {
            decimal.digits.pad_zeros(precision as usize);
            self.create_exponential_representation(decimal.digits.as_bytes(), exponent, &mut result);
        } else {
            let digits_after_point = (precision - decimal.point).max(0);
            self.create_decimal_representation(&decimal, digits_after_point, &mut result);
        }
        Ok(result)
    }

    /// Digits and decimal point of `|v|` with the sign of `v`; see
    /// [`dc_dtoa::double_to_ascii`].
    pub fn double_to_ascii(v: f64, mode: DtoaMode) -> (bool, Decimal) {
        double_to_ascii(v, mode)
    }

    fn special_value(&self, value: f64) -> Result<String, FormatError> {
        if value.is_infinite() {
            let symbol = self
                .infinity_symbol
                .ok_or(FormatError::MissingSymbol(SpecialValue::Infinity))?;
            if value < 0.0 {
                return Ok(format!("-{}", symbol));
            }
            return Ok(symbol.to_owned());
        }
        // NaN never carries a sign.
        self.nan_symbol
            .map(str::to_owned)
            .ok_or(FormatError::MissingSymbol(SpecialValue::NaN))
    }

    fn push_sign(&self, negative: bool, value: f64, result: &mut String) {
        if negative && (value != 0.0 || !self.flags.contains(DtoaFlags::UNIQUE_ZERO)) {
            result.push('-');
        }
    }

    fn create_exponential_representation(&self, digits: &[u8], mut exponent: i32, result: &mut String) {
        debug_assert!(!digits.is_empty());
        result.push(char::from(digits[0]));
        if digits.len() != 1 {
            result.push('.');
            push_ascii(&digits[1..], result);
        }
        result.push(self.exponent_character);
        if exponent < 0 {
            result.push('-');
            exponent = -exponent;
        } else if self.flags.contains(DtoaFlags::EMIT_POSITIVE_EXPONENT_SIGN) {
            result.push('+');
        }
        debug_assert!(exponent < 10_000);
        result.push_str(&exponent.to_string());
    }

    /// Plain decimal notation with exactly `digits_after_point` digits after
    /// the point, padding with zeros on either side as needed.
    fn create_decimal_representation(&self, decimal: &Decimal, digits_after_point: i32, result: &mut String) {
        let digits = decimal.digits.as_bytes();
        let length = digits.len() as i32;
        let point = decimal.point;
        if point <= 0 {
            // 0.000ddd000
            result.push('0');
            if digits_after_point > 0 {
                result.push('.');
                push_zeros(-point, result);
                debug_assert!(length <= digits_after_point + point);
                push_ascii(digits, result);
                push_zeros(digits_after_point + point - length, result);
            }
        } else if point >= length {
            // ddd000.000
            push_ascii(digits, result);
            push_zeros(point - length, result);
            if digits_after_point > 0 {
                result.push('.');
                push_zeros(digits_after_point, result);
            }
        } else {
            // dd.ddd000
            debug_assert!(digits_after_point > 0);
            let (integral, fractional) = digits.split_at(point as usize);
            push_ascii(integral, result);
            result.push('.');
            debug_assert!(fractional.len() as i32 <= digits_after_point);
            push_ascii(fractional, result);
            push_zeros(digits_after_point - fractional.len() as i32, result);
        }
        if digits_after_point == 0 {
            if self.flags.contains(DtoaFlags::EMIT_TRAILING_DECIMAL_POINT) {
                result.push('.');
            }
            if self.flags.contains(DtoaFlags::EMIT_TRAILING_ZERO_AFTER_POINT) {
                result.push('0');
            }
        }
    }
}

fn check_digits(requested: i32, min: i32, max: i32) -> Result<(), FormatError> {
    if requested < min || requested > max {
        return Err(FormatError::DigitsOutOfRange { requested, min, max });
    }
    Ok(())
}

fn push_ascii(digits: &[u8], result: &mut String) {
    result.extend(digits.iter().map(|&d| char::from(d)));
}

fn push_zeros(count: i32, result: &mut String) {
    result.extend((0..count).map(|_| '0'));
}
