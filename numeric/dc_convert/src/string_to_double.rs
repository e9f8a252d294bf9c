use bitflags::bitflags;
use dc_errors::ParseError;
use dc_strtod::strtod;

use crate::radix::{digit_value, radix_string_to_ieee};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct StrtodFlags: u32 {
        /// `0x` / `0X` prefixed hexadecimal integers.
        const ALLOW_HEX = 1;
        /// Integers with a leading zero and only digits below 8 are octal.
        const ALLOW_OCTALS = 2;
        /// Stop at the first character that cannot continue the number.
        const ALLOW_TRAILING_JUNK = 4;
        const ALLOW_LEADING_SPACES = 8;
        const ALLOW_TRAILING_SPACES = 16;
        /// `- 1.5` reads as `-1.5`.
        const ALLOW_SPACES_AFTER_SIGN = 32;
    }
}

/// Significant digits kept by the scanner; the rest only matter through
/// whether any of them is non-zero.
const MAX_SIGNIFICANT_DIGITS: usize = 772;

const WHITESPACE: [u8; 6] = [b' ', b'\r', b'\n', b'\t', 0x0b, 0x0c];

/// Index of the first non-whitespace byte at or after `current`, or the
/// input length.
pub(crate) fn skip_whitespace(input: &[u8], current: usize) -> usize {
    input[current..]
        .iter()
        .position(|c| !WHITESPACE.contains(c))
        .map_or(input.len(), |offset| current + offset)
}

pub(crate) fn signed_zero(sign: bool) -> f64 {
    if sign {
        -0.0
    } else {
        0.0
    }
}

enum Scan {
    Number(f64, usize),
    Empty(usize),
    Junk,
}

/// Reads decimal text (and optionally hexadecimal or octal integers) into
/// the nearest double.
#[derive(Debug, Clone, PartialEq)]
pub struct StringToDoubleConverter<'s> {
    flags: StrtodFlags,
    empty_string_value: f64,
    junk_string_value: f64,
    infinity_symbol: Option<&'s str>,
    nan_symbol: Option<&'s str>,
}

impl<'s> StringToDoubleConverter<'s> {
    /// `empty_string_value` is returned for input without any characters
    /// besides allowed whitespace, `junk_string_value` for input that is not
    /// a number under `flags`.
    pub const fn new(
        flags: StrtodFlags,
        empty_string_value: f64,
        junk_string_value: f64,
        infinity_symbol: Option<&'s str>,
        nan_symbol: Option<&'s str>,
    ) -> Self {
        StringToDoubleConverter {
            flags,
            empty_string_value,
            junk_string_value,
            infinity_symbol,
            nan_symbol,
        }
    }

    pub fn flags(&self) -> StrtodFlags {
        self.flags
    }

    /// The value of `input` and the number of bytes that made it up.
    ///
    /// Empty input yields the configured empty value together with the
    /// whitespace consumed; junk yields the junk value and zero.
    pub fn string_to_double(&self, input: &str) -> (f64, usize) {
        match self.scan(input.as_bytes()) {
            Scan::Number(value, processed) => (value, processed),
            Scan::Empty(processed) => (self.empty_string_value, processed),
            Scan::Junk => (self.junk_string_value, 0),
        }
    }

    /// Like [`Self::string_to_double`], with empty input and junk reported
    /// as errors instead of sentinel values.
    ///
    /// # Errors
    /// [`ParseError::Empty`] for input without a number,
    /// [`ParseError::Junk`] for anything else that is not a number
    pub fn try_string_to_double(&self, input: &str) -> Result<(f64, usize), ParseError> {
        match self.scan(input.as_bytes()) {
            Scan::Number(value, processed) => Ok((value, processed)),
            Scan::Empty(processed) => Err(ParseError::Empty { processed }),
            Scan::Junk => Err(ParseError::Junk),
        }
    }

    fn scan(&self, input: &[u8]) -> Scan {
        let end = input.len();
        let allow_trailing_junk = self.flags.contains(StrtodFlags::ALLOW_TRAILING_JUNK);
        let allow_leading_spaces = self.flags.contains(StrtodFlags::ALLOW_LEADING_SPACES);
        let allow_trailing_spaces = self.flags.contains(StrtodFlags::ALLOW_TRAILING_SPACES);
        let allow_spaces_after_sign = self.flags.contains(StrtodFlags::ALLOW_SPACES_AFTER_SIGN);

        let mut current = 0;
        if current == end {
            return Scan::Empty(0);
        }
        if allow_leading_spaces || allow_trailing_spaces {
            current = skip_whitespace(input, current);
            if current == end {
                return Scan::Empty(current);
            }
            if !allow_leading_spaces && current != 0 {
                return Scan::Junk;
            }
        }

        let mut sign = false;
        if input[current] == b'+' || input[current] == b'-' {
            sign = input[current] == b'-';
            current += 1;
            let next_non_space = skip_whitespace(input, current);
            if next_non_space == end {
                return Scan::Junk;
            }
            if !allow_spaces_after_sign && current != next_non_space {
                return Scan::Junk;
            }
            current = next_non_space;
        }

        for (symbol, value) in [(self.infinity_symbol, f64::INFINITY), (self.nan_symbol, f64::NAN)] {
            let symbol = match symbol {
                Some(symbol) if symbol.as_bytes().first() == Some(&input[current]) => symbol.as_bytes(),
                _ => continue,
            };
            if !input[current..].starts_with(symbol) {
                return Scan::Junk;
            }
            current += symbol.len();
            if !(allow_trailing_spaces || allow_trailing_junk) && current != end {
                return Scan::Junk;
            }
            if !allow_trailing_junk {
                current = skip_whitespace(input, current);
                if current != end {
                    return Scan::Junk;
                }
            }
            return Scan::Number(if sign { -value } else { value }, current);
        }

        let mut leading_zero = false;
        if input[current] == b'0' {
            current += 1;
            if current == end {
                return Scan::Number(signed_zero(sign), current);
            }
            leading_zero = true;

            if self.flags.contains(StrtodFlags::ALLOW_HEX) && (input[current] == b'x' || input[current] == b'X') {
                current += 1;
                if current == end || digit_value(input[current], 16).is_none() {
                    return Scan::Junk;
                }
                return match radix_string_to_ieee::<4>(input, &mut current, sign, allow_trailing_junk) {
                    Some(value) => {
                        if allow_trailing_spaces {
                            current = skip_whitespace(input, current);
                        }
                        Scan::Number(value, current)
                    }
                    None => Scan::Junk,
                };
            }

            while input[current] == b'0' {
                current += 1;
                if current == end {
                    return Scan::Number(signed_zero(sign), current);
                }
            }
        }

        let mut digits = [0u8; MAX_SIGNIFICANT_DIGITS + 10];
        let mut digit_count = 0;
        let mut exponent: i32 = 0;
        let mut insignificant_digits: i32 = 0;
        let mut nonzero_digit_dropped = false;
        let mut octal = leading_zero && self.flags.contains(StrtodFlags::ALLOW_OCTALS);

        'parsing: {
            while input[current].is_ascii_digit() {
                if digit_count < MAX_SIGNIFICANT_DIGITS {
                    digits[digit_count] = input[current];
                    digit_count += 1;
                } else {
                    insignificant_digits += 1;
                    nonzero_digit_dropped = nonzero_digit_dropped || input[current] != b'0';
                }
                octal = octal && input[current] < b'8';
                current += 1;
                if current == end {
                    break 'parsing;
                }
            }

            if digit_count == 0 {
                octal = false;
            }

            if input[current] == b'.' {
                if octal && !allow_trailing_junk {
                    return Scan::Junk;
                }
                if octal {
                    break 'parsing;
                }
                current += 1;
                if current == end {
                    if digit_count == 0 && !leading_zero {
                        return Scan::Junk;
                    }
                    break 'parsing;
                }

                if digit_count == 0 {
                    // Zeros right after the point only shift the exponent.
                    while input[current] == b'0' {
                        current += 1;
                        if current == end {
                            return Scan::Number(signed_zero(sign), current);
                        }
                        exponent -= 1;
                    }
                }

                while input[current].is_ascii_digit() {
                    if digit_count < MAX_SIGNIFICANT_DIGITS {
                        digits[digit_count] = input[current];
                        digit_count += 1;
                        exponent -= 1;
                    } else {
                        nonzero_digit_dropped = nonzero_digit_dropped || input[current] != b'0';
                    }
                    current += 1;
                    if current == end {
                        break 'parsing;
                    }
                }
            }

            // No digits at all, not even zeros.
            if !leading_zero && exponent == 0 && digit_count == 0 {
                return Scan::Junk;
            }

            if input[current] == b'e' || input[current] == b'E' {
                if octal && !allow_trailing_junk {
                    return Scan::Junk;
                }
                if octal {
                    break 'parsing;
                }
                current += 1;
                if current == end {
                    if allow_trailing_junk {
                        break 'parsing;
                    }
                    return Scan::Junk;
                }
                let mut exponent_sign = b'+';
                if input[current] == b'+' || input[current] == b'-' {
                    exponent_sign = input[current];
                    current += 1;
                    if current == end {
                        if allow_trailing_junk {
                            break 'parsing;
                        }
                        return Scan::Junk;
                    }
                }
                if !input[current].is_ascii_digit() {
                    if allow_trailing_junk {
                        break 'parsing;
                    }
                    return Scan::Junk;
                }

                // Saturate well before the accumulated exponent could overflow.
                const MAX_EXPONENT: i32 = i32::MAX / 2;
                let mut num: i32 = 0;
                loop {
                    let digit = i32::from(input[current] - b'0');
                    if num >= MAX_EXPONENT / 10 && !(num == MAX_EXPONENT / 10 && digit <= MAX_EXPONENT % 10) {
                        num = MAX_EXPONENT;
                    } else {
                        num = num * 10 + digit;
                    }
                    current += 1;
                    if current == end || !input[current].is_ascii_digit() {
                        break;
                    }
                }
                exponent += if exponent_sign == b'-' { -num } else { num };
            }

            if !(allow_trailing_spaces || allow_trailing_junk) && current != end {
                return Scan::Junk;
            }
            if !allow_trailing_junk {
                current = skip_whitespace(input, current);
                if current != end {
                    return Scan::Junk;
                }
            }
            if allow_trailing_spaces {
                current = skip_whitespace(input, current);
            }
        }

        exponent += insignificant_digits;

        if octal {
            let mut start = 0;
            return match radix_string_to_ieee::<3>(&digits[..digit_count], &mut start, sign, allow_trailing_junk) {
                Some(value) => Scan::Number(value, current),
                None => Scan::Junk,
            };
        }

        if nonzero_digit_dropped {
            digits[digit_count] = b'1';
            digit_count += 1;
            exponent -= 1;
        }

        let converted = strtod(&digits[..digit_count], exponent);
        Scan::Number(if sign { -converted } else { converted }, current)
    }
}
