//! Power-of-two radix parsing for hexadecimal and octal literals.

use dc_fp::{DiyFp, Double};

use crate::string_to_double::{signed_zero, skip_whitespace};

const SIGNIFICAND_SIZE: u32 = Double::SIGNIFICAND_SIZE as u32;

pub(crate) fn digit_value(c: u8, radix: u32) -> Option<u32> {
    let value = match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'z' => c - b'a' + 10,
        b'A'..=b'Z' => c - b'A' + 10,
        _ => return None,
    };
    let value = u32::from(value);
    (value < radix).then(|| value)
}

/// Parses digits in radix `2^LOG2` starting at `*current`, which must not be
/// at the end. Values wider than 53 bits are rounded half to even, taking
/// every dropped digit into account.
///
/// On success `*current` points past the consumed digits (and past trailing
/// whitespace unless trailing junk is allowed). `None` means junk follows
/// the digits.
pub(crate) fn radix_string_to_ieee<const LOG2: u32>(
    input: &[u8],
    current: &mut usize,
    sign: bool,
    allow_trailing_junk: bool,
) -> Option<f64> {
    let end = input.len();
    debug_assert!(*current < end);
    let radix = 1 << LOG2;

    while input[*current] == b'0' {
        *current += 1;
        if *current == end {
            return Some(signed_zero(sign));
        }
    }

    let mut number: u64 = 0;
    let mut exponent: i32 = 0;
    loop {
        let digit = match digit_value(input[*current], radix) {
            Some(digit) => digit,
            None if allow_trailing_junk => break,
            None => {
                *current = skip_whitespace(input, *current);
                if *current == end {
                    break;
                }
                return None;
            }
        };

        number = number * u64::from(radix) + u64::from(digit);
        let overflow = number >> SIGNIFICAND_SIZE;
        if overflow != 0 {
            // Drop the excess low bits and round on them.
            let overflow_bits_count = 64 - overflow.leading_zeros();
            let dropped_bits = number & ((1 << overflow_bits_count) - 1);
            number >>= overflow_bits_count;
            exponent = overflow_bits_count as i32;

            let mut zero_tail = true;
            loop {
                *current += 1;
                if *current == end || digit_value(input[*current], radix).is_none() {
                    break;
                }
                zero_tail = zero_tail && input[*current] == b'0';
                exponent += LOG2 as i32;
            }

            if !allow_trailing_junk {
                *current = skip_whitespace(input, *current);
                if *current != end {
                    return None;
                }
            }

            let middle_value = 1 << (overflow_bits_count - 1);
            if dropped_bits > middle_value || (dropped_bits == middle_value && (number & 1 != 0 || !zero_tail)) {
                number += 1;
            }
            if number & (1 << SIGNIFICAND_SIZE) != 0 {
                exponent += 1;
                number >>= 1;
            }
            break;
        }

        *current += 1;
        if *current == end {
            break;
        }
    }

    debug_assert!(number < 1 << SIGNIFICAND_SIZE);
    let magnitude = if exponent == 0 {
        number as f64
    } else {
        debug_assert!(number != 0);
        Double::from_diy_fp(DiyFp::new(number, exponent)).value()
    };
    Some(if sign { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(text: &str) -> Option<(f64, usize)> {
        let mut current = 0;
        radix_string_to_ieee::<4>(text.as_bytes(), &mut current, false, false).map(|v| (v, current))
    }

    #[test]
    fn digits() {
        assert_eq!(digit_value(b'7', 8), Some(7));
        assert_eq!(digit_value(b'8', 8), None);
        assert_eq!(digit_value(b'f', 16), Some(15));
        assert_eq!(digit_value(b'F', 16), Some(15));
        assert_eq!(digit_value(b'g', 16), None);
    }

    #[test]
    fn small_values_are_exact() {
        assert_eq!(hex("1A"), Some((26.0, 2)));
        assert_eq!(hex("000ff  "), Some((255.0, 7)));
        assert_eq!(hex("0"), Some((0.0, 1)));
        assert_eq!(hex("1g"), None);
    }

    #[test]
    fn wide_values_round_half_to_even() {
        // 2^53 + 1 is a tie and rounds down to the even 2^53
        assert_eq!(hex("20000000000001"), Some((9_007_199_254_740_992.0, 14)));
        // 2^53 + 3 is a tie and rounds up to 2^53 + 4
        assert_eq!(hex("20000000000003"), Some((9_007_199_254_740_996.0, 14)));
        // a non-zero tail breaks the tie upwards
        assert_eq!(hex("200000000000010001").map(|(v, _)| v), Some(9_007_199_254_740_994.0 * 65536.0));
        assert_eq!(hex("ffffffffffffffff").map(|(v, _)| v), Some(18_446_744_073_709_551_616.0));
    }

    #[test]
    fn sign_applies_to_wide_values() {
        let mut current = 0;
        let value = radix_string_to_ieee::<4>(b"20000000000003", &mut current, true, false);
        assert_eq!(value, Some(-9_007_199_254_740_996.0));
    }

    #[test]
    fn trailing_junk() {
        let mut current = 0;
        assert_eq!(radix_string_to_ieee::<3>(b"17x", &mut current, false, true), Some(15.0));
        assert_eq!(current, 2);
    }
}
