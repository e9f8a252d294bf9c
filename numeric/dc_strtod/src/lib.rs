//! Correctly rounded conversion of a decimal digit string to a double.
//!
//! A 64-bit approximation `input * 10^exponent` is computed with cached
//! powers while tracking an upper bound of its error in eighths of a unit.
//! If the error interval does not straddle a rounding boundary the result is
//! final; otherwise the candidate's upper boundary is compared exactly
//! against the decimal input with [`Bignum`]s.

#![allow(clippy::must_use_candidate)]

use std::cmp::Ordering;

use dc_bignum::Bignum;
use dc_fp::{cached_powers, DiyFp, Double};
use tracing::trace;

const MAX_U64_DECIMAL_DIGITS: i32 = 19;
const MAX_DECIMAL_POWER: i32 = 309;
const MIN_DECIMAL_POWER: i32 = -324;

/// Digits beyond this many cannot change the result, except for whether
/// something non-zero follows, which a trailing `1` records.
pub const MAX_SIGNIFICANT_DECIMAL_DIGITS: usize = 780;

/// The error of the approximation is measured in `1 / DENOMINATOR` units.
const DENOMINATOR_LOG: u32 = 3;
const DENOMINATOR: u64 = 1 << DENOMINATOR_LOG;

/// The double nearest to `digits * 10^exponent`, ties to even.
///
/// `digits` holds ASCII decimal digits without sign or point; leading and
/// trailing zeros are allowed.
///
/// # Panics
/// in debug builds, if `digits` contains anything but ASCII digits
pub fn strtod(digits: &[u8], exponent: i32) -> f64 {
    debug_assert!(digits.iter().all(u8::is_ascii_digit));
    let mut copy_space = [0; MAX_SIGNIFICANT_DECIMAL_DIGITS];
    let (trimmed, exponent) = trim_and_cut(digits, exponent, &mut copy_space);

    let guess = match compute_guess(trimmed, exponent) {
        Ok(guess) => return guess,
        Err(guess) => guess,
    };

    trace!(guess, "comparing candidate boundary exactly");
    let double = Double::new(guess);
    match compare_buffer_with_diy_fp(trimmed, exponent, double.upper_boundary()) {
        Ordering::Less => guess,
        Ordering::Greater => double.next_double(),
        Ordering::Equal if double.significand() & 1 == 0 => guess,
        Ordering::Equal => double.next_double(),
    }
}

/// Strips leading and trailing zeros (adjusting the exponent) and cuts
/// overlong inputs down to [`MAX_SIGNIFICANT_DECIMAL_DIGITS`], replacing the
/// dropped tail by a single `1`.
fn trim_and_cut<'a>(
    digits: &'a [u8],
    mut exponent: i32,
    copy_space: &'a mut [u8; MAX_SIGNIFICANT_DECIMAL_DIGITS],
) -> (&'a [u8], i32) {
    let leading = digits.iter().take_while(|&&d| d == b'0').count();
    let left_trimmed = &digits[leading..];
    let trailing = left_trimmed.iter().rev().take_while(|&&d| d == b'0').count();
    let trimmed = &left_trimmed[..left_trimmed.len() - trailing];
    exponent += trailing as i32;

    if trimmed.len() <= MAX_SIGNIFICANT_DECIMAL_DIGITS {
        return (trimmed, exponent);
    }
    let kept = MAX_SIGNIFICANT_DECIMAL_DIGITS - 1;
    copy_space[..kept].copy_from_slice(&trimmed[..kept]);
    copy_space[kept] = b'1';
    let exponent = exponent + (trimmed.len() - MAX_SIGNIFICANT_DECIMAL_DIGITS) as i32;
    (&copy_space[..], exponent)
}

/// Reads digits while the value stays below `u64::MAX / 10`; returns the
/// value and the number of digits consumed.
fn read_u64(digits: &[u8]) -> (u64, usize) {
    let mut result = 0u64;
    let mut read = 0;
    while read < digits.len() && result <= u64::MAX / 10 - 1 {
        result = 10 * result + u64::from(digits[read] - b'0');
        read += 1;
    }
    (result, read)
}

/// The leading (at most 19) digits as a `DiyFp`, rounded on the next digit,
/// and the number of digits left over.
fn read_diy_fp(digits: &[u8]) -> (DiyFp, usize) {
    let (mut significand, read) = read_u64(digits);
    if read == digits.len() {
        return (DiyFp::new(significand, 0), 0);
    }
    if digits[read] >= b'5' {
        significand += 1;
    }
    (DiyFp::new(significand, 0), digits.len() - read)
}

/// `10^exponent` for the gaps between cached powers, exact.
fn adjustment_power_of_ten(exponent: i32) -> DiyFp {
    debug_assert!(0 < exponent && exponent < cached_powers::DECIMAL_EXPONENT_DISTANCE);
    match exponent {
        1 => DiyFp::new(0xa000_0000_0000_0000, -60),
        2 => DiyFp::new(0xc800_0000_0000_0000, -57),
        3 => DiyFp::new(0xfa00_0000_0000_0000, -54),
        4 => DiyFp::new(0x9c40_0000_0000_0000, -50),
        5 => DiyFp::new(0xc350_0000_0000_0000, -47),
        6 => DiyFp::new(0xf424_0000_0000_0000, -44),
        7 => DiyFp::new(0x9896_8000_0000_0000, -40),
        _ => unreachable!("no adjustment power for 10^{}", exponent),
    }
}

/// Approximates `digits * 10^exponent` and rounds it to a double. The flag
/// tells whether the rounding is certain despite the accumulated error.
fn diy_fp_strtod(digits: &[u8], mut exponent: i32) -> (f64, bool) {
    let (input, remaining_decimals) = read_diy_fp(digits);
    exponent += remaining_decimals as i32;
    let mut error: u64 = if remaining_decimals == 0 { 0 } else { DENOMINATOR / 2 };

    let mut input = {
        let normalized = input.normalize();
        error <<= input.e - normalized.e;
        normalized
    };

    debug_assert!(exponent <= cached_powers::MAX_DECIMAL_EXPONENT);
    if exponent < cached_powers::MIN_DECIMAL_EXPONENT {
        return (0.0, true);
    }
    let (cached_power, cached_decimal_exponent) = cached_powers::for_decimal_exponent(exponent);

    if cached_decimal_exponent != exponent {
        let adjustment_exponent = exponent - cached_decimal_exponent;
        input = input * adjustment_power_of_ten(adjustment_exponent);
        if MAX_U64_DECIMAL_DIGITS - (digits.len() as i32) < adjustment_exponent {
            // The product no longer fits 64 bits exactly.
            error += DENOMINATOR / 2;
        }
    }

    input = input * cached_power;

    // Half a unit each for the cached power and the product rounding, one
    // for the product of two inexact factors.
    let error_cached_power = DENOMINATOR / 2;
    let error_product = if error == 0 { 0 } else { 1 };
    let fixed_error = DENOMINATOR / 2;
    error += error_cached_power + error_product + fixed_error;

    let normalized = input.normalize();
    error <<= input.e - normalized.e;
    let mut input = normalized;

    let order_of_magnitude = DiyFp::SIGNIFICAND_SIZE + input.e;
    let effective_significand_size = Double::significand_size_for_order_of_magnitude(order_of_magnitude);
    let mut precision_digits_count = DiyFp::SIGNIFICAND_SIZE - effective_significand_size;
    if precision_digits_count + DENOMINATOR_LOG as i32 >= DiyFp::SIGNIFICAND_SIZE {
        // Deep in the denormals: make room for the error fraction.
        let shift_amount = (precision_digits_count + DENOMINATOR_LOG as i32) - DiyFp::SIGNIFICAND_SIZE + 1;
        input.f >>= shift_amount;
        input.e += shift_amount;
        error = (error >> shift_amount) + 1 + DENOMINATOR;
        precision_digits_count -= shift_amount;
    }

    debug_assert!(precision_digits_count < 64);
    let precision_bits_mask = (1u64 << precision_digits_count) - 1;
    let precision_bits = (input.f & precision_bits_mask) * DENOMINATOR;
    let half_way = (1u64 << (precision_digits_count - 1)) * DENOMINATOR;
    let mut rounded_input = DiyFp::new(input.f >> precision_digits_count, input.e + precision_digits_count);
    if precision_bits >= half_way + error {
        rounded_input.f += 1;
    }

    let result = Double::from_diy_fp(rounded_input).value();
    let uncertain = half_way.wrapping_sub(error) < precision_bits && precision_bits < half_way + error;
    (result, !uncertain)
}

/// Compares `digits * 10^exponent` with `diy_fp` exactly.
fn compare_buffer_with_diy_fp(digits: &[u8], exponent: i32, diy_fp: DiyFp) -> Ordering {
    debug_assert!(digits.len() as i32 + exponent <= MAX_DECIMAL_POWER + 1);
    debug_assert!(digits.len() as i32 + exponent > MIN_DECIMAL_POWER);
    debug_assert!(digits.len() <= MAX_SIGNIFICANT_DECIMAL_DIGITS);

    let mut buffer_bignum = Bignum::new();
    buffer_bignum.assign_decimal_string(digits);
    let mut diy_fp_bignum = Bignum::from_u64(diy_fp.f);
    if exponent >= 0 {
        buffer_bignum.multiply_by_power_of_ten(exponent as usize);
    } else {
        diy_fp_bignum.multiply_by_power_of_ten(-exponent as usize);
    }
    if diy_fp.e > 0 {
        diy_fp_bignum.shift_left(diy_fp.e as usize);
    } else {
        buffer_bignum.shift_left(-diy_fp.e as usize);
    }
    buffer_bignum.cmp(&diy_fp_bignum)
}

/// `Ok` with the final result, or `Err` with a candidate that is either
/// correct or one below the correct result.
fn compute_guess(digits: &[u8], exponent: i32) -> Result<f64, f64> {
    if digits.is_empty() {
        return Ok(0.0);
    }
    let len = digits.len() as i32;
    if exponent + len - 1 >= MAX_DECIMAL_POWER {
        return Ok(f64::INFINITY);
    }
    if exponent + len <= MIN_DECIMAL_POWER {
        return Ok(0.0);
    }

    let (guess, certain) = diy_fp_strtod(digits, exponent);
    if certain || guess == f64::INFINITY {
        Ok(guess)
    } else {
        Err(guess)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimming() {
        let mut space = [0; MAX_SIGNIFICANT_DECIMAL_DIGITS];
        assert_eq!(trim_and_cut(b"00120300", 2, &mut space), (&b"1203"[..], 4));

        let mut space = [0; MAX_SIGNIFICANT_DECIMAL_DIGITS];
        assert_eq!(trim_and_cut(b"0000", 7, &mut space), (&b""[..], 7));
    }

    #[test]
    fn cutting_keeps_a_sticky_digit() {
        let mut long = vec![b'2'; 800];
        long.push(b'5');
        let mut space = [0; MAX_SIGNIFICANT_DECIMAL_DIGITS];
        let (trimmed, exponent) = trim_and_cut(&long, -3, &mut space);
        assert_eq!(trimmed.len(), MAX_SIGNIFICANT_DECIMAL_DIGITS);
        assert_eq!(trimmed[MAX_SIGNIFICANT_DECIMAL_DIGITS - 1], b'1');
        assert_eq!(trimmed[MAX_SIGNIFICANT_DECIMAL_DIGITS - 2], b'2');
        assert_eq!(exponent, -3 + 21);
    }

    #[test]
    fn reading() {
        assert_eq!(read_u64(b"12345"), (12345, 5));
        assert_eq!(read_u64(b"99999999999999999999"), (9_999_999_999_999_999_999, 19));
        assert_eq!(read_diy_fp(b"123"), (DiyFp::new(123, 0), 0));
        assert_eq!(
            read_diy_fp(b"12345678901234567895"),
            (DiyFp::new(1_234_567_890_123_456_790, 0), 1)
        );
    }

    #[test]
    fn adjustment_powers_are_exact() {
        for exponent in 1..8 {
            let power = adjustment_power_of_ten(exponent);
            let exact = 10u64.pow(exponent as u32);
            assert_eq!(power.f >> (-power.e), exact);
            assert_eq!(power.f & ((1 << -power.e) - 1), 0);
        }
    }

    #[test]
    fn guesses_out_of_range() {
        assert_eq!(compute_guess(b"1", 309), Ok(f64::INFINITY));
        assert_eq!(compute_guess(b"1", -325), Ok(0.0));
        assert_eq!(compute_guess(b"", 0), Ok(0.0));
    }
}
