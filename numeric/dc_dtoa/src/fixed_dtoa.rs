//! Fixed notation with at most 20 fractional digits for values below 2^73,
//! using plain 64-bit and 128-bit integer arithmetic.

use dc_fp::Double;

use crate::{Decimal, DigitBuffer};

const DOUBLE_SIGNIFICAND_SIZE: i32 = 53;
const MAX_EXPONENT: i32 = 20;
const MAX_FRACTIONAL_COUNT: usize = 20;
const TEN_7: u64 = 10_000_000;

/// Digits of `v` rounded to `fractional_count` digits after the point
/// (half-way cases round up), with leading and trailing zeros trimmed.
///
/// Returns `None` when `v >= 2^73` or more than 20 fractional digits are
/// requested. An empty digit sequence means `v` rounds to zero; the point
/// is then `-fractional_count`.
pub fn fixed(v: f64, fractional_count: usize) -> Option<Decimal> {
    let double = Double::new(v);
    let mut significand = double.significand();
    let exponent = double.exponent();

    // v = significand * 2^exponent with a 53-bit significand
    if exponent > MAX_EXPONENT || fractional_count > MAX_FRACTIONAL_COUNT {
        return None;
    }

    let mut digits = DigitBuffer::new();
    let mut point;
    if exponent + DOUBLE_SIGNIFICAND_SIZE > 64 {
        // The integer does not fit a u64. Divide by 10^17 = 5^17 * 2^17 so
        // that the quotient fits 32 bits and the remainder 64 bits.
        const FIVE_17: u64 = 0xB1_A2BC_2EC5;
        const DIVISOR_POWER: i32 = 17;
        let mut divisor = FIVE_17;
        let dividend;
        let quotient;
        let remainder;
        if exponent > DIVISOR_POWER {
            dividend = significand << (exponent - DIVISOR_POWER);
            quotient = (dividend / divisor) as u32;
            remainder = (dividend % divisor) << DIVISOR_POWER;
        } else {
            dividend = significand;
            divisor <<= DIVISOR_POWER - exponent;
            quotient = (dividend / divisor) as u32;
            remainder = (dividend % divisor) << exponent;
        }
        fill_digits32(quotient, &mut digits);
        fill_digits64_fixed_length(remainder, &mut digits);
        point = digits.len() as i32;
    } else if exponent >= 0 {
        significand <<= exponent;
        fill_digits64(significand, &mut digits);
        point = digits.len() as i32;
    } else if exponent > -DOUBLE_SIGNIFICAND_SIZE {
        let integrals = significand >> -exponent;
        let fractionals = significand - (integrals << -exponent);
        if integrals > u64::from(u32::MAX) {
            fill_digits64(integrals, &mut digits);
        } else {
            fill_digits32(integrals as u32, &mut digits);
        }
        point = digits.len() as i32;
        fill_fractionals(fractionals, exponent, fractional_count, &mut digits, &mut point);
    } else if exponent < -128 {
        // Below 2^-75: nothing survives 20 fractional digits.
        point = -(fractional_count as i32);
    } else {
        point = 0;
        fill_fractionals(significand, exponent, fractional_count, &mut digits, &mut point);
    }

    digits.trim_trailing_zeros();
    point -= digits.trim_leading_zeros() as i32;
    if digits.is_empty() {
        point = -(fractional_count as i32);
    }
    Some(Decimal::new(digits, point))
}

fn fill_digits32_fixed_length(mut number: u32, requested_length: usize, digits: &mut DigitBuffer) {
    let mut scratch = [0u8; 10];
    for slot in scratch[..requested_length].iter_mut().rev() {
        *slot = (number % 10) as u8;
        number /= 10;
    }
    for &digit in &scratch[..requested_length] {
        digits.push_digit(digit);
    }
}

/// Appends the digits of `number` without leading zeros; nothing for zero.
fn fill_digits32(mut number: u32, digits: &mut DigitBuffer) {
    let mut scratch = [0u8; 10];
    let mut number_length = 0;
    while number != 0 {
        scratch[number_length] = (number % 10) as u8;
        number /= 10;
        number_length += 1;
    }
    for &digit in scratch[..number_length].iter().rev() {
        digits.push_digit(digit);
    }
}

/// Appends exactly 17 digits.
fn fill_digits64_fixed_length(mut number: u64, digits: &mut DigitBuffer) {
    let part2 = (number % TEN_7) as u32;
    number /= TEN_7;
    let part1 = (number % TEN_7) as u32;
    let part0 = (number / TEN_7) as u32;

    fill_digits32_fixed_length(part0, 3, digits);
    fill_digits32_fixed_length(part1, 7, digits);
    fill_digits32_fixed_length(part2, 7, digits);
}

fn fill_digits64(mut number: u64, digits: &mut DigitBuffer) {
    let part2 = (number % TEN_7) as u32;
    number /= TEN_7;
    let part1 = (number % TEN_7) as u32;
    let part0 = (number / TEN_7) as u32;

    if part0 != 0 {
        fill_digits32(part0, digits);
        fill_digits32_fixed_length(part1, 7, digits);
        fill_digits32_fixed_length(part2, 7, digits);
    } else if part1 != 0 {
        fill_digits32(part1, digits);
        fill_digits32_fixed_length(part2, 7, digits);
    } else {
        fill_digits32(part2, digits);
    }
}

fn round_up(digits: &mut DigitBuffer, point: &mut i32) {
    if digits.is_empty() {
        digits.push_digit(1);
        *point = 1;
    } else if digits.round_up() {
        *point += 1;
    }
}

/// Appends up to `fractional_count` digits of `fractionals * 2^exponent`,
/// a value below one, and rounds on the first dropped bit.
///
/// Multiplying by ten is done as multiplying by five and moving the binary
/// point one to the left, which keeps the numbers small.
fn fill_fractionals(
    fractionals: u64,
    exponent: i32,
    fractional_count: usize,
    digits: &mut DigitBuffer,
    point: &mut i32,
) {
    debug_assert!((-128..=0).contains(&exponent));
    if -exponent <= 64 {
        debug_assert!(fractionals >> 56 == 0);
        let mut fractionals = fractionals;
        let mut binary_point = -exponent;
        for _ in 0..fractional_count {
            if fractionals == 0 {
                break;
            }
            fractionals *= 5;
            binary_point -= 1;
            let digit = fractionals >> binary_point;
            digits.push_digit(digit as u8);
            fractionals -= digit << binary_point;
        }
        // With the binary point at zero nothing is left to round.
        if binary_point > 0 && (fractionals >> (binary_point - 1)) & 1 == 1 {
            round_up(digits, point);
        }
    } else {
        debug_assert!(64 < -exponent && -exponent <= 128);
        let mut fractionals = u128::from(fractionals) << 64;
        fractionals >>= -exponent - 64;
        let mut binary_point = 128;
        for _ in 0..fractional_count {
            if fractionals == 0 {
                break;
            }
            fractionals *= 5;
            binary_point -= 1;
            let digit = fractionals >> binary_point;
            digits.push_digit(digit as u8);
            fractionals -= digit << binary_point;
        }
        if (fractionals >> (binary_point - 1)) & 1 == 1 {
            round_up(digits, point);
        }
    }
}
