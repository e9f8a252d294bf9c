//! Exact digit generation with arbitrary precision integers.
//!
//! `v` is represented as `numerator / denominator`, scaled by an estimated
//! power of ten so that the quotient lies in `[0.1, 1)` (or `[1, 10)` when
//! the estimate is one too low). Digits are then produced one at a time by
//! division; the boundary deltas track how far the half-way points to the
//! neighbouring doubles are from the remainder.

use std::cmp::Ordering;

use dc_bignum::Bignum;
use dc_fp::Double;

use crate::{Decimal, DigitBuffer, DtoaMode};

/// Always-correct digits of `v` for `mode`.
///
/// Counted modes keep trailing zeros.
///
/// Shortest mode produces the shortest digits that read back as `v`,
/// breaking ties toward an even last digit. Fixed and precision modes round
/// half-way cases up; fixed mode may return no digits, with the point at
/// `-requested`.
///
/// # Panics
/// if `v` is not strictly positive and finite
pub fn bignum_dtoa(v: f64, mode: DtoaMode) -> Decimal {
    let double = Double::new(v);
    assert!(v > 0.0 && !double.is_special(), "bignum_dtoa needs a positive finite value");
    let significand = double.significand();
    let exponent = double.exponent();
    let is_even = significand & 1 == 0;
    let estimated_power = estimate_power(normalized_exponent(significand, exponent));

    if let DtoaMode::Fixed(requested) = mode {
        if -estimated_power - 1 > requested as i32 {
            return Decimal::new(DigitBuffer::new(), -(requested as i32));
        }
    }

    let need_boundary_deltas = mode == DtoaMode::Shortest;
    let mut values = ScaledValues::new(
        significand,
        exponent,
        double.lower_boundary_is_closer(),
        estimated_power,
        need_boundary_deltas,
    );
    let mut point = values.fixup_multiply_10(estimated_power, is_even);

    let mut digits = DigitBuffer::new();
    match mode {
        DtoaMode::Shortest => values.generate_shortest_digits(is_even, &mut digits),
        DtoaMode::Fixed(requested) => values.to_fixed(requested, &mut point, &mut digits),
        DtoaMode::Precision(requested) => {
            values.generate_counted_digits(requested, &mut point, &mut digits)
        }
    }
    Decimal::new(digits, point)
}

/// Exponent of `significand * 2^exponent` once the hidden bit is set.
fn normalized_exponent(mut significand: u64, mut exponent: i32) -> i32 {
    debug_assert!(significand != 0);
    while significand & Double::HIDDEN_BIT == 0 {
        significand <<= 1;
        exponent -= 1;
    }
    exponent
}

/// `ceil(log10(v))` for a normalized `v = f * 2^exponent`, possibly one too
/// low but never too high.
fn estimate_power(exponent: i32) -> i32 {
    const INV_LOG2_10: f64 = 0.301_029_995_663_981_14;
    let estimate = f64::from(exponent + Double::SIGNIFICAND_SIZE - 1) * INV_LOG2_10 - 1e-10;
    estimate.ceil() as i32
}

struct ScaledValues {
    numerator: Bignum,
    denominator: Bignum,
    delta_minus: Bignum,
    delta_plus: Bignum,
}

impl ScaledValues {
    /// Sets up `numerator / denominator = v / 10^estimated_power`. With
    /// boundary deltas everything is doubled so that the half-way points
    /// stay integral; `delta_plus` is doubled once more when the lower
    /// neighbour is closer.
    fn new(
        significand: u64,
        exponent: i32,
        lower_boundary_is_closer: bool,
        estimated_power: i32,
        need_boundary_deltas: bool,
    ) -> Self {
        let mut numerator = Bignum::new();
        let mut denominator = Bignum::new();
        let mut delta_minus = Bignum::new();
        let mut delta_plus = Bignum::new();

        if exponent >= 0 {
            debug_assert!(estimated_power >= 0);
            numerator.assign_u64(significand);
            numerator.shift_left(exponent as usize);
            denominator.assign_power_u16(10, estimated_power as usize);
            if need_boundary_deltas {
                delta_plus.assign_u16(1);
                delta_plus.shift_left(exponent as usize);
                delta_minus.assign_u16(1);
                delta_minus.shift_left(exponent as usize);
            }
        } else if estimated_power >= 0 {
            numerator.assign_u64(significand);
            denominator.assign_power_u16(10, estimated_power as usize);
            denominator.shift_left(-exponent as usize);
            if need_boundary_deltas {
                delta_plus.assign_u16(1);
                delta_minus.assign_u16(1);
            }
        } else {
            numerator.assign_power_u16(10, -estimated_power as usize);
            if need_boundary_deltas {
                delta_plus.assign_bignum(&numerator);
                delta_minus.assign_bignum(&numerator);
            }
            numerator.multiply_by_u64(significand);
            denominator.assign_u16(1);
            denominator.shift_left(-exponent as usize);
        }

        if need_boundary_deltas {
            numerator.shift_left(1);
            denominator.shift_left(1);
            if lower_boundary_is_closer {
                numerator.shift_left(1);
                denominator.shift_left(1);
                delta_plus.shift_left(1);
            }
        }

        Self {
            numerator,
            denominator,
            delta_minus,
            delta_plus,
        }
    }

    /// Whether `numerator + delta_plus` reaches past the denominator, i.e.
    /// the upper boundary already has `estimated_power + 1` integral digits.
    fn upper_boundary_reaches_one(&self, is_even: bool) -> bool {
        let ordering = Bignum::plus_compare(&self.numerator, &self.delta_plus, &self.denominator);
        if is_even {
            ordering != Ordering::Less
        } else {
            ordering == Ordering::Greater
        }
    }

    /// Corrects a low estimate and returns the decimal point. Afterwards
    /// `numerator / denominator` lies in `[1, 10)`.
    fn fixup_multiply_10(&mut self, estimated_power: i32, is_even: bool) -> i32 {
        if self.upper_boundary_reaches_one(is_even) {
            return estimated_power + 1;
        }
        self.numerator.times_10();
        self.delta_minus.times_10();
        self.delta_plus.times_10();
        estimated_power
    }

    fn generate_shortest_digits(&mut self, is_even: bool, digits: &mut DigitBuffer) {
        // Both deltas are usually equal; keep scaling one of them then.
        let shared_delta = self.delta_minus == self.delta_plus;
        loop {
            let digit = self.numerator.divide_modulo_int_bignum(&self.denominator);
            debug_assert!(digit <= 9);
            digits.push_digit(digit as u8);

            let delta_plus = if shared_delta {
                &self.delta_minus
            } else {
                &self.delta_plus
            };
            let low_ordering = self.numerator.cmp(&self.delta_minus);
            let high_ordering = Bignum::plus_compare(&self.numerator, delta_plus, &self.denominator);
            let (in_room_minus, in_room_plus) = if is_even {
                (low_ordering != Ordering::Greater, high_ordering != Ordering::Less)
            } else {
                (low_ordering == Ordering::Less, high_ordering == Ordering::Greater)
            };

            match (in_room_minus, in_room_plus) {
                (false, false) => {
                    self.numerator.times_10();
                    self.delta_minus.times_10();
                    if !shared_delta {
                        self.delta_plus.times_10();
                    }
                }
                (true, true) => {
                    // Both candidates are in range: take the closer one.
                    let round_up = match Bignum::plus_compare(
                        &self.numerator,
                        &self.numerator,
                        &self.denominator,
                    ) {
                        Ordering::Less => false,
                        Ordering::Greater => true,
                        Ordering::Equal => (*digits.last_mut() - b'0') % 2 == 1,
                    };
                    if round_up {
                        bump_last_digit(digits);
                    }
                    return;
                }
                (true, false) => return,
                (false, true) => {
                    bump_last_digit(digits);
                    return;
                }
            }
        }
    }

    /// Exactly `count` digits, the last one rounded half up.
    fn generate_counted_digits(&mut self, count: usize, point: &mut i32, digits: &mut DigitBuffer) {
        debug_assert!(count >= 1);
        for _ in 1..count {
            let digit = self.numerator.divide_modulo_int_bignum(&self.denominator);
            debug_assert!(digit <= 9);
            digits.push_digit(digit as u8);
            self.numerator.times_10();
        }
        let digit = self.numerator.divide_modulo_int_bignum(&self.denominator);
        debug_assert!(digit <= 9);
        digits.push_digit(digit as u8);
        let remainder_half_or_more =
            Bignum::plus_compare(&self.numerator, &self.numerator, &self.denominator)
                != Ordering::Less;
        if remainder_half_or_more && digits.round_up() {
            *point += 1;
        }
    }

    fn to_fixed(&mut self, requested: usize, point: &mut i32, digits: &mut DigitBuffer) {
        let requested = requested as i32;
        match (-*point).cmp(&requested) {
            Ordering::Greater => *point = -requested,
            Ordering::Equal => {
                // Only the rounding digit is left: 0.5 * 10^point or more
                // becomes a single 1 one place to the left.
                self.denominator.times_10();
                if Bignum::plus_compare(&self.numerator, &self.numerator, &self.denominator)
                    != Ordering::Less
                {
                    digits.push_digit(1);
                    *point += 1;
                }
            }
            Ordering::Less => {
                let needed_digits = (*point + requested) as usize;
                self.generate_counted_digits(needed_digits, point, digits);
            }
        }
    }
}

/// Increments the last digit, which is known not to be a nine.
fn bump_last_digit(digits: &mut DigitBuffer) {
    let last = digits.last_mut();
    debug_assert!(*last != b'9');
    *last += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digits_of(v: f64, mode: DtoaMode) -> (String, i32) {
        let decimal = bignum_dtoa(v, mode);
        (decimal.digits.to_string(), decimal.point)
    }

    #[test]
    fn shortest() {
        assert_eq!(digits_of(1.0, DtoaMode::Shortest), ("1".to_owned(), 1));
        assert_eq!(digits_of(1.5, DtoaMode::Shortest), ("15".to_owned(), 1));
        assert_eq!(digits_of(0.1, DtoaMode::Shortest), ("1".to_owned(), 0));
        assert_eq!(digits_of(5e-324, DtoaMode::Shortest), ("5".to_owned(), -323));
        assert_eq!(digits_of(1e23, DtoaMode::Shortest), ("1".to_owned(), 24));
        assert_eq!(
            digits_of(1.7976931348623157e308, DtoaMode::Shortest),
            ("17976931348623157".to_owned(), 309)
        );
        assert_eq!(
            digits_of(3.5844466002796428e298, DtoaMode::Shortest),
            ("35844466002796428".to_owned(), 299)
        );
    }

    #[test]
    fn fixed() {
        assert_eq!(digits_of(1.0, DtoaMode::Fixed(3)), ("1000".to_owned(), 1));
        assert_eq!(digits_of(0.5, DtoaMode::Fixed(0)), ("1".to_owned(), 1));
        assert_eq!(digits_of(0.05, DtoaMode::Fixed(1)), ("1".to_owned(), 0));
        assert_eq!(digits_of(0.04, DtoaMode::Fixed(1)), (String::new(), -1));
        assert_eq!(digits_of(1e-30, DtoaMode::Fixed(5)), (String::new(), -5));
        assert_eq!(digits_of(1e23, DtoaMode::Fixed(0)), ("99999999999999991611392".to_owned(), 23));
        assert_eq!(digits_of(9.5, DtoaMode::Fixed(0)), ("1".to_owned(), 2));
    }

    #[test]
    fn precision() {
        assert_eq!(digits_of(1.0, DtoaMode::Precision(3)), ("100".to_owned(), 1));
        assert_eq!(digits_of(123.456, DtoaMode::Precision(2)), ("12".to_owned(), 3));
        assert_eq!(digits_of(99.99, DtoaMode::Precision(2)), ("10".to_owned(), 3));
        assert_eq!(digits_of(0.1, DtoaMode::Precision(20)), ("10000000000000000555".to_owned(), 0));
        assert_eq!(digits_of(5e-324, DtoaMode::Precision(5)), ("49407".to_owned(), -323));
    }
}
