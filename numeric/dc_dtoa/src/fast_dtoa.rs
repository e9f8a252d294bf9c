//! Grisu3: shortest and counted digit generation with 64-bit integers.
//!
//! The input `w` and its boundaries are multiplied by a cached power of ten
//! `c = 10^-k` chosen so that the binary exponent of the product lands in
//! `[MINIMAL_TARGET_EXPONENT, MAXIMAL_TARGET_EXPONENT]`. With `one = 2^-e`
//! the scaled value splits into a 32-bit integral part and a fractional part
//! that can be multiplied by ten without overflowing.
//!
//! Every multiplication may be off by half a unit, so the scaled boundaries
//! are widened by one unit on each side. A digit sequence is only reported
//! when it provably lies inside the narrowed ("safe") interval and is
//! provably the closest candidate to `w`. Otherwise the functions return
//! `None` and the exact generator in [`crate::bignum_dtoa`] must be used.
//! This happens for roughly half a percent of all doubles.

use dc_fp::{cached_powers, DiyFp, Double};

use crate::{Decimal, DigitBuffer};

const MINIMAL_TARGET_EXPONENT: i32 = -60;
const MAXIMAL_TARGET_EXPONENT: i32 = -32;

const SMALL_POWERS_OF_TEN: [u32; 11] = [
    0,
    1,
    10,
    100,
    1000,
    10000,
    100_000,
    1_000_000,
    10_000_000,
    100_000_000,
    1_000_000_000,
];

/// Shortest digits that read back as `v`, or `None` when the result cannot
/// be proven correct.
///
/// # Panics
/// in debug builds, if `v` is not finite and positive
pub fn shortest(v: f64) -> Option<Decimal> {
    debug_assert!(v > 0.0 && v.is_finite());
    let double = Double::new(v);
    let w = double.as_normalized_diy_fp();
    let (boundary_minus, boundary_plus) = double.normalized_boundaries();
    debug_assert_eq!(boundary_plus.e, w.e);

    let (ten_mk, mk) = cached_power_for(w);
    let scaled_w = w * ten_mk;
    let scaled_boundary_minus = boundary_minus * ten_mk;
    let scaled_boundary_plus = boundary_plus * ten_mk;

    let mut digits = DigitBuffer::new();
    let kappa = digit_gen(scaled_boundary_minus, scaled_w, scaled_boundary_plus, &mut digits)?;
    let point = digits.len() as i32 - mk + kappa;
    Some(Decimal::new(digits, point))
}

/// The first `requested_digits` digits of `v`, correctly rounded, or `None`
/// when the rounding cannot be decided.
///
/// # Panics
/// in debug builds, if `v` is not finite and positive
pub fn precision(v: f64, requested_digits: usize) -> Option<Decimal> {
    debug_assert!(v > 0.0 && v.is_finite());
    let w = Double::new(v).as_normalized_diy_fp();
    let (ten_mk, mk) = cached_power_for(w);
    let scaled_w = w * ten_mk;

    let mut digits = DigitBuffer::new();
    let kappa = digit_gen_counted(scaled_w, requested_digits, &mut digits)?;
    let point = digits.len() as i32 - mk + kappa;
    Some(Decimal::new(digits, point))
}

fn cached_power_for(w: DiyFp) -> (DiyFp, i32) {
    let min_exponent = MINIMAL_TARGET_EXPONENT - (w.e + DiyFp::SIGNIFICAND_SIZE);
    let max_exponent = MAXIMAL_TARGET_EXPONENT - (w.e + DiyFp::SIGNIFICAND_SIZE);
    let (ten_mk, mk) = cached_powers::for_binary_exponent_range(min_exponent, max_exponent);
    debug_assert!(MINIMAL_TARGET_EXPONENT <= w.e + ten_mk.e + DiyFp::SIGNIFICAND_SIZE);
    debug_assert!(w.e + ten_mk.e + DiyFp::SIGNIFICAND_SIZE <= MAXIMAL_TARGET_EXPONENT);
    (ten_mk, mk)
}

/// Moves the last digit towards `w` while that keeps it inside the safe
/// interval, then checks that the result is unambiguous.
///
/// All quantities are distances measured from `too_high`, the widened upper
/// boundary: `rest` is the distance of the current digits, `unit` the
/// uncertainty of one scaled multiplication.
fn round_weed(
    digits: &mut DigitBuffer,
    distance_too_high_w: u64,
    unsafe_interval: u64,
    mut rest: u64,
    ten_kappa: u64,
    unit: u64,
) -> bool {
    let small_distance = distance_too_high_w - unit;
    let big_distance = distance_too_high_w + unit;

    debug_assert!(rest <= unsafe_interval);
    // Decrement while the next lower candidate is still safe and at least as
    // close to w_high (the upper bound of where w can be).
    while rest < small_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < small_distance
            || small_distance - rest >= rest + ten_kappa - small_distance)
    {
        *digits.last_mut() -= 1;
        rest += ten_kappa;
    }

    // Seen from w_low the lower candidate might be the closer one: too close
    // to call.
    if rest < big_distance
        && unsafe_interval - rest >= ten_kappa
        && (rest + ten_kappa < big_distance
            || big_distance - rest > rest + ten_kappa - big_distance)
    {
        return false;
    }

    // The candidate must keep a margin of 2 units to too_high and 4 units to
    // too_low.
    2 * unit <= rest && rest <= unsafe_interval.wrapping_sub(4 * unit)
}

/// Rounds a counted digit sequence whose exact remainder is `rest`, known up
/// to `unit`. Returns `false` when both directions are possible.
fn round_weed_counted(
    digits: &mut DigitBuffer,
    rest: u64,
    ten_kappa: u64,
    unit: u64,
    kappa: &mut i32,
) -> bool {
    debug_assert!(rest < ten_kappa);
    if unit >= ten_kappa || ten_kappa - unit <= unit {
        return false;
    }
    // rest + unit is still below half of ten_kappa: round down.
    if ten_kappa - rest > rest && ten_kappa - 2 * rest >= 2 * unit {
        return true;
    }
    // rest - unit is already above half of ten_kappa: round up.
    if rest > unit && ten_kappa - (rest - unit) <= rest - unit {
        if digits.round_up() {
            *kappa += 1;
        }
        return true;
    }
    false
}

/// Largest power of ten `<= number` and its exponent plus one. `number_bits`
/// bounds the bit length of `number`; the guess `bits * log10(2)` is off by
/// at most one.
fn biggest_power_ten(number: u32, number_bits: i32) -> (u32, i32) {
    debug_assert!(u64::from(number) < 1u64 << (number_bits + 1));
    // 1233 / 4096 ~= log10(2)
    let mut exponent_plus_one = ((number_bits + 1) * 1233 >> 12) + 1;
    if number < SMALL_POWERS_OF_TEN[exponent_plus_one as usize] {
        exponent_plus_one -= 1;
    }
    (SMALL_POWERS_OF_TEN[exponent_plus_one as usize], exponent_plus_one)
}

/// Generates the shortest digits of any value strictly between `low` and
/// `high` that is closest to `w`. Returns `kappa` such that the digits times
/// `10^kappa` approximate the scaled `w`.
fn digit_gen(low: DiyFp, w: DiyFp, high: DiyFp, digits: &mut DigitBuffer) -> Option<i32> {
    debug_assert!(low.e == w.e && w.e == high.e);
    debug_assert!(low.f + 1 <= high.f - 1);
    debug_assert!(MINIMAL_TARGET_EXPONENT <= w.e && w.e <= MAXIMAL_TARGET_EXPONENT);

    let mut unit: u64 = 1;
    let too_low = DiyFp::new(low.f - unit, low.e);
    let too_high = DiyFp::new(high.f + unit, high.e);
    let mut unsafe_interval = too_high - too_low;
    let one = DiyFp::new(1 << -w.e, w.e);
    let shift = -one.e;

    let mut integrals = (too_high.f >> shift) as u32;
    let mut fractionals = too_high.f & (one.f - 1);
    let (mut divisor, mut kappa) =
        biggest_power_ten(integrals, DiyFp::SIGNIFICAND_SIZE - shift);

    while kappa > 0 {
        let digit = integrals / divisor;
        digits.push_digit(digit as u8);
        integrals %= divisor;
        kappa -= 1;
        let rest = (u64::from(integrals) << shift) + fractionals;
        if rest < unsafe_interval.f {
            let ten_kappa = u64::from(divisor) << shift;
            return round_weed(
                digits,
                (too_high - w).f,
                unsafe_interval.f,
                rest,
                ten_kappa,
                unit,
            )
            .then(|| kappa);
        }
        divisor /= 10;
    }

    debug_assert!(fractionals < one.f);
    debug_assert!(u64::MAX / 10 >= one.f);
    loop {
        fractionals *= 10;
        unit *= 10;
        unsafe_interval.f *= 10;
        let digit = (fractionals >> shift) as u8;
        digits.push_digit(digit);
        fractionals &= one.f - 1;
        kappa -= 1;
        if fractionals < unsafe_interval.f {
            return round_weed(
                digits,
                (too_high - w).f * unit,
                unsafe_interval.f,
                fractionals,
                one.f,
                unit,
            )
            .then(|| kappa);
        }
    }
}

/// Generates exactly `requested_digits` digits of `w`, whose error is at
/// most one unit.
fn digit_gen_counted(w: DiyFp, mut requested_digits: usize, digits: &mut DigitBuffer) -> Option<i32> {
    debug_assert!(MINIMAL_TARGET_EXPONENT <= w.e && w.e <= MAXIMAL_TARGET_EXPONENT);

    let mut w_error: u64 = 1;
    let one = DiyFp::new(1 << -w.e, w.e);
    let shift = -one.e;
    let mut integrals = (w.f >> shift) as u32;
    let mut fractionals = w.f & (one.f - 1);
    let (mut divisor, mut kappa) =
        biggest_power_ten(integrals, DiyFp::SIGNIFICAND_SIZE - shift);

    while kappa > 0 {
        let digit = integrals / divisor;
        digits.push_digit(digit as u8);
        requested_digits -= 1;
        integrals %= divisor;
        kappa -= 1;
        if requested_digits == 0 {
            break;
        }
        divisor /= 10;
    }

    if requested_digits == 0 {
        let rest = (u64::from(integrals) << shift) + fractionals;
        let ten_kappa = u64::from(divisor) << shift;
        return round_weed_counted(digits, rest, ten_kappa, w_error, &mut kappa).then(|| kappa);
    }

    debug_assert!(fractionals < one.f);
    debug_assert!(u64::MAX / 10 >= one.f);
    while requested_digits > 0 && fractionals > w_error {
        fractionals *= 10;
        w_error *= 10;
        let digit = (fractionals >> shift) as u8;
        digits.push_digit(digit);
        requested_digits -= 1;
        fractionals &= one.f - 1;
        kappa -= 1;
    }
    if requested_digits != 0 {
        return None;
    }
    round_weed_counted(digits, fractionals, one.f, w_error, &mut kappa).then(|| kappa)
}
