use dc_fp::cached_powers::{self, DECIMAL_EXPONENT_DISTANCE, MAX_DECIMAL_EXPONENT, MIN_DECIMAL_EXPONENT};
use dc_fp::{DiyFp, Double};
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn cached_powers_match_their_decimal_exponent() {
    let log10_2 = 2f64.log10();
    for k in (MIN_DECIMAL_EXPONENT..=MAX_DECIMAL_EXPONENT).step_by(DECIMAL_EXPONENT_DISTANCE as usize) {
        let (power, found) = cached_powers::for_decimal_exponent(k);
        assert_eq!(found, k);
        assert_eq!(power.f >> 63, 1, "10^{} is not normalized", k);
        let approx = (power.f as f64).log10() + f64::from(power.e) * log10_2;
        assert!((approx - f64::from(k)).abs() < 1e-9, "10^{} ~ 10^{}", k, approx);
    }
}

#[test]
fn cached_power_for_decimal_exponent_rounds_down() {
    for requested in MIN_DECIMAL_EXPONENT..MAX_DECIMAL_EXPONENT + DECIMAL_EXPONENT_DISTANCE {
        let (_, found) = cached_powers::for_decimal_exponent(requested);
        assert!(found <= requested);
        assert!(requested < found + DECIMAL_EXPONENT_DISTANCE);
    }
}

#[test]
fn cached_power_lands_in_grisu_window() {
    // every normalized binary exponent a positive double can have
    for e in -1137..=960 {
        let min = -60 - (e + 64);
        let max = -32 - (e + 64);
        let (power, _) = cached_powers::for_binary_exponent_range(min, max);
        let scaled = e + power.e + 64;
        assert!((-60..=-32).contains(&scaled), "e = {} scaled to {}", e, scaled);
    }
}

#[test]
fn double_decomposition() {
    let one = Double::new(1.0);
    assert_eq!(one.significand(), Double::HIDDEN_BIT);
    assert_eq!(one.exponent(), -52);
    assert_eq!(one.sign(), 1);
    assert!(!one.is_denormal());

    let min = Double::from_bits(1);
    assert!(min.is_denormal());
    assert_eq!(min.significand(), 1);
    assert_eq!(min.exponent(), -1074);

    assert_eq!(Double::new(-0.0).sign(), -1);
    assert!(Double::INFINITY.is_infinite());
    assert!(!Double::INFINITY.is_nan());
    assert!(Double::NAN.is_nan());
    assert!(Double::NAN.is_special());
    assert!(Double::new(f64::NAN).is_nan());
}

#[test]
fn normalized_diy_fp() {
    let d = Double::new(1.0).as_normalized_diy_fp();
    assert_eq!(d, DiyFp::new(0x8000_0000_0000_0000, -63));

    let min = Double::from_bits(1).as_normalized_diy_fp();
    assert_eq!(min, DiyFp::new(0x8000_0000_0000_0000, -1074 - 63));
}

#[test]
fn boundaries() {
    let (minus, plus) = Double::new(1.5).normalized_boundaries();
    let w = Double::new(1.5).as_normalized_diy_fp();
    assert_eq!(minus.e, plus.e);
    assert_eq!(plus.e, w.e);
    assert_eq!(plus.f - w.f, w.f - minus.f);

    // 1.0 is a power of two: the predecessor is twice as close
    let (minus, plus) = Double::new(1.0).normalized_boundaries();
    let w = Double::new(1.0).as_normalized_diy_fp();
    assert!(Double::new(1.0).lower_boundary_is_closer());
    assert_eq!(plus.f - w.f, 2 * (w.f - minus.f));

    // the smallest normal keeps a symmetric interval
    let smallest_normal = Double::new(f64::MIN_POSITIVE);
    assert!(!smallest_normal.lower_boundary_is_closer());
    assert!(!Double::new(0.5e-323).lower_boundary_is_closer());
}

#[test]
fn upper_boundary() {
    let upper = Double::new(1.0).upper_boundary();
    assert_eq!(upper, DiyFp::new((1 << 53) + 1, -53));
}

#[test]
fn next_and_previous() {
    assert_eq!(Double::new(0.0).next_double(), 5e-324);
    assert_eq!(Double::new(-0.0).next_double(), 0.0);
    assert_eq!(Double::new(0.0).previous_double(), -0.0);
    assert_eq!(Double::new(f64::MAX).next_double(), f64::INFINITY);
    assert_eq!(Double::INFINITY.next_double(), f64::INFINITY);
    assert_eq!(Double::new(f64::NEG_INFINITY).previous_double(), f64::NEG_INFINITY);
    assert_eq!(Double::new(1.0).next_double(), 1.0 + f64::EPSILON);

    let mut rng = StdRng::seed_from_u64(0x5EED);
    for _ in 0..10_000 {
        let v = f64::from_bits(rng.random::<u64>() & !(1 << 63));
        if !v.is_finite() || v == 0.0 {
            continue;
        }
        let next = Double::new(v).next_double();
        assert_eq!(Double::new(next).previous_double(), v);
        let neg = -v;
        let prev = Double::new(neg).previous_double();
        assert_eq!(Double::new(prev).next_double(), neg);
    }
}

#[test]
fn significand_size_for_order_of_magnitude() {
    assert_eq!(Double::significand_size_for_order_of_magnitude(0), 53);
    assert_eq!(Double::significand_size_for_order_of_magnitude(-1021), 53);
    assert_eq!(Double::significand_size_for_order_of_magnitude(-1022), 52);
    assert_eq!(Double::significand_size_for_order_of_magnitude(-1073), 1);
    assert_eq!(Double::significand_size_for_order_of_magnitude(-1074), 0);
    assert_eq!(Double::significand_size_for_order_of_magnitude(-2000), 0);
}
