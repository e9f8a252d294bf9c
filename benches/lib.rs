use rand::{rngs::StdRng, Rng, SeedableRng};

/// Finite doubles spread over the whole exponent range.
pub fn random_doubles(count: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(count);
    while values.len() < count {
        let v = f64::from_bits(rng.random::<u64>());
        if v.is_finite() {
            values.push(v);
        }
    }
    values
}

/// Doubles as they show up in drawings: a few digits around 1 to 1000.
pub fn coordinates(count: usize, seed: u64) -> Vec<f64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| f64::from(rng.random_range(-100_000..100_000)) / 100.0)
        .collect()
}
