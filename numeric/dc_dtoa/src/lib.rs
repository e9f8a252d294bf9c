#![allow(clippy::must_use_candidate)]

pub mod bignum_dtoa;
mod buffer;
pub mod fast_dtoa;
pub mod fixed_dtoa;

pub use buffer::{Decimal, DigitBuffer, BUFFER_CAPACITY};

use tracing::trace;

/// How many digits [`double_to_ascii`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtoaMode {
    /// The shortest digits that read back as the same double.
    Shortest,
    /// Rounded to the given number of digits after the decimal point.
    Fixed(usize),
    /// The given number of significant digits.
    Precision(usize),
}

/// Decimal digits of `|v|` for `mode` together with the sign of `v`.
///
/// The fast integer algorithms are tried first; when they cannot prove
/// their result the exact bignum generator takes over. Zero yields the
/// digit `0` with point 1, `Precision(0)` yields no digits with point 0.
/// Digits of the counted modes may carry trailing zeros.
///
/// # Panics
/// if `v` is NaN or infinite
pub fn double_to_ascii(v: f64, mode: DtoaMode) -> (bool, Decimal) {
    assert!(v.is_finite(), "double_to_ascii needs a finite value");
    let negative = v.is_sign_negative();
    let v = v.abs();

    if mode == DtoaMode::Precision(0) {
        return (negative, Decimal::new(DigitBuffer::new(), 0));
    }
    if v == 0.0 {
        return (negative, Decimal::zero());
    }

    let fast = match mode {
        DtoaMode::Shortest => fast_dtoa::shortest(v),
        DtoaMode::Fixed(fractional_count) => fixed_dtoa::fixed(v, fractional_count),
        DtoaMode::Precision(requested_digits) => fast_dtoa::precision(v, requested_digits),
    };
    let decimal = fast.unwrap_or_else(|| {
        trace!(value = v, ?mode, "falling back to bignum digit generation");
        bignum_dtoa::bignum_dtoa(v, mode)
    });
    (negative, decimal)
}
