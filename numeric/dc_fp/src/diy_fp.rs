use std::ops::{Mul, Sub};

/// An unsigned floating point number `f * 2^e` with a full 64-bit significand.
///
/// Unlike `f64` there is no hidden bit, no sign and no special values. It is
/// only used as an intermediate while converting between binary and decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiyFp {
    pub f: u64,
    pub e: i32,
}

impl DiyFp {
    pub const SIGNIFICAND_SIZE: i32 = 64;

    pub const fn new(f: u64, e: i32) -> Self {
        DiyFp { f, e }
    }

    /// Shifts the significand left until its most significant bit is set.
    ///
    /// # Panics
    /// if the significand is zero
    pub fn normalize(self) -> Self {
        assert!(self.f != 0, "cannot normalize a zero significand");
        let shift = self.f.leading_zeros();
        DiyFp {
            f: self.f << shift,
            e: self.e - shift as i32,
        }
    }
}

impl Sub for DiyFp {
    type Output = DiyFp;

    /// Exact subtraction. Both operands must share an exponent and the
    /// result must not be negative.
    fn sub(self, other: DiyFp) -> DiyFp {
        debug_assert_eq!(self.e, other.e);
        debug_assert!(self.f >= other.f);
        DiyFp {
            f: self.f - other.f,
            e: self.e,
        }
    }
}

impl Mul for DiyFp {
    type Output = DiyFp;

    /// Keeps the upper 64 bits of the 128-bit product, rounding half up.
    /// The result is not normalized.
    fn mul(self, other: DiyFp) -> DiyFp {
        let product = u128::from(self.f) * u128::from(other.f);
        let f = ((product + (1 << 63)) >> 64) as u64;
        DiyFp {
            f,
            e: self.e + other.e + 64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DiyFp;

    #[test]
    fn multiply_rounds_half_up() {
        let a = DiyFp::new(0x8000_0000_0000_0000, 0);
        let b = DiyFp::new(1, 0);
        // 2^63 / 2^64 is exactly one half
        assert_eq!(a * b, DiyFp::new(1, 64));

        let c = DiyFp::new(0x7FFF_FFFF_FFFF_FFFF, 0);
        assert_eq!(c * b, DiyFp::new(0, 64));
    }

    #[test]
    fn multiply_full_width() {
        let a = DiyFp::new(u64::MAX, 11);
        let b = DiyFp::new(u64::MAX, 13);
        let r = a * b;
        assert_eq!(r.f, 0xFFFF_FFFF_FFFF_FFFE);
        assert_eq!(r.e, 11 + 13 + 64);
    }

    #[test]
    fn subtract() {
        let r = DiyFp::new(3, 0) - DiyFp::new(1, 0);
        assert_eq!(r, DiyFp::new(2, 0));
    }

    #[test]
    fn normalize() {
        assert_eq!(
            DiyFp::new(1, 0).normalize(),
            DiyFp::new(0x8000_0000_0000_0000, -63)
        );
        assert_eq!(
            DiyFp::new(0x0010_0000_0000_0000, 12).normalize(),
            DiyFp::new(0x8000_0000_0000_0000, 1)
        );
    }
}
