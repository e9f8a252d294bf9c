use crate::DiyFp;

const SIGN_MASK: u64 = 0x8000_0000_0000_0000;
const EXPONENT_MASK: u64 = 0x7FF0_0000_0000_0000;
const SIGNIFICAND_MASK: u64 = 0x000F_FFFF_FFFF_FFFF;
const HIDDEN_BIT: u64 = 0x0010_0000_0000_0000;
const PHYSICAL_SIGNIFICAND_SIZE: i32 = 52;
const EXPONENT_BIAS: i32 = 0x3FF + PHYSICAL_SIGNIFICAND_SIZE;
const DENORMAL_EXPONENT: i32 = -EXPONENT_BIAS + 1;
const MAX_EXPONENT: i32 = 0x7FF - EXPONENT_BIAS;
const INFINITY_BITS: u64 = 0x7FF0_0000_0000_0000;
const NAN_BITS: u64 = 0x7FF8_0000_0000_0000;

/// Read-only view over the bit pattern of an IEEE-754 binary64.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Double(u64);

impl Double {
    /// Significand bits including the hidden bit.
    pub const SIGNIFICAND_SIZE: i32 = 53;
    pub const HIDDEN_BIT: u64 = HIDDEN_BIT;
    pub const SIGNIFICAND_MASK: u64 = SIGNIFICAND_MASK;
    pub const INFINITY: Double = Double(INFINITY_BITS);
    pub const NAN: Double = Double(NAN_BITS);

    pub fn new(value: f64) -> Self {
        Double(value.to_bits())
    }

    pub const fn from_bits(bits: u64) -> Self {
        Double(bits)
    }

    /// Packs `diy_fp` into the nearest binary64 by truncation. Exponents
    /// above the finite range give infinity, below the denormal range zero.
    pub fn from_diy_fp(diy_fp: DiyFp) -> Self {
        let mut significand = diy_fp.f;
        let mut exponent = diy_fp.e;
        while significand > HIDDEN_BIT + SIGNIFICAND_MASK {
            significand >>= 1;
            exponent += 1;
        }
        if exponent >= MAX_EXPONENT {
            return Double::INFINITY;
        }
        if exponent < DENORMAL_EXPONENT {
            return Double(0);
        }
        while exponent > DENORMAL_EXPONENT && significand & HIDDEN_BIT == 0 {
            significand <<= 1;
            exponent -= 1;
        }
        let biased_exponent = if exponent == DENORMAL_EXPONENT && significand & HIDDEN_BIT == 0 {
            0
        } else {
            (exponent + EXPONENT_BIAS) as u64
        };
        Double((significand & SIGNIFICAND_MASK) | (biased_exponent << PHYSICAL_SIGNIFICAND_SIZE))
    }

    pub fn to_bits(self) -> u64 {
        self.0
    }

    pub fn value(self) -> f64 {
        f64::from_bits(self.0)
    }

    /// # Panics
    /// in debug builds, if the value is negative or not finite
    pub fn as_diy_fp(self) -> DiyFp {
        debug_assert!(self.sign() > 0);
        debug_assert!(!self.is_special());
        DiyFp::new(self.significand(), self.exponent())
    }

    /// The value as a `DiyFp` whose significand has its top bit set.
    /// Denormals are shifted up as far as needed.
    pub fn as_normalized_diy_fp(self) -> DiyFp {
        debug_assert!(self.value() > 0.0);
        let mut f = self.significand();
        let mut e = self.exponent();
        while f & HIDDEN_BIT == 0 {
            f <<= 1;
            e -= 1;
        }
        let shift = DiyFp::SIGNIFICAND_SIZE - Self::SIGNIFICAND_SIZE;
        DiyFp::new(f << shift, e - shift)
    }

    pub fn next_double(self) -> f64 {
        if self.0 == INFINITY_BITS {
            return f64::INFINITY;
        }
        if self.sign() < 0 && self.significand() == 0 {
            return 0.0;
        }
        if self.sign() < 0 {
            Double(self.0 - 1).value()
        } else {
            Double(self.0 + 1).value()
        }
    }

    pub fn previous_double(self) -> f64 {
        if self.0 == INFINITY_BITS | SIGN_MASK {
            return f64::NEG_INFINITY;
        }
        if self.sign() < 0 {
            Double(self.0 + 1).value()
        } else if self.significand() == 0 {
            -0.0
        } else {
            Double(self.0 - 1).value()
        }
    }

    /// Unbiased exponent of the significand returned by [`Double::significand`].
    pub fn exponent(self) -> i32 {
        if self.is_denormal() {
            return DENORMAL_EXPONENT;
        }
        let biased = ((self.0 & EXPONENT_MASK) >> PHYSICAL_SIGNIFICAND_SIZE) as i32;
        biased - EXPONENT_BIAS
    }

    /// The significand with the hidden bit restored for normal numbers.
    pub fn significand(self) -> u64 {
        let significand = self.0 & SIGNIFICAND_MASK;
        if self.is_denormal() {
            significand
        } else {
            significand + HIDDEN_BIT
        }
    }

    pub fn is_denormal(self) -> bool {
        self.0 & EXPONENT_MASK == 0
    }

    /// Infinity and NaN. Denormals are not special.
    pub fn is_special(self) -> bool {
        self.0 & EXPONENT_MASK == EXPONENT_MASK
    }

    pub fn is_nan(self) -> bool {
        self.is_special() && self.0 & SIGNIFICAND_MASK != 0
    }

    pub fn is_infinite(self) -> bool {
        self.is_special() && self.0 & SIGNIFICAND_MASK == 0
    }

    /// `1` or `-1`. Negative zero reports `-1`.
    pub fn sign(self) -> i32 {
        if self.0 & SIGN_MASK == 0 {
            1
        } else {
            -1
        }
    }

    /// The half-way point between this value and its successor.
    pub fn upper_boundary(self) -> DiyFp {
        debug_assert!(self.sign() > 0);
        DiyFp::new(self.significand() * 2 + 1, self.exponent() - 1)
    }

    /// Returns `(m_minus, m_plus)`, the half-way points to the neighbouring
    /// doubles. Both share the exponent of the normalized `m_plus`.
    pub fn normalized_boundaries(self) -> (DiyFp, DiyFp) {
        debug_assert!(self.value() > 0.0);
        let v = self.as_diy_fp();
        let m_plus = DiyFp::new((v.f << 1) + 1, v.e - 1).normalize();
        let m_minus = if self.lower_boundary_is_closer() {
            DiyFp::new((v.f << 2) - 1, v.e - 2)
        } else {
            DiyFp::new((v.f << 1) - 1, v.e - 1)
        };
        let m_minus = DiyFp::new(m_minus.f << (m_minus.e - m_plus.e), m_plus.e);
        (m_minus, m_plus)
    }

    /// True for powers of two above the denormal range, where the gap to the
    /// predecessor is half the gap to the successor.
    pub fn lower_boundary_is_closer(self) -> bool {
        let physical_significand_is_zero = self.0 & SIGNIFICAND_MASK == 0;
        physical_significand_is_zero && self.exponent() != DENORMAL_EXPONENT
    }

    /// Number of significand bits available to a value whose binary order of
    /// magnitude is `order`. Shrinks in the denormal range.
    pub fn significand_size_for_order_of_magnitude(order: i32) -> i32 {
        if order >= DENORMAL_EXPONENT + Self::SIGNIFICAND_SIZE {
            return Self::SIGNIFICAND_SIZE;
        }
        if order <= DENORMAL_EXPONENT {
            return 0;
        }
        order - DENORMAL_EXPONENT
    }
}

impl From<f64> for Double {
    fn from(value: f64) -> Self {
        Double::new(value)
    }
}
