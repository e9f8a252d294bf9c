#![allow(clippy::must_use_candidate)]

//! Fixed-capacity unsigned big integers, just large enough for exact
//! binary/decimal conversion of doubles.
//!
//! Digits ("bigits") are 28 bits wide and stored little-endian. A separate
//! exponent counts implicit zero bigits at the low end, so left shifts by
//! whole bigits are free:
//!
//! ```text
//! value = bigits * 2^(28 * exponent)
//! ```
//!
//! Every operation keeps the number clamped: the top used bigit is non-zero,
//! and zero is represented with no used bigits and a zero exponent. Bigits at
//! or above `used_digits` are always zero.

use std::cmp::Ordering;
use std::fmt;

type Chunk = u32;
type DoubleChunk = u64;

const CHUNK_SIZE: usize = 32;
const BIGIT_SIZE: usize = 28;
const BIGIT_MASK: Chunk = (1 << BIGIT_SIZE) - 1;
const BIGIT_MASK_64: u64 = BIGIT_MASK as u64;

/// 3584 = 128 * 28. Enough for the exact value of any double multiplied by
/// the largest power of ten the converters ever need.
pub const MAX_SIGNIFICANT_BITS: usize = 3584;
const BIGIT_CAPACITY: usize = MAX_SIGNIFICANT_BITS / BIGIT_SIZE;

// 2^64 = 18446744073709551616 > 10^19
const MAX_U64_DECIMAL_DIGITS: usize = 19;

const FIVE_27: u64 = 0x6765_c793_fa10_079d;
const FIVE_13: u32 = 1_220_703_125;
const FIVE_1_TO_12: [u32; 12] = [
    5,
    25,
    125,
    625,
    3125,
    15625,
    78125,
    390_625,
    1_953_125,
    9_765_625,
    48_828_125,
    244_140_625,
];

#[derive(Clone)]
pub struct Bignum {
    bigits: [Chunk; BIGIT_CAPACITY],
    used_digits: usize,
    exponent: usize,
}

impl Default for Bignum {
    fn default() -> Self {
        Self::new()
    }
}

impl Bignum {
    pub fn new() -> Self {
        Bignum {
            bigits: [0; BIGIT_CAPACITY],
            used_digits: 0,
            exponent: 0,
        }
    }

    pub fn from_u64(value: u64) -> Self {
        let mut bignum = Bignum::new();
        bignum.assign_u64(value);
        bignum
    }

    pub fn is_zero(&self) -> bool {
        self.used_digits == 0
    }

    pub fn assign_u16(&mut self, value: u16) {
        self.zero();
        if value == 0 {
            return;
        }
        self.ensure_capacity(1);
        self.bigits[0] = Chunk::from(value);
        self.used_digits = 1;
    }

    pub fn assign_u64(&mut self, mut value: u64) {
        self.zero();
        if value == 0 {
            return;
        }
        let needed_bigits = 64 / BIGIT_SIZE + 1;
        self.ensure_capacity(needed_bigits);
        for bigit in &mut self.bigits[..needed_bigits] {
            *bigit = (value & BIGIT_MASK_64) as Chunk;
            value >>= BIGIT_SIZE;
        }
        self.used_digits = needed_bigits;
        self.clamp();
    }

    pub fn assign_bignum(&mut self, other: &Bignum) {
        self.exponent = other.exponent;
        self.bigits[..other.used_digits].copy_from_slice(&other.bigits[..other.used_digits]);
        if self.used_digits > other.used_digits {
            for bigit in &mut self.bigits[other.used_digits..self.used_digits] {
                *bigit = 0;
            }
        }
        self.used_digits = other.used_digits;
    }

    /// Assigns the value of a run of ASCII decimal digits.
    ///
    /// # Panics
    /// in debug builds, on a non-digit byte
    pub fn assign_decimal_string(&mut self, value: &[u8]) {
        self.zero();
        let mut chunks = value.chunks_exact(MAX_U64_DECIMAL_DIGITS);
        for chunk in &mut chunks {
            self.multiply_by_power_of_ten(MAX_U64_DECIMAL_DIGITS);
            self.add_u64(read_u64(chunk));
        }
        let rest = chunks.remainder();
        self.multiply_by_power_of_ten(rest.len());
        self.add_u64(read_u64(rest));
        self.clamp();
    }

    /// Assigns the value of a run of hexadecimal digits (either case).
    ///
    /// # Panics
    /// in debug builds, on a non-hex byte
    pub fn assign_hex_string(&mut self, value: &[u8]) {
        const HEX_CHARS_PER_BIGIT: usize = BIGIT_SIZE / 4;

        self.zero();
        let needed_bigits = value.len() * 4 / BIGIT_SIZE + 1;
        self.ensure_capacity(needed_bigits);
        let mut string_index = value.len();
        for i in 0..needed_bigits - 1 {
            let mut current_bigit: Chunk = 0;
            for j in 0..HEX_CHARS_PER_BIGIT {
                string_index -= 1;
                current_bigit += hex_char_value(value[string_index]) << (j * 4);
            }
            self.bigits[i] = current_bigit;
        }
        self.used_digits = needed_bigits - 1;

        let mut most_significant_bigit: Chunk = 0;
        for &c in &value[..string_index] {
            most_significant_bigit <<= 4;
            most_significant_bigit += hex_char_value(c);
        }
        if most_significant_bigit != 0 {
            self.bigits[self.used_digits] = most_significant_bigit;
            self.used_digits += 1;
        }
        self.clamp();
    }

    /// Assigns `base^power_exponent` by left-to-right binary exponentiation.
    /// Factors of two in `base` become a final shift.
    ///
    /// # Panics
    /// if `base` is zero
    pub fn assign_power_u16(&mut self, base: u16, power_exponent: usize) {
        assert!(base != 0, "zero base");
        if power_exponent == 0 {
            self.assign_u16(1);
            return;
        }
        self.zero();
        let shifts = base.trailing_zeros() as usize;
        let base = base >> shifts;
        let bit_size = 16 - base.leading_zeros() as usize;
        let final_size = bit_size * power_exponent;
        // Room for the trailing shift and the partial top bigit.
        self.ensure_capacity(final_size / BIGIT_SIZE + 2);

        let mut mask: usize = 1;
        while power_exponent >= mask {
            mask <<= 1;
        }
        // `mask` sits above the top set bit of the exponent; that bit is
        // already accounted for by starting from `base`.
        mask >>= 2;
        let mut this_value = u64::from(base);

        let mut delayed_multiplication = false;
        while mask != 0 && this_value <= u64::from(u32::MAX) {
            this_value *= this_value;
            if power_exponent & mask != 0 {
                let base_bits_mask = !((1u64 << (64 - bit_size)) - 1);
                if this_value & base_bits_mask == 0 {
                    this_value *= u64::from(base);
                } else {
                    delayed_multiplication = true;
                }
            }
            mask >>= 1;
        }
        self.assign_u64(this_value);
        if delayed_multiplication {
            self.multiply_by_u32(u32::from(base));
        }

        while mask != 0 {
            self.square();
            if power_exponent & mask != 0 {
                self.multiply_by_u32(u32::from(base));
            }
            mask >>= 1;
        }

        self.shift_left(shifts * power_exponent);
    }

    pub fn add_u64(&mut self, operand: u64) {
        if operand == 0 {
            return;
        }
        let other = Bignum::from_u64(operand);
        self.add_bignum(&other);
    }

    pub fn add_bignum(&mut self, other: &Bignum) {
        debug_assert!(self.is_clamped());
        debug_assert!(other.is_clamped());

        self.align(other);

        // One extra bigit for a final carry.
        self.ensure_capacity(1 + self.bigit_length().max(other.bigit_length()) - self.exponent);
        let mut carry: Chunk = 0;
        let mut bigit_pos = other.exponent - self.exponent;
        for &bigit in &other.bigits[..other.used_digits] {
            let sum = self.bigits[bigit_pos] + bigit + carry;
            self.bigits[bigit_pos] = sum & BIGIT_MASK;
            carry = sum >> BIGIT_SIZE;
            bigit_pos += 1;
        }
        while carry != 0 {
            let sum = self.bigits[bigit_pos] + carry;
            self.bigits[bigit_pos] = sum & BIGIT_MASK;
            carry = sum >> BIGIT_SIZE;
            bigit_pos += 1;
        }
        self.used_digits = self.used_digits.max(bigit_pos);
        debug_assert!(self.is_clamped());
    }

    /// `self -= other`.
    ///
    /// # Panics
    /// in debug builds, if `other > self`
    pub fn subtract_bignum(&mut self, other: &Bignum) {
        debug_assert!(self.is_clamped());
        debug_assert!(other.is_clamped());
        debug_assert!(*other <= *self);

        self.align(other);

        let offset = other.exponent - self.exponent;
        let mut borrow: Chunk = 0;
        let mut i = 0;
        while i < other.used_digits {
            let difference = self.bigits[i + offset]
                .wrapping_sub(other.bigits[i])
                .wrapping_sub(borrow);
            self.bigits[i + offset] = difference & BIGIT_MASK;
            borrow = difference >> (CHUNK_SIZE - 1);
            i += 1;
        }
        while borrow != 0 {
            let difference = self.bigits[i + offset].wrapping_sub(borrow);
            self.bigits[i + offset] = difference & BIGIT_MASK;
            borrow = difference >> (CHUNK_SIZE - 1);
            i += 1;
        }
        self.clamp();
    }

    pub fn shift_left(&mut self, shift_amount: usize) {
        if self.used_digits == 0 {
            return;
        }
        self.exponent += shift_amount / BIGIT_SIZE;
        let local_shift = shift_amount % BIGIT_SIZE;
        self.ensure_capacity(self.used_digits + 1);
        self.bigits_shift_left(local_shift);
    }

    pub fn multiply_by_u32(&mut self, factor: u32) {
        if factor == 1 {
            return;
        }
        if factor == 0 {
            self.zero();
            return;
        }
        if self.used_digits == 0 {
            return;
        }
        let mut carry: DoubleChunk = 0;
        for bigit in &mut self.bigits[..self.used_digits] {
            let product = DoubleChunk::from(factor) * DoubleChunk::from(*bigit) + carry;
            *bigit = (product & BIGIT_MASK_64) as Chunk;
            carry = product >> BIGIT_SIZE;
        }
        while carry != 0 {
            self.ensure_capacity(self.used_digits + 1);
            self.bigits[self.used_digits] = (carry & BIGIT_MASK_64) as Chunk;
            self.used_digits += 1;
            carry >>= BIGIT_SIZE;
        }
    }

    pub fn multiply_by_u64(&mut self, factor: u64) {
        if factor == 1 {
            return;
        }
        if factor == 0 {
            self.zero();
            return;
        }
        let mut carry: u64 = 0;
        let low = factor & 0xFFFF_FFFF;
        let high = factor >> 32;
        for bigit in &mut self.bigits[..self.used_digits] {
            let product_low = low * u64::from(*bigit);
            let product_high = high * u64::from(*bigit);
            let tmp = (carry & BIGIT_MASK_64) + product_low;
            *bigit = (tmp & BIGIT_MASK_64) as Chunk;
            carry = (carry >> BIGIT_SIZE) + (tmp >> BIGIT_SIZE) + (product_high << (32 - BIGIT_SIZE));
        }
        while carry != 0 {
            self.ensure_capacity(self.used_digits + 1);
            self.bigits[self.used_digits] = (carry & BIGIT_MASK_64) as Chunk;
            self.used_digits += 1;
            carry >>= BIGIT_SIZE;
        }
    }

    /// Multiplies by `10^exponent` as `5^exponent` followed by a shift.
    pub fn multiply_by_power_of_ten(&mut self, exponent: usize) {
        if exponent == 0 || self.used_digits == 0 {
            return;
        }
        let mut remaining_exponent = exponent;
        while remaining_exponent >= 27 {
            self.multiply_by_u64(FIVE_27);
            remaining_exponent -= 27;
        }
        while remaining_exponent >= 13 {
            self.multiply_by_u32(FIVE_13);
            remaining_exponent -= 13;
        }
        if remaining_exponent > 0 {
            self.multiply_by_u32(FIVE_1_TO_12[remaining_exponent - 1]);
        }
        self.shift_left(exponent);
    }

    pub fn times_10(&mut self) {
        self.multiply_by_u32(10);
    }

    /// Squares in place with a column-wise (Comba) convolution.
    ///
    /// # Panics
    /// if the accumulator could overflow, i.e. with 256 or more used bigits
    pub fn square(&mut self) {
        debug_assert!(self.is_clamped());
        let used = self.used_digits;
        let product_length = 2 * used;
        self.ensure_capacity(product_length);

        // Each column sums at most `used` products of two 28-bit bigits into
        // a 64-bit accumulator.
        assert!(
            used < 1 << (2 * (CHUNK_SIZE - BIGIT_SIZE)),
            "bignum too long to square"
        );

        // The product overwrites the low bigits, so square a copy placed just
        // above them. Column `i` only reads copies above position `i`.
        let copy_offset = used;
        self.bigits.copy_within(0..used, copy_offset);
        let mut accumulator: DoubleChunk = 0;
        for i in 0..used {
            for index2 in 0..=i {
                let chunk1 = self.bigits[copy_offset + i - index2];
                let chunk2 = self.bigits[copy_offset + index2];
                accumulator += DoubleChunk::from(chunk1) * DoubleChunk::from(chunk2);
            }
            self.bigits[i] = (accumulator & BIGIT_MASK_64) as Chunk;
            accumulator >>= BIGIT_SIZE;
        }
        for i in used..product_length {
            for index2 in (i + 1 - used)..used {
                let chunk1 = self.bigits[copy_offset + i - index2];
                let chunk2 = self.bigits[copy_offset + index2];
                accumulator += DoubleChunk::from(chunk1) * DoubleChunk::from(chunk2);
            }
            self.bigits[i] = (accumulator & BIGIT_MASK_64) as Chunk;
            accumulator >>= BIGIT_SIZE;
        }
        debug_assert_eq!(accumulator, 0);

        self.used_digits = product_length;
        self.exponent *= 2;
        self.clamp();
    }

    /// Divides by `other`, keeping the remainder in `self` and returning the
    /// quotient.
    ///
    /// Meant for extracting one decimal digit at a time: the quotient must fit
    /// in 16 bits, and the loop is linear in the quotient's size when the
    /// operands differ in length.
    ///
    /// # Panics
    /// in debug builds, if `other` is zero
    pub fn divide_modulo_int_bignum(&mut self, other: &Bignum) -> u16 {
        debug_assert!(self.is_clamped());
        debug_assert!(other.is_clamped());
        debug_assert!(other.used_digits > 0);

        if self.bigit_length() < other.bigit_length() {
            return 0;
        }

        self.align(other);

        let mut result: u16 = 0;

        while self.bigit_length() > other.bigit_length() {
            // The top bigit of `other` is at least 2^24, the top bigit of
            // `self` below 2^16, so this never underestimates by much.
            let top = self.bigits[self.used_digits - 1];
            debug_assert!(other.bigits[other.used_digits - 1] >= (1 << BIGIT_SIZE) / 16);
            debug_assert!(top < 0x10000);
            result += top as u16;
            self.subtract_times(other, top);
        }

        debug_assert_eq!(self.bigit_length(), other.bigit_length());

        let this_bigit = self.bigits[self.used_digits - 1];
        let other_bigit = other.bigits[other.used_digits - 1];

        if other.used_digits == 1 {
            let quotient = this_bigit / other_bigit;
            self.bigits[self.used_digits - 1] = this_bigit - other_bigit * quotient;
            debug_assert!(quotient < 0x10000);
            result += quotient as u16;
            self.clamp();
            return result;
        }

        let division_estimate = this_bigit / (other_bigit + 1);
        debug_assert!(division_estimate < 0x10000);
        result += division_estimate as u16;
        self.subtract_times(other, division_estimate);

        if other_bigit * (division_estimate + 1) > this_bigit {
            // The estimate is exact.
            return result;
        }

        while *other <= *self {
            self.subtract_bignum(other);
            result += 1;
        }
        result
    }

    /// Uppercase hexadecimal digits without prefix; `"0"` for zero.
    pub fn to_hex_string(&self) -> String {
        const HEX_CHARS_PER_BIGIT: usize = BIGIT_SIZE / 4;

        debug_assert!(self.is_clamped());
        if self.used_digits == 0 {
            return String::from("0");
        }
        let mut digits = Vec::with_capacity(self.bigit_length() * HEX_CHARS_PER_BIGIT);
        // Built least significant first, then reversed.
        for _ in 0..self.exponent * HEX_CHARS_PER_BIGIT {
            digits.push(b'0');
        }
        for &bigit in &self.bigits[..self.used_digits - 1] {
            let mut current_bigit = bigit;
            for _ in 0..HEX_CHARS_PER_BIGIT {
                digits.push(hex_char_of_value(current_bigit & 0xF));
                current_bigit >>= 4;
            }
        }
        let mut most_significant_bigit = self.bigits[self.used_digits - 1];
        while most_significant_bigit != 0 {
            digits.push(hex_char_of_value(most_significant_bigit & 0xF));
            most_significant_bigit >>= 4;
        }
        digits.reverse();
        digits.into_iter().map(char::from).collect()
    }

    /// Three-way comparison of `a + b` with `c`, without computing the sum.
    pub fn plus_compare(a: &Bignum, b: &Bignum, c: &Bignum) -> Ordering {
        debug_assert!(a.is_clamped());
        debug_assert!(b.is_clamped());
        debug_assert!(c.is_clamped());
        if a.bigit_length() < b.bigit_length() {
            return Bignum::plus_compare(b, a, c);
        }
        if a.bigit_length() + 1 < c.bigit_length() {
            return Ordering::Less;
        }
        if a.bigit_length() > c.bigit_length() {
            return Ordering::Greater;
        }
        // `b` fits entirely below the low zero bigits of `a`, so the sum has
        // the length of `a`.
        if a.exponent >= b.bigit_length() && a.bigit_length() < c.bigit_length() {
            return Ordering::Less;
        }

        let mut borrow: Chunk = 0;
        let min_exponent = a.exponent.min(b.exponent).min(c.exponent);
        for i in (min_exponent..c.bigit_length()).rev() {
            let chunk_a = a.bigit_at(i);
            let chunk_b = b.bigit_at(i);
            let chunk_c = c.bigit_at(i);
            let sum = chunk_a + chunk_b;
            if sum > chunk_c + borrow {
                return Ordering::Greater;
            }
            borrow = chunk_c + borrow - sum;
            if borrow > 1 {
                return Ordering::Less;
            }
            borrow <<= BIGIT_SIZE;
        }
        if borrow == 0 {
            Ordering::Equal
        } else {
            Ordering::Less
        }
    }

    fn ensure_capacity(&self, size: usize) {
        assert!(size <= BIGIT_CAPACITY, "bignum capacity exceeded");
    }

    fn bigit_length(&self) -> usize {
        self.used_digits + self.exponent
    }

    fn bigit_at(&self, index: usize) -> Chunk {
        if index >= self.bigit_length() || index < self.exponent {
            return 0;
        }
        self.bigits[index - self.exponent]
    }

    fn clamp(&mut self) {
        while self.used_digits > 0 && self.bigits[self.used_digits - 1] == 0 {
            self.used_digits -= 1;
        }
        if self.used_digits == 0 {
            self.exponent = 0;
        }
    }

    fn is_clamped(&self) -> bool {
        self.used_digits == 0 || self.bigits[self.used_digits - 1] != 0
    }

    fn zero(&mut self) {
        for bigit in &mut self.bigits[..self.used_digits] {
            *bigit = 0;
        }
        self.used_digits = 0;
        self.exponent = 0;
    }

    /// Lowers the exponent to `other`'s by materializing zero bigits.
    fn align(&mut self, other: &Bignum) {
        if self.exponent > other.exponent {
            let zero_digits = self.exponent - other.exponent;
            self.ensure_capacity(self.used_digits + zero_digits);
            self.bigits.copy_within(0..self.used_digits, zero_digits);
            for bigit in &mut self.bigits[..zero_digits] {
                *bigit = 0;
            }
            self.used_digits += zero_digits;
            self.exponent -= zero_digits;
        }
    }

    fn bigits_shift_left(&mut self, shift_amount: usize) {
        debug_assert!(shift_amount < BIGIT_SIZE);
        let mut carry: Chunk = 0;
        for bigit in &mut self.bigits[..self.used_digits] {
            let new_carry = *bigit >> (BIGIT_SIZE - shift_amount);
            *bigit = ((*bigit << shift_amount) + carry) & BIGIT_MASK;
            carry = new_carry;
        }
        if carry != 0 {
            self.bigits[self.used_digits] = carry;
            self.used_digits += 1;
        }
    }

    /// `self -= other * factor`. The result must not be negative.
    fn subtract_times(&mut self, other: &Bignum, factor: u32) {
        debug_assert!(self.exponent <= other.exponent);
        if factor < 3 {
            for _ in 0..factor {
                self.subtract_bignum(other);
            }
            return;
        }
        let mut borrow: Chunk = 0;
        let exponent_diff = other.exponent - self.exponent;
        for (i, &bigit) in other.bigits[..other.used_digits].iter().enumerate() {
            let product = DoubleChunk::from(factor) * DoubleChunk::from(bigit);
            let remove = DoubleChunk::from(borrow) + product;
            let difference = self.bigits[i + exponent_diff].wrapping_sub((remove & BIGIT_MASK_64) as Chunk);
            self.bigits[i + exponent_diff] = difference & BIGIT_MASK;
            borrow = (difference >> (CHUNK_SIZE - 1)) + (remove >> BIGIT_SIZE) as Chunk;
        }
        for i in other.used_digits + exponent_diff..self.used_digits {
            if borrow == 0 {
                return;
            }
            let difference = self.bigits[i].wrapping_sub(borrow);
            self.bigits[i] = difference & BIGIT_MASK;
            borrow = difference >> (CHUNK_SIZE - 1);
        }
        self.clamp();
    }
}

impl PartialEq for Bignum {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Bignum {}

impl PartialOrd for Bignum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bignum {
    fn cmp(&self, other: &Self) -> Ordering {
        debug_assert!(self.is_clamped());
        debug_assert!(other.is_clamped());
        let bigit_length_a = self.bigit_length();
        let bigit_length_b = other.bigit_length();
        if bigit_length_a != bigit_length_b {
            return bigit_length_a.cmp(&bigit_length_b);
        }
        for i in (self.exponent.min(other.exponent)..bigit_length_a).rev() {
            let ordering = self.bigit_at(i).cmp(&other.bigit_at(i));
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl fmt::Debug for Bignum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bignum(0x{})", self.to_hex_string())
    }
}

fn read_u64(digits: &[u8]) -> u64 {
    digits.iter().fold(0, |result, &c| {
        debug_assert!(c.is_ascii_digit());
        result * 10 + u64::from(c - b'0')
    })
}

fn hex_char_value(c: u8) -> Chunk {
    match c {
        b'0'..=b'9' => Chunk::from(c - b'0'),
        b'a'..=b'f' => Chunk::from(10 + c - b'a'),
        _ => {
            debug_assert!(c.is_ascii_hexdigit());
            Chunk::from(10 + c - b'A')
        }
    }
}

fn hex_char_of_value(value: Chunk) -> u8 {
    debug_assert!(value < 16);
    if value < 10 {
        b'0' + value as u8
    } else {
        b'A' + (value - 10) as u8
    }
}
