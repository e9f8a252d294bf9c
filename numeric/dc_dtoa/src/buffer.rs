use std::fmt;

/// Enough for 60 integral plus 60 fractional digits, or 120 significant
/// digits plus one for rounding.
pub const BUFFER_CAPACITY: usize = 128;

/// Inline, fixed-capacity run of ASCII decimal digits.
#[derive(Clone, Copy)]
pub struct DigitBuffer {
    digits: [u8; BUFFER_CAPACITY],
    len: usize,
}

impl DigitBuffer {
    pub const fn new() -> Self {
        DigitBuffer {
            digits: [0; BUFFER_CAPACITY],
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.digits[..self.len]
    }

    /// Appends the digit with numeric value `digit`.
    ///
    /// # Panics
    /// if the buffer is full or `digit` is not a decimal digit
    pub fn push_digit(&mut self, digit: u8) {
        assert!(digit <= 9, "not a decimal digit: {}", digit);
        assert!(self.len < BUFFER_CAPACITY, "digit buffer overflow");
        self.digits[self.len] = b'0' + digit;
        self.len += 1;
    }

    /// Appends `'0'` until the buffer holds `len` digits.
    pub fn pad_zeros(&mut self, len: usize) {
        while self.len < len {
            self.push_digit(0);
        }
    }

    pub fn truncate(&mut self, len: usize) {
        self.len = self.len.min(len);
    }

    /// # Panics
    /// if the buffer is empty
    pub fn last_mut(&mut self) -> &mut u8 {
        assert!(self.len > 0, "empty digit buffer");
        &mut self.digits[self.len - 1]
    }

    /// Adds one to the last digit and propagates the carry. When the carry
    /// runs off the front the buffer reads `10...0` and `true` is returned;
    /// the length is unchanged, so the caller moves the decimal point.
    ///
    /// # Panics
    /// if the buffer is empty
    pub fn round_up(&mut self) -> bool {
        assert!(self.len > 0, "empty digit buffer");
        for digit in self.digits[1..self.len].iter_mut().rev() {
            if *digit != b'9' {
                *digit += 1;
                return false;
            }
            *digit = b'0';
        }
        if self.digits[0] == b'9' {
            self.digits[0] = b'1';
            true
        } else {
            self.digits[0] += 1;
            false
        }
    }

    pub fn trim_trailing_zeros(&mut self) {
        while self.len > 0 && self.digits[self.len - 1] == b'0' {
            self.len -= 1;
        }
    }

    /// Removes leading zeros and returns how many there were.
    pub fn trim_leading_zeros(&mut self) -> usize {
        let zeros = self.as_bytes().iter().take_while(|&&d| d == b'0').count();
        if zeros != 0 {
            self.digits.copy_within(zeros..self.len, 0);
            self.len -= zeros;
        }
        zeros
    }
}

impl Default for DigitBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for DigitBuffer {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for DigitBuffer {}

impl fmt::Display for DigitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &digit in self.as_bytes() {
            write!(f, "{}", char::from(digit))?;
        }
        Ok(())
    }
}

impl fmt::Debug for DigitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self)
    }
}

/// Decimal digits with a point position: the value is
/// `0.d1d2...dn * 10^point`, i.e. `point` digits sit left of the decimal
/// point. `point` may be negative or exceed the digit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decimal {
    pub digits: DigitBuffer,
    pub point: i32,
}

impl Decimal {
    pub fn new(digits: DigitBuffer, point: i32) -> Self {
        Decimal { digits, point }
    }

    /// The single digit `0` with the point after it.
    pub fn zero() -> Self {
        let mut digits = DigitBuffer::new();
        digits.push_digit(0);
        Decimal { digits, point: 1 }
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }
}
