use core::fmt;
use core::ops::{Add, AddAssign};

/// A 1-bit sequence number used for duplicate suppression.
///
/// Implements wrapping arithmetic (only `+` and `+=` are supported) matching the toggle behavior
/// both endpoints rely on: adding `SeqNum::ONE` flips the bit, adding `SeqNum::ZERO` is a no-op.
#[derive(PartialEq, Eq, Copy, Clone, Default)]
pub struct SeqNum(bool);

impl SeqNum {
    /// A sequence number of 0 (the default value).
    pub const ZERO: Self = SeqNum(false);

    /// A sequence number of 1.
    pub const ONE: Self = SeqNum(true);

    /// Decodes a sequence number from its wire value (0 or 1).
    ///
    /// Any nonzero byte is treated as 1; callers that need to reject malformed values should check
    /// the raw byte themselves before calling this.
    pub fn from_wire(byte: u8) -> Self {
        SeqNum(byte != 0)
    }

    /// Encodes `self` to its wire value (0 or 1).
    pub fn to_wire(self) -> u8 {
        self.0 as u8
    }

    /// Returns the complement of `self` (0 becomes 1 and vice versa).
    pub fn complement(self) -> Self {
        SeqNum(!self.0)
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0 as u8)
    }
}

impl fmt::Debug for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        <Self as fmt::Display>::fmt(self, f)
    }
}

impl Add for SeqNum {
    type Output = Self;

    #[allow(clippy::suspicious_arithmetic_impl)] // XOR is the correct 1-bit toggle
    fn add(self, rhs: Self) -> Self {
        SeqNum(self.0 ^ rhs.0)
    }
}

impl AddAssign for SeqNum {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggles_via_one() {
        let mut seq = SeqNum::ZERO;
        seq += SeqNum::ONE;
        assert_eq!(seq, SeqNum::ONE);
        seq += SeqNum::ONE;
        assert_eq!(seq, SeqNum::ZERO);
    }

    #[test]
    fn complement_is_the_other_value() {
        assert_eq!(SeqNum::ZERO.complement(), SeqNum::ONE);
        assert_eq!(SeqNum::ONE.complement(), SeqNum::ZERO);
    }

    #[test]
    fn wire_round_trip() {
        assert_eq!(SeqNum::from_wire(0), SeqNum::ZERO);
        assert_eq!(SeqNum::from_wire(1), SeqNum::ONE);
        assert_eq!(SeqNum::ZERO.to_wire(), 0);
        assert_eq!(SeqNum::ONE.to_wire(), 1);
    }
}
