//! Arbitrary-precision difficulty values.

use std::cmp::Ordering;
use std::fmt;

/// A non-negative integer stored as minimal big-endian bytes.
///
/// Zero is the empty byte string. Ordering is numeric.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Difficulty(Vec<u8>);

impl Difficulty {
    /// The difficulty of a failed or invalid proof.
    pub const ZERO: Self = Self(Vec::new());

    /// From big-endian bytes, leading zeroes allowed.
    pub fn from_be_bytes(bytes: &[u8]) -> Self {
        let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
        Self(bytes[first..].to_vec())
    }

    /// Minimal big-endian bytes. Empty for zero.
    pub fn as_be_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    /// The value, if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        self.to_u128().and_then(|v| u64::try_from(v).ok())
    }

    fn to_u128(&self) -> Option<u128> {
        if self.0.len() > 16 {
            return None;
        }
        Some(self.0.iter().fold(0u128, |acc, &b| (acc << 8) | u128::from(b)))
    }
}

impl From<u64> for Difficulty {
    fn from(value: u64) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }
}

impl From<usize> for Difficulty {
    fn from(value: usize) -> Self {
        Self::from_be_bytes(&value.to_be_bytes())
    }
}

impl Ord for Difficulty {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Difficulty {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_u128() {
            Some(value) => write!(f, "{}", value),
            None => write!(f, "0x{}", hex::encode(&self.0)),
        }
    }
}

impl fmt::Debug for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Difficulty({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero() {
        assert!(Difficulty::ZERO.is_zero());
        assert_eq!(Difficulty::from(0u64), Difficulty::ZERO);
        assert_eq!(Difficulty::from_be_bytes(&[0, 0, 0]), Difficulty::ZERO);
        assert_eq!(Difficulty::ZERO.as_be_bytes(), &[] as &[u8]);
        assert_eq!(Difficulty::ZERO.to_string(), "0");
    }

    #[test]
    fn test_minimal_encoding() {
        assert_eq!(Difficulty::from(4096usize).as_be_bytes(), &[0x10, 0x00]);
        assert_eq!(Difficulty::from_be_bytes(&[0, 0, 1, 0]).as_be_bytes(), &[1, 0]);
    }

    #[test]
    fn test_wide_values() {
        let wide = Difficulty::from_be_bytes(&[1; 20]);
        assert_eq!(wide.to_u64(), None);
        assert!(wide > Difficulty::from(u64::MAX));
        assert!(wide.to_string().starts_with("0x0101"));
    }

    proptest! {
        #[test]
        fn test_ordering_is_numeric(a: u64, b: u64) {
            prop_assert_eq!(Difficulty::from(a).cmp(&Difficulty::from(b)), a.cmp(&b));
            prop_assert_eq!(Difficulty::from(a).to_u64(), Some(a));
        }
    }
}
