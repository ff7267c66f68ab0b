use std::fmt;
use std::fmt::{Debug, Display, Formatter};

use num::bigint::BigUint;
use num::{One, Zero};
use serde::{Deserialize, Serialize};

/// An element of a prime field, stored as its canonical representative in `[0, p)`.
///
/// A `FieldElement` does not know which field it belongs to; arithmetic goes through
/// [`PrimeField`](crate::prime_field::PrimeField), which is the only place that creates reduced
/// values. Deserialized elements are not trusted to be reduced until checked with
/// [`PrimeField::is_canonical`](crate::prime_field::PrimeField::is_canonical).
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldElement(pub(crate) BigUint);

impl FieldElement {
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    pub fn one() -> Self {
        Self(BigUint::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_nonzero(&self) -> bool {
        !self.is_zero()
    }

    pub fn is_one(&self) -> bool {
        self.0.is_one()
    }

    pub fn to_biguint(&self) -> BigUint {
        self.0.clone()
    }

    pub fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// The low 64 bits of the canonical representative.
    pub fn to_u64_lossy(&self) -> u64 {
        self.0.iter_u64_digits().next().unwrap_or(0)
    }

    /// Appends a length-prefixed little-endian encoding of this element to `buf`. The prefix makes
    /// the encoding injective across elements of different sizes.
    pub fn write_bytes(&self, buf: &mut Vec<u8>) {
        let bytes = self.0.to_bytes_le();
        buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
        buf.extend_from_slice(&bytes);
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_bytes(&mut buf);
        buf
    }
}

impl Display for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Debug for FieldElement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

/// Encodes a slice of elements as the concatenation of their length-prefixed encodings.
pub fn elements_to_bytes(elements: &[FieldElement]) -> Vec<u8> {
    let mut buf = Vec::new();
    for element in elements {
        element.write_bytes(&mut buf);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_is_length_prefixed() {
        let bytes = FieldElement(BigUint::from(0x0102u32)).to_bytes();
        assert_eq!(bytes, vec![2, 0, 0, 0, 0x02, 0x01]);

        // Two different splits of the same digits must not collide.
        let a = elements_to_bytes(&[FieldElement(BigUint::from(0x0100u32)), FieldElement::one()]);
        let b = elements_to_bytes(&[FieldElement(BigUint::from(0x01u32)), FieldElement::one()]);
        assert_ne!(a, b);
    }

    #[test]
    fn low_bits() {
        let x = FieldElement((BigUint::one() << 70u32) + BigUint::from(5u32));
        assert_eq!(x.to_u64_lossy(), 5);
        assert_eq!(FieldElement::zero().to_u64_lossy(), 0);
    }
}
