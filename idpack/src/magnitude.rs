//! # Arbitrary-Width Magnitudes
//!
//! Bitmap segments carry their present/absent pattern as a single integer
//! whose binary expansion is the pattern itself. A bitmap may span as many
//! slots as the configured window size, so its value can be far wider than
//! a `u64`. [`Magnitude`] is the minimal unsigned big integer needed for
//! that: built from bits, converted to and from a positional base, and
//! expanded back into bits.
//!
//! Limbs are stored most-significant first and never carry leading zero
//! limbs, so equality on the limb vector is numeric equality and zero is the
//! empty vector.

use bitvec::prelude::{BitSlice, BitVec, Msb0};

/// Number of bits held by each limb.
const LIMB_BITS: usize = u32::BITS as usize;

/// A non-negative integer of unbounded width.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Magnitude {
    limbs: Vec<u32>,
}

impl Magnitude {
    /// Returns the zero magnitude.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Returns `true` if this magnitude is zero.
    pub fn is_zero(&self) -> bool {
        self.limbs.is_empty()
    }

    /// Builds a magnitude from a big-endian bit string. Leading zero bits
    /// are accepted and carry no value.
    pub fn from_bits(bits: &BitSlice<u8, Msb0>) -> Self {
        let mut limbs = Vec::with_capacity(bits.len().div_ceil(LIMB_BITS));

        // The first limb takes whatever does not divide evenly into 32-bit
        // chunks, every following limb is a full chunk.
        let head = bits.len() % LIMB_BITS;
        let (first, rest) = bits.split_at(head);
        if !first.is_empty() {
            limbs.push(pack_limb(first));
        }
        for chunk in rest.chunks(LIMB_BITS) {
            limbs.push(pack_limb(chunk));
        }

        let mut magnitude = Self { limbs };
        magnitude.normalize();
        magnitude
    }

    /// Expands the magnitude into its minimal big-endian bit string. The
    /// first bit is always `1`; zero expands to the empty string.
    pub fn to_bits(&self) -> BitVec<u8, Msb0> {
        let mut bits = BitVec::with_capacity(self.bit_len());
        let Some((&first, rest)) = self.limbs.split_first() else {
            return bits;
        };

        let width = LIMB_BITS - first.leading_zeros() as usize;
        for shift in (0..width).rev() {
            bits.push((first >> shift) & 1 == 1);
        }
        for &limb in rest {
            for shift in (0..LIMB_BITS).rev() {
                bits.push((limb >> shift) & 1 == 1);
            }
        }

        bits
    }

    /// Number of bits in the minimal binary expansion.
    pub fn bit_len(&self) -> usize {
        match self.limbs.first() {
            Some(first) => {
                (self.limbs.len() - 1) * LIMB_BITS + LIMB_BITS - first.leading_zeros() as usize
            }
            None => 0,
        }
    }

    /// Returns the value as a `u64` if it fits.
    pub fn to_u64(&self) -> Option<u64> {
        match self.limbs.as_slice() {
            [] => Some(0),
            [low] => Some(u64::from(*low)),
            [high, low] => Some((u64::from(*high) << LIMB_BITS) | u64::from(*low)),
            _ => None,
        }
    }

    /// Computes `self = self * factor + addend` in place.
    pub(crate) fn mul_add(&mut self, factor: u32, addend: u32) {
        let mut carry = u64::from(addend);
        for limb in self.limbs.iter_mut().rev() {
            let product = u64::from(*limb) * u64::from(factor) + carry;
            *limb = product as u32;
            carry = product >> LIMB_BITS;
        }
        if carry != 0 {
            self.limbs.insert(0, carry as u32);
        }
        self.normalize();
    }

    /// Divides in place by `divisor`, returning the remainder.
    ///
    /// `divisor` must be non-zero; callers only divide by an alphabet base,
    /// which is at least two.
    pub(crate) fn div_rem(&mut self, divisor: u32) -> u32 {
        let divisor = u64::from(divisor);
        let mut remainder = 0u64;
        for limb in self.limbs.iter_mut() {
            let current = (remainder << LIMB_BITS) | u64::from(*limb);
            *limb = (current / divisor) as u32;
            remainder = current % divisor;
        }
        self.normalize();
        remainder as u32
    }

    /// Drops leading zero limbs so that zero is always the empty vector.
    fn normalize(&mut self) {
        let leading = self.limbs.iter().take_while(|&&limb| limb == 0).count();
        self.limbs.drain(..leading);
    }
}

impl From<u64> for Magnitude {
    fn from(value: u64) -> Self {
        let mut magnitude = Self {
            limbs: vec![(value >> LIMB_BITS) as u32, value as u32],
        };
        magnitude.normalize();
        magnitude
    }
}

/// Renders the binary expansion, e.g. `Magnitude(10101)`.
impl std::fmt::Debug for Magnitude {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Magnitude(")?;
        for bit in self.to_bits().iter().by_vals() {
            write!(f, "{}", u8::from(bit))?;
        }
        write!(f, ")")
    }
}

/// Packs at most 32 bits, most significant first, into a limb.
fn pack_limb(bits: &BitSlice<u8, Msb0>) -> u32 {
    bits.iter()
        .by_vals()
        .fold(0u32, |limb, bit| (limb << 1) | u32::from(bit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitvec::bitvec;
    use proptest::prelude::*;
    use test_case::test_case;

    fn bits_of(text: &str) -> BitVec<u8, Msb0> {
        text.chars().map(|c| c == '1').collect()
    }

    fn text_of(bits: &BitSlice<u8, Msb0>) -> String {
        bits.iter().by_vals().map(|b| if b { '1' } else { '0' }).collect()
    }

    #[test_case("10101", 21; "small pattern")]
    #[test_case("11100111", 231; "two runs")]
    #[test_case("1", 1; "single bit")]
    #[test_case("0001010", 10; "leading zeros ignored")]
    #[test_case("", 0; "empty is zero")]
    fn test_from_bits(bits: &str, expected: u64) {
        let magnitude = Magnitude::from_bits(&bits_of(bits));
        assert_eq!(magnitude.to_u64(), Some(expected));
    }

    #[test_case(10, "1010"; "ten")]
    #[test_case(21, "10101"; "twenty one")]
    #[test_case(1, "1"; "one")]
    #[test_case(0, ""; "zero has no digits")]
    #[test_case(u64::MAX, &"1".repeat(64); "all ones")]
    fn test_to_bits(value: u64, expected: &str) {
        let bits = Magnitude::from(value).to_bits();
        assert_eq!(text_of(&bits), expected);
        assert_eq!(bits.len(), Magnitude::from(value).bit_len());
    }

    #[test]
    fn test_wide_bitmap_survives_expansion() {
        // A 1000-slot window with the first and last slot present.
        let mut bits = bitvec![u8, Msb0; 0; 1000];
        bits.set(0, true);
        bits.set(999, true);

        let magnitude = Magnitude::from_bits(&bits);
        assert_eq!(magnitude.bit_len(), 1000);
        assert_eq!(magnitude.to_u64(), None);
        assert_eq!(magnitude.to_bits(), bits);
    }

    #[test]
    fn test_mul_add_and_div_rem_are_inverse() {
        let mut magnitude = Magnitude::from(u64::MAX);
        magnitude.mul_add(63, 62);
        assert_eq!(magnitude.to_u64(), None);

        assert_eq!(magnitude.div_rem(63), 62);
        assert_eq!(magnitude.to_u64(), Some(u64::MAX));
    }

    #[test]
    fn test_zero() {
        let zero = Magnitude::zero();
        assert!(zero.is_zero());
        assert_eq!(zero, Magnitude::from(0));
        assert_eq!(format!("{zero:?}"), "Magnitude()");
    }

    proptest! {
        #[test]
        fn prop_bits_roundtrip(tail in prop::collection::vec(any::<bool>(), 0..300)) {
            // Minimal expansions always start with a set bit.
            let mut bits: BitVec<u8, Msb0> = BitVec::new();
            bits.push(true);
            bits.extend(tail);

            let magnitude = Magnitude::from_bits(&bits);
            prop_assert_eq!(magnitude.to_bits(), bits);
        }

        #[test]
        fn prop_u64_matches_bits(value in any::<u64>()) {
            let magnitude = Magnitude::from(value);
            let rebuilt = Magnitude::from_bits(&magnitude.to_bits());
            prop_assert_eq!(rebuilt.to_u64(), Some(value));
        }
    }
}
