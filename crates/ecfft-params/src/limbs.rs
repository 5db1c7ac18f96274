//! Fixed-width 64-bit limb encoding of field-sized integers.
//!
//! Every integer in an artifact occupies exactly `num_limbs(p)` words,
//! least significant word first, regardless of its own magnitude.

use num_bigint::BigUint;
use num_traits::Zero;

/// `ceil(bits(p) / 64)`.
#[inline]
#[must_use]
pub fn num_limbs(modulus: &BigUint) -> usize {
    usize::try_from(modulus.bits().div_ceil(64)).unwrap_or(usize::MAX)
}

/// Little-limb-first words of `value`, zero-padded to `num_limbs`.
///
/// `value` must fit in `64 · num_limbs` bits; callers pass residues mod `p`.
#[must_use]
pub fn encode(value: &BigUint, num_limbs: usize) -> Vec<u64> {
    let mut words = value.to_u64_digits();
    debug_assert!(
        words.len() <= num_limbs,
        "value needs {} limbs, only {num_limbs} available",
        words.len()
    );
    words.resize(num_limbs, 0);
    words
}

/// Inverse of [`encode`].
#[must_use]
pub fn decode(words: &[u64]) -> BigUint {
    words
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, &w| (acc << 64u32) + w)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limb_counts() {
        assert_eq!(num_limbs(&BigUint::from(17u32)), 1);
        assert_eq!(num_limbs(&BigUint::from(u64::MAX)), 1);
        assert_eq!(num_limbs(&(BigUint::from(1u32) << 64u32)), 2);
        // 254-bit BN254 base field
        assert_eq!(num_limbs(&((BigUint::from(1u32) << 253u32) + 1u32)), 4);
        // 255-bit and 381-bit moduli
        assert_eq!(num_limbs(&((BigUint::from(1u32) << 255u32) - 19u32)), 4);
        assert_eq!(num_limbs(&(BigUint::from(1u32) << 380u32)), 6);
    }

    #[test]
    fn little_limb_first() {
        let v = (BigUint::from(3u32) << 128u32) + (BigUint::from(2u32) << 64u32) + 1u32;
        assert_eq!(encode(&v, 4), vec![1, 2, 3, 0]);
        assert_eq!(encode(&BigUint::zero(), 2), vec![0, 0]);
        assert_eq!(decode(&[1, 2, 3, 0]), v);
    }
}
