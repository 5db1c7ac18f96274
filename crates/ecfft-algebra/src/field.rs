//! Prime field `GF(p)` with a modulus chosen at runtime.
//!
//! Elements are plain residues ([`FieldElement`]) and all arithmetic goes
//! through the owning [`Field`], which carries the modulus and the
//! Tonelli–Shanks constants derived from it. Nothing here is constant-time;
//! this is an offline parameter generator.

use core::fmt;

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

use crate::AlgebraError;

/// Witnesses for Miller–Rabin. Deterministic below ~3.3·10^24.
const MR_BASES: [u32; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

/// Canonical residue in `[0, p)`.
///
/// Ordered and hashable so callers can count distinct values directly.
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldElement(pub(crate) BigUint);

impl FieldElement {
    /// Zero.
    #[inline]
    #[must_use]
    pub fn zero() -> Self {
        Self(BigUint::zero())
    }

    /// One.
    #[inline]
    #[must_use]
    pub fn one() -> Self {
        Self(BigUint::one())
    }

    /// Whether this is the zero residue.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Borrow the underlying integer.
    #[inline]
    #[must_use]
    pub const fn as_biguint(&self) -> &BigUint {
        &self.0
    }

    /// Take the underlying integer.
    #[inline]
    #[must_use]
    pub fn into_biguint(self) -> BigUint {
        self.0
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// `GF(p)` for an odd prime `p > 3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Field {
    modulus: BigUint,
    /// `p - 1 = q · 2^s`, `q` odd.
    s: u64,
    q: BigUint,
    /// Smallest quadratic non-residue.
    non_residue: BigUint,
}

impl Field {
    /// Build the field for `modulus`.
    ///
    /// The modulus must be an odd prime greater than 3 (short Weierstrass
    /// form needs characteristic ≠ 2, 3). Primality is checked with
    /// Miller–Rabin over fixed bases, so very large inputs are accepted as
    /// *probable* primes.
    pub fn new(modulus: BigUint) -> Result<Self, AlgebraError> {
        if modulus <= BigUint::from(3u32) {
            return Err(AlgebraError::InvalidModulus {
                modulus,
                reason: "modulus must be greater than 3",
            });
        }
        if modulus.is_even() {
            return Err(AlgebraError::InvalidModulus {
                modulus,
                reason: "modulus must be odd",
            });
        }
        if !is_probable_prime(&modulus) {
            return Err(AlgebraError::InvalidModulus {
                modulus,
                reason: "modulus is not prime",
            });
        }

        let p_minus_1 = &modulus - 1u32;
        let s = p_minus_1.trailing_zeros().unwrap_or(0);
        let q = &p_minus_1 >> s;
        let half = &p_minus_1 >> 1u32;

        // Smallest non-residue; one exists below p since p is an odd prime.
        let mut z = BigUint::from(2u32);
        while z.modpow(&half, &modulus) != p_minus_1 {
            z += 1u32;
        }

        Ok(Self {
            modulus,
            s,
            q,
            non_residue: z,
        })
    }

    /// The modulus `p`.
    #[inline]
    #[must_use]
    pub const fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// Bit length of `p`.
    #[inline]
    #[must_use]
    pub fn bits(&self) -> u64 {
        self.modulus.bits()
    }

    /// Reduce an arbitrary integer into the field.
    #[inline]
    #[must_use]
    pub fn element(&self, value: BigUint) -> FieldElement {
        if value < self.modulus {
            FieldElement(value)
        } else {
            FieldElement(value % &self.modulus)
        }
    }

    /// From `u64`, reduced mod `p`.
    #[inline]
    #[must_use]
    pub fn from_u64(&self, value: u64) -> FieldElement {
        self.element(BigUint::from(value))
    }

    /// From signed `i64` (negative values wrap around `p`).
    #[must_use]
    pub fn from_i64(&self, value: i64) -> FieldElement {
        let magnitude = self.from_u64(value.unsigned_abs());
        if value < 0 {
            self.neg(&magnitude)
        } else {
            magnitude
        }
    }

    /// `a + b`.
    #[must_use]
    pub fn add(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        let sum = &a.0 + &b.0;
        if sum >= self.modulus {
            FieldElement(sum - &self.modulus)
        } else {
            FieldElement(sum)
        }
    }

    /// `a - b`.
    #[must_use]
    pub fn sub(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        if a.0 >= b.0 {
            FieldElement(&a.0 - &b.0)
        } else {
            FieldElement(&a.0 + &self.modulus - &b.0)
        }
    }

    /// `-a`.
    #[must_use]
    pub fn neg(&self, a: &FieldElement) -> FieldElement {
        if a.is_zero() {
            FieldElement::zero()
        } else {
            FieldElement(&self.modulus - &a.0)
        }
    }

    /// `a · b`.
    #[must_use]
    pub fn mul(&self, a: &FieldElement, b: &FieldElement) -> FieldElement {
        FieldElement((&a.0 * &b.0) % &self.modulus)
    }

    /// `a²`.
    #[inline]
    #[must_use]
    pub fn square(&self, a: &FieldElement) -> FieldElement {
        self.mul(a, a)
    }

    /// `k · a` for a small integer `k`.
    #[must_use]
    pub fn mul_small(&self, a: &FieldElement, k: u64) -> FieldElement {
        self.element(&a.0 * k)
    }

    /// `a^e`.
    #[must_use]
    pub fn pow(&self, a: &FieldElement, e: &BigUint) -> FieldElement {
        FieldElement(a.0.modpow(e, &self.modulus))
    }

    /// Multiplicative inverse; `None` for zero.
    #[must_use]
    pub fn inv(&self, a: &FieldElement) -> Option<FieldElement> {
        if a.is_zero() {
            return None;
        }
        a.0.modinv(&self.modulus).map(FieldElement)
    }

    /// `a / b`; `None` when `b` is zero.
    #[must_use]
    pub fn div(&self, a: &FieldElement, b: &FieldElement) -> Option<FieldElement> {
        self.inv(b).map(|b_inv| self.mul(a, &b_inv))
    }

    /// Invert every element with a single field inversion (Montgomery's
    /// trick). `None` if any input is zero.
    #[must_use]
    pub fn batch_inverse(&self, values: &[FieldElement]) -> Option<Vec<FieldElement>> {
        if values.is_empty() {
            return Some(Vec::new());
        }

        // prefix[i] = v_0 · … · v_{i-1}
        let mut prefix = Vec::with_capacity(values.len());
        let mut acc = FieldElement::one();
        for v in values {
            if v.is_zero() {
                return None;
            }
            prefix.push(acc.clone());
            acc = self.mul(&acc, v);
        }

        let mut acc_inv = self.inv(&acc)?;
        let mut out = vec![FieldElement::zero(); values.len()];
        for (i, v) in values.iter().enumerate().rev() {
            out[i] = self.mul(&acc_inv, &prefix[i]);
            acc_inv = self.mul(&acc_inv, v);
        }
        Some(out)
    }

    /// Legendre symbol: `0` for zero, `1` for non-zero squares, `-1` otherwise.
    #[must_use]
    pub fn legendre(&self, a: &FieldElement) -> i8 {
        if a.is_zero() {
            return 0;
        }
        let half = (&self.modulus - 1u32) >> 1u32;
        if a.0.modpow(&half, &self.modulus).is_one() {
            1
        } else {
            -1
        }
    }

    /// Whether `a` has a square root in the field (zero included).
    #[inline]
    #[must_use]
    pub fn is_square(&self, a: &FieldElement) -> bool {
        self.legendre(a) >= 0
    }

    /// A square root of `a` (Tonelli–Shanks), or `None` for non-residues.
    #[must_use]
    pub fn sqrt(&self, a: &FieldElement) -> Option<FieldElement> {
        if a.is_zero() {
            return Some(FieldElement::zero());
        }
        if self.legendre(a) != 1 {
            return None;
        }

        let p = &self.modulus;
        if self.s == 1 {
            // p ≡ 3 (mod 4)
            let e = (p + 1u32) >> 2u32;
            return Some(FieldElement(a.0.modpow(&e, p)));
        }

        let mut m = self.s;
        let mut c = self.non_residue.modpow(&self.q, p);
        let mut t = a.0.modpow(&self.q, p);
        let mut r = a.0.modpow(&((&self.q + 1u32) >> 1u32), p);

        while !t.is_one() {
            // least i with t^(2^i) = 1
            let mut i = 0u64;
            let mut t2 = t.clone();
            while !t2.is_one() {
                t2 = (&t2 * &t2) % p;
                i += 1;
                if i == m {
                    return None;
                }
            }
            let mut b = c.clone();
            for _ in 0..(m - i - 1) {
                b = (&b * &b) % p;
            }
            m = i;
            c = (&b * &b) % p;
            t = (&t * &c) % p;
            r = (&r * &b) % p;
        }
        Some(FieldElement(r))
    }

    /// Uniformly random element (rejection sampling over `bits(p)` bits).
    pub fn random<R: Rng + ?Sized>(&self, rng: &mut R) -> FieldElement {
        let bits = self.bits();
        let byte_len = usize::try_from(bits.div_ceil(8)).unwrap_or(usize::MAX);
        let excess = (byte_len as u64) * 8 - bits;
        let mut buf = vec![0u8; byte_len];
        loop {
            rng.fill(buf.as_mut_slice());
            if let Some(top) = buf.last_mut() {
                *top &= 0xff_u8 >> excess;
            }
            let candidate = BigUint::from_bytes_le(&buf);
            if candidate < self.modulus {
                return FieldElement(candidate);
            }
        }
    }
}

/// Iterate the bits of `e`, least significant first.
pub(crate) fn bits_le(e: &BigUint) -> impl Iterator<Item = bool> + '_ {
    let len = e.bits();
    e.to_u64_digits()
        .into_iter()
        .flat_map(|digit| (0..64).map(move |i| (digit >> i) & 1 == 1))
        .take(usize::try_from(len).unwrap_or(usize::MAX))
}

/// Miller–Rabin over [`MR_BASES`].
fn is_probable_prime(n: &BigUint) -> bool {
    for &base in &MR_BASES {
        let b = BigUint::from(base);
        if *n == b {
            return true;
        }
        if (n % &b).is_zero() {
            return false;
        }
    }

    let n_minus_1 = n - 1u32;
    let r = n_minus_1.trailing_zeros().unwrap_or(0);
    let d = &n_minus_1 >> r;

    'witness: for &base in &MR_BASES {
        let mut x = BigUint::from(base).modpow(&d, n);
        if x.is_one() || x == n_minus_1 {
            continue;
        }
        for _ in 1..r {
            x = (&x * &x) % n;
            if x == n_minus_1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn f(p: u64) -> Field {
        Field::new(BigUint::from(p)).unwrap()
    }

    #[test]
    fn rejects_bad_moduli() {
        for p in [0u64, 1, 2, 3, 4, 9, 15, 91, 561] {
            assert!(Field::new(BigUint::from(p)).is_err(), "p = {p} accepted");
        }
        for p in [5u64, 7, 17, 97, 65_537, 2_147_483_647] {
            assert!(Field::new(BigUint::from(p)).is_ok(), "p = {p} rejected");
        }
    }

    #[test]
    fn inverse_and_batch_inverse_agree() {
        let field = f(1009);
        let xs: Vec<_> = (1..50).map(|i| field.from_u64(i * 17)).collect();
        let batch = field.batch_inverse(&xs).unwrap();
        for (x, x_inv) in xs.iter().zip(&batch) {
            assert_eq!(field.inv(x).as_ref(), Some(x_inv));
            assert_eq!(field.mul(x, x_inv), FieldElement::one());
        }
        assert!(field.inv(&FieldElement::zero()).is_none());
        assert!(field.batch_inverse(&[field.from_u64(3), FieldElement::zero()]).is_none());
    }

    #[test]
    fn sqrt_on_both_residue_classes() {
        // 97 ≡ 1 (mod 32) exercises the full loop; 103 ≡ 3 (mod 4) the shortcut.
        for p in [97u64, 103, 17, 41] {
            let field = f(p);
            for v in 0..p {
                let a = field.from_u64(v);
                match field.sqrt(&a) {
                    Some(r) => assert_eq!(field.square(&r), a, "p = {p}, v = {v}"),
                    None => assert_eq!(field.legendre(&a), -1, "p = {p}, v = {v}"),
                }
            }
        }
    }

    #[test]
    fn from_i64_wraps_negatives() {
        let field = f(17);
        assert_eq!(field.from_i64(-1), field.from_u64(16));
        assert_eq!(field.from_i64(-34), FieldElement::zero());
        assert_eq!(field.from_i64(20), field.from_u64(3));
    }

    #[test]
    fn random_stays_below_modulus() {
        let field = f(257);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            assert!(field.random(&mut rng).as_biguint() < field.modulus());
        }
    }

    #[test]
    fn bits_le_matches_value() {
        let e = BigUint::from(0b1011_0010u32) << 70u32;
        let rebuilt = bits_le(&e)
            .enumerate()
            .filter(|(_, b)| *b)
            .fold(BigUint::zero(), |acc, (i, _)| acc + (BigUint::one() << i));
        assert_eq!(rebuilt, e);
    }
}
