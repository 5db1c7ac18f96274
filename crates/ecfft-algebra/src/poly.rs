//! Dense univariate polynomials over a runtime [`Field`].
//!
//! Coefficients are stored low-to-high degree with no trailing zeros, so the
//! zero polynomial is the empty vector. Only what curve code needs is here:
//! ring operations, Euclidean division, gcd, modular powering and root
//! finding.

use num_bigint::BigUint;

use crate::field::{bits_le, Field, FieldElement};

/// Polynomial with coefficients in some `GF(p)`, lowest degree first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Poly {
    coeffs: Vec<FieldElement>,
}

impl Poly {
    /// Build from low-to-high coefficients (trailing zeros are dropped).
    #[must_use]
    pub fn new(coeffs: Vec<FieldElement>) -> Self {
        let mut p = Self { coeffs };
        p.trim();
        p
    }

    /// The zero polynomial.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self { coeffs: Vec::new() }
    }

    /// The constant polynomial `c`.
    #[must_use]
    pub fn constant(c: FieldElement) -> Self {
        Self::new(vec![c])
    }

    /// The monomial `x`.
    #[must_use]
    pub fn x() -> Self {
        Self {
            coeffs: vec![FieldElement::zero(), FieldElement::one()],
        }
    }

    /// Coefficients, low-to-high.
    #[inline]
    #[must_use]
    pub fn coeffs(&self) -> &[FieldElement] {
        &self.coeffs
    }

    /// Degree, or `None` for the zero polynomial.
    #[inline]
    #[must_use]
    pub fn degree(&self) -> Option<usize> {
        self.coeffs.len().checked_sub(1)
    }

    /// Whether this is the zero polynomial.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Leading coefficient.
    #[inline]
    #[must_use]
    pub fn leading(&self) -> Option<&FieldElement> {
        self.coeffs.last()
    }

    fn trim(&mut self) {
        while self.coeffs.last().is_some_and(FieldElement::is_zero) {
            self.coeffs.pop();
        }
    }

    /// Horner evaluation at `x`.
    #[must_use]
    pub fn evaluate(&self, field: &Field, x: &FieldElement) -> FieldElement {
        horner(field, &self.coeffs, x)
    }

    /// `self + other`.
    #[must_use]
    pub fn add(&self, field: &Field, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let zero = FieldElement::zero();
        let coeffs = (0..n)
            .map(|i| {
                let a = self.coeffs.get(i).unwrap_or(&zero);
                let b = other.coeffs.get(i).unwrap_or(&zero);
                field.add(a, b)
            })
            .collect();
        Self::new(coeffs)
    }

    /// `self - other`.
    #[must_use]
    pub fn sub(&self, field: &Field, other: &Self) -> Self {
        let n = self.coeffs.len().max(other.coeffs.len());
        let zero = FieldElement::zero();
        let coeffs = (0..n)
            .map(|i| {
                let a = self.coeffs.get(i).unwrap_or(&zero);
                let b = other.coeffs.get(i).unwrap_or(&zero);
                field.sub(a, b)
            })
            .collect();
        Self::new(coeffs)
    }

    /// Schoolbook product.
    #[must_use]
    pub fn mul(&self, field: &Field, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return Self::zero();
        }
        let mut out = vec![FieldElement::zero(); self.coeffs.len() + other.coeffs.len() - 1];
        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in other.coeffs.iter().enumerate() {
                let prod = field.mul(a, b);
                out[i + j] = field.add(&out[i + j], &prod);
            }
        }
        Self::new(out)
    }

    /// Euclidean division: `self = q · divisor + r` with `deg r < deg divisor`.
    /// `None` when `divisor` is zero.
    #[must_use]
    pub fn div_rem(&self, field: &Field, divisor: &Self) -> Option<(Self, Self)> {
        let lead_inv = field.inv(divisor.leading()?)?;
        let d = divisor.coeffs.len();
        if self.coeffs.len() < d {
            return Some((Self::zero(), self.clone()));
        }

        let mut rem = self.coeffs.clone();
        let mut quot = vec![FieldElement::zero(); rem.len() - d + 1];
        for shift in (0..quot.len()).rev() {
            let top = &rem[shift + d - 1];
            if top.is_zero() {
                continue;
            }
            let c = field.mul(top, &lead_inv);
            for (k, dc) in divisor.coeffs.iter().enumerate() {
                let t = field.mul(&c, dc);
                rem[shift + k] = field.sub(&rem[shift + k], &t);
            }
            quot[shift] = c;
        }
        rem.truncate(d - 1);
        Some((Self::new(quot), Self::new(rem)))
    }

    /// `self mod divisor`.
    #[must_use]
    pub fn rem(&self, field: &Field, divisor: &Self) -> Option<Self> {
        self.div_rem(field, divisor).map(|(_, r)| r)
    }

    /// Scale to leading coefficient one (zero stays zero).
    #[must_use]
    pub fn monic(&self, field: &Field) -> Self {
        match self.leading().and_then(|lc| field.inv(lc)) {
            Some(lc_inv) => Self::new(self.coeffs.iter().map(|c| field.mul(c, &lc_inv)).collect()),
            None => self.clone(),
        }
    }

    /// Monic greatest common divisor.
    #[must_use]
    pub fn gcd(&self, field: &Field, other: &Self) -> Self {
        let mut a = self.clone();
        let mut b = other.clone();
        while !b.is_zero() {
            let r = a.rem(field, &b).unwrap_or_default();
            a = b;
            b = r;
        }
        a.monic(field)
    }

    /// `self^exp mod modulus`. `None` when `modulus` is zero.
    #[must_use]
    pub fn pow_mod(&self, field: &Field, exp: &BigUint, modulus: &Self) -> Option<Self> {
        let mut base = self.rem(field, modulus)?;
        let mut acc = Self::constant(FieldElement::one()).rem(field, modulus)?;
        for bit in bits_le(exp) {
            if bit {
                acc = acc.mul(field, &base).rem(field, modulus)?;
            }
            base = base.mul(field, &base).rem(field, modulus)?;
        }
        Some(acc)
    }

    /// Distinct roots in `GF(p)`, ascending.
    ///
    /// Isolates the split part with `gcd(f, x^p - x)` and then separates the
    /// linear factors by splitting with `(x + δ)^((p-1)/2) - 1` for
    /// `δ = 0, 1, 2, …`, which keeps the result independent of any RNG.
    #[must_use]
    pub fn roots(&self, field: &Field) -> Vec<FieldElement> {
        if self.degree().unwrap_or(0) == 0 {
            return Vec::new();
        }
        let f = self.monic(field);
        let x = Self::x();
        let Some(x_p) = x.pow_mod(field, field.modulus(), &f) else {
            return Vec::new();
        };
        let split = f.gcd(field, &x_p.sub(field, &x));

        let mut roots = Vec::new();
        split_linear(field, split, &mut roots);
        roots.sort();
        roots.dedup();
        roots
    }
}

/// Collect the roots of a monic product of distinct linear factors.
fn split_linear(field: &Field, g: Poly, out: &mut Vec<FieldElement>) {
    match g.degree() {
        None | Some(0) => {}
        Some(1) => out.push(field.neg(&g.coeffs[0])),
        Some(deg) => {
            let half = (field.modulus() - 1u32) >> 1u32;
            let one = Poly::constant(FieldElement::one());
            for delta in 0u64.. {
                let shifted = Poly::new(vec![field.from_u64(delta), FieldElement::one()]);
                let Some(h) = shifted.pow_mod(field, &half, &g) else {
                    return;
                };
                let d = g.gcd(field, &h.sub(field, &one));
                if matches!(d.degree(), Some(k) if k > 0 && k < deg) {
                    if let Some((q, _)) = g.div_rem(field, &d) {
                        split_linear(field, d, out);
                        split_linear(field, q.monic(field), out);
                    }
                    return;
                }
            }
        }
    }
}

/// Evaluate low-to-high `coeffs` at `x`.
pub(crate) fn horner(field: &Field, coeffs: &[FieldElement], x: &FieldElement) -> FieldElement {
    coeffs.iter().rev().fold(FieldElement::zero(), |acc, c| {
        field.add(&field.mul(&acc, x), c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(p: u64) -> Field {
        Field::new(BigUint::from(p)).unwrap()
    }

    fn poly(field: &Field, coeffs: &[i64]) -> Poly {
        Poly::new(coeffs.iter().map(|&c| field.from_i64(c)).collect())
    }

    #[test]
    fn div_rem_reconstructs() {
        let f = field(101);
        let a = poly(&f, &[3, -7, 0, 5, 1, 9]);
        let b = poly(&f, &[2, 0, 4]);
        let (q, r) = a.div_rem(&f, &b).unwrap();
        assert!(r.degree().unwrap_or(0) < 2);
        assert_eq!(q.mul(&f, &b).add(&f, &r), a);
        assert!(a.div_rem(&f, &Poly::zero()).is_none());
    }

    #[test]
    fn gcd_of_products() {
        let f = field(97);
        // (x - 2)(x - 5) and (x - 5)(x + 1)
        let a = poly(&f, &[10, -7, 1]);
        let b = poly(&f, &[-5, -4, 1]);
        assert_eq!(a.gcd(&f, &b), poly(&f, &[-5, 1]));
    }

    #[test]
    fn roots_of_split_cubic() {
        let f = field(1009);
        // (x - 3)(x - 10)(x - 500)
        let lin = |r: i64| poly(&f, &[-r, 1]);
        let cubic = lin(3).mul(&f, &lin(10)).mul(&f, &lin(500));
        let roots = cubic.roots(&f);
        assert_eq!(roots, vec![f.from_u64(3), f.from_u64(10), f.from_u64(500)]);
    }

    #[test]
    fn roots_brute_force_agreement() {
        let f = field(97);
        for a in 0..8i64 {
            for b in 1..8i64 {
                let cubic = poly(&f, &[b, a, 0, 1]);
                let expected: Vec<_> = (0..97u64)
                    .map(|x| f.from_u64(x))
                    .filter(|x| cubic.evaluate(&f, x).is_zero())
                    .collect();
                assert_eq!(cubic.roots(&f), expected, "a = {a}, b = {b}");
            }
        }
    }
}
