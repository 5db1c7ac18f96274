//! Short Weierstrass curves `y² = x³ + ax + b` over a runtime [`Field`].
//!
//! Affine coordinates only. Every operation takes the curve explicitly; a
//! [`Point`] carries no reference to the curve it lives on.

use num_bigint::BigUint;
use rand::Rng;

use crate::field::{bits_le, Field, FieldElement};
use crate::isogeny::TwoIsogeny;
use crate::poly::Poly;
use crate::AlgebraError;

/// Largest modulus (in bits) accepted by [`Curve::count_points`].
pub const NAIVE_COUNT_MAX_BITS: u64 = 24;

/// A point on some curve: the identity or an affine pair.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Point {
    /// Point at infinity.
    Identity,
    /// Affine point `(x, y)`.
    Affine {
        /// Abscissa.
        x: FieldElement,
        /// Ordinate.
        y: FieldElement,
    },
}

impl Point {
    /// Whether this is the point at infinity.
    #[inline]
    #[must_use]
    pub const fn is_identity(&self) -> bool {
        matches!(self, Self::Identity)
    }

    /// The x-coordinate, if affine.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> Option<&FieldElement> {
        match self {
            Self::Identity => None,
            Self::Affine { x, .. } => Some(x),
        }
    }

    /// The y-coordinate, if affine.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> Option<&FieldElement> {
        match self {
            Self::Identity => None,
            Self::Affine { y, .. } => Some(y),
        }
    }
}

/// `E: y² = x³ + ax + b` over `GF(p)`, non-singular.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Curve {
    field: Field,
    a: FieldElement,
    b: FieldElement,
}

impl Curve {
    /// Build a curve, rejecting `4a³ + 27b² = 0`.
    pub fn new(field: Field, a: FieldElement, b: FieldElement) -> Result<Self, AlgebraError> {
        let a = field.element(a.into_biguint());
        let b = field.element(b.into_biguint());

        let a3 = field.mul(&field.square(&a), &a);
        let disc = field.add(&field.mul_small(&a3, 4), &field.mul_small(&field.square(&b), 27));
        if disc.is_zero() {
            return Err(AlgebraError::SingularCurve);
        }
        Ok(Self { field, a, b })
    }

    /// Convenience constructor from raw integers.
    pub fn from_coefficients(
        modulus: BigUint,
        a: BigUint,
        b: BigUint,
    ) -> Result<Self, AlgebraError> {
        let field = Field::new(modulus)?;
        let a = field.element(a);
        let b = field.element(b);
        Self::new(field, a, b)
    }

    /// Base field.
    #[inline]
    #[must_use]
    pub const fn field(&self) -> &Field {
        &self.field
    }

    /// Coefficient `a`.
    #[inline]
    #[must_use]
    pub const fn a(&self) -> &FieldElement {
        &self.a
    }

    /// Coefficient `b`.
    #[inline]
    #[must_use]
    pub const fn b(&self) -> &FieldElement {
        &self.b
    }

    /// `x³ + ax + b`.
    #[must_use]
    pub fn rhs(&self, x: &FieldElement) -> FieldElement {
        let f = &self.field;
        let x2a = f.add(&f.square(x), &self.a);
        f.add(&f.mul(&x2a, x), &self.b)
    }

    /// Whether `p` satisfies the curve equation.
    #[must_use]
    pub fn contains(&self, p: &Point) -> bool {
        match p {
            Point::Identity => true,
            Point::Affine { x, y } => self.field.square(y) == self.rhs(x),
        }
    }

    /// `-p`.
    #[must_use]
    pub fn neg(&self, p: &Point) -> Point {
        match p {
            Point::Identity => Point::Identity,
            Point::Affine { x, y } => Point::Affine {
                x: x.clone(),
                y: self.field.neg(y),
            },
        }
    }

    /// `p + q`.
    #[must_use]
    pub fn add(&self, p: &Point, q: &Point) -> Point {
        let (x1, y1, x2, y2) = match (p, q) {
            (Point::Identity, _) => return q.clone(),
            (_, Point::Identity) => return p.clone(),
            (Point::Affine { x: x1, y: y1 }, Point::Affine { x: x2, y: y2 }) => (x1, y1, x2, y2),
        };

        let f = &self.field;
        if x1 == x2 {
            if f.add(y1, y2).is_zero() {
                return Point::Identity;
            }
            return self.double(p);
        }

        // x1 != x2, so the slope denominator is invertible.
        let Some(lambda) = f.div(&f.sub(y2, y1), &f.sub(x2, x1)) else {
            return Point::Identity;
        };
        self.chord(&lambda, x1, y1, x2)
    }

    /// `2p`.
    #[must_use]
    pub fn double(&self, p: &Point) -> Point {
        let Point::Affine { x, y } = p else {
            return Point::Identity;
        };
        let f = &self.field;
        if y.is_zero() {
            return Point::Identity;
        }
        let num = f.add(&f.mul_small(&f.square(x), 3), &self.a);
        let Some(lambda) = f.div(&num, &f.mul_small(y, 2)) else {
            return Point::Identity;
        };
        self.chord(&lambda, x, y, x)
    }

    /// Third intersection of the line of slope `lambda` through `(x1, y1)`,
    /// reflected.
    fn chord(
        &self,
        lambda: &FieldElement,
        x1: &FieldElement,
        y1: &FieldElement,
        x2: &FieldElement,
    ) -> Point {
        let f = &self.field;
        let x3 = f.sub(&f.sub(&f.square(lambda), x1), x2);
        let y3 = f.sub(&f.mul(lambda, &f.sub(x1, &x3)), y1);
        Point::Affine { x: x3, y: y3 }
    }

    /// `k · p` by double-and-add.
    #[must_use]
    pub fn mul(&self, p: &Point, k: &BigUint) -> Point {
        let mut acc = Point::Identity;
        let mut base = p.clone();
        for bit in bits_le(k) {
            if bit {
                acc = self.add(&acc, &base);
            }
            base = self.double(&base);
        }
        acc
    }

    /// `2^n · p`.
    #[must_use]
    pub fn double_n(&self, p: &Point, n: u32) -> Point {
        let mut acc = p.clone();
        for _ in 0..n {
            if acc.is_identity() {
                break;
            }
            acc = self.double(&acc);
        }
        acc
    }

    /// Uniformly random affine point: random abscissa until `x³ + ax + b` is
    /// a square, then a random choice of sign.
    pub fn random_point<R: Rng + ?Sized>(&self, rng: &mut R) -> Point {
        loop {
            let x = self.field.random(rng);
            let Some(y) = self.field.sqrt(&self.rhs(&x)) else {
                continue;
            };
            let y = if rng.random::<bool>() {
                self.field.neg(&y)
            } else {
                y
            };
            return Point::Affine { x, y };
        }
    }

    /// Abscissas of the rational 2-torsion points (roots of `x³ + ax + b`),
    /// ascending.
    #[must_use]
    pub fn two_torsion_abscissas(&self) -> Vec<FieldElement> {
        let cubic = Poly::new(vec![
            self.b.clone(),
            self.a.clone(),
            FieldElement::zero(),
            FieldElement::one(),
        ]);
        cubic.roots(&self.field)
    }

    /// One rational 2-isogeny per rational 2-torsion point, in ascending
    /// kernel-abscissa order.
    pub fn two_isogenies(&self) -> Result<Vec<TwoIsogeny>, AlgebraError> {
        self.two_torsion_abscissas()
            .into_iter()
            .map(|x0| TwoIsogeny::from_kernel(self, x0))
            .collect()
    }

    /// `#E(GF(p)) = p + 1 + Σ_x χ(x³ + ax + b)`, by enumeration.
    ///
    /// Linear in `p`; refused above [`NAIVE_COUNT_MAX_BITS`].
    pub fn count_points(&self) -> Result<BigUint, AlgebraError> {
        let bits = self.field.bits();
        if bits > NAIVE_COUNT_MAX_BITS {
            return Err(AlgebraError::FieldTooLarge {
                bits,
                max_bits: NAIVE_COUNT_MAX_BITS,
            });
        }
        let p = self
            .field
            .modulus()
            .to_u64_digits()
            .first()
            .copied()
            .unwrap_or(0);

        let mut sum: i64 = 0;
        for x in 0..p {
            sum += i64::from(self.field.legendre(&self.rhs(&self.field.from_u64(x))));
        }
        let total = i64::try_from(p).unwrap_or(i64::MAX) + 1 + sum;
        Ok(BigUint::from(total.unsigned_abs()))
    }
}
