//! Degree-2 isogenies (Vélu) and their x-coordinate rational maps.

use crate::curve::{Curve, Point};
use crate::field::{Field, FieldElement};
use crate::poly::horner;
use crate::AlgebraError;

/// `numerator(x) / denominator(x)`, both low-to-high degree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RationalMap {
    /// Numerator coefficients, lowest degree first.
    pub numerator: Vec<FieldElement>,
    /// Denominator coefficients, lowest degree first.
    pub denominator: Vec<FieldElement>,
}

impl RationalMap {
    /// Build from coefficient vectors.
    #[inline]
    #[must_use]
    pub const fn new(numerator: Vec<FieldElement>, denominator: Vec<FieldElement>) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Evaluate at `x`; `None` at a pole.
    #[must_use]
    pub fn evaluate(&self, field: &Field, x: &FieldElement) -> Option<FieldElement> {
        let den = horner(field, &self.denominator, x);
        let num = horner(field, &self.numerator, x);
        field.div(&num, &den)
    }

    /// Evaluate at every `x` with one batched inversion; `None` if any `x`
    /// is a pole.
    #[must_use]
    pub fn evaluate_many(&self, field: &Field, xs: &[FieldElement]) -> Option<Vec<FieldElement>> {
        let dens: Vec<_> = xs.iter().map(|x| horner(field, &self.denominator, x)).collect();
        let inv = field.batch_inverse(&dens)?;
        Some(
            xs.iter()
                .zip(&inv)
                .map(|(x, d_inv)| field.mul(&horner(field, &self.numerator, x), d_inv))
                .collect(),
        )
    }

    /// Numerator then denominator coefficients.
    pub fn coefficients(&self) -> impl Iterator<Item = &FieldElement> + '_ {
        self.numerator.iter().chain(&self.denominator)
    }

    /// Total number of stored coefficients.
    #[inline]
    #[must_use]
    pub fn coefficient_count(&self) -> usize {
        self.numerator.len() + self.denominator.len()
    }
}

/// The 2-isogeny `E → E'` with kernel `{O, (x0, 0)}`.
///
/// With `t = 3x0² + a`, Vélu's formulas give
/// `ψ(x) = x + t/(x - x0) = (x² - x0·x + t)/(x - x0)`,
/// `y ↦ y · (1 - t/(x - x0)²)` and `E': y² = x³ + (a - 5t)x + (b - 7x0·t)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TwoIsogeny {
    kernel_x: FieldElement,
    t: FieldElement,
    x_map: RationalMap,
    codomain: Curve,
}

impl TwoIsogeny {
    /// Isogeny of `curve` whose kernel is generated by `(kernel_x, 0)`.
    ///
    /// `kernel_x` must be a root of `x³ + ax + b`.
    pub fn from_kernel(curve: &Curve, kernel_x: FieldElement) -> Result<Self, AlgebraError> {
        let f = curve.field();
        debug_assert!(curve.rhs(&kernel_x).is_zero(), "kernel abscissa is not 2-torsion");

        let t = f.add(&f.mul_small(&f.square(&kernel_x), 3), curve.a());
        let w = f.mul(&kernel_x, &t);
        let a2 = f.sub(curve.a(), &f.mul_small(&t, 5));
        let b2 = f.sub(curve.b(), &f.mul_small(&w, 7));
        let codomain = Curve::new(f.clone(), a2, b2)?;

        let neg_x0 = f.neg(&kernel_x);
        let x_map = RationalMap::new(
            vec![t.clone(), neg_x0.clone(), FieldElement::one()],
            vec![neg_x0, FieldElement::one()],
        );

        Ok(Self {
            kernel_x,
            t,
            x_map,
            codomain,
        })
    }

    /// Abscissa of the kernel generator.
    #[inline]
    #[must_use]
    pub const fn kernel_x(&self) -> &FieldElement {
        &self.kernel_x
    }

    /// The x-coordinate rational map.
    #[inline]
    #[must_use]
    pub const fn x_map(&self) -> &RationalMap {
        &self.x_map
    }

    /// Target curve `E'`.
    #[inline]
    #[must_use]
    pub const fn codomain(&self) -> &Curve {
        &self.codomain
    }

    /// Split into map and codomain.
    #[must_use]
    pub fn into_parts(self) -> (RationalMap, Curve) {
        (self.x_map, self.codomain)
    }

    /// Image of a point of the domain curve.
    #[must_use]
    pub fn map_point(&self, p: &Point) -> Point {
        let Point::Affine { x, y } = p else {
            return Point::Identity;
        };
        let f = self.codomain.field();
        let Some(inv) = f.inv(&f.sub(x, &self.kernel_x)) else {
            // kernel point
            return Point::Identity;
        };
        let x2 = f.add(x, &f.mul(&self.t, &inv));
        let scale = f.sub(&FieldElement::one(), &f.mul(&self.t, &f.square(&inv)));
        Point::Affine {
            x: x2,
            y: f.mul(y, &scale),
        }
    }
}
