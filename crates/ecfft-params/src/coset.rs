//! Additive cosets `R + ⟨G⟩` of the 2-power subgroup: the evaluation domain.

use std::collections::HashSet;

use ecfft_algebra::{Curve, FieldElement, Point};
use rand::Rng;
use tracing::{debug, trace};

use crate::error::{ParamsError, Result};
use crate::subgroup::SubgroupGenerator;

/// Shifts drawn before giving up.
pub const MAX_SHIFT_ATTEMPTS: usize = 64;

/// `H[i] = R + i·G` for `i < 2^log_n`, with pairwise distinct abscissas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CosetDomain {
    shift: Point,
    points: Vec<Point>,
    abscissas: Vec<FieldElement>,
}

impl CosetDomain {
    /// Number of points (`2^log_n`).
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// The shift `R`.
    #[inline]
    #[must_use]
    pub const fn shift(&self) -> &Point {
        &self.shift
    }

    /// `i`-th point `R + i·G`.
    #[inline]
    #[must_use]
    pub fn element(&self, i: usize) -> Option<&Point> {
        self.points.get(i)
    }

    /// All points in index order.
    #[inline]
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// `L[i] = x(H[i])`.
    #[inline]
    #[must_use]
    pub fn abscissas(&self) -> &[FieldElement] {
        &self.abscissas
    }

    /// Even/odd split of the abscissas.
    #[must_use]
    pub fn halves(&self) -> DomainHalves {
        split_halves(&self.abscissas)
    }
}

/// `S` (even indices) and `S′` (odd indices) of a coset's abscissas.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DomainHalves {
    /// `L[0], L[2], L[4], …`
    pub s: Vec<FieldElement>,
    /// `L[1], L[3], L[5], …`
    pub s_prime: Vec<FieldElement>,
}

/// Interleaved split of `xs` into even- and odd-indexed entries.
#[must_use]
pub fn split_halves(xs: &[FieldElement]) -> DomainHalves {
    let s = xs.iter().step_by(2).cloned().collect();
    let s_prime = xs.iter().skip(1).step_by(2).cloned().collect();
    DomainHalves { s, s_prime }
}

/// Materialize `shift + ⟨gen⟩`.
///
/// `None` when the coset hits the identity or repeats an abscissa, which
/// happens exactly when `2·shift ∈ ⟨gen⟩`.
#[must_use]
pub fn coset_from_shift(
    curve: &Curve,
    generator: &SubgroupGenerator,
    shift: Point,
) -> Option<CosetDomain> {
    let size = generator.size();
    let mut points = Vec::with_capacity(size);
    let mut abscissas = Vec::with_capacity(size);
    let mut seen = HashSet::with_capacity(size);

    let mut h = shift.clone();
    for _ in 0..size {
        let x = h.x()?.clone();
        if !seen.insert(x.clone()) {
            return None;
        }
        let next = curve.add(&h, generator.point());
        abscissas.push(x);
        points.push(h);
        h = next;
    }

    Some(CosetDomain {
        shift,
        points,
        abscissas,
    })
}

/// Sample a random shift `R` and build `R + ⟨G⟩`, resampling `R` while the
/// coset is degenerate.
pub fn build_coset<R: Rng + ?Sized>(
    curve: &Curve,
    generator: &SubgroupGenerator,
    rng: &mut R,
) -> Result<CosetDomain> {
    for attempt in 1..=MAX_SHIFT_ATTEMPTS {
        let shift = curve.random_point(rng);
        if let Some(coset) = coset_from_shift(curve, generator, shift) {
            debug!(attempt, size = coset.size(), "built coset domain");
            return Ok(coset);
        }
        trace!(attempt, "coset shift lies too close to the subgroup; resampling");
    }

    Err(ParamsError::PreconditionViolation(format!(
        "no coset shift outside the subgroup after {MAX_SHIFT_ATTEMPTS} attempts; \
         the curve group is (nearly) the 2-power subgroup itself"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::GroupOrder;
    use crate::subgroup::find_generator;
    use num_bigint::BigUint;
    use rand::{rngs::StdRng, SeedableRng};

    fn setup(p: u32, a: u32, b: u32, seed: u64) -> (Curve, SubgroupGenerator, StdRng) {
        let e = Curve::from_coefficients(BigUint::from(p), BigUint::from(a), BigUint::from(b))
            .unwrap();
        let order = GroupOrder::resolve(&e, None).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let g = find_generator(&e, &order, &mut rng).unwrap();
        (e, g, rng)
    }

    #[test]
    fn coset_points_follow_generator() {
        let (e, g, mut rng) = setup(97, 2, 1, 4);
        let coset = build_coset(&e, &g, &mut rng).unwrap();
        assert_eq!(coset.size(), 16);
        for i in 0..coset.size() {
            let expected = e.add(coset.shift(), &e.mul(g.point(), &BigUint::from(i)));
            assert_eq!(coset.element(i), Some(&expected));
        }
        let distinct: HashSet<_> = coset.abscissas().iter().collect();
        assert_eq!(distinct.len(), 16);
    }

    #[test]
    fn shift_inside_subgroup_is_rejected() {
        let (e, g, _) = setup(97, 2, 1, 4);
        // Any R in <G> walks into the identity.
        assert!(coset_from_shift(&e, &g, g.point().clone()).is_none());
        let r = e.mul(g.point(), &BigUint::from(3u32));
        assert!(coset_from_shift(&e, &g, r).is_none());
    }

    #[test]
    fn halves_interleave() {
        let (e, g, mut rng) = setup(401, 1, 5, 8);
        let coset = build_coset(&e, &g, &mut rng).unwrap();
        let DomainHalves { s, s_prime } = coset.halves();
        assert_eq!(s.len(), 64);
        assert_eq!(s_prime.len(), 64);
        for (i, x) in coset.abscissas().iter().enumerate() {
            let half = if i % 2 == 0 { &s } else { &s_prime };
            assert_eq!(&half[i / 2], x);
        }
    }
}
