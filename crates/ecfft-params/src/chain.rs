//! The 2-isogeny chain that halves the domain level by level.
//!
//! At level `i` the working set `S` has `2^i` abscissas. A rational
//! 2-isogeny `ψ` is acceptable when `ψ(S)` has exactly `2^(i-1)` distinct
//! values; then `S ← ψ(S[..half])`, `S′ ← ψ(S′[..half])` and the curve moves
//! to the codomain. The interleaved coset layout guarantees that the first
//! half of `S` holds one representative of every collapsed pair.

use std::collections::HashSet;

use ecfft_algebra::{Curve, Field, FieldElement, RationalMap};
use tracing::{debug, trace};

use crate::coset::{split_halves, DomainHalves};
use crate::error::{ParamsError, Result};

/// One accepted isogeny.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainLevel {
    /// Level index `i` (counts down to 1).
    pub level: usize,
    /// `|S|` before this step (`2^i`).
    pub domain_size: usize,
    /// Abscissa of the kernel generator.
    pub kernel_x: FieldElement,
    /// x-coordinate map of the isogeny.
    pub map: RationalMap,
    /// Curve reached after this step.
    pub codomain: Curve,
}

/// Isogenies in the order computed, from the full domain down to size 2.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IsogenyChain {
    levels: Vec<ChainLevel>,
    terminal: Curve,
    remaining: DomainHalves,
}

impl IsogenyChain {
    /// Accepted steps, first to last.
    #[inline]
    #[must_use]
    pub fn levels(&self) -> &[ChainLevel] {
        &self.levels
    }

    /// Number of steps.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    /// Whether the chain has no steps (a domain of size 2).
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The rational maps in chain order.
    pub fn maps(&self) -> impl Iterator<Item = &RationalMap> + '_ {
        self.levels.iter().map(|l| &l.map)
    }

    /// Curve after the last step.
    #[inline]
    #[must_use]
    pub const fn terminal(&self) -> &Curve {
        &self.terminal
    }

    /// Working sets left after the last step (one point each).
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> &DomainHalves {
        &self.remaining
    }

    /// Numerator plus denominator coefficients over the whole chain.
    #[must_use]
    pub fn coefficient_count(&self) -> usize {
        self.maps().map(RationalMap::coefficient_count).sum()
    }
}

fn distinct(values: &[FieldElement]) -> usize {
    values.iter().collect::<HashSet<_>>().len()
}

/// Run `levels` halving steps starting from `curve` and the coset halves.
///
/// `halves.s` must hold `2^levels` abscissas.
pub fn compute_chain(levels: usize, halves: DomainHalves, curve: &Curve) -> Result<IsogenyChain> {
    let DomainHalves {
        mut s,
        mut s_prime,
    } = halves;
    if levels >= usize::BITS as usize || s.len() != 1usize << levels {
        return Err(ParamsError::PreconditionViolation(format!(
            "working set has {} points, expected 2^{levels}",
            s.len()
        )));
    }

    let mut curve = curve.clone();
    let mut out = Vec::with_capacity(levels);

    for level in (1..=levels).rev() {
        let n = 1usize << level;
        let half = n / 2;
        let field = curve.field().clone();

        let mut accepted = None;
        for iso in curve.two_isogenies()? {
            let Some(images) = iso.x_map().evaluate_many(&field, &s) else {
                trace!(level, kernel_x = %iso.kernel_x(), "candidate has a pole on S");
                continue;
            };
            let count = distinct(&images);
            if count != half {
                trace!(level, kernel_x = %iso.kernel_x(), count, half, "candidate does not halve S");
                continue;
            }
            let Some(images_prime) = iso.x_map().evaluate_many(&field, &s_prime[..half]) else {
                trace!(level, kernel_x = %iso.kernel_x(), "candidate has a pole on S'");
                continue;
            };
            accepted = Some((iso, images, images_prime));
            break;
        }

        let Some((iso, mut images, images_prime)) = accepted else {
            return Err(ParamsError::NoValidIsogeny {
                level,
                domain_size: n,
            });
        };

        images.truncate(half);
        s = images;
        s_prime = images_prime;

        let kernel_x = iso.kernel_x().clone();
        let (map, codomain) = iso.into_parts();
        debug!(level, domain_size = n, kernel_x = %kernel_x, "accepted 2-isogeny");

        out.push(ChainLevel {
            level,
            domain_size: n,
            kernel_x,
            map,
            codomain: codomain.clone(),
        });
        curve = codomain;
    }

    Ok(IsogenyChain {
        levels: out,
        terminal: curve,
        remaining: DomainHalves { s, s_prime },
    })
}

/// Re-check a finished chain against the coset it was built from: each map
/// must send both the current `S` and the current `S'` 2-to-1 onto their
/// images, and the chain must reach a single point.
pub fn verify_halving(field: &Field, coset: &[FieldElement], maps: &[RationalMap]) -> Result<()> {
    if !coset.len().is_power_of_two() || coset.len() < 2 {
        return Err(ParamsError::Verification(format!(
            "coset size {} is not a power of two ≥ 2",
            coset.len()
        )));
    }
    let levels = coset.len().trailing_zeros() as usize - 1;
    if maps.len() != levels {
        return Err(ParamsError::Verification(format!(
            "a coset of {} points needs {levels} isogenies, found {}",
            coset.len(),
            maps.len()
        )));
    }

    let DomainHalves {
        mut s,
        mut s_prime,
    } = split_halves(coset);
    for (step, map) in maps.iter().enumerate() {
        s = halve(field, map, &s, step, "S")?;
        s_prime = halve(field, map, &s_prime, step, "S'")?;
    }
    Ok(())
}

/// Image of `xs` under `map`, which must be 2-to-1 on it, cut to one
/// representative per fiber.
fn halve(
    field: &Field,
    map: &RationalMap,
    xs: &[FieldElement],
    step: usize,
    which: &str,
) -> Result<Vec<FieldElement>> {
    let half = xs.len() / 2;
    let mut images = map.evaluate_many(field, xs).ok_or_else(|| {
        ParamsError::Verification(format!("isogeny {step} has a pole on {which}"))
    })?;
    let count = distinct(&images);
    if count != half || distinct(&images[..half]) != half {
        return Err(ParamsError::Verification(format!(
            "isogeny {step} maps {} points of {which} onto {count} values, expected {half}",
            xs.len()
        )));
    }
    images.truncate(half);
    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coset::build_coset;
    use crate::order::GroupOrder;
    use crate::subgroup::find_generator;
    use num_bigint::BigUint;
    use rand::{rngs::StdRng, SeedableRng};

    fn run(p: u32, a: u32, b: u32, seed: u64) -> (Curve, Vec<FieldElement>, IsogenyChain) {
        let e = Curve::from_coefficients(BigUint::from(p), BigUint::from(a), BigUint::from(b))
            .unwrap();
        let order = GroupOrder::resolve(&e, None).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        let g = find_generator(&e, &order, &mut rng).unwrap();
        let coset = build_coset(&e, &g, &mut rng).unwrap();
        let levels = order.log_n() as usize - 1;
        let chain = compute_chain(levels, coset.halves(), &e).unwrap();
        (e, coset.abscissas().to_vec(), chain)
    }

    #[test]
    fn toy_chain_shape() {
        let (e, coset, chain) = run(97, 2, 1, 3);
        assert_eq!(coset.len(), 16);
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.coefficient_count(), 15);
        let sizes: Vec<_> = chain.levels().iter().map(|l| l.domain_size).collect();
        assert_eq!(sizes, vec![8, 4, 2]);
        assert_eq!(chain.remaining().s.len(), 1);
        assert_eq!(chain.remaining().s_prime.len(), 1);
        assert_eq!(&chain.levels()[2].codomain, chain.terminal());
        let maps: Vec<_> = chain.maps().cloned().collect();
        verify_halving(e.field(), &coset, &maps).unwrap();
    }

    #[test]
    fn codomains_are_linked() {
        let (e, _, chain) = run(401, 1, 5, 1);
        let mut current = e;
        for level in chain.levels() {
            let iso = ecfft_algebra::TwoIsogeny::from_kernel(&current, level.kernel_x.clone())
                .unwrap();
            assert_eq!(iso.x_map(), &level.map);
            assert_eq!(iso.codomain(), &level.codomain);
            current = level.codomain.clone();
        }
    }

    #[test]
    fn wrong_working_set_size_is_rejected() {
        let e = Curve::from_coefficients(
            BigUint::from(97u32),
            BigUint::from(2u32),
            BigUint::from(1u32),
        )
        .unwrap();
        let f = e.field();
        let halves = split_halves(&(0..6u64).map(|v| f.from_u64(v)).collect::<Vec<_>>());
        assert!(matches!(
            compute_chain(2, halves, &e),
            Err(ParamsError::PreconditionViolation(_))
        ));
    }

    #[test]
    fn tampered_chain_fails_verification() {
        let (e, coset, chain) = run(97, 2, 1, 5);
        let mut maps: Vec<_> = chain.maps().cloned().collect();
        maps.pop();
        assert!(verify_halving(e.field(), &coset, &maps).is_err());

        let mut maps: Vec<_> = chain.maps().cloned().collect();
        // x ↦ x is injective, never 2-to-1.
        maps[0] = RationalMap::new(
            vec![FieldElement::zero(), FieldElement::one()],
            vec![FieldElement::one()],
        );
        assert!(verify_halving(e.field(), &coset, &maps).is_err());
    }

    #[test]
    fn corrupted_odd_half_fails_verification() {
        let (e, coset, chain) = run(97, 2, 1, 5);
        let maps: Vec<_> = chain.maps().cloned().collect();
        let f = e.field();

        // S' = odd entries. Over GF(97) the first map sends 1..=8 to eight
        // distinct values, so it cannot halve them.
        let mut replaced = coset.clone();
        for (i, v) in (1..=8u64).enumerate() {
            replaced[2 * i + 1] = f.from_u64(v);
        }
        assert!(matches!(
            verify_halving(f, &replaced, &maps),
            Err(ParamsError::Verification(_))
        ));

        // S'[1] and S'[4] trade places: the image is still 2-to-1 but the
        // first half now holds both points of one fiber.
        let mut swapped = coset.clone();
        swapped.swap(3, 9);
        assert!(matches!(
            verify_halving(f, &swapped, &maps),
            Err(ParamsError::Verification(_))
        ));

        verify_halving(f, &coset, &maps).unwrap();
    }

    #[test]
    fn non_coset_working_set_has_no_valid_isogeny() {
        let e = Curve::from_coefficients(
            BigUint::from(97u32),
            BigUint::from(2u32),
            BigUint::from(1u32),
        )
        .unwrap();
        let f = e.field();
        let xs: Vec<_> = (20..36u64).map(|v| f.from_u64(v)).collect();
        let err = compute_chain(3, split_halves(&xs), &e).unwrap_err();
        assert!(matches!(
            err,
            ParamsError::NoValidIsogeny {
                level: 3,
                domain_size: 8
            }
        ));
        assert!(err.is_retryable());
    }
}
