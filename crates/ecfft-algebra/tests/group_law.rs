//! Group-law and isogeny properties on small curves.
//!
//! Invariants tested:
//! 1) Addition is commutative and associative, with `O` neutral and `-P` inverse.
//! 2) Scalar multiplication distributes: `(m + n)·P = m·P + n·P`.
//! 3) Every rational 2-isogeny is a homomorphism onto its codomain.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ecfft_algebra::{Curve, Point};
use num_bigint::BigUint;
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

/// (p, a, b) with a single rational 2-torsion point, plus one with full
/// 2-torsion (x³ - x over GF(101)).
const CURVES: [(u32, u32, u32); 4] = [(97, 2, 1), (401, 1, 5), (1153, 1, 1), (101, 100, 0)];

fn curve(idx: usize) -> Curve {
    let (p, a, b) = CURVES[idx % CURVES.len()];
    Curve::from_coefficients(BigUint::from(p), BigUint::from(a), BigUint::from(b)).unwrap()
}

fn points(e: &Curve, seed: u64, n: usize) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| e.random_point(&mut rng)).collect()
}

#[test]
fn full_two_torsion_has_three_isogenies() {
    let e = curve(3);
    assert_eq!(e.two_torsion_abscissas().len(), 3);
    let isos = e.two_isogenies().unwrap();
    assert_eq!(isos.len(), 3);
    let mut kernels: Vec<_> = isos.iter().map(|i| i.kernel_x().clone()).collect();
    let sorted = {
        let mut k = kernels.clone();
        k.sort();
        k
    };
    assert_eq!(kernels, sorted, "isogenies must come in ascending kernel order");
    kernels.dedup();
    assert_eq!(kernels.len(), 3);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    #[test]
    fn addition_laws(idx in 0usize..4, seed in any::<u64>()) {
        let e = curve(idx);
        let pts = points(&e, seed, 3);
        let (p, q, r) = (&pts[0], &pts[1], &pts[2]);

        prop_assert_eq!(e.add(p, q), e.add(q, p));
        prop_assert_eq!(e.add(&e.add(p, q), r), e.add(p, &e.add(q, r)));
        prop_assert_eq!(e.add(p, &Point::Identity), p.clone());
        prop_assert!(e.add(p, &e.neg(p)).is_identity());
        prop_assert_eq!(e.add(p, p), e.double(p));
        prop_assert!(e.contains(&e.add(p, q)));
    }

    #[test]
    fn scalar_mul_distributes(idx in 0usize..4, seed in any::<u64>(), m in 0u32..500, n in 0u32..500) {
        let e = curve(idx);
        let p = &points(&e, seed, 1)[0];
        let lhs = e.mul(p, &BigUint::from(m + n));
        let rhs = e.add(&e.mul(p, &BigUint::from(m)), &e.mul(p, &BigUint::from(n)));
        prop_assert_eq!(lhs, rhs);
    }

    #[test]
    fn two_isogenies_are_homomorphisms(idx in 0usize..4, seed in any::<u64>()) {
        let e = curve(idx);
        let pts = points(&e, seed, 2);
        for iso in e.two_isogenies().unwrap() {
            let lhs = iso.map_point(&e.add(&pts[0], &pts[1]));
            let rhs = iso.codomain().add(&iso.map_point(&pts[0]), &iso.map_point(&pts[1]));
            prop_assert_eq!(lhs, rhs);
        }
    }
}
