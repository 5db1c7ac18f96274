//! Search for a generator of the cyclic 2-primary subgroup.

use ecfft_algebra::{Curve, Point};
use rand::Rng;
use tracing::{debug, trace};

use crate::error::{ParamsError, Result};
use crate::order::GroupOrder;

/// Candidates drawn before giving up. On a cyclic 2-part each draw succeeds
/// with probability 1/2.
pub const MAX_GENERATOR_ATTEMPTS: usize = 128;

/// A point `G` of exact order `2^log_n`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubgroupGenerator {
    point: Point,
    log_n: u32,
}

impl SubgroupGenerator {
    /// The generator.
    #[inline]
    #[must_use]
    pub const fn point(&self) -> &Point {
        &self.point
    }

    /// `log2` of its order.
    #[inline]
    #[must_use]
    pub const fn log_n(&self) -> u32 {
        self.log_n
    }

    /// Its order `2^log_n`.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        1usize << self.log_n
    }
}

/// `2^log_n · g`, or `None` if some `2^i · g` with `i < log_n` is already the
/// identity.
#[must_use]
pub fn double_log_n(curve: &Curve, g: &Point, log_n: u32) -> Option<Point> {
    let mut h = g.clone();
    for _ in 0..log_n {
        if h.is_identity() {
            return None;
        }
        h = curve.double(&h);
    }
    Some(h)
}

/// Whether `g` has order exactly `2^log_n`.
#[must_use]
pub fn has_exact_order(curve: &Curve, g: &Point, log_n: u32) -> bool {
    double_log_n(curve, g, log_n).is_some_and(|h| h.is_identity())
}

/// Draw random points, clear the odd part of their order with the cofactor,
/// and keep the first one none of whose proper halvings `2^i · G`
/// (`0 ≤ i < log_n`) vanishes.
///
/// A candidate that survives the halvings but is not killed by `2^log_n`
/// means the order is wrong, which is fatal rather than retried.
pub fn find_generator<R: Rng + ?Sized>(
    curve: &Curve,
    order: &GroupOrder,
    rng: &mut R,
) -> Result<SubgroupGenerator> {
    let log_n = order.log_n();

    for attempt in 1..=MAX_GENERATOR_ATTEMPTS {
        let g = curve.mul(&curve.random_point(rng), order.cofactor());

        let Some(h) = double_log_n(curve, &g, log_n) else {
            trace!(attempt, "candidate lies in a proper subgroup; resampling");
            continue;
        };
        if !h.is_identity() {
            return Err(ParamsError::InconsistentOrder(format!(
                "2^{log_n} · G is not the identity; {} is not the curve order",
                order.order()
            )));
        }

        debug!(attempt, log_n, "found subgroup generator");
        return Ok(SubgroupGenerator { point: g, log_n });
    }

    Err(ParamsError::PreconditionViolation(format!(
        "no point of order 2^{log_n} after {MAX_GENERATOR_ATTEMPTS} attempts; \
         the 2-primary subgroup is probably not cyclic"
    )))
}
