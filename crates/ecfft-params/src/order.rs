//! Group-order bookkeeping: the 2-primary split `#E = 2^log_n · cofactor`
//! and the checks that make the subgroup search terminate.

use ecfft_algebra::{AlgebraError, Curve};
use num_bigint::BigUint;
use rand::Rng;
use tracing::debug;

use crate::error::{ParamsError, Result};

/// Largest supported 2-adicity; the whole domain is held in memory.
pub const MAX_LOG_N: u32 = 28;

/// Random points that must be annihilated by the claimed order.
const ORDER_CHECK_SAMPLES: usize = 4;

/// `#E(GF(p))` split into its 2-primary part and the rest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupOrder {
    order: BigUint,
    log_n: u32,
    cofactor: BigUint,
}

impl GroupOrder {
    /// Split `order` into `2^log_n · cofactor`, `cofactor` odd.
    pub fn new(order: BigUint) -> Result<Self> {
        let Some(tz) = order.trailing_zeros() else {
            return Err(ParamsError::InconsistentOrder(
                "group order cannot be zero".into(),
            ));
        };
        let log_n = u32::try_from(tz).unwrap_or(u32::MAX);
        if log_n > MAX_LOG_N {
            return Err(ParamsError::PreconditionViolation(format!(
                "2-adicity {log_n} exceeds the supported maximum {MAX_LOG_N}"
            )));
        }
        let cofactor = &order >> log_n;
        Ok(Self {
            order,
            log_n,
            cofactor,
        })
    }

    /// Use `explicit` when given, otherwise count points (small fields only).
    pub fn resolve(curve: &Curve, explicit: Option<BigUint>) -> Result<Self> {
        let order = match explicit {
            Some(order) => order,
            None => match curve.count_points() {
                Ok(order) => {
                    debug!(%order, "counted curve points");
                    order
                }
                Err(AlgebraError::FieldTooLarge { bits, max_bits }) => {
                    return Err(ParamsError::PreconditionViolation(format!(
                        "the group order of a {bits}-bit curve must be supplied \
                         (points are only counted up to {max_bits} bits)"
                    )));
                }
                Err(e) => return Err(e.into()),
            },
        };
        Self::new(order)
    }

    /// `#E`.
    #[inline]
    #[must_use]
    pub const fn order(&self) -> &BigUint {
        &self.order
    }

    /// 2-adic valuation of `#E`.
    #[inline]
    #[must_use]
    pub const fn log_n(&self) -> u32 {
        self.log_n
    }

    /// Odd part `#E / 2^log_n`.
    #[inline]
    #[must_use]
    pub const fn cofactor(&self) -> &BigUint {
        &self.cofactor
    }

    /// `2^log_n`.
    #[inline]
    #[must_use]
    pub const fn domain_size(&self) -> usize {
        1usize << self.log_n
    }

    /// Sanity-check the order against `curve`: the Hasse bound
    /// `|#E - (p + 1)| ≤ 2√p`, and `#E · P = O` for a few random `P`.
    pub fn validate<R: Rng + ?Sized>(&self, curve: &Curve, rng: &mut R) -> Result<()> {
        let p_plus_1 = curve.field().modulus() + 1u32;
        let trace = if self.order >= p_plus_1 {
            &self.order - &p_plus_1
        } else {
            &p_plus_1 - &self.order
        };
        if &trace * &trace > curve.field().modulus() * 4u32 {
            return Err(ParamsError::InconsistentOrder(format!(
                "{} violates the Hasse bound for p = {}",
                self.order,
                curve.field().modulus()
            )));
        }

        for _ in 0..ORDER_CHECK_SAMPLES {
            let p = curve.random_point(rng);
            if !curve.mul(&p, &self.order).is_identity() {
                return Err(ParamsError::InconsistentOrder(format!(
                    "{} does not annihilate a random curve point",
                    self.order
                )));
            }
        }
        Ok(())
    }
}

/// Require the 2-primary subgroup to be a non-trivial cyclic group.
///
/// It is cyclic exactly when the curve has a single rational point of order
/// two, i.e. when `x³ + ax + b` has a single root in `GF(p)`.
pub fn ensure_cyclic_two_part(curve: &Curve, order: &GroupOrder) -> Result<()> {
    let roots = curve.two_torsion_abscissas().len();
    match (roots, order.log_n()) {
        (0, 0) => Err(ParamsError::PreconditionViolation(
            "the group order is odd; there is no 2-power subgroup".into(),
        )),
        (1, 0) | (0, _) => Err(ParamsError::InconsistentOrder(format!(
            "{roots} rational 2-torsion point(s) but 2-adicity {}",
            order.log_n()
        ))),
        (1, _) => Ok(()),
        _ => Err(ParamsError::PreconditionViolation(format!(
            "the 2-primary subgroup is not cyclic ({roots} rational points of order 2)"
        ))),
    }
}
