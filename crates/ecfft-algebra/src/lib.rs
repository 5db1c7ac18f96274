//! Runtime-modulus algebra for ECFFT parameter generation.
//!
//! - [`field`]: `GF(p)` for any odd prime `p > 3`, backed by `num-bigint`.
//! - [`poly`]: dense polynomials over that field (gcd, modular powering, roots).
//! - [`curve`]: short Weierstrass curves, affine group law, random points,
//!   rational 2-torsion and naive point counting for toy fields.
//! - [`isogeny`]: Vélu 2-isogenies and their x-coordinate rational maps.
//!
//! Curves and fields are plain values: an isogeny step produces a new
//! [`Curve`] rather than mutating any shared context.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![warn(
    missing_docs,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::doc_markdown
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

pub mod curve;
pub mod field;
pub mod isogeny;
pub mod poly;

pub use curve::{Curve, Point, NAIVE_COUNT_MAX_BITS};
pub use field::{Field, FieldElement};
pub use isogeny::{RationalMap, TwoIsogeny};
pub use poly::Poly;

use num_bigint::BigUint;
use thiserror::Error;

/// Failures while setting up fields and curves.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum AlgebraError {
    /// The modulus cannot define a field usable for short Weierstrass curves.
    #[error("invalid modulus {modulus}: {reason}")]
    InvalidModulus {
        /// Rejected modulus.
        modulus: BigUint,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// `4a³ + 27b² ≡ 0 (mod p)`.
    #[error("singular curve: 4a^3 + 27b^2 vanishes modulo p")]
    SingularCurve,
    /// Point counting by enumeration was asked for a field that is too big.
    #[error("naive point counting supports moduli up to {max_bits} bits, got {bits}")]
    FieldTooLarge {
        /// Bit length of the modulus.
        bits: u64,
        /// Largest supported bit length.
        max_bits: u64,
    },
}
