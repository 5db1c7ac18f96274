//! ECFFT parameter generation.
//!
//! Given `E: y² = x³ + ax + b` over `GF(p)` with a cyclic 2-primary subgroup
//! of order `2^log_n`, this crate
//!
//! 1. finds a generator `G` of that subgroup ([`subgroup`]),
//! 2. builds the evaluation domain `R + ⟨G⟩` and splits its abscissas into
//!    the interleaved halves `S`, `S′` ([`coset`]),
//! 3. walks a chain of `log_n - 1` rational 2-isogenies, each of which maps
//!    the current `S` 2-to-1 onto the next one ([`chain`]),
//! 4. writes the abscissas and the chain's x-map coefficients as fixed-width
//!    64-bit limb files ([`writer`], [`limbs`]).
//!
//! [`pipeline::generate`] runs the whole thing; [`presets`] carries curves
//! with known orders. Everything is single-threaded and driven by a
//! caller-supplied RNG, so a seeded `StdRng` reproduces a run exactly.

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

pub mod chain;
pub mod coset;
pub mod error;
pub mod limbs;
pub mod manifest;
pub mod order;
pub mod pipeline;
pub mod presets;
pub mod subgroup;
pub mod writer;

pub use chain::{compute_chain, verify_halving, ChainLevel, IsogenyChain};
pub use coset::{build_coset, split_halves, CosetDomain, DomainHalves};
pub use error::{ParamsError, Result};
pub use manifest::Manifest;
pub use order::{ensure_cyclic_two_part, GroupOrder, MAX_LOG_N};
pub use pipeline::{generate, generate_to, EcFftParams, GenerateOptions, WriteSummary};
pub use presets::Preset;
pub use subgroup::{find_generator, SubgroupGenerator};
pub use writer::ArtifactPaths;

use num_bigint::BigUint;
use num_traits::Num;

/// Parse an unsigned integer written in decimal or with a `0x`/`0X` prefix.
pub fn parse_uint(s: &str) -> Result<BigUint> {
    let t = s.trim();
    let (digits, radix) = match t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        Some(hex) => (hex, 16),
        None => (t, 10),
    };
    // from_str_radix also takes a sign and `_` separators; neither is allowed.
    let valid = !digits.is_empty()
        && digits.chars().all(|c| match radix {
            16 => c.is_ascii_hexdigit(),
            _ => c.is_ascii_digit(),
        });
    let parsed = if valid {
        BigUint::from_str_radix(digits, radix).ok()
    } else {
        None
    };
    parsed.ok_or_else(|| ParamsError::Parse {
        input: s.to_owned(),
    })
}
