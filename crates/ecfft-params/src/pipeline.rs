//! End-to-end generation: order checks, generator, coset, chain, artifacts.

use std::path::Path;

use ecfft_algebra::Curve;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::chain::{compute_chain, verify_halving, IsogenyChain};
use crate::coset::{build_coset, CosetDomain};
use crate::error::{ParamsError, Result};
use crate::limbs::num_limbs;
use crate::order::{ensure_cyclic_two_part, GroupOrder};
use crate::subgroup::{find_generator, SubgroupGenerator};
use crate::writer::{read_coset, read_isogenies, write_coset, write_isogenies, ArtifactPaths};

/// Knobs for [`generate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerateOptions {
    /// Full generator/coset/chain runs before a `NoValidIsogeny` is final.
    pub attempts: usize,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { attempts: 3 }
    }
}

/// A complete parameter set, ready to be written.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EcFftParams {
    curve: Curve,
    order: GroupOrder,
    generator: SubgroupGenerator,
    coset: CosetDomain,
    chain: IsogenyChain,
    num_limbs: usize,
}

/// Line counts of a written parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WriteSummary {
    /// Lines in `<base>_coset`.
    pub coset_lines: usize,
    /// Lines in `<base>_isogenies`.
    pub isogeny_lines: usize,
}

impl EcFftParams {
    /// Starting curve.
    #[must_use]
    pub const fn curve(&self) -> &Curve {
        &self.curve
    }

    /// Its group order.
    #[must_use]
    pub const fn order(&self) -> &GroupOrder {
        &self.order
    }

    /// Generator of the 2-power subgroup.
    #[must_use]
    pub const fn generator(&self) -> &SubgroupGenerator {
        &self.generator
    }

    /// Evaluation domain.
    #[must_use]
    pub const fn coset(&self) -> &CosetDomain {
        &self.coset
    }

    /// Halving chain.
    #[must_use]
    pub const fn chain(&self) -> &IsogenyChain {
        &self.chain
    }

    /// Words per encoded integer.
    #[must_use]
    pub const fn num_limbs(&self) -> usize {
        self.num_limbs
    }

    /// Re-run the halving check on the in-memory values.
    pub fn verify(&self) -> Result<()> {
        let maps: Vec<_> = self.chain.maps().cloned().collect();
        verify_halving(self.curve.field(), self.coset.abscissas(), &maps)
    }

    /// Write `<base>_coset` and `<base>_isogenies`, overwriting existing files.
    pub fn write(&self, paths: &ArtifactPaths) -> Result<WriteSummary> {
        let coset_lines = write_coset(&paths.coset, self.coset.abscissas(), self.num_limbs)?;
        let isogeny_lines = write_isogenies(&paths.isogenies, self.chain.maps(), self.num_limbs)?;
        info!(
            coset = %paths.coset.display(),
            isogenies = %paths.isogenies.display(),
            coset_lines,
            isogeny_lines,
            "wrote ECFFT parameters"
        );
        Ok(WriteSummary {
            coset_lines,
            isogeny_lines,
        })
    }

    /// Decode the written artifacts and check them against this parameter
    /// set and the halving property.
    pub fn verify_written(&self, paths: &ArtifactPaths) -> Result<()> {
        let field = self.curve.field();
        let coset = read_coset(&paths.coset, field)?;
        if coset != self.coset.abscissas() {
            return Err(ParamsError::Verification(format!(
                "{} does not decode to the generated coset",
                paths.coset.display()
            )));
        }
        let maps = read_isogenies(&paths.isogenies, field)?;
        if !maps.iter().eq(self.chain.maps()) {
            return Err(ParamsError::Verification(format!(
                "{} does not decode to the generated chain",
                paths.isogenies.display()
            )));
        }
        verify_halving(field, &coset, &maps)?;
        debug!("written artifacts verified");
        Ok(())
    }
}

/// Build a full parameter set for `curve`.
///
/// The order is sanity-checked and the 2-primary subgroup is required to be
/// cyclic before any sampling. A chain that dead-ends is retried with a
/// fresh generator and coset up to `options.attempts` times in total.
pub fn generate<R: Rng + ?Sized>(
    curve: &Curve,
    order: GroupOrder,
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<EcFftParams> {
    if options.attempts == 0 {
        return Err(ParamsError::PreconditionViolation(
            "at least one attempt is required".into(),
        ));
    }
    order.validate(curve, rng)?;
    ensure_cyclic_two_part(curve, &order)?;

    let log_n = order.log_n();
    let levels = log_n as usize - 1;
    info!(
        modulus_bits = curve.field().bits(),
        log_n,
        domain = order.domain_size(),
        levels,
        "generating ECFFT parameters"
    );

    let (generator, coset, chain) = with_retries(options.attempts, |attempt| {
        let generator = find_generator(curve, &order, rng)?;
        let coset = build_coset(curve, &generator, rng)?;
        let chain = compute_chain(levels, coset.halves(), curve)?;
        info!(attempt, levels = chain.len(), "isogeny chain complete");
        Ok((generator, coset, chain))
    })?;
    Ok(EcFftParams {
        num_limbs: num_limbs(curve.field().modulus()),
        curve: curve.clone(),
        order,
        generator,
        coset,
        chain,
    })
}

/// Run `step` (given the 1-based attempt number) until it succeeds, fails
/// with a non-retryable error, or `attempts` runs are used up.
fn with_retries<T>(attempts: usize, mut step: impl FnMut(usize) -> Result<T>) -> Result<T> {
    let mut attempt = 1;
    loop {
        match step(attempt) {
            Err(e) if e.is_retryable() && attempt < attempts => {
                warn!(attempt, error = %e, "chain dead-ended; resampling generator and coset");
                attempt += 1;
            }
            done => return done,
        }
    }
}

/// [`generate`] followed by [`EcFftParams::write`] under `base`.
pub fn generate_to<R: Rng + ?Sized>(
    curve: &Curve,
    order: GroupOrder,
    options: &GenerateOptions,
    base: impl AsRef<Path>,
    rng: &mut R,
) -> Result<(EcFftParams, ArtifactPaths, WriteSummary)> {
    let params = generate(curve, order, options, rng)?;
    let paths = ArtifactPaths::from_base(base);
    let summary = params.write(&paths)?;
    Ok((params, paths, summary))
}
