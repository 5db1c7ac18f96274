//! Error taxonomy for parameter generation.
//!
//! Sampling retries (a candidate generator of too small order, a coset shift
//! inside the subgroup) are not errors; they only surface here once their
//! attempt budget is exhausted.

use std::path::PathBuf;

use ecfft_algebra::AlgebraError;
use thiserror::Error;

/// Errors produced while building or emitting ECFFT parameters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParamsError {
    /// Bad field or curve input.
    #[error(transparent)]
    Algebra(#[from] AlgebraError),

    /// The curve is unsuitable (odd order, non-cyclic 2-part, domain too
    /// large, unknown order for a large field, …).
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),

    /// The supplied or computed group order disagrees with the curve.
    #[error("inconsistent group order: {0}")]
    InconsistentOrder(String),

    /// No rational 2-isogeny maps the working set 2-to-1.
    #[error("no 2-isogeny halves the domain at level {level} (working set of {domain_size} points)")]
    NoValidIsogeny {
        /// Chain level (counts down to 1).
        level: usize,
        /// Size of the working set `S` at that level.
        domain_size: usize,
    },

    /// A finished parameter set fails its own consistency checks.
    #[error("verification failed: {0}")]
    Verification(String),

    /// Numeric argument could not be parsed.
    #[error("cannot parse {input:?} as an unsigned integer (decimal or 0x-hex)")]
    Parse {
        /// Offending text.
        input: String,
    },

    /// A written artifact does not have the expected shape.
    #[error("malformed artifact {}: {reason}", path.display())]
    Malformed {
        /// Artifact path.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// Filesystem failure.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Manifest (de)serialization failure.
    #[error("manifest json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ParamsError {
    /// Whether re-running with fresh randomness may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NoValidIsogeny { .. })
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for this crate.
pub type Result<T, E = ParamsError> = core::result::Result<T, E>;
