//! Optional JSON sidecar describing a written parameter set.
//!
//! Big integers are stored as decimal strings so the file stays readable by
//! any JSON consumer.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ParamsError, Result};
use crate::pipeline::EcFftParams;
use crate::writer::{ensure_parent_dir, ArtifactPaths};

/// Format marker; bumped on incompatible changes.
pub const MANIFEST_VERSION: u32 = 1;

/// One chain step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSummary {
    /// Working-set size before the step.
    pub domain_size: usize,
    /// Kernel abscissa of the 2-isogeny.
    pub kernel_x: String,
    /// Codomain coefficient `a`.
    pub codomain_a: String,
    /// Codomain coefficient `b`.
    pub codomain_b: String,
    /// Numerator coefficient count.
    pub numerator_len: usize,
    /// Denominator coefficient count.
    pub denominator_len: usize,
}

/// Contents of `<base>_manifest.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// [`MANIFEST_VERSION`] at write time.
    pub version: u32,
    /// Field modulus `p`.
    pub modulus: String,
    /// Curve coefficient `a`.
    pub a: String,
    /// Curve coefficient `b`.
    pub b: String,
    /// Group order `#E`.
    pub order: String,
    /// 2-adicity of the order.
    pub log_n: u32,
    /// Words per encoded integer.
    pub num_limbs: usize,
    /// Points in the coset.
    pub coset_len: usize,
    /// Chain steps, first to last.
    pub levels: Vec<LevelSummary>,
    /// File name of the coset artifact.
    pub coset_file: String,
    /// File name of the isogenies artifact.
    pub isogenies_file: String,
    /// RNG seed, when the run was seeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}

impl Manifest {
    /// Summarize `params` as written to `paths`.
    #[must_use]
    pub fn describe(params: &EcFftParams, paths: &ArtifactPaths, seed: Option<u64>) -> Self {
        let curve = params.curve();
        let levels = params
            .chain()
            .levels()
            .iter()
            .map(|l| LevelSummary {
                domain_size: l.domain_size,
                kernel_x: l.kernel_x.to_string(),
                codomain_a: l.codomain.a().to_string(),
                codomain_b: l.codomain.b().to_string(),
                numerator_len: l.map.numerator.len(),
                denominator_len: l.map.denominator.len(),
            })
            .collect();

        Self {
            version: MANIFEST_VERSION,
            modulus: curve.field().modulus().to_string(),
            a: curve.a().to_string(),
            b: curve.b().to_string(),
            order: params.order().order().to_string(),
            log_n: params.order().log_n(),
            num_limbs: params.num_limbs(),
            coset_len: params.coset().size(),
            levels,
            coset_file: file_name(&paths.coset),
            isogenies_file: file_name(&paths.isogenies),
            seed,
        }
    }

    /// Pretty-print to `path`.
    pub fn write(&self, path: &Path) -> Result<()> {
        ensure_parent_dir(path)?;
        let f = File::create(path).map_err(|e| ParamsError::io(path, e))?;
        let mut w = BufWriter::new(f);
        serde_json::to_writer_pretty(&mut w, self)?;
        writeln!(w).map_err(|e| ParamsError::io(path, e))?;
        w.flush().map_err(|e| ParamsError::io(path, e))
    }

    /// Load from `path`.
    pub fn read(path: &Path) -> Result<Self> {
        let f = File::open(path).map_err(|e| ParamsError::io(path, e))?;
        Ok(serde_json::from_reader(BufReader::new(f))?)
    }

    /// Parse from a JSON string.
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// Total coefficient count across all levels.
    #[must_use]
    pub fn coefficient_count(&self) -> usize {
        self.levels
            .iter()
            .map(|l| l.numerator_len + l.denominator_len)
            .sum()
    }
}
