//! Limb-file artifacts.
//!
//! Both files are plain text with one decimal `u64` per line and no header.
//! Each integer takes exactly `num_limbs(p)` consecutive lines, least
//! significant word first:
//!
//! - `<base>_coset`: the `2^log_n` coset abscissas in index order.
//! - `<base>_isogenies`: for each map in chain order, the numerator then the
//!   denominator coefficients, lowest degree first.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ecfft_algebra::{Field, FieldElement, RationalMap};

use crate::error::{ParamsError, Result};
use crate::limbs;

/// Numerator coefficients of a degree-2 x-map.
pub const NUMERATOR_LEN: usize = 3;
/// Denominator coefficients of a degree-2 x-map.
pub const DENOMINATOR_LEN: usize = 2;

/// File names derived from one base path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// `<base>_coset`
    pub coset: PathBuf,
    /// `<base>_isogenies`
    pub isogenies: PathBuf,
    /// `<base>_manifest.json`
    pub manifest: PathBuf,
}

impl ArtifactPaths {
    /// Append the fixed suffixes to `base` (which may contain directories).
    #[must_use]
    pub fn from_base(base: impl AsRef<Path>) -> Self {
        let with = |suffix: &str| {
            let mut s = OsString::from(base.as_ref().as_os_str());
            s.push(suffix);
            PathBuf::from(s)
        };
        Self {
            coset: with("_coset"),
            isogenies: with("_isogenies"),
            manifest: with("_manifest.json"),
        }
    }
}

/// Create the parent directory of `path` if it has one.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir).map_err(|e| ParamsError::io(dir, e))?;
        }
    }
    Ok(())
}

fn write_words<'a, I>(path: &Path, values: I, num_limbs: usize) -> Result<usize>
where
    I: IntoIterator<Item = &'a FieldElement>,
{
    ensure_parent_dir(path)?;
    let f = File::create(path).map_err(|e| ParamsError::io(path, e))?;
    let mut w = BufWriter::new(f);
    let mut lines = 0usize;
    for v in values {
        for word in limbs::encode(v.as_biguint(), num_limbs) {
            writeln!(w, "{word}").map_err(|e| ParamsError::io(path, e))?;
            lines += 1;
        }
    }
    w.flush().map_err(|e| ParamsError::io(path, e))?;
    Ok(lines)
}

/// Write the coset abscissas. Returns the number of lines written.
pub fn write_coset(path: &Path, coset: &[FieldElement], num_limbs: usize) -> Result<usize> {
    write_words(path, coset, num_limbs)
}

/// Write every map's coefficients in chain order. Returns the number of
/// lines written.
pub fn write_isogenies<'a, I>(path: &Path, maps: I, num_limbs: usize) -> Result<usize>
where
    I: IntoIterator<Item = &'a RationalMap>,
{
    write_words(
        path,
        maps.into_iter().flat_map(|m| m.coefficients()),
        num_limbs,
    )
}

fn malformed(path: &Path, reason: impl Into<String>) -> ParamsError {
    ParamsError::Malformed {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

/// Parse a limb file back into field elements of `field`.
fn read_elements(path: &Path, field: &Field) -> Result<Vec<FieldElement>> {
    let text = fs::read_to_string(path).map_err(|e| ParamsError::io(path, e))?;
    let num_limbs = limbs::num_limbs(field.modulus());

    let mut words = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let word = line
            .trim()
            .parse::<u64>()
            .map_err(|e| malformed(path, format!("line {}: {e}", i + 1)))?;
        words.push(word);
    }
    if words.len() % num_limbs != 0 {
        return Err(malformed(
            path,
            format!("{} words is not a multiple of {num_limbs} limbs", words.len()),
        ));
    }

    words
        .chunks_exact(num_limbs)
        .enumerate()
        .map(|(i, chunk)| {
            let v = limbs::decode(chunk);
            if &v >= field.modulus() {
                return Err(malformed(path, format!("element {i} is not reduced modulo p")));
            }
            Ok(field.element(v))
        })
        .collect()
}

/// Read a coset artifact.
pub fn read_coset(path: &Path, field: &Field) -> Result<Vec<FieldElement>> {
    read_elements(path, field)
}

/// Read an isogenies artifact as degree-2 maps (3 numerator and 2
/// denominator coefficients each).
pub fn read_isogenies(path: &Path, field: &Field) -> Result<Vec<RationalMap>> {
    const PER_MAP: usize = NUMERATOR_LEN + DENOMINATOR_LEN;
    let coeffs = read_elements(path, field)?;
    if coeffs.len() % PER_MAP != 0 {
        return Err(malformed(
            path,
            format!("{} coefficients do not split into degree-2 maps", coeffs.len()),
        ));
    }
    Ok(coeffs
        .chunks_exact(PER_MAP)
        .map(|c| {
            let (num, den) = c.split_at(NUMERATOR_LEN);
            RationalMap::new(num.to_vec(), den.to_vec())
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_bigint::BigUint;

    #[test]
    fn suffixes() {
        let p = ArtifactPaths::from_base("out/bn254");
        assert_eq!(p.coset, PathBuf::from("out/bn254_coset"));
        assert_eq!(p.isogenies, PathBuf::from("out/bn254_isogenies"));
        assert_eq!(p.manifest, PathBuf::from("out/bn254_manifest.json"));
    }

    #[test]
    fn coset_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/toy_coset");
        // Two-limb modulus 2^64 + 13.
        let field = Field::new((BigUint::from(1u32) << 64u32) + 13u32).unwrap();
        let xs = vec![field.from_u64(7), field.from_i64(-1)];
        let lines = write_coset(&path, &xs, 2).unwrap();
        assert_eq!(lines, 4);

        let text = fs::read_to_string(&path).unwrap();
        let words: Vec<&str> = text.lines().collect();
        assert_eq!(words, vec!["7", "0", "12", "1"]);
        assert_eq!(read_coset(&path, &field).unwrap(), xs);
    }

    #[test]
    fn rejects_bad_shapes() {
        let dir = tempfile::tempdir().unwrap();
        let field = Field::new(BigUint::from(97u32)).unwrap();

        let path = dir.path().join("junk");
        fs::write(&path, "1\nx\n").unwrap();
        assert!(matches!(
            read_coset(&path, &field),
            Err(ParamsError::Malformed { .. })
        ));

        fs::write(&path, "1\n2\n3\n4\n").unwrap();
        assert!(matches!(
            read_isogenies(&path, &field),
            Err(ParamsError::Malformed { .. })
        ));

        fs::write(&path, "97\n").unwrap();
        assert!(matches!(
            read_coset(&path, &field),
            Err(ParamsError::Malformed { .. })
        ));

        assert!(matches!(
            read_coset(&dir.path().join("missing"), &field),
            Err(ParamsError::Io { .. })
        ));
    }
}
