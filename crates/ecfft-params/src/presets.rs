//! Curves with known group orders that yield large 2-power domains.

use std::fmt;
use std::str::FromStr;

use ecfft_algebra::Curve;

use crate::error::{ParamsError, Result};
use crate::order::GroupOrder;
use crate::parse_uint;

struct PresetData {
    modulus: &'static str,
    a: &'static str,
    b: &'static str,
    order: &'static str,
}

const BN254: PresetData = PresetData {
    modulus: "21888242871839275222246405745257275088696311157297823662689037894645226208583",
    a: "1",
    b: "5612291247948481584627780310922020304781354847659642188369727566000581075360",
    // 2^14 · odd
    order: "21888242871839275222246405745257275088712935808829559400805562964428910444544",
};

const BLS12_381: PresetData = PresetData {
    modulus: "0x1a0111ea397fe69a4b1ba7b6434bacd764774b84f38512bf6730d2a0f6b0f6241eabfffeb153ffffb9feffffffffaaab",
    a: "0x287cc81c41f14f729fcbc12f57b2dd49bdcfc64938f9ad946c9fe5288aa3e9653670d336b09c058baad66ae717c1df7",
    b: "0x33f44f9b6fd7ba0080f0ad4843e076da70b11e6846d41e19792a15a4920e2294f9c971db67257eefea71c70514c6e54",
    // 2^15 · odd
    order: "4002409555221667393417789825735904156556882819939007885330472032889288775404654397856791416969022033299503997812736",
};

const CURVE25519: PresetData = PresetData {
    modulus: "0x7fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffed",
    a: "1",
    b: "0xd63",
    // 2^16 · odd
    order: "57896044618658097711785492504343953926261577544886303154527763127846362480640",
};

/// A named curve over a pairing-friendly or Edwards base field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Preset {
    /// BN254 base field, `log_n = 14`.
    #[default]
    Bn254,
    /// BLS12-381 base field, `log_n = 15`.
    Bls12_381,
    /// `p = 2^255 - 19`, `log_n = 16`.
    Curve25519,
}

impl Preset {
    /// All presets.
    pub const ALL: [Self; 3] = [Self::Bn254, Self::Bls12_381, Self::Curve25519];

    /// Stable name, also the default artifact base name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bn254 => "bn254",
            Self::Bls12_381 => "bls12-381",
            Self::Curve25519 => "curve25519",
        }
    }

    fn data(self) -> &'static PresetData {
        match self {
            Self::Bn254 => &BN254,
            Self::Bls12_381 => &BLS12_381,
            Self::Curve25519 => &CURVE25519,
        }
    }

    /// The curve.
    pub fn curve(self) -> Result<Curve> {
        let d = self.data();
        Ok(Curve::from_coefficients(
            parse_uint(d.modulus)?,
            parse_uint(d.a)?,
            parse_uint(d.b)?,
        )?)
    }

    /// Its known group order.
    pub fn order(self) -> Result<GroupOrder> {
        GroupOrder::new(parse_uint(self.data().order)?)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                ParamsError::PreconditionViolation(format!(
                    "unknown preset {s:?} (expected one of: bn254, bls12-381, curve25519)"
                ))
            })
    }
}
