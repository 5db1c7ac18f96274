// crates/ecfft-cli/src/main.rs

#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, ValueEnum};
use ecfft_algebra::Curve;
use ecfft_params::{
    generate_to, parse_uint, GenerateOptions, GroupOrder, Manifest, Preset,
};
use num_bigint::BigUint;
use rand::{rngs::StdRng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "ecfft-params",
    about = "Generate ECFFT domain and isogeny-chain parameter files",
    long_about = "Generate ECFFT domain and isogeny-chain parameter files.\n\n\
        With no positional arguments the selected preset curve is used and the \
        files are named after it. With `p a b output_filename` (decimal or 0x-hex) \
        a custom curve y^2 = x^3 + ax + b over GF(p) is used; its group order is \
        counted for fields of at most 24 bits and must be passed with --order otherwise.\n\n\
        Writes <base>_coset and <base>_isogenies: one decimal u64 limb per line.",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Either nothing, or `p a b output_filename`
    #[arg(value_name = "P A B OUTPUT")]
    args: Vec<String>,

    /// Curve used when no positional arguments are given
    #[arg(long, value_enum, default_value_t = PresetOpt::Bn254)]
    preset: PresetOpt,

    /// Group order of a custom curve (decimal or 0x-hex)
    #[arg(long, value_parser = parse_order)]
    order: Option<BigUint>,

    /// Seed for a reproducible run (OS entropy otherwise)
    #[arg(long, env = "ECFFT_SEED")]
    seed: Option<u64>,

    /// Generator/coset/chain runs before giving up on a dead-ended chain
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    attempts: u32,

    /// Also write <base>_manifest.json
    #[arg(long, default_value_t = false)]
    manifest: bool,

    /// Re-read the written files and re-check the halving property
    #[arg(long, default_value_t = false)]
    verify: bool,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
enum PresetOpt {
    /// BN254 base field (2^14 domain)
    Bn254,
    /// BLS12-381 base field (2^15 domain)
    #[value(name = "bls12-381")]
    Bls12_381,
    /// p = 2^255 - 19 (2^16 domain)
    Curve25519,
}

impl From<PresetOpt> for Preset {
    fn from(p: PresetOpt) -> Self {
        match p {
            PresetOpt::Bn254 => Self::Bn254,
            PresetOpt::Bls12_381 => Self::Bls12_381,
            PresetOpt::Curve25519 => Self::Curve25519,
        }
    }
}

fn parse_order(s: &str) -> std::result::Result<BigUint, String> {
    parse_uint(s).map_err(|e| e.to_string())
}

/// What to generate and where.
struct Job {
    curve: Curve,
    order: GroupOrder,
    base: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let job = match cli.args.len() {
        0 => preset_job(&cli)?,
        4 => custom_job(&cli)?,
        _ => {
            // Wrong arity is a usage error: help, clean exit, no files.
            Cli::command().print_help().context("printing usage")?;
            println!();
            return Ok(());
        }
    };
    run(&cli, job)
}

fn preset_job(cli: &Cli) -> Result<Job> {
    let preset = Preset::from(cli.preset);
    if cli.order.is_some() {
        warn!(preset = %preset, "--order is ignored for preset curves");
    }
    Ok(Job {
        curve: preset
            .curve()
            .with_context(|| format!("building preset {preset}"))?,
        order: preset.order()?,
        base: PathBuf::from(preset.name()),
    })
}

fn custom_job(cli: &Cli) -> Result<Job> {
    let [p, a, b, out] = cli.args.as_slice() else {
        bail!("expected `p a b output_filename`");
    };
    let p = parse_uint(p).context("parsing p")?;
    let a = parse_uint(a).context("parsing a")?;
    let b = parse_uint(b).context("parsing b")?;
    if out.is_empty() {
        bail!("output filename must not be empty");
    }

    let curve = Curve::from_coefficients(p, a, b).context("building the curve")?;
    let order = GroupOrder::resolve(&curve, cli.order.clone())?;
    Ok(Job {
        curve,
        order,
        base: PathBuf::from(out),
    })
}

fn run(cli: &Cli, job: Job) -> Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => {
            info!(seed, "using seeded RNG");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    };
    let options = GenerateOptions {
        attempts: cli.attempts as usize,
    };

    let (params, paths, summary) = generate_to(&job.curve, job.order, &options, &job.base, &mut rng)
        .with_context(|| format!("generating parameters for {}", job.base.display()))?;

    if cli.manifest {
        Manifest::describe(&params, &paths, cli.seed)
            .write(&paths.manifest)
            .with_context(|| format!("writing {}", paths.manifest.display()))?;
        info!(path = %paths.manifest.display(), "wrote manifest");
    }

    if cli.verify {
        params
            .verify_written(&paths)
            .context("verifying written artifacts")?;
        info!("artifacts verified");
    }

    println!(
        "{} ({} lines) + {} ({} lines): log_n = {}, {} isogenies, {} limb(s) per element",
        paths.coset.display(),
        summary.coset_lines,
        paths.isogenies.display(),
        summary.isogeny_lines,
        params.order().log_n(),
        params.chain().len(),
        params.num_limbs(),
    );
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
