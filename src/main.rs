//! # glycoladder
//!
//! Identify glycan fragments in an MS/MS peak list from the mass differences
//! between its peaks.
//!
//! ```bash
//! # Analyse with the bundled monosaccharide reference
//! glycoladder analyse spectrum.csv --length 3 --out results/
//!
//! # Show the reference that would be matched against
//! glycoladder reference --by-ions
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use glycoladder::report::write_report;
use glycoladder::{
    AnalysisError, AnalysisParams, Backbone, Config, MatchPolicy, RawReferenceEntry, analyse,
    build_reference, default_reference, load_peaks, load_reference,
};

/// glycoladder - glycan fragment ladders from peak-mass differences
#[derive(Parser)]
#[command(name = "glycoladder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Smallest mass error wins
    Closest,
    /// First entry in reference order wins
    First,
}

impl From<PolicyArg> for MatchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Closest => MatchPolicy::Closest,
            PolicyArg::First => MatchPolicy::FirstListed,
        }
    }
}

/// Reference-shaping flags shared by both subcommands.
#[derive(clap::Args)]
struct ReferenceArgs {
    /// Monosaccharide reference JSON (defaults to the bundled SNFG table)
    #[arg(long, value_name = "FILE")]
    reference: Option<PathBuf>,

    /// Also match modifications (acetylation, methylation, ...)
    #[arg(long)]
    mods: bool,

    /// Split the reference into B and Y ions
    #[arg(long)]
    by_ions: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyse a peak list (.csv, .tsv or .parquet)
    Analyse {
        #[arg(value_name = "PEAKS")]
        peaks: PathBuf,

        #[command(flatten)]
        reference: ReferenceArgs,

        /// Load parameters from a TOML config file; flags override it
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Write result tables and graph.json into this directory
        #[arg(short, long, value_name = "DIR")]
        out: Option<PathBuf>,

        /// Intensity threshold, % of the tallest peak (1-99)
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Mass tolerance for identification, Da
        #[arg(long)]
        mass_tol: Option<f64>,

        /// Isotope tolerance, Da
        #[arg(long)]
        isotope_tol: Option<f64>,

        #[arg(long)]
        mz_min: Option<f64>,

        #[arg(long)]
        mz_max: Option<f64>,

        /// Longest polysaccharide chain to match (1-8)
        #[arg(short, long)]
        length: Option<usize>,

        /// Tie-break among candidates inside the tolerance
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },

    /// Print the derived reference table
    Reference {
        #[command(flatten)]
        reference: ReferenceArgs,
    },
}

fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyse {
            peaks,
            reference,
            config,
            out,
            threshold,
            mass_tol,
            isotope_tol,
            mz_min,
            mz_max,
            length,
            policy,
        } => {
            let mut params = match config {
                Some(path) => Config::from_file(&path)?.analysis,
                None => AnalysisParams::default(),
            };
            params.threshold_pct = threshold.unwrap_or(params.threshold_pct);
            params.mass_tol = mass_tol.unwrap_or(params.mass_tol);
            params.isotope_tol = isotope_tol.unwrap_or(params.isotope_tol);
            params.mz_range.lo = mz_min.unwrap_or(params.mz_range.lo);
            params.mz_range.hi = mz_max.unwrap_or(params.mz_range.hi);
            params.max_length = length.unwrap_or(params.max_length);
            params.match_policy = policy.map_or(params.match_policy, MatchPolicy::from);
            params.use_modifications |= reference.mods;
            params.use_b_y_ions |= reference.by_ions;

            run_analysis(&peaks, reference.reference.as_deref(), &params, out.as_deref())
        }
        Commands::Reference { reference } => {
            let params = AnalysisParams {
                use_modifications: reference.mods,
                use_b_y_ions: reference.by_ions,
                ..Default::default()
            };
            let built = build_reference(&raw_reference(reference.reference.as_deref())?, &params)?;
            println!("{:<12} {:>10}  {:<4} {:<15} name", "symbol", "mass", "ion", "kind");
            for entry in built.entries() {
                println!(
                    "{:<12} {:>10.4}  {:<4} {:<15} {}",
                    entry.symbol,
                    entry.mass,
                    entry.ion_type.to_string(),
                    entry.kind.to_string(),
                    entry.name
                );
            }
            Ok(())
        }
    }
}

fn raw_reference(path: Option<&Path>) -> Result<Vec<RawReferenceEntry>, AnalysisError> {
    match path {
        Some(path) => load_reference(path),
        None => default_reference(),
    }
}

fn run_analysis(
    peaks_path: &Path,
    reference_path: Option<&Path>,
    params: &AnalysisParams,
    out: Option<&Path>,
) -> Result<()> {
    params.validate()?;
    info!("Parameters: {params:?}");

    let peaks = load_peaks(peaks_path)
        .with_context(|| format!("loading peak list {}", peaks_path.display()))?;
    let reference = build_reference(&raw_reference(reference_path)?, params)?;

    let analysis = match analyse(&peaks, &reference, params) {
        Err(AnalysisError::EmptyInput(reason)) => {
            eprintln!("No peaks found ({reason}).");
            eprintln!("Check the spectrum file, widen the m/z range or lower the threshold.");
            std::process::exit(2);
        }
        other => other?,
    };

    println!("Peaks after preprocessing: {}", analysis.peaks.len());
    println!("Assigned differences:      {}", analysis.assigned.len());
    println!("Unassigned differences:    {}", analysis.unassigned.len());
    println!("Unmatched peaks:           {}", analysis.unmatched.len());
    match analysis.graph.backbone() {
        Backbone::Path(path) => {
            let steps: Vec<String> = path.iter().map(|mz| format!("{mz:.4}")).collect();
            println!("Backbone:                  {}", steps.join(" -> "));
        }
        Backbone::Disconnected => println!("Backbone:                  none (graph disconnected)"),
        Backbone::Empty => println!("Backbone:                  none (no assigned differences)"),
    }

    if let Some(dir) = out {
        write_report(&analysis, dir)?;
        println!("Report written to {}", dir.display());
    }
    Ok(())
}
