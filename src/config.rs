//! Analysis parameters and TOML configuration file support.
//!
//! Parameters can be given on the command line or collected in a file:
//!
//! ```toml
//! # glycoladder.toml
//! [analysis]
//! threshold_pct = 10.0
//! mass_tol = 0.5
//! isotope_tol = 1.2
//! mz_range = { lo = 150.0, hi = 2000.0 }
//! max_length = 3
//! use_modifications = true
//! match_policy = "closest"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::analysis::differences::MatchPolicy;
use crate::data::filter::MzRange;
use crate::error::AnalysisError;

/// Longest polysaccharide chain the assigner will generate.
pub const MAX_CHAIN_LENGTH: usize = 8;

const TOLERANCE_BOUNDS: (f64, f64) = (1e-5, 100.0);

/// Everything an analysis run needs besides its peaks and reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisParams {
    /// Intensity cutoff, as a percentage of the tallest peak.
    pub threshold_pct: f64,
    /// Half-width of the (exclusive) matching window, in Da.
    pub mass_tol: f64,
    /// Successive peaks closer than this are one isotope cluster.
    pub isotope_tol: f64,
    pub mz_range: MzRange,
    /// Longest polysaccharide chain to match; 1 disables chain generation.
    pub max_length: usize,
    pub use_modifications: bool,
    pub use_b_y_ions: bool,
    pub match_policy: MatchPolicy,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            threshold_pct: 15.0,
            mass_tol: 1.0,
            isotope_tol: 1.2,
            mz_range: MzRange::default(),
            max_length: 1,
            use_modifications: false,
            use_b_y_ions: false,
            match_policy: MatchPolicy::default(),
        }
    }
}

impl AnalysisParams {
    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if !(1.0..=99.0).contains(&self.threshold_pct) {
            return Err(AnalysisError::invalid(
                "threshold_pct",
                format!("{} is outside [1, 99]", self.threshold_pct),
            ));
        }
        let (lo, hi) = TOLERANCE_BOUNDS;
        if !(lo..=hi).contains(&self.mass_tol) {
            return Err(AnalysisError::invalid(
                "mass_tol",
                format!("{} is outside [{lo}, {hi}]", self.mass_tol),
            ));
        }
        if !(lo..=hi).contains(&self.isotope_tol) {
            return Err(AnalysisError::invalid(
                "isotope_tol",
                format!("{} is outside [{lo}, {hi}]", self.isotope_tol),
            ));
        }
        if self.mz_range.lo > self.mz_range.hi {
            return Err(AnalysisError::invalid(
                "mz_range",
                format!("low {} exceeds high {}", self.mz_range.lo, self.mz_range.hi),
            ));
        }
        if !(1..=MAX_CHAIN_LENGTH).contains(&self.max_length) {
            return Err(AnalysisError::invalid(
                "max_length",
                format!("{} is outside [1, {MAX_CHAIN_LENGTH}]", self.max_length),
            ));
        }
        Ok(())
    }
}

/// Root configuration structure for glycoladder.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisParams,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }
}
