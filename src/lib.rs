//! Glycan fragment identification from MS/MS peak lists.
//!
//! Pairwise peak-mass differences are matched against a monosaccharide
//! reference (optionally with B/Y-ion variants and modifications), unmatched
//! differences are retried as multi-unit chains, and the shortest ladder of
//! assigned differences between the lightest and heaviest peak is reported
//! as the backbone.
//!
//! ```no_run
//! use glycoladder::{AnalysisParams, analyse_raw, default_reference, load_peaks};
//!
//! # fn main() -> anyhow::Result<()> {
//! let peaks = load_peaks(std::path::Path::new("spectrum.csv"))?;
//! let analysis = analyse_raw(&peaks, &default_reference()?, &AnalysisParams::default())?;
//! println!("{} assigned differences", analysis.assigned.len());
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use analysis::backbone::{Backbone, BackboneGraph, Branch, EdgeRole, GraphEdge};
pub use analysis::differences::MatchPolicy;
pub use analysis::pipeline::{Analysis, analyse, analyse_raw, build_reference};
pub use analysis::reference::{Reference, ReferenceOptions};
pub use config::{AnalysisParams, Config, MAX_CHAIN_LENGTH};
pub use data::filter::MzRange;
pub use data::loader::{default_reference, load_peaks, load_reference};
pub use data::model::{
    Assignment, DifferenceRecord, EntryKind, IonType, Peak, RawReferenceEntry, ReferenceEntry,
};
pub use error::AnalysisError;
