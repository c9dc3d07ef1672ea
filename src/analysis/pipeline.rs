use log::info;

use super::backbone::{BackboneGraph, extract_backbone};
use super::chains::{ChainAssignment, assign_chains};
use super::differences::{HistogramBin, compute_differences, difference_histogram, unmatched_peaks};
use super::preprocess::preprocess;
use super::reference::{Reference, ReferenceOptions};
use crate::config::AnalysisParams;
use crate::data::model::{DifferenceRecord, Peak, RawReferenceEntry};
use crate::error::AnalysisError;

/// Everything one run produces, ready for tabulation or drawing.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Thresholded, de-isotoped peaks, ascending by m/z.
    pub peaks: Vec<Peak>,
    /// All pairs, sorted by assigned mass, largest first.
    pub assigned: Vec<DifferenceRecord>,
    pub unassigned: Vec<DifferenceRecord>,
    /// Peaks that take part in no assigned difference.
    pub unmatched: Vec<Peak>,
    pub histogram: Vec<HistogramBin>,
    pub graph: BackboneGraph,
}

impl Analysis {
    /// Every difference record, assigned ones first.
    pub fn differences(&self) -> impl Iterator<Item = &DifferenceRecord> {
        self.assigned.iter().chain(&self.unassigned)
    }
}

/// Build the reference described by `params` from raw records.
pub fn build_reference(
    raw: &[RawReferenceEntry],
    params: &AnalysisParams,
) -> Result<Reference, AnalysisError> {
    Reference::build(
        raw,
        ReferenceOptions {
            use_b_y_ions: params.use_b_y_ions,
            use_modifications: params.use_modifications,
        },
    )
}

/// Run the whole pipeline on one peak list.
///
/// Parameters are taken as given; validate them at the boundary first.
pub fn analyse(
    peaks: &[Peak],
    reference: &Reference,
    params: &AnalysisParams,
) -> Result<Analysis, AnalysisError> {
    if reference.is_empty() {
        return Err(AnalysisError::EmptyInput("the reference set is empty".into()));
    }

    let peaks = preprocess(peaks, params.threshold_pct, params.mz_range, params.isotope_tol)?;
    let differences = compute_differences(&peaks, reference, params.mass_tol, params.match_policy);

    let ChainAssignment {
        assigned,
        unassigned,
    } = assign_chains(
        differences,
        reference,
        params.max_length,
        params.mass_tol,
        params.match_policy,
    );
    let histogram = difference_histogram(assigned.iter().chain(&unassigned));
    let unmatched = unmatched_peaks(&peaks, &assigned);
    let graph = extract_backbone(&assigned);

    info!(
        "{} peaks: {} assigned and {} unassigned differences, {} unmatched peaks",
        peaks.len(),
        assigned.len(),
        unassigned.len(),
        unmatched.len()
    );

    Ok(Analysis {
        peaks,
        assigned,
        unassigned,
        unmatched,
        histogram,
        graph,
    })
}

/// Build the reference and analyse in one call.
pub fn analyse_raw(
    peaks: &[Peak],
    raw_reference: &[RawReferenceEntry],
    params: &AnalysisParams,
) -> Result<Analysis, AnalysisError> {
    let reference = build_reference(raw_reference, params)?;
    analyse(peaks, &reference, params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::backbone::Backbone;
    use crate::data::filter::MzRange;
    use crate::data::loader::default_reference;
    use crate::data::model::EntryKind;

    fn params() -> AnalysisParams {
        AnalysisParams {
            threshold_pct: 5.0,
            mass_tol: 0.05,
            isotope_tol: 1.2,
            mz_range: MzRange::new(0.0, 2000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_peaks_is_empty_input() {
        let peaks = vec![Peak::new(3000.0, 10.0)];
        let err = analyse_raw(&peaks, &default_reference().unwrap(), &params()).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput(_)));
    }

    #[test]
    fn test_hexose_ladder() {
        // Y-ion ladder losing hexoses, with isotope peaks and one stray peak.
        let peaks = vec![
            Peak::new(163.06, 40.0),
            Peak::new(164.06, 8.0),
            Peak::new(325.11, 60.0),
            Peak::new(326.12, 12.0),
            Peak::new(487.16, 100.0),
            Peak::new(488.17, 20.0),
            Peak::new(700.0, 30.0),
        ];
        let analysis = analyse_raw(&peaks, &default_reference().unwrap(), &params()).unwrap();

        assert_eq!(analysis.peaks.len(), 4);
        assert_eq!(analysis.assigned.len() + analysis.unassigned.len(), 6);
        assert_eq!(analysis.assigned.len(), 2);
        assert!(analysis.assigned.iter().all(|r| r.assigned_symbol() == "Hex"));
        assert_eq!(analysis.unmatched.len(), 1);
        assert_eq!(analysis.unmatched[0].mz, 700.0);
        assert_eq!(
            analysis.graph.backbone(),
            &Backbone::Path(vec![487.16, 325.11, 163.06])
        );
    }

    #[test]
    fn test_histogram_labels_chain_matches() {
        let peaks = vec![
            Peak::new(100.0, 100.0),
            Peak::new(262.05, 80.0),
            Peak::new(424.1, 60.0),
        ];
        let params = AnalysisParams {
            max_length: 2,
            ..params()
        };
        let analysis = analyse_raw(&peaks, &default_reference().unwrap(), &params).unwrap();

        let dimer = analysis
            .assigned
            .iter()
            .find(|r| r.kind() == Some(EntryKind::Polysaccharide))
            .unwrap();
        assert_eq!(dimer.assigned_symbol(), "HexHex");

        let bin = analysis
            .histogram
            .iter()
            .find(|b| b.difference == 324.1)
            .unwrap();
        assert_eq!(bin.count, 1);
        assert!(bin.assigned);
        assert_eq!(bin.symbol.as_deref(), Some("HexHex"));

        let binned: usize = analysis.histogram.iter().map(|b| b.count).sum();
        assert_eq!(binned, analysis.differences().count());
    }
}
