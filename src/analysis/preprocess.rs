use log::{debug, info};

use crate::data::filter::{MzRange, filter_peaks};
use crate::data::model::Peak;
use crate::error::AnalysisError;

/// Highest charge state considered when reading isotope spacing.
pub const MAX_CHARGE: u8 = 5;

/// How far an isotope gap may stray from `1/z` and still count.
const SPACING_TOL: f64 = 1e-3;

/// Threshold, range-filter and de-isotope a raw peak list.
///
/// The result is sorted by m/z and no two peaks in it lie closer than
/// `isotope_tol`.
pub fn preprocess(
    peaks: &[Peak],
    threshold_pct: f64,
    mz_range: MzRange,
    isotope_tol: f64,
) -> Result<Vec<Peak>, AnalysisError> {
    let filtered = filter_peaks(peaks, threshold_pct, mz_range);
    if filtered.is_empty() {
        return Err(AnalysisError::EmptyInput(format!(
            "no peaks above {threshold_pct}% within m/z {}-{}; widen the range or lower the threshold",
            mz_range.lo, mz_range.hi
        )));
    }

    let collapsed = collapse_isotopes(&filtered, isotope_tol);
    info!(
        "Preprocessing kept {} of {} peaks ({} after thresholding)",
        collapsed.len(),
        peaks.len(),
        filtered.len()
    );
    Ok(collapsed)
}

/// Collapse isotope clusters onto their lightest peak.
///
/// A cluster is a run of m/z-sorted peaks whose successive gaps are all below
/// `isotope_tol`. The lightest member survives and gets a charge state read
/// from those gaps.
pub fn collapse_isotopes(peaks: &[Peak], isotope_tol: f64) -> Vec<Peak> {
    let mut sorted = peaks.to_vec();
    sorted.sort_by(|a, b| a.mz.total_cmp(&b.mz));

    let mut kept = Vec::with_capacity(sorted.len());
    let mut i = 0;
    while i < sorted.len() {
        let mut gaps = Vec::new();
        let mut j = i + 1;
        while j < sorted.len() && sorted[j].mz - sorted[j - 1].mz < isotope_tol {
            gaps.push(sorted[j].mz - sorted[j - 1].mz);
            j += 1;
        }

        let charge = infer_charge(&gaps);
        if !gaps.is_empty() {
            debug!(
                "Collapsed {} isotope peaks onto {:.4} (z = {charge})",
                gaps.len(),
                sorted[i].mz
            );
        }
        kept.push(sorted[i].with_charge(charge));
        i = j;
    }
    kept
}

/// Smallest `z` in `1..=MAX_CHARGE` whose spacing `1/z` fits every gap.
///
/// Falls back to 1 when nothing fits, including for a lone peak.
pub fn infer_charge(gaps: &[f64]) -> u8 {
    (1..=MAX_CHARGE)
        .find(|&z| {
            let spacing = 1.0 / f64::from(z);
            gaps.iter().all(|gap| (gap - spacing).abs() < SPACING_TOL)
        })
        .unwrap_or(1)
}
