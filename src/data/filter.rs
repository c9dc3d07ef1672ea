use log::debug;
use serde::{Deserialize, Serialize};

use super::model::Peak;

// ---------------------------------------------------------------------------
// m/z window
// ---------------------------------------------------------------------------

/// Inclusive m/z window a peak must fall in to be kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MzRange {
    pub lo: f64,
    pub hi: f64,
}

impl MzRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        MzRange { lo, hi }
    }

    pub fn contains(&self, mz: f64) -> bool {
        mz >= self.lo && mz <= self.hi
    }
}

impl Default for MzRange {
    fn default() -> Self {
        MzRange::new(0.0, 5000.0)
    }
}

// ---------------------------------------------------------------------------
// Intensity threshold + range filter
// ---------------------------------------------------------------------------

/// Keep peaks strictly above `threshold_pct` % of the tallest peak and inside
/// `mz_range`.
///
/// The threshold is relative to the tallest peak of the *whole* list, before
/// the range is applied. Input order is preserved.
pub fn filter_peaks(peaks: &[Peak], threshold_pct: f64, mz_range: MzRange) -> Vec<Peak> {
    let Some(max_intensity) = peaks
        .iter()
        .map(|p| p.intensity)
        .filter(|i| !i.is_nan())
        .reduce(f64::max)
    else {
        return Vec::new();
    };
    let cutoff = threshold_pct * 0.01 * max_intensity;

    let kept: Vec<Peak> = peaks
        .iter()
        .filter(|p| p.intensity > cutoff && mz_range.contains(p.mz))
        .copied()
        .collect();

    debug!(
        "Threshold {threshold_pct}% (cutoff {cutoff:.3}) and range [{}, {}] kept {} of {} peaks",
        mz_range.lo,
        mz_range.hi,
        kept.len(),
        peaks.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peaks() -> Vec<Peak> {
        vec![
            Peak::new(100.0, 10.0),
            Peak::new(200.0, 100.0),
            Peak::new(300.0, 15.0),
            Peak::new(400.0, 50.0),
        ]
    }

    #[test]
    fn test_threshold_is_strict() {
        let kept = filter_peaks(&peaks(), 15.0, MzRange::default());
        let mzs: Vec<f64> = kept.iter().map(|p| p.mz).collect();
        assert_eq!(mzs, vec![200.0, 400.0]);
    }

    #[test]
    fn test_range_is_inclusive() {
        let kept = filter_peaks(&peaks(), 1.0, MzRange::new(200.0, 300.0));
        let mzs: Vec<f64> = kept.iter().map(|p| p.mz).collect();
        assert_eq!(mzs, vec![200.0, 300.0]);
    }

    #[test]
    fn test_threshold_uses_global_maximum() {
        // The tallest peak lies outside the range but still sets the cutoff.
        let kept = filter_peaks(&peaks(), 20.0, MzRange::new(250.0, 350.0));
        assert!(kept.is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(filter_peaks(&[], 10.0, MzRange::default()).is_empty());
    }
}
