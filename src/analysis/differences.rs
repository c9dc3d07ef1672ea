use std::collections::BTreeMap;

use itertools::Itertools;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::reference::Reference;
use crate::data::model::{DifferenceRecord, Matchable, Peak};

/// How to pick among several candidates inside the tolerance window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPolicy {
    /// Smallest absolute mass error; ties go to the earlier candidate.
    #[default]
    Closest,
    /// The first candidate in table order, however far inside the window.
    FirstListed,
}

/// Find the candidate matching `delta`, using an exclusive tolerance bound.
pub fn find_match<T: Matchable>(
    candidates: &[T],
    delta: f64,
    mass_tol: f64,
    policy: MatchPolicy,
) -> Option<&T> {
    let mut within = candidates
        .iter()
        .filter(|c| (c.mass() - delta).abs() < mass_tol);

    match policy {
        MatchPolicy::FirstListed => within.next(),
        // `min_by` keeps the first of equal minima.
        MatchPolicy::Closest => within.min_by(|a, b| {
            (a.mass() - delta)
                .abs()
                .total_cmp(&(b.mass() - delta).abs())
        }),
    }
}

/// One record per unordered pair of `peaks`, matched against `reference`.
///
/// The result is sorted by assigned mass, largest first, so unassigned pairs
/// come last. Pairs keep the order of `peaks` (`peak1` precedes `peak2`).
pub fn compute_differences(
    peaks: &[Peak],
    reference: &Reference,
    mass_tol: f64,
    policy: MatchPolicy,
) -> Vec<DifferenceRecord> {
    let min_mass = reference.min_mass();
    let mut too_small = 0usize;

    let mut records: Vec<DifferenceRecord> = peaks
        .iter()
        .tuple_combinations()
        .map(|(a, b)| {
            let mut record = DifferenceRecord::unassigned(a.mz, b.mz);
            if record.delta < min_mass {
                too_small += 1;
            } else {
                record.assignment = find_match(reference.entries(), record.delta, mass_tol, policy)
                    .map(Matchable::to_assignment);
            }
            record
        })
        .collect();

    sort_by_assigned_mass(&mut records);

    let assigned = records.iter().filter(|r| r.is_assigned()).count();
    debug!("{too_small} differences fall below the smallest reference mass {min_mass}");
    info!(
        "Computed {} peak differences, {assigned} assigned",
        records.len()
    );
    records
}

/// Stable descending sort on assigned mass.
pub(crate) fn sort_by_assigned_mass(records: &mut [DifferenceRecord]) {
    records.sort_by(|a, b| b.assigned_mass().total_cmp(&a.assigned_mass()));
}

/// Peaks that take part in no assigned difference.
pub fn unmatched_peaks(peaks: &[Peak], assigned: &[DifferenceRecord]) -> Vec<Peak> {
    peaks
        .iter()
        .filter(|p| !assigned.iter().any(|r| r.involves(p.mz)))
        .copied()
        .collect()
}

// ---------------------------------------------------------------------------
// Difference histogram
// ---------------------------------------------------------------------------

/// Count of differences sharing one 0.1 Da bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    /// Bin centre, i.e. the difference rounded to one decimal.
    pub difference: f64,
    pub count: usize,
    /// First assigned symbol seen in this bin, if any.
    pub symbol: Option<String>,
    pub assigned: bool,
}

/// Bin every difference to 0.1 Da, ascending by bin.
///
/// Pass the records after chain assignment so chain-only matches are labelled.
pub fn difference_histogram<'a>(
    records: impl IntoIterator<Item = &'a DifferenceRecord>,
) -> Vec<HistogramBin> {
    let mut bins: BTreeMap<i64, HistogramBin> = BTreeMap::new();

    for record in records {
        let key = (record.delta * 10.0).round() as i64;
        let bin = bins.entry(key).or_insert_with(|| HistogramBin {
            difference: key as f64 / 10.0,
            count: 0,
            symbol: None,
            assigned: false,
        });
        bin.count += 1;
        if let Some(assignment) = &record.assignment {
            bin.assigned = true;
            bin.symbol.get_or_insert_with(|| assignment.symbol.clone());
        }
    }

    bins.into_values().collect()
}
