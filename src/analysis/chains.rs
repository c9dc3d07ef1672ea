use std::collections::HashSet;

use itertools::Itertools;
use log::{debug, info, warn};

use super::differences::{MatchPolicy, find_match, sort_by_assigned_mass};
use super::reference::Reference;
use crate::config::MAX_CHAIN_LENGTH;
use crate::data::model::{Assignment, DifferenceRecord, EntryKind, ReferenceEntry, round2};

/// Differences split by whether anything matched them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainAssignment {
    pub assigned: Vec<DifferenceRecord>,
    pub unassigned: Vec<DifferenceRecord>,
}

/// Try to explain still-unassigned differences as chains of 2..=`max_length`
/// monosaccharides, then partition everything into assigned and unassigned.
///
/// Chains are only built from units that were already matched on their own
/// somewhere in this spectrum. Both partitions stay sorted by assigned mass,
/// largest first.
pub fn assign_chains(
    mut differences: Vec<DifferenceRecord>,
    reference: &Reference,
    max_length: usize,
    mass_tol: f64,
    policy: MatchPolicy,
) -> ChainAssignment {
    if max_length > MAX_CHAIN_LENGTH {
        warn!("Chain length {max_length} exceeds the limit, using {MAX_CHAIN_LENGTH}");
    }
    let max_length = max_length.min(MAX_CHAIN_LENGTH);

    if max_length > 1 {
        let alphabet = observed_alphabet(&differences, reference);
        let chains = generate_chains(&alphabet, max_length);
        info!(
            "Generated {} chains of length 2-{max_length} from {} observed units",
            chains.len(),
            alphabet.len()
        );

        if let Some(min_chain_mass) = chains.iter().map(|c| c.mass).reduce(f64::min) {
            let mut newly_assigned = 0usize;
            for record in differences
                .iter_mut()
                .filter(|r| !r.is_assigned() && r.delta >= min_chain_mass)
            {
                if let Some(chain) = find_match(&chains, record.delta, mass_tol, policy) {
                    record.assignment = Some(chain.clone());
                    newly_assigned += 1;
                }
            }
            debug!("Chains explained {newly_assigned} more differences");
            sort_by_assigned_mass(&mut differences);
        }
    }

    let (assigned, unassigned): (Vec<_>, Vec<_>) =
        differences.into_iter().partition(DifferenceRecord::is_assigned);
    ChainAssignment {
        assigned,
        unassigned,
    }
}

/// Monosaccharides matched as single units, in reference order.
pub fn observed_alphabet<'a>(
    differences: &[DifferenceRecord],
    reference: &'a Reference,
) -> Vec<&'a ReferenceEntry> {
    let observed: HashSet<&str> = differences
        .iter()
        .filter_map(|r| r.assignment.as_ref())
        .filter(|a| a.unit_count == 1 && a.kind == EntryKind::Monosaccharide)
        .map(|a| a.name.as_str())
        .collect();

    reference
        .entries()
        .iter()
        .filter(|e| observed.contains(e.name.as_str()))
        .collect()
}

/// Every multiset of 2..=`max_length` units drawn from `alphabet`.
///
/// Units appear in alphabet order within a chain, so names and symbols are
/// concatenated in that order.
pub fn generate_chains(alphabet: &[&ReferenceEntry], max_length: usize) -> Vec<Assignment> {
    (2..=max_length)
        .flat_map(|length| alphabet.iter().combinations_with_replacement(length))
        .map(|units| Assignment {
            name: units.iter().map(|u| u.name.as_str()).join("-"),
            symbol: units.iter().map(|u| u.symbol.as_str()).collect(),
            mass: round2(units.iter().map(|u| u.mass).sum()),
            ion_types: units.iter().map(|u| u.ion_type).collect(),
            kind: EntryKind::Polysaccharide,
            unit_count: units.len(),
        })
        .collect()
}
