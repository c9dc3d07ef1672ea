use std::collections::BTreeSet;

use glycoladder::analysis::backbone::extract_backbone;
use glycoladder::analysis::chains::assign_chains;
use glycoladder::analysis::differences::compute_differences;
use glycoladder::analysis::preprocess::collapse_isotopes;
use glycoladder::data::filter::filter_peaks;
use glycoladder::{
    Assignment, Backbone, DifferenceRecord, EntryKind, IonType, MatchPolicy, MzRange, Peak,
    Reference, ReferenceOptions, default_reference,
};
use proptest::prelude::*;

fn peak_list(max_len: usize) -> impl Strategy<Value = Vec<Peak>> {
    prop::collection::vec((100.0f64..1500.0, 1.0f64..1000.0), 0..max_len)
        .prop_map(|pairs| pairs.into_iter().map(|(mz, i)| Peak::new(mz, i)).collect())
}

fn bundled() -> Reference {
    Reference::build(&default_reference().unwrap(), ReferenceOptions::default()).unwrap()
}

fn pair_key(record: &DifferenceRecord) -> (u64, u64) {
    (record.peak1.to_bits(), record.peak2.to_bits())
}

proptest! {
    #[test]
    fn collapsed_peaks_are_isotope_tol_apart(peaks in peak_list(60), tol in 0.01f64..5.0) {
        let collapsed = collapse_isotopes(&peaks, tol);
        for pair in collapsed.windows(2) {
            prop_assert!(pair[1].mz - pair[0].mz >= tol);
        }
        prop_assert!(collapsed.iter().all(|p| (1..=5).contains(&p.charge_state)));
    }

    #[test]
    fn raising_the_threshold_never_adds_peaks(
        peaks in peak_list(60),
        low in 1.0f64..99.0,
        bump in 0.0f64..50.0,
    ) {
        let high = (low + bump).min(99.0);
        let range = MzRange::default();
        prop_assert!(filter_peaks(&peaks, high, range).len() <= filter_peaks(&peaks, low, range).len());
    }

    #[test]
    fn one_record_per_pair(peaks in peak_list(40), tol in 0.01f64..2.0) {
        let peaks = collapse_isotopes(&peaks, 1.2);
        let n = peaks.len();
        let records = compute_differences(&peaks, &bundled(), tol, MatchPolicy::Closest);
        prop_assert_eq!(records.len(), n * n.saturating_sub(1) / 2);
        for record in &records {
            prop_assert_eq!(record.delta, (record.peak1 - record.peak2).abs());
            if let Some(assignment) = &record.assignment {
                prop_assert!((assignment.mass - record.delta).abs() < tol);
            }
        }
    }

    #[test]
    fn longer_chains_only_move_records_to_assigned(peaks in peak_list(20), length in 1usize..3) {
        let reference = bundled();
        let peaks = collapse_isotopes(&peaks, 1.2);
        let records = compute_differences(&peaks, &reference, 0.1, MatchPolicy::Closest);

        let short = assign_chains(records.clone(), &reference, length, 0.1, MatchPolicy::Closest);
        let long = assign_chains(records, &reference, length + 1, 0.1, MatchPolicy::Closest);

        let long_keys: BTreeSet<(u64, u64)> = long.assigned.iter().map(pair_key).collect();
        prop_assert!(short.assigned.iter().all(|r| long_keys.contains(&pair_key(r))));
        prop_assert_eq!(
            short.assigned.len() + short.unassigned.len(),
            long.assigned.len() + long.unassigned.len()
        );
    }

    #[test]
    fn backbone_is_a_shortest_simple_path(
        edges in prop::collection::vec((0usize..10, 0usize..10), 1..25),
    ) {
        let records: Vec<DifferenceRecord> = edges
            .iter()
            .filter(|(a, b)| a != b)
            .map(|&(a, b)| {
                let mut record = DifferenceRecord::unassigned(100.0 + a as f64 * 50.0, 100.0 + b as f64 * 50.0);
                record.assignment = Some(Assignment {
                    name: "X".into(),
                    symbol: "X".into(),
                    mass: record.delta,
                    ion_types: vec![IonType::None],
                    kind: EntryKind::Monosaccharide,
                    unit_count: 1,
                });
                record
            })
            .collect();
        let graph = extract_backbone(&records);
        let nodes = graph.nodes().to_vec();

        // Hop distances from the heaviest node by repeated relaxation.
        let mut distance = vec![usize::MAX; nodes.len()];
        if let Some(last) = distance.last_mut() {
            *last = 0;
        }
        let index = |mz: f64| nodes.iter().position(|&n| n == mz).unwrap();
        for _ in 0..nodes.len() {
            for edge in graph.edges() {
                let (s, t) = (index(edge.source), index(edge.target));
                if distance[s] != usize::MAX {
                    distance[t] = distance[t].min(distance[s] + 1);
                }
                if distance[t] != usize::MAX {
                    distance[s] = distance[s].min(distance[t] + 1);
                }
            }
        }

        match graph.backbone() {
            Backbone::Empty => prop_assert!(records.is_empty()),
            Backbone::Disconnected => prop_assert_eq!(distance[0], usize::MAX),
            Backbone::Path(path) => {
                prop_assert_eq!(path.first().copied(), nodes.last().copied());
                prop_assert_eq!(path.last().copied(), nodes.first().copied());
                prop_assert_eq!(path.len() - 1, distance[0]);

                let distinct: BTreeSet<u64> = path.iter().map(|m| m.to_bits()).collect();
                prop_assert_eq!(distinct.len(), path.len());

                for step in path.windows(2) {
                    let (lo, hi) = (step[0].min(step[1]), step[0].max(step[1]));
                    prop_assert!(graph.edges().any(|e| e.source == lo && e.target == hi));
                }
            }
        }
    }
}
