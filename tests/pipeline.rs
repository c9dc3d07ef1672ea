use std::io::Write;

use glycoladder::analysis::chains::assign_chains;
use glycoladder::analysis::differences::compute_differences;
use glycoladder::{
    AnalysisParams, Backbone, EdgeRole, EntryKind, IonType, MatchPolicy, MzRange, Peak, Reference,
    ReferenceEntry, analyse, analyse_raw, default_reference, load_peaks,
};
use tempfile::tempdir;

fn hex_42() -> Reference {
    Reference::from_entries(vec![ReferenceEntry {
        name: "Hex".into(),
        symbol: "Hex".into(),
        symbol_description: String::new(),
        mass: 42.0,
        ion_type: IonType::None,
        kind: EntryKind::Monosaccharide,
    }])
    .unwrap()
}

fn flat(mzs: &[f64]) -> Vec<Peak> {
    mzs.iter().map(|&mz| Peak::new(mz, 100.0)).collect()
}

#[test]
fn test_three_peak_example() {
    let params = AnalysisParams {
        threshold_pct: 1.0,
        mass_tol: 1.0,
        isotope_tol: 0.5,
        max_length: 2,
        ..Default::default()
    };
    let analysis = analyse(&flat(&[100.0, 142.0, 304.0]), &hex_42(), &params).unwrap();

    // 162 and 204 are not multiples of 42 within 1 Da, so only one pair matches.
    assert_eq!(analysis.assigned.len(), 1);
    assert_eq!(analysis.unassigned.len(), 2);
    assert_eq!(analysis.graph.nodes(), &[100.0, 142.0]);
    assert_eq!(analysis.unmatched, vec![Peak::new(304.0, 100.0)]);
    assert_eq!(analysis.graph.backbone(), &Backbone::Path(vec![142.0, 100.0]));
}

#[test]
fn test_b_y_reference_finds_both_ion_types() {
    let params = AnalysisParams {
        threshold_pct: 1.0,
        mass_tol: 0.02,
        use_b_y_ions: true,
        ..Default::default()
    };
    // 162.05 apart (B-type Hex) and 180.06 apart (Y-type Hex).
    let peaks = flat(&[366.14, 528.19, 708.25]);
    let analysis = analyse_raw(&peaks, &default_reference().unwrap(), &params).unwrap();

    let ion_types: Vec<String> = analysis
        .assigned
        .iter()
        .map(|r| r.assignment.as_ref().unwrap().ion_label())
        .collect();
    assert_eq!(ion_types, vec!["Y", "B"]);
    assert_eq!(analysis.assigned[1].assigned_symbol(), "Hex ᵇ");
    assert_eq!(analysis.assigned[0].assigned_name(), Some("Hexose (Y)"));
}

#[test]
fn test_modifications_stay_out_of_the_graph() {
    let params = AnalysisParams {
        threshold_pct: 1.0,
        mass_tol: 0.02,
        use_modifications: true,
        ..Default::default()
    };
    let peaks = flat(&[366.14, 408.15, 528.19]);
    let analysis = analyse_raw(&peaks, &default_reference().unwrap(), &params).unwrap();

    assert!(analysis
        .assigned
        .iter()
        .any(|r| r.kind() == Some(EntryKind::Modification)));
    assert_eq!(analysis.graph.nodes(), &[366.14, 528.19]);
    assert!(analysis.unmatched.is_empty());
}

#[test]
fn test_disconnected_graph_has_no_backbone() {
    let params = AnalysisParams {
        threshold_pct: 1.0,
        mass_tol: 0.02,
        ..Default::default()
    };
    let peaks = flat(&[200.0, 362.05, 1000.0, 1203.08]);
    let analysis = analyse_raw(&peaks, &default_reference().unwrap(), &params).unwrap();

    assert_eq!(analysis.graph.backbone(), &Backbone::Disconnected);
    assert!(analysis.graph.require_backbone().is_err());
    assert!(analysis.graph.edges().all(|e| e.role == EdgeRole::Branch));
}

#[test]
fn test_policy_changes_the_pick() {
    let reference = Reference::from_entries(vec![
        ReferenceEntry {
            name: "Loose".into(),
            symbol: "L".into(),
            symbol_description: String::new(),
            mass: 161.7,
            ion_type: IonType::None,
            kind: EntryKind::Monosaccharide,
        },
        ReferenceEntry {
            name: "Tight".into(),
            symbol: "T".into(),
            symbol_description: String::new(),
            mass: 162.05,
            ion_type: IonType::None,
            kind: EntryKind::Monosaccharide,
        },
    ])
    .unwrap();
    let peaks = flat(&[100.0, 262.05]);

    let closest = compute_differences(&peaks, &reference, 1.0, MatchPolicy::Closest);
    assert_eq!(closest[0].assigned_symbol(), "T");
    let first = compute_differences(&peaks, &reference, 1.0, MatchPolicy::FirstListed);
    assert_eq!(first[0].assigned_symbol(), "L");

    let chained = assign_chains(closest, &reference, 3, 1.0, MatchPolicy::Closest);
    assert_eq!(chained.assigned.len(), 1);
}

#[test]
fn test_csv_file_end_to_end() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("spectrum.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "m/z,Intensity").unwrap();
    for (mz, intensity) in [
        (204.087, 900.0),
        (205.09, 150.0),
        (366.14, 700.0),
        (367.143, 120.0),
        (528.19, 500.0),
        (690.24, 300.0),
        (1500.0, 2.0),
    ] {
        writeln!(file, "{mz},{intensity}").unwrap();
    }
    drop(file);

    let peaks = load_peaks(&path).unwrap();
    let params = AnalysisParams {
        threshold_pct: 5.0,
        mass_tol: 0.05,
        mz_range: MzRange::new(0.0, 2000.0),
        max_length: 3,
        ..Default::default()
    };
    let analysis = analyse_raw(&peaks, &default_reference().unwrap(), &params).unwrap();

    assert_eq!(analysis.peaks.len(), 4);
    assert_eq!(analysis.assigned.len(), 6);
    assert!(analysis.unassigned.is_empty());
    assert_eq!(
        analysis.graph.require_backbone().unwrap(),
        &[690.24, 204.087]
    );
}
