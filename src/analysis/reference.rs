use log::{debug, info};
use serde::Serialize;

use crate::data::model::{EntryKind, IonType, RawReferenceEntry, ReferenceEntry, WATER_MASS, round2};
use crate::error::AnalysisError;

/// Modification masses that can be matched alongside the monosaccharides.
/// `(name, symbol, mass)`; masses are already residue masses.
const MODIFICATIONS: [(&str, &str, f64); 4] = [
    ("Acetylation", "Ac", 42.0106),
    ("Methylation", "Me", 14.0157),
    ("Phosphorylation", "Ph", 79.9663),
    ("Sulfonation", "Su", 79.9568),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReferenceOptions {
    /// Replace every entry by its B- and Y-ion variants.
    pub use_b_y_ions: bool,
    /// Append the fixed modification table.
    pub use_modifications: bool,
}

/// The reference set differences are matched against, in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reference {
    entries: Vec<ReferenceEntry>,
}

impl Reference {
    /// Convert raw records into residue masses and derive the requested variants.
    pub fn build(raw: &[RawReferenceEntry], options: ReferenceOptions) -> Result<Self, AnalysisError> {
        let mut entries: Vec<ReferenceEntry> = raw
            .iter()
            .filter(|r| r.mz > 0.0)
            .map(|r| ReferenceEntry {
                name: r.name.clone(),
                symbol: r.symbol.clone(),
                symbol_description: r.symbol_description.clone(),
                mass: round2(r.mz - WATER_MASS),
                ion_type: IonType::None,
                kind: EntryKind::Monosaccharide,
            })
            .collect();

        if entries.is_empty() {
            return Err(AnalysisError::ReferenceLoad(format!(
                "no entries with a positive mass among {} records",
                raw.len()
            )));
        }
        debug!("{} of {} reference records have a positive mass", entries.len(), raw.len());

        if options.use_b_y_ions {
            entries = split_b_y(entries);
        }
        if options.use_modifications {
            entries.extend(modifications());
        }

        info!("Reference holds {} entries", entries.len());
        Ok(Reference { entries })
    }

    /// Wrap already-converted entries, e.g. a custom table built in code.
    pub fn from_entries(entries: Vec<ReferenceEntry>) -> Result<Self, AnalysisError> {
        if entries.is_empty() {
            return Err(AnalysisError::EmptyInput("the reference set is empty".into()));
        }
        Ok(Reference { entries })
    }

    pub fn entries(&self) -> &[ReferenceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Smallest entry mass; differences below it cannot match anything.
    pub fn min_mass(&self) -> f64 {
        self.entries
            .iter()
            .map(|e| e.mass)
            .fold(f64::INFINITY, f64::min)
    }
}

/// B ions keep the residue mass, Y ions regain the water.
fn split_b_y(entries: Vec<ReferenceEntry>) -> Vec<ReferenceEntry> {
    let b_ions = entries.iter().map(|e| ReferenceEntry {
        name: format!("{} (B)", e.name),
        symbol: format!("{} ᵇ", e.symbol),
        ion_type: IonType::B,
        ..e.clone()
    });
    let y_ions = entries.iter().map(|e| ReferenceEntry {
        name: format!("{} (Y)", e.name),
        symbol: format!("{} ʸ", e.symbol),
        mass: round2(e.mass + WATER_MASS),
        ion_type: IonType::Y,
        ..e.clone()
    });
    b_ions.chain(y_ions).collect()
}

fn modifications() -> impl Iterator<Item = ReferenceEntry> {
    MODIFICATIONS.iter().map(|&(name, symbol, mass)| ReferenceEntry {
        name: name.to_string(),
        symbol: symbol.to_string(),
        symbol_description: "Modification".to_string(),
        mass,
        ion_type: IonType::None,
        kind: EntryKind::Modification,
    })
}
