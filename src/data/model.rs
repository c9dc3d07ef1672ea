use std::fmt;

use serde::{Deserialize, Serialize};

/// Mass of one water molecule, lost on glycosidic bond formation.
pub const WATER_MASS: f64 = 18.010565;

/// Round to two decimals, the precision every reference mass is held at.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// ---------------------------------------------------------------------------
// Peak – one row of the peak list
// ---------------------------------------------------------------------------

/// A single centroided peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Mass-to-charge ratio.
    pub mz: f64,
    pub intensity: f64,
    /// Inferred from isotope spacing; 1 until preprocessing says otherwise.
    pub charge_state: u8,
}

impl Peak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Peak {
            mz,
            intensity,
            charge_state: 1,
        }
    }

    /// Copy of this peak carrying a different charge state.
    pub fn with_charge(self, charge_state: u8) -> Self {
        Peak {
            charge_state,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Reference entries
// ---------------------------------------------------------------------------

/// Glycosidic fragment ion type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum IonType {
    #[default]
    None,
    B,
    Y,
}

impl fmt::Display for IonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IonType::None => Ok(()),
            IonType::B => write!(f, "B"),
            IonType::Y => write!(f, "Y"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Monosaccharide,
    Modification,
    Polysaccharide,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::Monosaccharide => write!(f, "Monosaccharide"),
            EntryKind::Modification => write!(f, "Modification"),
            EntryKind::Polysaccharide => write!(f, "Polysaccharide"),
        }
    }
}

/// One record of a reference file, before any mass conversion.
///
/// ```json
/// { "name": "Hexose", "m/z": 180.06339, "symbol": "Hex", "symbol_description": "White circle" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReferenceEntry {
    #[serde(alias = "Name")]
    pub name: String,
    /// Free mass, water included.
    #[serde(rename = "m/z")]
    pub mz: f64,
    #[serde(alias = "Symbol")]
    pub symbol: String,
    #[serde(alias = "Symbol Description")]
    pub symbol_description: String,
}

/// A named mass that peak differences are matched against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceEntry {
    pub name: String,
    pub symbol: String,
    pub symbol_description: String,
    /// Neutral residue mass, rounded to two decimals.
    pub mass: f64,
    pub ion_type: IonType,
    pub kind: EntryKind,
}

// ---------------------------------------------------------------------------
// Assignment – what a difference was matched to
// ---------------------------------------------------------------------------

/// The reference entry or generated chain a difference was matched to.
///
/// Single units carry one ion type; chains carry one per unit, in the order
/// the units were chosen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assignment {
    pub name: String,
    pub symbol: String,
    pub mass: f64,
    pub ion_types: Vec<IonType>,
    pub kind: EntryKind,
    pub unit_count: usize,
}

impl Assignment {
    /// Concatenated ion types, e.g. `"BB"`; empty when no unit has a type.
    pub fn ion_label(&self) -> String {
        self.ion_types.iter().map(ToString::to_string).collect()
    }
}

impl From<&ReferenceEntry> for Assignment {
    fn from(entry: &ReferenceEntry) -> Self {
        Assignment {
            name: entry.name.clone(),
            symbol: entry.symbol.clone(),
            mass: entry.mass,
            ion_types: vec![entry.ion_type],
            kind: entry.kind,
            unit_count: 1,
        }
    }
}

/// Anything with a mass that can be turned into an [`Assignment`].
pub trait Matchable {
    fn mass(&self) -> f64;
    fn to_assignment(&self) -> Assignment;
}

impl Matchable for ReferenceEntry {
    fn mass(&self) -> f64 {
        self.mass
    }

    fn to_assignment(&self) -> Assignment {
        Assignment::from(self)
    }
}

impl Matchable for Assignment {
    fn mass(&self) -> f64 {
        self.mass
    }

    fn to_assignment(&self) -> Assignment {
        self.clone()
    }
}

// ---------------------------------------------------------------------------
// DifferenceRecord – one unordered peak pair
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DifferenceRecord {
    pub peak1: f64,
    pub peak2: f64,
    /// Always `|peak1 - peak2|`.
    pub delta: f64,
    pub assignment: Option<Assignment>,
}

impl DifferenceRecord {
    pub fn unassigned(peak1: f64, peak2: f64) -> Self {
        DifferenceRecord {
            peak1,
            peak2,
            delta: (peak1 - peak2).abs(),
            assignment: None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        self.assignment.is_some()
    }

    /// Assigned mass, or `0.0` for unassigned pairs.
    pub fn assigned_mass(&self) -> f64 {
        self.assignment.as_ref().map_or(0.0, |a| a.mass)
    }

    pub fn assigned_name(&self) -> Option<&str> {
        self.assignment.as_ref().map(|a| a.name.as_str())
    }

    pub fn assigned_symbol(&self) -> &str {
        self.assignment.as_ref().map_or("", |a| a.symbol.as_str())
    }

    pub fn kind(&self) -> Option<EntryKind> {
        self.assignment.as_ref().map(|a| a.kind)
    }

    pub fn unit_count(&self) -> usize {
        self.assignment.as_ref().map_or(0, |a| a.unit_count)
    }

    pub fn involves(&self, mz: f64) -> bool {
        self.peak1 == mz || self.peak2 == mz
    }
}
