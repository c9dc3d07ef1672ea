/// Analysis engine: reference building, peak preprocessing, difference
/// matching, chain assignment and backbone extraction.
///
/// ```text
///   Vec<RawReferenceEntry>        Vec<Peak>
///          │                          │
///          ▼                          ▼
///   ┌────────────┐             ┌────────────┐
///   │ reference   │             │ preprocess  │  threshold, de-isotope
///   └────────────┘             └────────────┘
///          └────────────┬─────────────┘
///                       ▼
///               ┌──────────────┐
///               │ differences   │  all pairs, matched within tolerance
///               └──────────────┘
///                       ▼
///               ┌──────────────┐
///               │ chains        │  multi-unit matches, partition
///               └──────────────┘
///                       ▼
///               ┌──────────────┐
///               │ backbone      │  graph + shortest extreme-to-extreme path
///               └──────────────┘
/// ```

pub mod backbone;
pub mod chains;
pub mod differences;
pub mod pipeline;
pub mod preprocess;
pub mod reference;
