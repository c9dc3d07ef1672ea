/// Errors surfaced by an analysis run.
///
/// The pipeline is deterministic, so none of these are worth retrying with the
/// same inputs.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// No peaks survived filtering, or the reference set is empty.
    #[error("No peaks found: {0}")]
    EmptyInput(String),

    /// The reference source is malformed or holds no usable entries.
    #[error("Reference error: {0}")]
    ReferenceLoad(String),

    /// The match graph has no path between its extreme masses.
    #[error("No backbone: the smallest and largest peaks are not connected")]
    NoBackbone,

    /// A caller-supplied parameter is outside its allowed range.
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl AnalysisError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        AnalysisError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
