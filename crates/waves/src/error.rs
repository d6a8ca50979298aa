/// Errors from wave field construction and queries.
///
/// Every variant is a caller precondition violation. None of them leave the
/// field in a partially-updated state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WaveError {
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    #[error("vertex index {index} out of range for {len} vertices")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("cell ({row}, {col}) out of range for a {rows}x{cols} grid")]
    CellOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("unstable parameters: courant number {courant:.4} must stay below {limit:.4}")]
    Unstable { courant: f32, limit: f32 },
}

impl WaveError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}
