use thiserror::Error;

/// Failures at the rules-engine boundary. Analysis itself never fails: inputs
/// are legal positions and degenerate cases degrade to empty results.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid FEN string: {0}")]
    InvalidFen(String),
}
