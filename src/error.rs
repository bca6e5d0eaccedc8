use thiserror::Error;

/// Every failure kind the engine can report to a caller.
///
/// `DtError` never represents an internal invariant violation (those are
/// `debug_assert!`s, not recoverable errors) -- it only ever describes a
/// caller mistake: a bad index, malformed input, or an IO failure at the
/// value boundary.
#[derive(Debug, Error)]
pub enum DtError {
    #[error("index {0} is out of range")]
    OutOfRange(usize),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("interpolation failed: empty mesh or query outside the convex hull")]
    EmptyMesh,

    #[error("the infinite vertex (index 0) cannot be accessed geometrically")]
    InfiniteVertex,

    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type DtResult<T> = Result<T, DtError>;
