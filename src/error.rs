use thiserror::Error;

/// Top-level error type for contour-to-surface reconstruction.
#[derive(Debug, Error)]
pub enum StratumError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Contour(#[from] ContourError),

    #[error(transparent)]
    Triangulation(#[from] TriangulationError),
}

/// Errors raised while validating the source contours or parameters.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("input has no {0}")]
    Empty(&'static str),

    #[error("line {line} references point {index}, but only {count} points exist")]
    PointIndexOutOfRange { line: usize, index: u32, count: usize },

    #[error("point {0} has a non-finite coordinate")]
    NonFinitePoint(usize),

    #[error("invalid parameter {name} = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Errors related to the contour store.
#[derive(Debug, Error)]
pub enum ContourError {
    #[error("contour line not found")]
    LineNotFound,

    #[error("point {0} not found")]
    PointNotFound(u32),

    #[error("degenerate contour: {0}")]
    Degenerate(String),
}

/// Errors raised by the planar cap triangulator.
#[derive(Debug, Error)]
pub enum TriangulationError {
    #[error("triangulation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`StratumError`].
pub type Result<T> = std::result::Result<T, StratumError>;
