//! Error types for richardson-solver.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid {what} dimension: expected {expected}, got {actual}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("empty system (N = 0)")]
    EmptySystem,

    #[error("invalid matrix data: {0}")]
    InvalidMatrixData(String),

    #[error("tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),

    #[error("iteration limit must be at least 1")]
    InvalidIterationLimit,

    #[error("step size must be finite, got {0}")]
    InvalidStepSize(f64),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("convergence failed after {iterations} iterations (relative residual {residual:e})")]
    ConvergenceFailed { iterations: usize, residual: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<rayon::ThreadPoolBuildError> for Error {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        Error::ThreadPool(e.to_string())
    }
}
