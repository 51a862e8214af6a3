//! Parallel Richardson iteration for dense linear systems.
//!
//! This crate provides:
//! - A row-major dense matrix type
//! - The Richardson (simple) iteration `x <- x - tau * (A * x - b)` with a
//!   relative-residual stopping rule
//! - Row-parallel sweeps on a per-call rayon worker pool
//! - Reference problems with known exact solutions

pub mod error;
pub mod helpers;
pub mod matrix;
pub mod parallel;
pub mod problems;
pub mod richardson;
pub mod scalar;

pub use error::{Error, Result};
pub use matrix::DenseMatrix;
pub use parallel::{ParallelConfig, RowExecutor};
pub use problems::{TestProblem, arbitrary_solution_problem, known_solution_problem};
pub use richardson::{
    FinalIterate, RichardsonConfig, RichardsonResult, relative_residual, solve_richardson,
    solve_richardson_from_zero,
};
pub use scalar::Real;
