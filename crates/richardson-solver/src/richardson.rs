//! Richardson (simple) iteration for dense linear systems.
//!
//! Solves `A * x = b` with the stationary update
//!
//! ```text
//! x_{k+1} = x_k - tau * (A * x_k - b)
//! ```
//!
//! stopping when the relative residual `||A * x_{k+1} - b|| / ||b||` drops
//! below `tol` or after `max_iter` iterations. Convergence requires the
//! spectral radius of `I - tau * A` to be below one; the step size is not
//! checked against it.
//!
//! Each iteration runs two row sweeps on a [`RowExecutor`]: the update of
//! every component, then the residual of the updated iterate as a parallel
//! sum of squares.
//!
//! # Example
//!
//! ```
//! use richardson_solver::{DenseMatrix, RichardsonConfig, solve_richardson};
//!
//! let a = DenseMatrix::from_fn(4, 4, |i, j| if i == j { 2.0 } else { 1.0 });
//! let b = vec![5.0; 4];
//! let mut x: Vec<f64> = vec![0.0; 4];
//!
//! let config = RichardsonConfig::new(0.1, 1e-10, 1000);
//! let result = solve_richardson(&a, &b, &config, &mut x).unwrap();
//!
//! assert!(result.converged);
//! assert!(x.iter().all(|&xi| (xi - 1.0).abs() < 1e-8));
//! ```

use crate::error::{Error, Result};
use crate::helpers::{dot, vec_norm};
use crate::matrix::DenseMatrix;
use crate::parallel::{ParallelConfig, RowExecutor};
use crate::scalar::Real;

/// Which iterate `x` holds when the tolerance is met.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FinalIterate {
    /// The iterate whose residual satisfied the tolerance.
    #[default]
    Accepted,
    /// The iterate before it. The reported residual then belongs to an
    /// iterate the caller never sees; kept for compatibility with solvers
    /// that stop before committing the last update.
    Previous,
}

/// Richardson solver configuration.
#[derive(Debug, Clone)]
pub struct RichardsonConfig<T = f64> {
    /// Step size.
    pub tau: T,
    /// Convergence tolerance (relative residual).
    pub tol: T,
    /// Maximum number of iterations.
    pub max_iter: usize,
    /// Iterate returned on convergence.
    pub final_iterate: FinalIterate,
    /// Record the relative residual of every iteration.
    pub record_history: bool,
    /// Worker pool settings.
    pub parallel: ParallelConfig,
}

impl Default for RichardsonConfig<f64> {
    fn default() -> Self {
        Self::new(1e-3, 1e-4, 10_000)
    }
}

impl<T: Real> RichardsonConfig<T> {
    pub fn new(tau: T, tol: T, max_iter: usize) -> Self {
        Self {
            tau,
            tol,
            max_iter,
            final_iterate: FinalIterate::default(),
            record_history: false,
            parallel: ParallelConfig::default(),
        }
    }

    /// Set the step size.
    pub fn with_tau(mut self, tau: T) -> Self {
        self.tau = tau;
        self
    }

    /// Set the tolerance.
    pub fn with_tol(mut self, tol: T) -> Self {
        self.tol = tol;
        self
    }

    /// Set the iteration limit.
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Set the final iterate policy.
    pub fn with_final_iterate(mut self, policy: FinalIterate) -> Self {
        self.final_iterate = policy;
        self
    }

    /// Enable or disable residual history.
    pub fn with_history(mut self, record: bool) -> Self {
        self.record_history = record;
        self
    }

    /// Set the worker pool configuration.
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }

    /// Shorthand for an explicit worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.parallel.num_threads = Some(threads);
        self
    }

    /// Check the scalar parameters.
    pub fn validate(&self) -> Result<()> {
        if !(self.tol > T::zero()) || !self.tol.is_finite() {
            return Err(Error::InvalidTolerance(self.tol.as_f64()));
        }
        if self.max_iter == 0 {
            return Err(Error::InvalidIterationLimit);
        }
        if !self.tau.is_finite() {
            return Err(Error::InvalidStepSize(self.tau.as_f64()));
        }
        Ok(())
    }
}

/// Result of a Richardson solve. The solution itself is left in the caller's
/// `x`.
#[derive(Debug, Clone)]
pub struct RichardsonResult<T = f64> {
    /// Number of iterations performed. A zero right-hand side reports 0.
    pub iterations: usize,
    /// Relative residual of the last evaluated iterate.
    pub residual: T,
    /// Whether the solver converged.
    pub converged: bool,
    /// Relative residual per iteration (empty unless requested).
    pub history: Vec<T>,
}

impl<T: Real> RichardsonResult<T> {
    /// Treat non-convergence as an error.
    pub fn into_converged(self) -> Result<Self> {
        if self.converged {
            Ok(self)
        } else {
            Err(Error::ConvergenceFailed {
                iterations: self.iterations,
                residual: self.residual.as_f64(),
            })
        }
    }
}

/// Solve `A * x = b` in place, using `x` as the initial guess.
///
/// Dimension and parameter checks happen before `x` is modified; on error `x`
/// is unchanged. Running out of iterations is not an error: the result has
/// `converged == false` and `x` holds the last computed iterate.
///
/// A zero right-hand side has the exact solution `x = 0` for any nonsingular
/// `A`, so `x` is zeroed and the solve reports convergence after zero
/// iterations.
pub fn solve_richardson<T: Real>(
    a: &DenseMatrix<T>,
    b: &[T],
    config: &RichardsonConfig<T>,
    x: &mut [T],
) -> Result<RichardsonResult<T>> {
    config.validate()?;
    let n = check_dimensions(a, b, x)?;

    let b_norm = vec_norm(b);
    if b_norm == T::zero() {
        log::debug!("zero right-hand side, returning x = 0");
        x.fill(T::zero());
        return Ok(RichardsonResult {
            iterations: 0,
            residual: T::zero(),
            converged: true,
            history: Vec::new(),
        });
    }

    let exec = RowExecutor::new(&config.parallel, n)?;
    log::debug!(
        "Richardson solve (n={}, tau={:e}, tol={:e}, max_iter={}, threads={}, parallel={})",
        n,
        config.tau,
        config.tol,
        config.max_iter,
        exec.num_threads(),
        exec.is_parallel()
    );

    let mut new_x = vec![T::zero(); n];
    let mut history = Vec::new();
    let mut residual = T::infinity();

    for iter in 1..=config.max_iter {
        richardson_step(a, b, config.tau, x, &mut new_x, &exec);
        residual = residual_norm_squared(a, b, &new_x, &exec).sqrt() / b_norm;

        log::trace!("iteration {}: relative residual {:e}", iter, residual);
        if config.record_history {
            history.push(residual);
        }

        if residual < config.tol {
            if config.final_iterate == FinalIterate::Accepted {
                x.copy_from_slice(&new_x);
            }
            log::debug!(
                "converged after {} iterations (relative residual {:e})",
                iter,
                residual
            );
            return Ok(RichardsonResult {
                iterations: iter,
                residual,
                converged: true,
                history,
            });
        }

        x.copy_from_slice(&new_x);
    }

    log::warn!(
        "Richardson iteration did not converge after {} iterations (relative residual {:e})",
        config.max_iter,
        residual
    );
    Ok(RichardsonResult {
        iterations: config.max_iter,
        residual,
        converged: false,
        history,
    })
}

/// Solve `A * x = b` starting from the zero vector.
pub fn solve_richardson_from_zero<T: Real>(
    a: &DenseMatrix<T>,
    b: &[T],
    config: &RichardsonConfig<T>,
) -> Result<(Vec<T>, RichardsonResult<T>)> {
    let mut x = vec![T::zero(); b.len()];
    let result = solve_richardson(a, b, config, &mut x)?;
    Ok((x, result))
}

/// One update sweep: `new_x[i] = x[i] - tau * (A[i] . x - b[i])` for every row.
///
/// Callers must pass consistent dimensions; see [`solve_richardson`].
pub fn richardson_step<T: Real>(
    a: &DenseMatrix<T>,
    b: &[T],
    tau: T,
    x: &[T],
    new_x: &mut [T],
    exec: &RowExecutor,
) {
    exec.map_rows(new_x, |i| {
        let row_sum = dot(a.row(i), x);
        x[i] - tau * (row_sum - b[i])
    });
}

/// Residual sweep: `sum_i (A[i] . x - b[i])^2`.
pub fn residual_norm_squared<T: Real>(
    a: &DenseMatrix<T>,
    b: &[T],
    x: &[T],
    exec: &RowExecutor,
) -> T {
    exec.sum_rows(b.len(), |i| {
        let r = dot(a.row(i), x) - b[i];
        r * r
    })
}

/// Relative residual `||A * x - b|| / ||b||` of an arbitrary vector.
///
/// Falls back to the absolute residual norm when `b` is zero.
pub fn relative_residual<T: Real>(
    a: &DenseMatrix<T>,
    b: &[T],
    x: &[T],
    parallel: &ParallelConfig,
) -> Result<T> {
    let n = check_dimensions(a, b, x)?;
    let exec = RowExecutor::new(parallel, n)?;
    let r_norm = residual_norm_squared(a, b, x, &exec).sqrt();
    let b_norm = vec_norm(b);
    if b_norm == T::zero() {
        Ok(r_norm)
    } else {
        Ok(r_norm / b_norm)
    }
}

fn check_dimensions<T: Real>(a: &DenseMatrix<T>, b: &[T], x: &[T]) -> Result<usize> {
    if !a.is_square() {
        return Err(Error::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }
    let n = a.nrows();
    if n == 0 {
        return Err(Error::EmptySystem);
    }
    if b.len() != n {
        return Err(Error::DimensionMismatch {
            what: "rhs",
            expected: n,
            actual: b.len(),
        });
    }
    if x.len() != n {
        return Err(Error::DimensionMismatch {
            what: "initial guess",
            expected: n,
            actual: x.len(),
        });
    }
    Ok(n)
}
