//! Reference problems with known exact solutions.
//!
//! Both problems use the matrix with 2 on the diagonal and 1 everywhere else.
//! Its eigenvalues are 1 (multiplicity `n - 1`) and `n + 1`, so Richardson
//! iteration converges for `0 < tau < 2 / (n + 1)`; [`reference_step_size`]
//! returns `0.1 / n`.

use std::f64::consts::PI;

use crate::error::Result;
use crate::matrix::DenseMatrix;
use crate::richardson::RichardsonConfig;

/// A linear system together with its exact solution.
#[derive(Debug, Clone)]
pub struct TestProblem {
    pub name: &'static str,
    pub matrix: DenseMatrix<f64>,
    pub rhs: Vec<f64>,
    pub exact: Vec<f64>,
}

impl TestProblem {
    pub fn size(&self) -> usize {
        self.rhs.len()
    }

    /// Largest absolute componentwise error of `x` against the exact solution.
    pub fn max_error(&self, x: &[f64]) -> f64 {
        self.exact
            .iter()
            .zip(x.iter())
            .map(|(&u, &xi)| (u - xi).abs())
            .fold(0.0, f64::max)
    }
}

/// The `n x n` matrix with 2 on the diagonal and 1 elsewhere.
pub fn two_one_matrix(n: usize) -> DenseMatrix<f64> {
    DenseMatrix::from_fn(n, n, |i, j| if i == j { 2.0 } else { 1.0 })
}

/// `b[i] = n + 1`, exact solution all ones.
pub fn known_solution_problem(n: usize) -> TestProblem {
    TestProblem {
        name: "known solution",
        matrix: two_one_matrix(n),
        rhs: vec![(n + 1) as f64; n],
        exact: vec![1.0; n],
    }
}

/// `u[i] = sin(2 * pi * i / n)`, `b = A * u`.
pub fn arbitrary_solution_problem(n: usize) -> Result<TestProblem> {
    let matrix = two_one_matrix(n);
    let exact: Vec<f64> = (0..n)
        .map(|i| (2.0 * PI * i as f64 / n as f64).sin())
        .collect();
    let rhs = matrix.mul_vec(&exact)?;
    Ok(TestProblem {
        name: "arbitrary solution",
        matrix,
        rhs,
        exact,
    })
}

/// Step size used with the reference problems.
pub fn reference_step_size(n: usize) -> f64 {
    0.1 / n as f64
}

/// Solver settings for the reference problems: `tau = 0.1 / n`, `tol = 1e-4`,
/// 10000 iterations.
pub fn reference_config(n: usize) -> RichardsonConfig<f64> {
    RichardsonConfig::new(reference_step_size(n), 1e-4, 10_000)
}
