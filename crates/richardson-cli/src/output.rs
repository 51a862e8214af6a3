//! Report types and text formatting.

use serde::Serialize;

/// Outcome of one reference problem.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemReport {
    pub name: String,
    pub size: usize,
    pub tau: f64,
    pub tol: f64,
    pub iterations: usize,
    pub converged: bool,
    /// Residual reported by the solver.
    pub residual: f64,
    /// Residual recomputed from the returned iterate.
    pub verified_residual: f64,
    pub max_error: f64,
    pub elapsed_secs: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub history: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<Vec<f64>>,
}

/// All problems from one invocation.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub threads: usize,
    pub problems: Vec<ProblemReport>,
}

impl RunReport {
    pub fn all_converged(&self) -> bool {
        self.problems.iter().all(|p| p.converged)
    }
}

/// Print a run report in human-readable form.
pub fn print_text(report: &RunReport) {
    if report.threads == 0 {
        println!("Worker threads: auto");
    } else {
        println!("Worker threads: {}", report.threads);
    }
    println!();

    for problem in &report.problems {
        print_problem(problem);
    }
}

fn print_problem(p: &ProblemReport) {
    let title = format!("Problem: {} (N = {})", p.name, p.size);
    println!("{}", title);
    println!("{}", "=".repeat(title.len()));

    if p.converged {
        println!("Converged after {} iterations.", p.iterations);
    } else {
        eprintln!(
            "Warning: did not converge after {} iterations",
            p.iterations
        );
    }

    println!("  tau               = {:e}", p.tau);
    println!("  tolerance         = {:e}", p.tol);
    println!("  relative residual = {:e}", p.residual);
    println!("  verified residual = {:e}", p.verified_residual);
    println!("  max error         = {:e}", p.max_error);
    println!("  elapsed           = {:.6} s", p.elapsed_secs);

    if !p.history.is_empty() {
        println!();
        println!("Residual history:");
        for (k, r) in p.history.iter().enumerate() {
            println!("  {:>6}  {:e}", k + 1, r);
        }
    }

    if let Some(x) = &p.solution {
        println!();
        println!("Solution:");
        for (i, xi) in x.iter().enumerate() {
            println!("  x[{}] = {:.6}", i, xi);
        }
    }
    println!();
}
