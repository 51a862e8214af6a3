//! richardson CLI.
//!
//! Runs the reference problems through the parallel Richardson solver and
//! reports iteration counts, accuracy and wall time.

mod output;

use std::process::ExitCode;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use richardson_solver::problems::reference_step_size;
use richardson_solver::{
    FinalIterate, ParallelConfig, RichardsonConfig, TestProblem, arbitrary_solution_problem,
    known_solution_problem, relative_residual, solve_richardson_from_zero,
};

use crate::output::{ProblemReport, RunReport, print_text};

#[derive(Parser)]
#[command(name = "richardson")]
#[command(about = "Solve dense reference systems with parallel Richardson iteration")]
#[command(version)]
struct Cli {
    /// System size N
    #[arg(short = 'n', long, default_value_t = 100)]
    size: usize,

    /// Worker threads (0 = one per logical core)
    #[arg(short = 'j', long, default_value_t = 4)]
    threads: usize,

    /// Step size [default: 0.1 / N]
    #[arg(long)]
    tau: Option<f64>,

    /// Relative residual tolerance
    #[arg(long, default_value_t = 1e-4)]
    tol: f64,

    /// Maximum number of iterations
    #[arg(long, default_value_t = 10_000)]
    max_iter: usize,

    /// Which reference problem to run
    #[arg(long, value_enum, default_value_t = ProblemArg::All)]
    problem: ProblemArg,

    /// Return the iterate before the one that met the tolerance
    #[arg(long)]
    keep_previous_iterate: bool,

    /// Include the per-iteration residual history
    #[arg(long)]
    history: bool,

    /// Print the solution vector
    #[arg(long)]
    print_solution: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProblemArg {
    Known,
    Arbitrary,
    All,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(s) => println!("{}", s),
                    Err(e) => eprintln!("Error serializing report: {}", e),
                }
            } else {
                print_text(&report);
            }

            if report.all_converged() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<RunReport> {
    if cli.size == 0 {
        anyhow::bail!("system size must be at least 1");
    }

    let mut problems = Vec::new();
    if matches!(cli.problem, ProblemArg::Known | ProblemArg::All) {
        problems.push(known_solution_problem(cli.size));
    }
    if matches!(cli.problem, ProblemArg::Arbitrary | ProblemArg::All) {
        problems.push(
            arbitrary_solution_problem(cli.size)
                .context("failed to build arbitrary-solution problem")?,
        );
    }

    let final_iterate = if cli.keep_previous_iterate {
        FinalIterate::Previous
    } else {
        FinalIterate::Accepted
    };
    let config = RichardsonConfig::new(
        cli.tau.unwrap_or_else(|| reference_step_size(cli.size)),
        cli.tol,
        cli.max_iter,
    )
    .with_final_iterate(final_iterate)
    .with_history(cli.history)
    .with_parallel(ParallelConfig::default().with_threads(cli.threads));

    let reports = problems
        .iter()
        .map(|problem| run_problem(problem, &config, cli.print_solution))
        .collect::<Result<Vec<_>>>()?;

    Ok(RunReport {
        threads: cli.threads,
        problems: reports,
    })
}

fn run_problem(
    problem: &TestProblem,
    config: &RichardsonConfig<f64>,
    print_solution: bool,
) -> Result<ProblemReport> {
    let start = Instant::now();
    let (x, result) = solve_richardson_from_zero(&problem.matrix, &problem.rhs, config)
        .with_context(|| format!("{} problem", problem.name))?;
    let elapsed = start.elapsed();

    let verified_residual = relative_residual(&problem.matrix, &problem.rhs, &x, &config.parallel)
        .context("failed to verify residual")?;

    Ok(ProblemReport {
        name: problem.name.to_string(),
        size: problem.size(),
        tau: config.tau,
        tol: config.tol,
        iterations: result.iterations,
        converged: result.converged,
        residual: result.residual,
        verified_residual,
        max_error: problem.max_error(&x),
        elapsed_secs: elapsed.as_secs_f64(),
        history: result.history,
        solution: print_solution.then_some(x),
    })
}
