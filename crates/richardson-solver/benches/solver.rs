//! Benchmarks for the Richardson solver.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use richardson_solver::problems::reference_config;
use richardson_solver::{
    ParallelConfig, RowExecutor, known_solution_problem, solve_richardson_from_zero,
};

fn bench_solve_known(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_known_solution");

    for size in [50, 100, 200, 400] {
        for threads in [1, 4] {
            group.bench_with_input(
                BenchmarkId::new(format!("threads_{threads}"), size),
                &size,
                |bencher, &size| {
                    let problem = known_solution_problem(size);
                    let config = reference_config(size).with_parallel(
                        ParallelConfig::default()
                            .with_threads(threads)
                            .with_min_parallel(1),
                    );

                    bencher.iter(|| {
                        solve_richardson_from_zero(
                            black_box(&problem.matrix),
                            black_box(&problem.rhs),
                            &config,
                        )
                        .unwrap()
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_single_sweep(c: &mut Criterion) {
    let mut group = c.benchmark_group("richardson_step");

    for size in [100, 500, 1000] {
        group.bench_with_input(
            BenchmarkId::from_parameter(size),
            &size,
            |bencher, &size| {
                let problem = known_solution_problem(size);
                let exec = RowExecutor::new(&ParallelConfig::default(), size).unwrap();
                let x = vec![0.0; size];
                let mut new_x = vec![0.0; size];

                bencher.iter(|| {
                    richardson_solver::richardson::richardson_step(
                        black_box(&problem.matrix),
                        black_box(&problem.rhs),
                        1e-3,
                        black_box(&x),
                        &mut new_x,
                        &exec,
                    )
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_solve_known, bench_single_sweep);
criterion_main!(benches);
