//! Row-parallel execution using rayon.
//!
//! Each solver sweep is a fan-out over the row index of a dense system:
//! every row produces one output value (or one reduction term) from shared
//! read-only inputs. [`RowExecutor`] owns a scoped rayon thread pool built
//! from a [`ParallelConfig`], so the worker count is a property of the call
//! rather than of the process.
//!
//! The end of every parallel iterator is a join, which is the barrier between
//! dependent sweeps.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::thread;

use crate::error::Result;
use crate::scalar::Real;

/// Configuration for row-parallel sweeps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelConfig {
    /// Number of worker threads. `None` or `Some(0)` = one per logical core.
    pub num_threads: Option<usize>,
    /// Minimum row count to use the pool (below this, rows run on the caller's thread).
    pub min_rows_for_parallel: usize,
    /// Minimum rows handed to a worker at once. None = auto (rayon default).
    pub chunk_size: Option<usize>,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            num_threads: None,
            min_rows_for_parallel: 64,
            chunk_size: None,
        }
    }
}

impl ParallelConfig {
    /// Single-threaded configuration.
    pub fn sequential() -> Self {
        Self {
            num_threads: Some(1),
            ..Default::default()
        }
    }

    /// Set an explicit worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = Some(threads);
        self
    }

    /// Set the minimum parallel threshold.
    pub fn with_min_parallel(mut self, min: usize) -> Self {
        self.min_rows_for_parallel = min;
        self
    }

    /// Set the per-worker chunk size.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = Some(size);
        self
    }
}

/// Runs per-row kernels on a private worker pool.
///
/// The pool is only built when sweeps will actually be dispatched to it, so
/// small or single-threaded systems never start worker threads.
pub struct RowExecutor {
    pool: Option<ThreadPool>,
    num_threads: usize,
    min_len: usize,
}

impl RowExecutor {
    /// Set up sweeps over `rows` rows.
    pub fn new(config: &ParallelConfig, rows: usize) -> Result<Self> {
        let num_threads = match config.num_threads {
            Some(threads) if threads > 0 => threads,
            _ => thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        let pool = if rows >= config.min_rows_for_parallel && num_threads > 1 {
            let pool = ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .thread_name(|i| format!("richardson-worker-{i}"))
                .build()?;
            Some(pool)
        } else {
            None
        };

        Ok(Self {
            pool,
            num_threads,
            min_len: config.chunk_size.unwrap_or(1).max(1),
        })
    }

    /// Number of workers the sweeps may use.
    pub fn num_threads(&self) -> usize {
        self.num_threads
    }

    /// Whether sweeps are dispatched to the pool.
    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// Fill `out[i] = f(i)` for every row.
    ///
    /// Workers own disjoint sub-slices of `out`, so no synchronization is
    /// needed beyond the join at the end.
    pub fn map_rows<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        let Some(pool) = &self.pool else {
            for (i, o) in out.iter_mut().enumerate() {
                *o = f(i);
            }
            return;
        };

        let min_len = self.min_len;
        pool.install(|| {
            out.par_iter_mut()
                .enumerate()
                .with_min_len(min_len)
                .for_each(|(i, o)| *o = f(i));
        });
    }

    /// Compute `Σ f(i)` over `rows` rows.
    ///
    /// Partial sums are combined in an unspecified order, so the last bits of
    /// the result can change with the worker count.
    pub fn sum_rows<T, F>(&self, rows: usize, f: F) -> T
    where
        T: Real,
        F: Fn(usize) -> T + Sync + Send,
    {
        let Some(pool) = &self.pool else {
            return (0..rows).map(f).sum();
        };

        let min_len = self.min_len;
        pool.install(|| {
            (0..rows)
                .into_par_iter()
                .with_min_len(min_len)
                .map(f)
                .sum()
        })
    }
}

impl std::fmt::Debug for RowExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowExecutor")
            .field("num_threads", &self.num_threads())
            .field("parallel", &self.is_parallel())
            .field("min_len", &self.min_len)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parallel_config_default() {
        let config = ParallelConfig::default();
        assert_eq!(config.num_threads, None);
        assert_eq!(config.min_rows_for_parallel, 64);
        assert_eq!(config.chunk_size, None);
    }

    #[test]
    fn small_systems_stay_sequential() {
        let exec = RowExecutor::new(&ParallelConfig::default().with_threads(4), 10).unwrap();
        assert_eq!(exec.num_threads(), 4);
        assert!(!exec.is_parallel());
    }

    #[test]
    fn sequential_executor_holds_no_pool() {
        let exec = RowExecutor::new(&ParallelConfig::default().with_threads(16), 1).unwrap();
        assert!(exec.pool.is_none());

        let config = ParallelConfig::sequential().with_min_parallel(1);
        let exec = RowExecutor::new(&config, 500).unwrap();
        assert!(exec.pool.is_none());

        // Sequential sweeps still produce every row.
        let mut out = vec![0usize; 3];
        exec.map_rows(&mut out, |i| i + 1);
        assert_eq!(out, vec![1, 2, 3]);
        assert_eq!(exec.sum_rows(3, |i| i as f64), 3.0);
    }

    #[test]
    fn parallel_executor_builds_requested_workers() {
        let config = ParallelConfig::default().with_threads(3).with_min_parallel(1);
        let exec = RowExecutor::new(&config, 10).unwrap();
        let pool = exec.pool.as_ref().expect("pool for a parallel sweep");
        assert_eq!(pool.current_num_threads(), 3);
    }

    #[test]
    fn default_thread_count_uses_available_parallelism() {
        let expected = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let exec = RowExecutor::new(&ParallelConfig::default(), 1).unwrap();
        assert_eq!(exec.num_threads(), expected);
        let exec = RowExecutor::new(&ParallelConfig::default().with_threads(0), 1).unwrap();
        assert_eq!(exec.num_threads(), expected);
    }

    #[test]
    fn single_thread_never_dispatches() {
        let config = ParallelConfig::sequential().with_min_parallel(1);
        let exec = RowExecutor::new(&config, 1000).unwrap();
        assert!(!exec.is_parallel());
    }

    #[test]
    fn map_rows_writes_every_row() {
        let config = ParallelConfig::default().with_threads(4).with_min_parallel(1);
        let exec = RowExecutor::new(&config, 1000).unwrap();
        assert!(exec.is_parallel());

        let mut out = vec![0usize; 1000];
        exec.map_rows(&mut out, |i| i * 2);
        assert!(out.iter().enumerate().all(|(i, &v)| v == i * 2));
    }

    #[test]
    fn chunked_map_rows() {
        let config = ParallelConfig::default()
            .with_threads(3)
            .with_min_parallel(1)
            .with_chunk_size(7);
        let exec = RowExecutor::new(&config, 100).unwrap();

        let mut out = vec![0.0f64; 100];
        exec.map_rows(&mut out, |i| i as f64);
        assert_eq!(out[99], 99.0);
    }

    #[test]
    fn sum_rows_matches_sequential() {
        let par = RowExecutor::new(
            &ParallelConfig::default().with_threads(4).with_min_parallel(1),
            1000,
        )
        .unwrap();
        let seq = RowExecutor::new(&ParallelConfig::sequential(), 1000).unwrap();

        // Integers below 2^53 sum exactly in any order.
        let f = |i: usize| (i * i) as f64;
        assert_eq!(par.sum_rows(1000, f), seq.sum_rows(1000, f));
    }
}
