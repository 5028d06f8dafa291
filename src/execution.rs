//! Execution strategies for per-candidate work.
//!
//! Candidate construction and mutation are independent per candidate once
//! each candidate owns its own random stream, so they can be spread over a
//! [rayon] thread pool. Results always come back in input order, which keeps a
//! seeded run bit-for-bit reproducible whichever strategy is chosen.
//!
//! **For cheap work, parallelization may only decrease performance because of
//! additional overhead introduced. Benchmark if in doubt.**

use rand::{rngs::StdRng, Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// How per-candidate work is scheduled.
#[derive(
  Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize,
)]
pub enum Execution {
  /// No parallelization involved.
  #[default]
  Sequential,
  /// Every candidate is a separate rayon task.
  ParallelEach,
  /// Candidates are split into one batch per available thread.
  ParallelBatch,
}

impl Execution {
  /// Applies `f` to each element, collecting results in input order.
  pub(crate) fn map<T, U, F>(self, items: &[T], f: F) -> Vec<U>
  where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
  {
    match self {
      Execution::Sequential => items.iter().map(f).collect(),
      Execution::ParallelEach => items.par_iter().map(f).collect(),
      Execution::ParallelBatch => items
        .par_chunks(chunk_size(items.len()))
        .flat_map_iter(|chunk| chunk.iter().map(&f))
        .collect(),
    }
  }

  /// Applies `f` to each element mutably, collecting results in input order.
  pub(crate) fn map_mut<T, U, F>(self, items: &mut [T], f: F) -> Vec<U>
  where
    T: Send,
    U: Send,
    F: Fn(&mut T) -> U + Sync + Send,
  {
    match self {
      Execution::Sequential => items.iter_mut().map(f).collect(),
      Execution::ParallelEach => items.par_iter_mut().map(f).collect(),
      Execution::ParallelBatch => {
        let chunk_size = chunk_size(items.len());
        items
          .par_chunks_mut(chunk_size)
          .flat_map_iter(|chunk| chunk.into_iter().map(&f))
          .collect()
      }
    }
  }
}

fn chunk_size(len: usize) -> usize {
  (len / rayon::current_num_threads()).max(1)
}

/// Draws `n` seeds from `rng`, one independent stream per unit of work.
pub(crate) fn fork_seeds<R: Rng + ?Sized>(rng: &mut R, n: usize) -> Vec<u64> {
  (0..n).map(|_| rng.gen()).collect()
}

/// The random stream of one unit of work.
pub(crate) fn stream(seed: u64) -> StdRng {
  StdRng::seed_from_u64(seed)
}
