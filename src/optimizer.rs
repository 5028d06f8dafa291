//! Abstract optimizer and the paper composer built on it.

pub mod genetic_algorithm;
pub mod paper;

use crate::error::Result;

/// How a run ended.
#[derive(Clone, PartialEq, Debug)]
pub enum Outcome<Solution> {
  /// At least one solution met the acceptance threshold.
  Converged {
    /// Generations that ran before convergence; `0` if the initial
    /// population already qualified.
    generation: usize,
    /// The solutions of the final population meeting the threshold, in
    /// population order.
    papers: Vec<Solution>,
  },
  /// The generation budget ran out. No solution is reported.
  Exhausted {
    /// Generations that ran.
    generations: usize,
    /// Best adaptation degree of the final population, negative infinity for
    /// an empty one.
    best_adaptation_degree: f64,
  },
}

impl<Solution> Outcome<Solution> {
  /// Returns `true` for [`Outcome::Converged`].
  pub fn is_converged(&self) -> bool {
    matches!(self, Outcome::Converged { .. })
  }

  /// Accepted solutions; empty if the run was exhausted.
  pub fn papers(&self) -> &[Solution] {
    match self {
      Outcome::Converged { papers, .. } => papers,
      Outcome::Exhausted { .. } => &[],
    }
  }

  /// Generations that ran.
  pub fn generations(&self) -> usize {
    match *self {
      Outcome::Converged { generation, .. } => generation,
      Outcome::Exhausted { generations, .. } => generations,
    }
  }
}

/// Represents an abstract optimizer.
pub trait Optimizer<Solution>: Sized {
  /// Runs `Optimizer` until the termination condition is met.
  ///
  /// # Errors
  ///
  /// Fails if any stage of the run meets a structurally infeasible input.
  fn optimize(self) -> Result<Outcome<Solution>>;
}
