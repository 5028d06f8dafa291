//! Termination conditions of the generation loop.

use typed_builder::TypedBuilder;

use crate::fitness::Evaluated;

/// What the controller should do after looking at a population.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Verdict {
  /// Run another generation.
  Continue,
  /// At least one solution meets the acceptance threshold.
  Converged,
  /// The generation budget is spent without convergence.
  Exhausted,
}

/// Stops the loop as soon as a solution's adaptation degree reaches
/// `acceptance_threshold`, or after `max_generations` generations have run.
///
/// Convergence is checked first, so a population that qualifies right when the
/// budget runs out still counts as converged.
#[derive(TypedBuilder, Clone, Copy, PartialEq, Debug)]
pub struct Termination {
  /// Adaptation degree a solution needs to be accepted.
  #[builder(default = 0.98)]
  acceptance_threshold: f64,
  /// Generations to run before giving up.
  #[builder(default = 1000)]
  max_generations: usize,
}

impl Default for Termination {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl Termination {
  /// Adaptation degree a solution needs to be accepted.
  pub fn acceptance_threshold(&self) -> f64 {
    self.acceptance_threshold
  }

  /// Generations to run before giving up.
  pub fn max_generations(&self) -> usize {
    self.max_generations
  }

  /// Returns `true` if `solution` meets the acceptance threshold.
  pub fn accepts<S: Evaluated>(&self, solution: &S) -> bool {
    solution.adaptation_degree() >= self.acceptance_threshold
  }

  /// Judges `population` after `generation` generations have run.
  pub fn judge<S: Evaluated>(
    &self,
    population: &[S],
    generation: usize,
  ) -> Verdict {
    if population.iter().any(|s| self.accepts(s)) {
      Verdict::Converged
    } else if generation >= self.max_generations {
      Verdict::Exhausted
    } else {
      Verdict::Continue
    }
  }
}
