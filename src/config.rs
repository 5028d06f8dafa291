//! Engine configuration.

use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
  error::{Error, Result},
  execution::Execution,
  fitness::FitnessWeights,
};

/// Every tunable of a composition run.
///
/// Missing fields fall back to their defaults when deserializing, so a config
/// file only needs to name what it changes.
///
/// # Examples
/// ```
/// use papergen::config::EngineConfig;
///
/// let config = EngineConfig::builder().max_generations(50).seed(7).build();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.population_size, 20);
/// ```
#[derive(TypedBuilder, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
  /// Candidates in the initial population.
  #[builder(default = 20)]
  pub population_size: usize,
  /// Parents picked by roulette selection per generation.
  #[builder(default = 10)]
  pub selection_count: usize,
  /// Children produced by crossover per generation, at least
  /// `selection_count` so the next generation can be selected from.
  #[builder(default = 20)]
  pub offspring_count: usize,
  /// Adaptation degree a paper needs to be accepted.
  #[builder(default = 0.98)]
  pub acceptance_threshold: f64,
  /// Generations to run before giving up.
  #[builder(default = 1000)]
  pub max_generations: usize,
  /// Fitness penalty weights.
  #[builder(default)]
  pub weights: FitnessWeights,
  /// Retries per candidate while building the initial population.
  #[builder(default = 1000)]
  pub max_construction_attempts: usize,
  /// Failed window exchanges tolerated per crossover pass.
  #[builder(default = 10_000)]
  pub max_crossover_attempts: usize,
  /// Roulette spins tolerated per selection pass.
  #[builder(default = 100_000)]
  pub max_selection_draws: usize,
  /// Scheduling of per-candidate work.
  #[builder(default)]
  pub execution: Execution,
  /// Seed of the random source. `None` seeds from system entropy.
  #[builder(default, setter(strip_option))]
  pub seed: Option<u64>,
}

impl Default for EngineConfig {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl EngineConfig {
  /// Checks that the configuration describes a runnable engine.
  ///
  /// # Errors
  ///
  /// Returns [`Error::InvalidConfig`] naming the first offending field.
  pub fn validate(&self) -> Result<()> {
    let invalid = |reason: &str| Err(Error::InvalidConfig(reason.to_owned()));
    if self.population_size == 0 {
      return invalid("population_size must be positive");
    }
    if self.selection_count < 2 {
      return invalid("selection_count must be at least 2");
    }
    if self.selection_count > self.population_size {
      return invalid("selection_count exceeds population_size");
    }
    if self.offspring_count < self.selection_count {
      return invalid("offspring_count is below selection_count");
    }
    if self.max_construction_attempts == 0 {
      return invalid("max_construction_attempts must be positive");
    }
    if !self.acceptance_threshold.is_finite() {
      return invalid("acceptance_threshold must be finite");
    }
    let FitnessWeights {
      coverage,
      difficulty,
    } = self.weights;
    if !(coverage >= 0.0 && difficulty >= 0.0) {
      return invalid("weights must be non-negative");
    }
    if !(coverage.is_finite() && difficulty.is_finite()) {
      return invalid("weights must be finite");
    }
    Ok(())
  }

  /// Random source for a run: seeded if `seed` is set, from entropy otherwise.
  pub fn rng(&self) -> StdRng {
    self
      .seed
      .map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
  }
}
