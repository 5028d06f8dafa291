//! Selection operator: roulette-wheel sampling without replacement.

use rand::Rng;
use typed_builder::TypedBuilder;

use crate::{
  error::{Error, Result},
  fitness::Evaluated,
};

/// Selects `count` distinct solutions with probability proportional to their
/// adaptation degree.
///
/// Each draw spins the wheel: a value `r` is drawn uniformly from
/// `[0, total fitness)` and the population is walked in order, accumulating
/// adaptation degrees. The first solution whose running sum reaches `r` and
/// that has not been picked yet is selected.
///
/// Adaptation degrees may be negative, which makes the running sum
/// non-monotonic. A solution whose running sum never rises above zero can't be
/// reached by any draw; such solutions are not eligible. Requesting more
/// solutions than are eligible, or exhausting `max_draws` spins, is an error
/// rather than an endless loop.
///
/// # Examples
/// ```
/// use papergen::selection::RouletteSelector;
///
/// let selector = RouletteSelector::builder().count(10).build();
/// assert_eq!(selector.count(), 10);
/// ```
#[derive(TypedBuilder, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct RouletteSelector {
  /// Number of solutions to select.
  count: usize,
  /// Spins of the wheel before giving up.
  #[builder(default = 100_000)]
  max_draws: usize,
}

impl RouletteSelector {
  /// Number of solutions selected per call.
  pub fn count(&self) -> usize {
    self.count
  }

  /// Selects `count` distinct solutions from `population`, returned in the
  /// order they were drawn.
  ///
  /// # Errors
  ///
  /// Returns [`Error::SelectionInfeasible`] if fewer than `count` solutions
  /// are eligible or the draw budget runs out.
  pub fn select<'a, S, R>(
    &self,
    population: &'a [S],
    rng: &mut R,
  ) -> Result<Vec<&'a S>>
  where
    S: Evaluated,
    R: Rng + ?Sized,
  {
    let cumulative: Vec<f64> = population
      .iter()
      .scan(0.0, |sum, s| {
        *sum += s.adaptation_degree();
        Some(*sum)
      })
      .collect();
    let total = cumulative.last().copied().unwrap_or(0.0);
    let eligible = if total > 0.0 {
      cumulative.iter().filter(|&&sum| sum > 0.0).count()
    } else {
      0
    };
    let infeasible = || Error::SelectionInfeasible {
      requested: self.count,
      available: eligible,
    };
    if self.count > eligible {
      return Err(infeasible());
    }

    let mut picked = vec![false; population.len()];
    let mut selected = Vec::with_capacity(self.count);
    let mut draws = 0;
    while selected.len() < self.count {
      if draws == self.max_draws {
        return Err(infeasible());
      }
      draws += 1;
      let r = rng.gen_range(0.0..total);
      if let Some(i) =
        (0..population.len()).find(|&i| cumulative[i] >= r && !picked[i])
      {
        picked[i] = true;
        selected.push(&population[i]);
      }
    }
    Ok(selected)
  }
}
