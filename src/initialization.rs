//! Initial population construction by constrained rejection sampling.

use log::debug;
use rand::Rng;
use typed_builder::TypedBuilder;

use crate::{
  candidate::Candidate,
  catalog::Catalog,
  error::{Error, Infeasibility, Result},
  execution::{self, Execution},
  fitness::{self, FitnessWeights},
  item::{Category, Question, CATEGORY_COUNT},
  target::TargetSpecification,
};

/// Builds a feasible initial population.
///
/// For every category the initializer keeps only the items exercising at
/// least one required knowledge point and draws the requested number of them
/// without replacement. A draw whose scores do not add up to the target total
/// is discarded as a whole and retried, at most `max_attempts` times per
/// candidate.
///
/// # Examples
/// ```
/// use papergen::initialization::Initializer;
///
/// let initializer = Initializer::builder().population_size(20).build();
/// assert_eq!(initializer.population_size(), 20);
/// ```
#[derive(TypedBuilder, Clone, Copy, PartialEq, Eq, Debug)]
pub struct Initializer {
  /// Number of candidates to build.
  population_size: usize,
  /// Whole-candidate retries before giving up.
  #[builder(default = 1000)]
  max_attempts: usize,
  /// How candidates are spread over threads.
  #[builder(default)]
  execution: Execution,
}

impl Initializer {
  /// Number of candidates built per call.
  pub fn population_size(&self) -> usize {
    self.population_size
  }

  /// Builds `population_size` candidates with ids `1..=population_size`.
  ///
  /// Each candidate is drawn from its own random stream seeded from `rng`, so
  /// the result depends only on `rng`'s state, not on the execution strategy.
  ///
  /// # Errors
  ///
  /// Returns [`Error::ConstructionInfeasible`] if a category has fewer
  /// qualifying items than requested, if the target total score cannot be
  /// reached by any draw, or if the retry budget runs out.
  pub fn initialize<'c, C, R>(
    &self,
    catalog: &'c C,
    target: &TargetSpecification,
    weights: &FitnessWeights,
    rng: &mut R,
  ) -> Result<Vec<Candidate<'c, C::Item>>>
  where
    C: Catalog,
    C::Item: Sync,
    R: Rng + ?Sized,
  {
    let pools = qualifying_pools(catalog, target)?;
    check_reachable(&pools, target)?;

    let seeds = execution::fork_seeds(rng, self.population_size);
    let ids: Vec<_> = (1..=self.population_size).zip(seeds).collect();
    let drawn = self.execution.map(&ids, |&(id, seed)| {
      let mut rng = execution::stream(seed);
      draw(&pools, target, self.max_attempts, &mut rng)
        .map(|(items, attempts)| {
          debug!("candidate {id} constructed after {attempts} attempt(s)");
          Candidate::new(id, items, target, weights)
        })
    });
    drawn.into_iter().collect()
  }
}

type Pools<'c, Q> = [Vec<&'c Q>; CATEGORY_COUNT];

/// Per category, the items covering a required knowledge point.
fn qualifying_pools<'c, C: Catalog>(
  catalog: &'c C,
  target: &TargetSpecification,
) -> Result<Pools<'c, C::Item>> {
  let mut pools: Pools<'c, C::Item> = Default::default();
  for category in Category::ALL {
    let pool: Vec<_> = catalog
      .items_of_category(category)
      .iter()
      .filter(|item| item.covers_any(&target.required_knowledge_points))
      .collect();
    let required = target.count_of(category);
    if pool.len() < required {
      return Err(Error::ConstructionInfeasible(
        Infeasibility::InsufficientItems {
          category,
          required,
          available: pool.len(),
        },
      ));
    }
    pools[category.index()] = pool;
  }
  Ok(pools)
}

/// Fails fast when the target total lies outside the sums of the lowest and
/// highest scoring draws.
fn check_reachable<Q: Question>(
  pools: &Pools<'_, Q>,
  target: &TargetSpecification,
) -> Result<()> {
  let (mut min, mut max) = (0, 0);
  for category in Category::ALL {
    let mut scores: Vec<u64> = pools[category.index()]
      .iter()
      .map(|q| u64::from(q.score()))
      .collect();
    scores.sort_unstable();
    let k = target.count_of(category);
    min += scores[..k].iter().sum::<u64>();
    max += scores[scores.len() - k..].iter().sum::<u64>();
  }
  if (min..=max).contains(&u64::from(target.total_score)) {
    Ok(())
  } else {
    Err(Error::ConstructionInfeasible(
      Infeasibility::ScoreOutOfReach {
        target: target.total_score,
        min,
        max,
      },
    ))
  }
}

/// Draws one candidate's items, returning them with the number of attempts it
/// took.
fn draw<'c, Q: Question, R: Rng + ?Sized>(
  pools: &Pools<'c, Q>,
  target: &TargetSpecification,
  max_attempts: usize,
  rng: &mut R,
) -> Result<(Vec<&'c Q>, usize)> {
  let mut pools = pools.clone();
  let mut items = Vec::with_capacity(target.item_count());
  for attempt in 1..=max_attempts {
    items.clear();
    for category in Category::ALL {
      let pool = &mut pools[category.index()];
      for k in 0..target.count_of(category) {
        // sample from the front, park the pick at the tail
        let tail = pool.len() - k - 1;
        let index = rng.gen_range(0..=tail);
        items.push(pool[index]);
        pool.swap(index, tail);
      }
    }
    if fitness::total_score(&items) == u64::from(target.total_score) {
      return Ok((items, attempt));
    }
  }
  Err(Error::ConstructionInfeasible(
    Infeasibility::AttemptsExhausted {
      attempts: max_attempts,
    },
  ))
}
