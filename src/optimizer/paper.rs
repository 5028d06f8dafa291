//! Genetic composition of exam papers.

use log::warn;
use rand::{rngs::StdRng, Rng};
use typed_builder::TypedBuilder;

use crate::{
  candidate::Candidate,
  catalog::Catalog,
  config::EngineConfig,
  error::Result,
  fitness::FitnessWeights,
  initialization::Initializer,
  mutation::KnowledgePointMutation,
  optimizer::genetic_algorithm::GeneticAlgorithm,
  recombination::WindowCrossover,
  selection::RouletteSelector,
  target::TargetSpecification,
  termination::{Termination, Verdict},
};

/// Composes papers from `catalog` matching `target`.
///
/// Generation zero comes from `initializer` unless a population is supplied
/// with [`PaperOptimizer::with_population`]. Every following generation is
/// produced by `selector`, `crossover` and `mutation` in turn, until
/// `termination` reports convergence or runs out of generations. All randomness is drawn from
/// `rng`; a seeded `rng` makes the whole run reproducible.
///
/// # Examples
/// ```
/// use papergen::{
///   catalog::ItemCatalog,
///   config::EngineConfig,
///   item::{Category, Item},
///   optimizer::{paper::PaperOptimizer, Optimizer},
///   target::TargetSpecification,
/// };
///
/// let catalog = ItemCatalog::new(
///   (1..=6).map(|id| Item::new(id, Category::Choice, 1, 0.5, [1]).unwrap()),
/// )?;
/// let target = TargetSpecification::builder()
///   .total_score(2)
///   .target_difficulty(0.5)
///   .required_knowledge_points([1].into())
///   .per_category_count([2, 0, 0, 0, 0])
///   .build();
/// let config = EngineConfig::builder()
///   .population_size(4)
///   .selection_count(2)
///   .offspring_count(4)
///   .seed(1)
///   .build();
///
/// let outcome = PaperOptimizer::from_config(&catalog, target, &config)?
///   .optimize()?;
/// assert!(outcome.is_converged());
/// assert_eq!(outcome.generations(), 0);
/// # Ok::<(), papergen::Error>(())
/// ```
#[derive(TypedBuilder)]
pub struct PaperOptimizer<'c, C: Catalog, R> {
  catalog: &'c C,
  target: TargetSpecification,
  rng: R,
  #[builder(default)]
  weights: FitnessWeights,
  initializer: Initializer,
  selector: RouletteSelector,
  crossover: WindowCrossover,
  #[builder(default)]
  mutation: KnowledgePointMutation,
  #[builder(default)]
  termination: Termination,
  #[builder(setter(skip), default)]
  population: Option<Vec<Candidate<'c, C::Item>>>,
}

impl<'c, C: Catalog, R> PaperOptimizer<'c, C, R> {
  /// Seeds generation zero with `population` instead of running the
  /// initializer. The population is checked against the target's structural
  /// invariants when the run starts.
  pub fn with_population(
    mut self,
    population: Vec<Candidate<'c, C::Item>>,
  ) -> Self {
    self.population = Some(population);
    self
  }
}

impl<'c, C: Catalog> PaperOptimizer<'c, C, StdRng> {
  /// Assembles an optimizer from `config`, seeding its random source from
  /// `config.seed`.
  ///
  /// # Errors
  ///
  /// Fails if `config` or `target` does not validate.
  pub fn from_config(
    catalog: &'c C,
    target: TargetSpecification,
    config: &EngineConfig,
  ) -> Result<Self> {
    config.validate()?;
    target.validate()?;
    Ok(
      Self::builder()
        .catalog(catalog)
        .target(target)
        .rng(config.rng())
        .weights(config.weights)
        .initializer(
          Initializer::builder()
            .population_size(config.population_size)
            .max_attempts(config.max_construction_attempts)
            .execution(config.execution)
            .build(),
        )
        .selector(
          RouletteSelector::builder()
            .count(config.selection_count)
            .max_draws(config.max_selection_draws)
            .build(),
        )
        .crossover(
          WindowCrossover::builder()
            .offspring(config.offspring_count)
            .max_attempts(config.max_crossover_attempts)
            .build(),
        )
        .mutation(
          KnowledgePointMutation::builder()
            .execution(config.execution)
            .build(),
        )
        .termination(
          Termination::builder()
            .acceptance_threshold(config.acceptance_threshold)
            .max_generations(config.max_generations)
            .build(),
        )
        .build(),
    )
  }
}

impl<'c, C, R> GeneticAlgorithm<Candidate<'c, C::Item>>
  for PaperOptimizer<'c, C, R>
where
  C: Catalog + Sync,
  C::Item: Sync,
  R: Rng,
{
  fn initialize(&mut self) -> Result<Vec<Candidate<'c, C::Item>>> {
    let population = match self.population.take() {
      Some(population) => {
        for candidate in &population {
          candidate.check_invariants(&self.target)?;
        }
        population
      }
      None => self.initializer.initialize(
        self.catalog,
        &self.target,
        &self.weights,
        &mut self.rng,
      )?,
    };
    if self.crossover.offspring() != population.len() {
      warn!(
        "crossover produces {} children for a population of {}, the \
         population size will drift",
        self.crossover.offspring(),
        population.len()
      );
    }
    Ok(population)
  }

  fn select<'a>(
    &mut self,
    population: &'a [Candidate<'c, C::Item>],
  ) -> Result<Vec<&'a Candidate<'c, C::Item>>> {
    self.selector.select(population, &mut self.rng)
  }

  fn create(
    &mut self,
    parents: Vec<&Candidate<'c, C::Item>>,
  ) -> Result<Vec<Candidate<'c, C::Item>>> {
    let children = self.crossover.recombine(
      &parents,
      &self.target,
      &self.weights,
      &mut self.rng,
    )?;
    debug_assert!(children
      .iter()
      .all(|child| child.check_invariants(&self.target).is_ok()));
    Ok(children)
  }

  fn mutate(&mut self, population: &mut [Candidate<'c, C::Item>]) {
    self.mutation.mutate(
      population,
      self.catalog,
      &self.target,
      &self.weights,
      &mut self.rng,
    );
    debug_assert!(population
      .iter()
      .all(|candidate| candidate.check_invariants(&self.target).is_ok()));
  }

  fn judge(
    &self,
    population: &[Candidate<'c, C::Item>],
    generation: usize,
  ) -> Verdict {
    self.termination.judge(population, generation)
  }

  fn accepts(&self, solution: &Candidate<'c, C::Item>) -> bool {
    self.termination.accepts(solution)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use rand::SeedableRng;

  use super::*;
  use crate::{
    catalog::ItemCatalog,
    error::Error,
    execution::Execution,
    fixtures,
    fitness::Evaluated,
    item::{Category, Item, Question},
    optimizer::{Optimizer, Outcome},
  };

  fn optimizer<'c>(
    catalog: &'c ItemCatalog,
    config: &EngineConfig,
  ) -> PaperOptimizer<'c, ItemCatalog, StdRng> {
    PaperOptimizer::from_config(catalog, fixtures::target(), config).unwrap()
  }

  #[test]
  fn test_zero_threshold_converges_immediately() {
    let catalog = fixtures::catalog(1);
    let config = EngineConfig::builder()
      .acceptance_threshold(0.0)
      .seed(1)
      .build();
    let outcome = optimizer(&catalog, &config).optimize().unwrap();
    let Outcome::Converged { generation, papers } = outcome else {
      panic!("expected convergence, got {outcome:?}");
    };
    assert_eq!(generation, 0);
    // every paper clears a zero threshold
    assert_eq!(papers.len(), 20);
    for paper in &papers {
      assert!(paper.adaptation_degree() >= 0.0);
      paper.check_invariants(&fixtures::target()).unwrap();
    }
  }

  /// Papers of four Choice items worth 1 each, drawn from a catalog that
  /// shares no knowledge point with the target.
  fn disjoint_setup() -> (ItemCatalog, TargetSpecification) {
    let catalog = ItemCatalog::new(
      (1..=32).map(|id| Item::new(id, Category::Choice, 1, 0.5, [99]).unwrap()),
    )
    .unwrap();
    let target = TargetSpecification::builder()
      .total_score(4)
      .target_difficulty(0.5)
      .required_knowledge_points(BTreeSet::from([1, 2]))
      .per_category_count([4, 0, 0, 0, 0])
      .build();
    (catalog, target)
  }

  #[test]
  fn test_disjoint_knowledge_points_exhaust() {
    let (catalog, target) = disjoint_setup();
    let weights = FitnessWeights::default();
    let population: Vec<_> = catalog
      .items_of_category(Category::Choice)
      .chunks(4)
      .enumerate()
      .map(|(i, chunk)| {
        Candidate::new(i + 1, chunk.iter().collect(), &target, &weights)
      })
      .collect();
    assert_eq!(population.len(), 8);
    // coverage 0 and difficulty on target: 1 - 0.4
    assert!(population
      .iter()
      .all(|c| (c.adaptation_degree() - 0.6).abs() < 1e-12));

    let outcome = PaperOptimizer::builder()
      .catalog(&catalog)
      .target(target)
      .rng(StdRng::seed_from_u64(9))
      .initializer(Initializer::builder().population_size(8).build())
      .selector(RouletteSelector::builder().count(4).build())
      .crossover(WindowCrossover::builder().offspring(8).build())
      .termination(Termination::builder().max_generations(5).build())
      .build()
      .with_population(population)
      .optimize()
      .unwrap();

    assert_eq!(outcome.papers().len(), 0);
    let Outcome::Exhausted {
      generations,
      best_adaptation_degree,
    } = outcome
    else {
      panic!("expected exhaustion, got {outcome:?}");
    };
    assert_eq!(generations, 5);
    assert!((best_adaptation_degree - 0.6).abs() < 1e-12);
  }

  #[test]
  fn test_disjoint_knowledge_points_are_infeasible_to_construct() {
    let (catalog, target) = disjoint_setup();
    let config = EngineConfig::builder()
      .population_size(8)
      .selection_count(4)
      .offspring_count(8)
      .seed(1)
      .build();
    let result = PaperOptimizer::from_config(&catalog, target, &config)
      .unwrap()
      .optimize();
    assert!(matches!(result, Err(Error::ConstructionInfeasible(_))));
  }

  #[test]
  fn test_seeded_population_is_checked() {
    let (catalog, target) = disjoint_setup();
    let weights = FitnessWeights::default();
    let items = catalog.items_of_category(Category::Choice);
    // three items where four are required
    let broken =
      Candidate::new(1, items[..3].iter().collect(), &target, &weights);
    let result = PaperOptimizer::builder()
      .catalog(&catalog)
      .target(target)
      .rng(StdRng::seed_from_u64(1))
      .initializer(Initializer::builder().population_size(1).build())
      .selector(RouletteSelector::builder().count(1).build())
      .crossover(WindowCrossover::builder().offspring(1).build())
      .build()
      .with_population(vec![broken])
      .optimize();
    assert!(matches!(result, Err(Error::InvariantViolated { .. })));
  }

  #[test]
  fn test_seeded_population_out_of_layout_order_is_rejected() {
    let catalog = ItemCatalog::new([
      Item::new(1, Category::Choice, 2, 0.5, [1]).unwrap(),
      Item::new(2, Category::Choice, 2, 0.5, [1]).unwrap(),
      Item::new(3, Category::FillIn, 2, 0.5, [1]).unwrap(),
      Item::new(4, Category::FillIn, 2, 0.5, [1]).unwrap(),
    ])
    .unwrap();
    let target = TargetSpecification::builder()
      .total_score(8)
      .target_difficulty(0.5)
      .required_knowledge_points(BTreeSet::from([1]))
      .per_category_count([2, 2, 0, 0, 0])
      .build();
    let weights = FitnessWeights::default();
    let choices = catalog.items_of_category(Category::Choice);
    let fill_ins = catalog.items_of_category(Category::FillIn);
    let ordered = Candidate::new(
      1,
      vec![&choices[0], &choices[1], &fill_ins[0], &fill_ins[1]],
      &target,
      &weights,
    );
    let reversed = Candidate::new(
      2,
      vec![&fill_ins[0], &fill_ins[1], &choices[0], &choices[1]],
      &target,
      &weights,
    );
    let result = PaperOptimizer::builder()
      .catalog(&catalog)
      .target(target)
      .rng(StdRng::seed_from_u64(1))
      .initializer(Initializer::builder().population_size(2).build())
      .selector(RouletteSelector::builder().count(2).build())
      .crossover(WindowCrossover::builder().offspring(2).build())
      .termination(Termination::builder().acceptance_threshold(2.0).build())
      .build()
      .with_population(vec![ordered, reversed])
      .optimize();
    assert!(matches!(
      result,
      Err(Error::InvariantViolated { candidate: 2, .. })
    ));
  }

  #[test]
  fn test_selection_failure_aborts_the_run() {
    let catalog = fixtures::catalog(3);
    let target = fixtures::target();
    let weights = FitnessWeights::default();
    let population = Initializer::builder()
      .population_size(4)
      .build()
      .initialize(&catalog, &target, &weights, &mut StdRng::seed_from_u64(2))
      .unwrap();
    let result = PaperOptimizer::builder()
      .catalog(&catalog)
      .target(target)
      .rng(StdRng::seed_from_u64(2))
      .initializer(Initializer::builder().population_size(4).build())
      .selector(RouletteSelector::builder().count(5).build())
      .crossover(WindowCrossover::builder().offspring(4).build())
      .termination(Termination::builder().acceptance_threshold(2.0).build())
      .build()
      .with_population(population)
      .optimize();
    assert!(matches!(
      result,
      Err(Error::SelectionInfeasible { requested: 5, .. })
    ));
  }

  fn run(seed: u64, execution: Execution) -> Outcome<Vec<u32>> {
    let catalog = fixtures::catalog(4);
    let config = EngineConfig::builder()
      .max_generations(15)
      .execution(execution)
      .seed(seed)
      .build();
    match optimizer(&catalog, &config).optimize().unwrap() {
      Outcome::Converged { generation, papers } => Outcome::Converged {
        generation,
        papers: papers.iter().map(Candidate::item_ids).collect(),
      },
      Outcome::Exhausted {
        generations,
        best_adaptation_degree,
      } => Outcome::Exhausted {
        generations,
        best_adaptation_degree,
      },
    }
  }

  #[test]
  fn test_seeded_runs_are_reproducible() {
    assert_eq!(run(21, Execution::Sequential), run(21, Execution::Sequential));
  }

  #[test]
  fn test_execution_strategy_does_not_change_outcome() {
    let sequential = run(8, Execution::Sequential);
    assert_eq!(sequential, run(8, Execution::ParallelEach));
    assert_eq!(sequential, run(8, Execution::ParallelBatch));
  }

  #[test]
  fn test_every_generation_keeps_invariants() {
    let catalog = fixtures::catalog(6);
    let target = fixtures::target();
    let mut optimizer =
      optimizer(&catalog, &EngineConfig::builder().seed(6).build());
    let mut population = optimizer.initialize().unwrap();
    for _ in 0..10 {
      let selected = optimizer.select(&population).unwrap();
      let mut created = optimizer.create(selected).unwrap();
      optimizer.mutate(&mut created);
      population = created;
      assert_eq!(population.len(), 20);
      for candidate in &population {
        candidate.check_invariants(&target).unwrap();
        assert!(candidate
          .items()
          .iter()
          .all(|q| q.covers_any(&target.required_knowledge_points)));
      }
    }
  }
}
