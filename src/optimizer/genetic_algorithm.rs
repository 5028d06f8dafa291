use log::{debug, info};

use super::{Optimizer, Outcome};
use crate::{error::Result, fitness::Evaluated, termination::Verdict};

/// Represents an abstract genetic algorithm.
///
/// Every generation replaces the population wholesale:
/// `mutate(create(select(population)))`.
pub trait GeneticAlgorithm<Solution> {
  /// Produces the generation-zero population.
  fn initialize(&mut self) -> Result<Vec<Solution>>;

  /// Selects solutions from population that are suitable for creation of
  /// new population.
  fn select<'a>(&mut self, population: &'a [Solution])
    -> Result<Vec<&'a Solution>>;

  /// Creates new population from selected solutions of previous population.
  fn create(&mut self, parents: Vec<&Solution>) -> Result<Vec<Solution>>;

  /// Mutates population.
  fn mutate(&mut self, population: &mut [Solution]);

  /// Decides whether to go on after `generation` generations.
  fn judge(&self, population: &[Solution], generation: usize) -> Verdict;

  /// Returns `true` if `solution` is good enough to be reported.
  fn accepts(&self, solution: &Solution) -> bool;
}

impl<Solution, G> Optimizer<Solution> for G
where
  Solution: Evaluated,
  G: GeneticAlgorithm<Solution>,
{
  fn optimize(mut self) -> Result<Outcome<Solution>> {
    let mut population = self.initialize()?;
    info!("starting with {} solution(s)", population.len());

    let mut generation = 0;
    loop {
      match self.judge(&population, generation) {
        Verdict::Continue => {}
        Verdict::Converged => {
          let papers: Vec<_> = population
            .into_iter()
            .filter(|solution| self.accepts(solution))
            .collect();
          info!(
            "converged after {generation} generation(s) with {} accepted \
             solution(s)",
            papers.len()
          );
          return Ok(Outcome::Converged { generation, papers });
        }
        Verdict::Exhausted => {
          let best_adaptation_degree = best(&population);
          info!(
            "no solution after {generation} generation(s), best adaptation \
             degree {best_adaptation_degree:.4}"
          );
          return Ok(Outcome::Exhausted {
            generations: generation,
            best_adaptation_degree,
          });
        }
      }

      let selected = self.select(&population)?;
      let mut created = self.create(selected)?;
      self.mutate(&mut created);
      population = created;
      generation += 1;

      debug!(
        "generation {generation}: best {:.4}, mean {:.4}",
        best(&population),
        mean(&population)
      );
    }
  }
}

fn best<S: Evaluated>(population: &[S]) -> f64 {
  population
    .iter()
    .map(Evaluated::adaptation_degree)
    .fold(f64::NEG_INFINITY, f64::max)
}

fn mean<S: Evaluated>(population: &[S]) -> f64 {
  if population.is_empty() {
    return 0.0;
  }
  let sum: f64 = population.iter().map(Evaluated::adaptation_degree).sum();
  sum / population.len() as f64
}
