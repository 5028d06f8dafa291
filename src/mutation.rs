//! Mutation operator: knowledge-point-preserving item substitution.

use std::collections::BTreeSet;

use log::{debug, trace};
use rand::{seq::SliceRandom, Rng};
use typed_builder::TypedBuilder;

use crate::{
  candidate::Candidate,
  catalog::Catalog,
  execution::{self, Execution},
  fitness::FitnessWeights,
  item::Question,
  target::TargetSpecification,
};

/// Replaces exactly one random item of every candidate.
///
/// The replacement has the same category and the same score as the item it
/// replaces, so total score and per-category counts never change. It must
/// also exercise at least one of the replaced item's *required* knowledge
/// points and must not already be part of the candidate. When the catalog
/// offers no such item, the candidate is left as it is; that is a normal
/// outcome, not an error.
///
/// The mutation rate is fixed at one slot per candidate.
///
/// # Examples
/// ```
/// use papergen::{execution::Execution, mutation::KnowledgePointMutation};
///
/// let mutation = KnowledgePointMutation::builder()
///   .execution(Execution::ParallelEach)
///   .build();
/// # let _ = mutation;
/// ```
#[derive(TypedBuilder, Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct KnowledgePointMutation {
  /// How candidates are spread over threads.
  #[builder(default)]
  execution: Execution,
}

/// What a mutation pass did.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct MutationReport {
  /// Candidates that received a replacement item.
  pub mutated: usize,
  /// Candidates for which no compatible replacement existed.
  pub unchanged: usize,
}

impl KnowledgePointMutation {
  /// Mutates every candidate of `population` in place.
  ///
  /// Each candidate draws from its own stream seeded from `rng`, so the result
  /// does not depend on the execution strategy.
  pub fn mutate<'c, C, R>(
    &self,
    population: &mut [Candidate<'c, C::Item>],
    catalog: &'c C,
    target: &TargetSpecification,
    weights: &FitnessWeights,
    rng: &mut R,
  ) -> MutationReport
  where
    C: Catalog + Sync,
    C::Item: Sync,
    R: Rng + ?Sized,
  {
    let seeds = execution::fork_seeds(rng, population.len());
    let mut work: Vec<_> = population.iter_mut().zip(seeds).collect();
    let outcomes = self.execution.map_mut(&mut work, |(candidate, seed)| {
      let mut rng = execution::stream(*seed);
      mutate_one(candidate, catalog, target, weights, &mut rng)
    });

    let mutated = outcomes.iter().filter(|&&changed| changed).count();
    let report = MutationReport {
      mutated,
      unchanged: outcomes.len() - mutated,
    };
    debug!(
      "mutated {} candidate(s), {} without a compatible replacement",
      report.mutated, report.unchanged
    );
    report
  }
}

/// Replaces one random slot of `candidate`. Returns `false` if nothing in the
/// catalog could take the slot.
fn mutate_one<'c, C, R>(
  candidate: &mut Candidate<'c, C::Item>,
  catalog: &'c C,
  target: &TargetSpecification,
  weights: &FitnessWeights,
  rng: &mut R,
) -> bool
where
  C: Catalog,
  R: Rng + ?Sized,
{
  if candidate.item_count() == 0 {
    return false;
  }
  let slot = rng.gen_range(0..candidate.item_count());
  let current = candidate.items()[slot];
  let restricted: BTreeSet<_> = current
    .knowledge_points()
    .intersection(&target.required_knowledge_points)
    .copied()
    .collect();

  let replacements: Vec<_> = catalog
    .items_of_category_and_score(current.category(), current.score())
    .into_iter()
    .filter(|q| q.id() != current.id())
    .filter(|q| q.covers_any(&restricted))
    .filter(|q| !candidate.contains(q.id()))
    .collect();

  match replacements.choose(rng) {
    Some(&replacement) => {
      candidate.replace(slot, replacement, target, weights);
      true
    }
    None => {
      trace!(
        "no replacement for item {} of candidate {}",
        current.id(),
        candidate.id()
      );
      false
    }
  }
}
