//! Fitness evaluation: knowledge-point coverage, score-weighted difficulty and
//! the adaptation degree that blends them.
//!
//! Evaluation is a pure function of a paper's items, the target and the
//! weights. Evaluating the same items twice yields bit-identical metrics.
//!
//! The adaptation degree is deliberately **not** clamped to `[0, 1]`: a paper
//! whose difficulty is far off the target scores negative. Operators that
//! consume fitness, such as the roulette wheel, must tolerate that.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{item::Question, target::TargetSpecification};

/// Weights of the two fitness penalties.
#[derive(TypedBuilder, Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct FitnessWeights {
  /// Weight of missing knowledge-point coverage.
  #[builder(default = 0.4)]
  pub coverage: f64,
  /// Weight of the distance from the target difficulty.
  #[builder(default = 0.6)]
  pub difficulty: f64,
}

impl Default for FitnessWeights {
  fn default() -> Self {
    Self::builder().build()
  }
}

/// Anything carrying an adaptation degree. Selection only ever looks at this.
pub trait Evaluated {
  /// Fitness of the solution. Higher is better; may be negative.
  fn adaptation_degree(&self) -> f64;
}

/// Derived metrics of a paper.
#[derive(Clone, Copy, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct Metrics {
  /// Sum of item scores.
  pub total_score: u64,
  /// Score-weighted mean difficulty.
  pub difficulty: f64,
  /// Share of required knowledge points the paper covers.
  pub coverage: f64,
  /// Blended fitness.
  pub adaptation_degree: f64,
}

impl Evaluated for Metrics {
  fn adaptation_degree(&self) -> f64 {
    self.adaptation_degree
  }
}

/// Sum of item scores, widened so that no item bank can overflow it.
pub fn total_score<Q: Question>(items: &[&Q]) -> u64 {
  items.iter().map(|item| u64::from(item.score())).sum()
}

/// Score-weighted mean difficulty, `0` for items worth nothing in total.
pub fn difficulty<Q: Question>(items: &[&Q]) -> f64 {
  let total = total_score(items);
  if total == 0 {
    return 0.0;
  }
  let weighted: f64 = items
    .iter()
    .map(|item| item.difficulty() * f64::from(item.score()))
    .sum();
  weighted / total as f64
}

/// Share of `target`'s required knowledge points exercised by `items`.
/// An empty requirement counts as fully covered.
pub fn coverage<Q: Question>(
  items: &[&Q],
  target: &TargetSpecification,
) -> f64 {
  let required = &target.required_knowledge_points;
  if required.is_empty() {
    return 1.0;
  }
  let covered: BTreeSet<_> = items
    .iter()
    .flat_map(|item| item.knowledge_points())
    .filter(|&point| required.contains(point))
    .collect();
  covered.len() as f64 / required.len() as f64
}

/// `1 - (1 - coverage) * w_coverage - |difficulty - target| * w_difficulty`.
pub fn adaptation_degree(
  coverage: f64,
  difficulty: f64,
  target: &TargetSpecification,
  weights: &FitnessWeights,
) -> f64 {
  1.0
    - (1.0 - coverage) * weights.coverage
    - (difficulty - target.target_difficulty).abs() * weights.difficulty
}

/// Evaluates every metric of a paper made of `items`.
pub fn evaluate<Q: Question>(
  items: &[&Q],
  target: &TargetSpecification,
  weights: &FitnessWeights,
) -> Metrics {
  let coverage = coverage(items, target);
  let difficulty = difficulty(items);
  Metrics {
    total_score: total_score(items),
    difficulty,
    coverage,
    adaptation_degree: adaptation_degree(coverage, difficulty, target, weights),
  }
}

#[cfg(test)]
mod tests {
  use proptest::prelude::*;

  use super::*;
  use crate::item::{Category, Item};

  fn target(difficulty: f64) -> TargetSpecification {
    TargetSpecification::builder()
      .total_score(10)
      .target_difficulty(difficulty)
      .required_knowledge_points(BTreeSet::from([1, 2, 3, 4]))
      .per_category_count([2, 0, 0, 0, 0])
      .build()
  }

  #[test]
  fn test_default_weights() {
    let weights = FitnessWeights::default();
    assert_eq!(weights.coverage, 0.4);
    assert_eq!(weights.difficulty, 0.6);
  }

  #[test]
  fn test_evaluate() {
    let a = Item::new(1, Category::Choice, 2, 0.2, [1, 9]).unwrap();
    let b = Item::new(2, Category::Choice, 8, 0.7, [2]).unwrap();
    let metrics =
      evaluate(&[&a, &b], &target(0.6), &FitnessWeights::default());

    assert_eq!(metrics.total_score, 10);
    // (0.2 * 2 + 0.7 * 8) / 10
    assert!((metrics.difficulty - 0.6).abs() < 1e-12);
    assert_eq!(metrics.coverage, 0.5);
    // 1 - 0.5 * 0.4 - 0.0 * 0.6
    assert!((metrics.adaptation_degree - 0.8).abs() < 1e-12);
  }

  #[test]
  fn test_adaptation_degree_is_not_clamped() {
    let item = Item::new(1, Category::Choice, 1, 1.0, [9]).unwrap();
    let weights = FitnessWeights::builder().difficulty(2.0).build();
    let metrics = evaluate(&[&item], &target(0.0), &weights);
    // 1 - 1.0 * 0.4 - 1.0 * 2.0
    assert!((metrics.adaptation_degree + 1.4).abs() < 1e-12);
  }

  #[test]
  fn test_total_score_does_not_overflow() {
    let a = Item::new(1, Category::Essay, u32::MAX, 0.4, [1]).unwrap();
    let b = Item::new(2, Category::Essay, u32::MAX, 0.8, [2]).unwrap();
    let metrics =
      evaluate(&[&a, &b], &target(0.6), &FitnessWeights::default());
    assert_eq!(metrics.total_score, 2 * u64::from(u32::MAX));
    assert!((metrics.difficulty - 0.6).abs() < 1e-9);
  }

  #[test]
  fn test_empty_paper() {
    let metrics =
      evaluate::<Item>(&[], &target(0.5), &FitnessWeights::default());
    assert_eq!(metrics.total_score, 0);
    assert_eq!(metrics.difficulty, 0.0);
    assert_eq!(metrics.coverage, 0.0);
  }

  proptest! {
    #[test]
    fn test_evaluation_is_deterministic(
      specs in prop::collection::vec(
        (1u32..10, 0.0f64..=1.0, prop::collection::btree_set(1u32..10, 1..4)),
        1..12,
      ),
      target_difficulty in 0.0f64..=1.0,
    ) {
      let items: Vec<_> = specs
        .into_iter()
        .enumerate()
        .map(|(i, (score, difficulty, points))| {
          Item::new(i as u32, Category::Choice, score, difficulty, points)
            .unwrap()
        })
        .collect();
      let refs: Vec<_> = items.iter().collect();
      let target = target(target_difficulty);
      let weights = FitnessWeights::default();

      let first = evaluate(&refs, &target, &weights);
      let second = evaluate(&refs, &target, &weights);
      prop_assert_eq!(first.difficulty.to_bits(), second.difficulty.to_bits());
      prop_assert_eq!(first.coverage.to_bits(), second.coverage.to_bits());
      prop_assert_eq!(
        first.adaptation_degree.to_bits(),
        second.adaptation_degree.to_bits()
      );
      prop_assert!((0.0..=1.0).contains(&first.coverage));
      prop_assert!(first.difficulty <= 1.0 + 1e-12);
    }
  }
}
