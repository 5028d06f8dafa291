//! Population members: candidate papers.

use std::collections::HashSet;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::{
  error::{Error, Result},
  fitness::{self, Evaluated, FitnessWeights, Metrics},
  item::{Category, Item, ItemId, KnowledgePoint, Question, CATEGORY_COUNT},
  target::TargetSpecification,
};

/// One exam paper proposal: an ordered sequence of borrowed catalog items
/// together with its fitness metrics.
///
/// Items are laid out category by category in [`Category::ALL`] order. Metrics
/// are computed on construction and on every slot replacement, so a candidate
/// is never observable with stale metrics.
#[derive(Debug)]
pub struct Candidate<'c, Q = Item> {
  id: usize,
  items: Vec<&'c Q>,
  metrics: Metrics,
}

// a derived `Clone` would require `Q: Clone`
impl<Q> Clone for Candidate<'_, Q> {
  fn clone(&self) -> Self {
    Self {
      id: self.id,
      items: self.items.clone(),
      metrics: self.metrics,
    }
  }
}

impl<'c, Q: Question> Candidate<'c, Q> {
  /// Creates a candidate from `items`, evaluating its metrics.
  pub fn new(
    id: usize,
    items: Vec<&'c Q>,
    target: &TargetSpecification,
    weights: &FitnessWeights,
  ) -> Self {
    let metrics = fitness::evaluate(&items, target, weights);
    Self { id, items, metrics }
  }

  /// Identifier, unique within a population.
  pub fn id(&self) -> usize {
    self.id
  }

  /// Items in layout order.
  pub fn items(&self) -> &[&'c Q] {
    &self.items
  }

  /// Number of items.
  pub fn item_count(&self) -> usize {
    self.items.len()
  }

  /// All derived metrics.
  pub fn metrics(&self) -> &Metrics {
    &self.metrics
  }

  /// Sum of item scores.
  pub fn total_score(&self) -> u64 {
    self.metrics.total_score
  }

  /// Score-weighted mean difficulty.
  pub fn difficulty(&self) -> f64 {
    self.metrics.difficulty
  }

  /// Share of required knowledge points covered.
  pub fn knowledge_point_coverage(&self) -> f64 {
    self.metrics.coverage
  }

  /// Returns `true` if an item with `id` is part of the paper.
  pub fn contains(&self, id: ItemId) -> bool {
    self.items.iter().any(|item| item.id() == id)
  }

  /// Sorted, deduplicated knowledge points of all items.
  pub fn covered_knowledge_points(&self) -> Vec<KnowledgePoint> {
    self
      .items
      .iter()
      .flat_map(|item| item.knowledge_points().iter().copied())
      .sorted_unstable()
      .dedup()
      .collect()
  }

  /// Sorted ids of all items.
  pub fn item_ids(&self) -> Vec<ItemId> {
    self.items.iter().map(|item| item.id()).sorted_unstable().collect()
  }

  /// Number of items per category, indexed by [`Category::index`].
  pub fn category_counts(&self) -> [usize; CATEGORY_COUNT] {
    let mut counts = [0; CATEGORY_COUNT];
    for item in &self.items {
      counts[item.category().index()] += 1;
    }
    counts
  }

  /// Replaces the item at `slot` and re-evaluates the metrics.
  ///
  /// # Panics
  ///
  /// Panics if `slot` is out of bounds.
  pub fn replace(
    &mut self,
    slot: usize,
    item: &'c Q,
    target: &TargetSpecification,
    weights: &FitnessWeights,
  ) {
    self.items[slot] = item;
    self.metrics = fitness::evaluate(&self.items, target, weights);
  }

  /// Checks the structural invariants every paper at rest must hold: the total
  /// score matches the target, each category holds exactly the requested
  /// number of items, items are laid out in [`Category::ALL`] order and no
  /// item appears twice.
  ///
  /// # Errors
  ///
  /// Returns [`Error::InvariantViolated`] describing the first broken
  /// invariant.
  pub fn check_invariants(&self, target: &TargetSpecification) -> Result<()> {
    let violated = |reason: String| Error::InvariantViolated {
      candidate: self.id,
      reason,
    };
    if self.total_score() != u64::from(target.total_score) {
      return Err(violated(format!(
        "total score {} differs from target {}",
        self.total_score(),
        target.total_score
      )));
    }
    let counts = self.category_counts();
    if let Some(category) = Category::ALL
      .into_iter()
      .find(|c| counts[c.index()] != target.count_of(*c))
    {
      return Err(violated(format!(
        "{} {category} items instead of {}",
        counts[category.index()],
        target.count_of(category)
      )));
    }
    if let Some(pair) = self
      .items
      .windows(2)
      .find(|pair| pair[0].category() > pair[1].category())
    {
      return Err(violated(format!(
        "{} item laid out before {} item",
        pair[0].category(),
        pair[1].category()
      )));
    }
    let mut seen = HashSet::with_capacity(self.items.len());
    if let Some(item) = self.items.iter().find(|item| !seen.insert(item.id())) {
      return Err(violated(format!("item {} appears twice", item.id())));
    }
    Ok(())
  }

  /// A flat record of the paper for tabular sinks.
  pub fn record(&self) -> PaperRecord {
    PaperRecord {
      id: self.id,
      total_score: self.total_score(),
      difficulty: self.difficulty(),
      knowledge_points: self.covered_knowledge_points(),
      problem_ids: self.item_ids(),
    }
  }
}

impl<Q> Evaluated for Candidate<'_, Q> {
  fn adaptation_degree(&self) -> f64 {
    self.metrics.adaptation_degree
  }
}

/// A paper flattened into the columns `ID, Total Score, Difficulty,
/// Knowledge Points, Problem IDs`.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PaperRecord {
  /// Candidate id.
  pub id: usize,
  /// Sum of item scores.
  pub total_score: u64,
  /// Score-weighted mean difficulty.
  pub difficulty: f64,
  /// Sorted knowledge points of all items.
  pub knowledge_points: Vec<KnowledgePoint>,
  /// Sorted item ids.
  pub problem_ids: Vec<ItemId>,
}

impl PaperRecord {
  /// Column headers matching [`PaperRecord::fields`].
  pub const HEADERS: [&'static str; 5] = [
    "ID",
    "Total Score",
    "Difficulty",
    "Knowledge Points",
    "Problem IDs",
  ];

  /// The record rendered as five text fields; lists are space separated.
  pub fn fields(&self) -> [String; 5] {
    [
      self.id.to_string(),
      self.total_score.to_string(),
      self.difficulty.to_string(),
      self.knowledge_points.iter().join(" "),
      self.problem_ids.iter().join(" "),
    ]
  }
}
