//! Error types surfaced by the engine.
//!
//! Structural infeasibility (construction, selection, crossover) aborts a run.
//! A mutation that finds no replacement item and a run that exhausts its
//! generation budget are *not* errors: the former is counted in
//! [`MutationReport`], the latter is reported as [`Outcome::Exhausted`].
//!
//! [`MutationReport`]: crate::mutation::MutationReport
//! [`Outcome::Exhausted`]: crate::optimizer::Outcome::Exhausted

use crate::item::{Category, ItemId};

/// A specialized `Result` type for this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while composing a paper.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
  /// The initializer could not build a candidate satisfying the structural
  /// constraints.
  #[error("construction infeasible: {0}")]
  ConstructionInfeasible(Infeasibility),

  /// More candidates were requested from the roulette wheel than it can
  /// ever hand out.
  #[error(
    "selection infeasible: requested {requested} candidates but only \
     {available} are eligible"
  )]
  SelectionInfeasible {
    /// Number of candidates requested.
    requested: usize,
    /// Number of candidates a draw can reach.
    available: usize,
  },

  /// The crossover operator could not produce the requested offspring.
  #[error("crossover infeasible: {0}")]
  CrossoverInfeasible(CrossoverFailure),

  /// The target specification is malformed.
  #[error("invalid target specification: {0}")]
  InvalidTarget(String),

  /// An item failed validation.
  #[error("invalid item {id}: {reason}")]
  InvalidItem {
    /// Offending item id.
    id: ItemId,
    /// What is wrong with it.
    reason: String,
  },

  /// Two catalog items share an id.
  #[error("duplicate item id {0}")]
  DuplicateItem(ItemId),

  /// The engine configuration is malformed.
  #[error("invalid configuration: {0}")]
  InvalidConfig(String),

  /// A candidate broke one of the structural invariants.
  #[error("candidate {candidate} violates an invariant: {reason}")]
  InvariantViolated {
    /// Offending candidate id.
    candidate: usize,
    /// Which invariant was broken.
    reason: String,
  },
}

/// Why the initializer gave up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Infeasibility {
  /// Too few items of a category cover the required knowledge points.
  #[error(
    "category {category} needs {required} items covering the required \
     knowledge points but only {available} qualify"
  )]
  InsufficientItems {
    /// Category that came up short.
    category: Category,
    /// Items required by the target.
    required: usize,
    /// Qualifying items in the catalog.
    available: usize,
  },

  /// The target total score lies outside what any draw can add up to.
  #[error("total score {target} is outside the reachable range {min}..={max}")]
  ScoreOutOfReach {
    /// Requested total score.
    target: u32,
    /// Smallest reachable total.
    min: u64,
    /// Largest reachable total.
    max: u64,
  },

  /// No draw hit the target total score within the retry budget.
  #[error("no draw matched the total score after {attempts} attempts")]
  AttemptsExhausted {
    /// Attempts made for the failing candidate.
    attempts: usize,
  },
}

/// Why the crossover operator gave up.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CrossoverFailure {
  /// Crossover needs at least two distinct parents.
  #[error("{count} parents given, at least 2 are required")]
  TooFewParents {
    /// Parents given.
    count: usize,
  },

  /// A two-item window does not fit into the candidates.
  #[error("candidates hold {count} items, at least 2 are required")]
  TooFewItems {
    /// Items per candidate.
    count: usize,
  },

  /// No score-balanced window was found within the retry budget.
  #[error("no score-balanced window found after {attempts} attempts")]
  AttemptsExhausted {
    /// Failed attempts made.
    attempts: usize,
  },
}
