//! Exam items and the capability trait the engine reads them through.

use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A stable, unique item identifier.
pub type ItemId = u32;

/// An identifier of a syllabus topic.
pub type KnowledgePoint = u32;

/// Number of item categories.
pub const CATEGORY_COUNT: usize = 5;

/// Item category. The declaration order is the order in which a paper lays
/// out its items and the index into [`per_category_count`].
///
/// [`per_category_count`]: crate::target::TargetSpecification::per_category_count
#[derive(
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Debug,
  Serialize,
  Deserialize,
)]
pub enum Category {
  /// Single choice questions.
  Choice,
  /// Fill in the blank questions.
  FillIn,
  /// True or false questions.
  TrueFalse,
  /// Short answer questions.
  ShortAnswer,
  /// Essay questions.
  Essay,
}

impl Category {
  /// All categories in layout order.
  pub const ALL: [Category; CATEGORY_COUNT] = [
    Category::Choice,
    Category::FillIn,
    Category::TrueFalse,
    Category::ShortAnswer,
    Category::Essay,
  ];

  /// Position of the category in [`Category::ALL`].
  pub fn index(self) -> usize {
    self as usize
  }
}

impl fmt::Display for Category {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Category::Choice => "choice",
      Category::FillIn => "fill-in",
      Category::TrueFalse => "true-false",
      Category::ShortAnswer => "short-answer",
      Category::Essay => "essay",
    };
    f.write_str(name)
  }
}

/// The narrow view of an item the engine needs. Nothing else about an item is
/// ever read, so any catalog entry type can take part in composition by
/// implementing this trait.
pub trait Question {
  /// Unique, stable identifier.
  fn id(&self) -> ItemId;

  /// Category of the item.
  fn category(&self) -> Category;

  /// Positive score the item is worth.
  fn score(&self) -> u32;

  /// Difficulty in `[0, 1]`.
  fn difficulty(&self) -> f64;

  /// Non-empty set of knowledge points the item exercises.
  fn knowledge_points(&self) -> &BTreeSet<KnowledgePoint>;

  /// Returns `true` if the item exercises at least one of `points`.
  fn covers_any(&self, points: &BTreeSet<KnowledgePoint>) -> bool {
    !self.knowledge_points().is_disjoint(points)
  }
}

/// An immutable exam item.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Item {
  id: ItemId,
  category: Category,
  score: u32,
  difficulty: f64,
  knowledge_points: BTreeSet<KnowledgePoint>,
}

impl Item {
  /// Creates a validated item.
  ///
  /// # Errors
  ///
  /// Returns [`Error::InvalidItem`] if `score` is zero, `difficulty` is not
  /// within `[0, 1]` or `knowledge_points` is empty.
  pub fn new(
    id: ItemId,
    category: Category,
    score: u32,
    difficulty: f64,
    knowledge_points: impl IntoIterator<Item = KnowledgePoint>,
  ) -> Result<Self> {
    let knowledge_points: BTreeSet<_> = knowledge_points.into_iter().collect();
    let invalid = |reason: &str| Error::InvalidItem {
      id,
      reason: reason.to_owned(),
    };
    if score == 0 {
      return Err(invalid("score must be positive"));
    }
    if !(0.0..=1.0).contains(&difficulty) {
      return Err(invalid("difficulty must lie within [0, 1]"));
    }
    if knowledge_points.is_empty() {
      return Err(invalid("at least one knowledge point is required"));
    }
    Ok(Self {
      id,
      category,
      score,
      difficulty,
      knowledge_points,
    })
  }
}

impl Question for Item {
  fn id(&self) -> ItemId {
    self.id
  }

  fn category(&self) -> Category {
    self.category
  }

  fn score(&self) -> u32 {
    self.score
  }

  fn difficulty(&self) -> f64 {
    self.difficulty
  }

  fn knowledge_points(&self) -> &BTreeSet<KnowledgePoint> {
    &self.knowledge_points
  }
}
