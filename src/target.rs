//! The profile of the paper to compose.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{
  error::{Error, Result},
  item::{Category, KnowledgePoint, CATEGORY_COUNT},
};

/// Structural constraints and fitness targets of a paper.
///
/// # Examples
/// ```
/// use papergen::target::TargetSpecification;
///
/// let target = TargetSpecification::builder()
///   .total_score(100)
///   .target_difficulty(0.72)
///   .required_knowledge_points((1..82).step_by(2).collect())
///   .per_category_count([20, 5, 10, 7, 5])
///   .build();
/// assert!(target.validate().is_ok());
/// assert_eq!(target.item_count(), 47);
/// ```
#[derive(TypedBuilder, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct TargetSpecification {
  /// Identifier of the requested paper.
  #[builder(default = 1)]
  pub id: u32,
  /// Exact total score every paper must add up to.
  pub total_score: u32,
  /// Score-weighted mean difficulty to aim for, in `[0, 1]`.
  pub target_difficulty: f64,
  /// Knowledge points the paper should cover.
  pub required_knowledge_points: BTreeSet<KnowledgePoint>,
  /// Number of items per category, indexed by [`Category::index`].
  pub per_category_count: [usize; CATEGORY_COUNT],
}

impl TargetSpecification {
  /// Number of items in every paper.
  pub fn item_count(&self) -> usize {
    self.per_category_count.iter().sum()
  }

  /// Required number of items of `category`.
  pub fn count_of(&self, category: Category) -> usize {
    self.per_category_count[category.index()]
  }

  /// Checks that the specification describes a composable paper.
  ///
  /// # Errors
  ///
  /// Returns [`Error::InvalidTarget`] if the total score is zero, the target
  /// difficulty lies outside `[0, 1]`, no knowledge point is required or no
  /// item is requested.
  pub fn validate(&self) -> Result<()> {
    if self.total_score == 0 {
      return Err(Error::InvalidTarget("total score must be positive".into()));
    }
    if !(0.0..=1.0).contains(&self.target_difficulty) {
      return Err(Error::InvalidTarget(format!(
        "target difficulty {} is outside [0, 1]",
        self.target_difficulty
      )));
    }
    if self.required_knowledge_points.is_empty() {
      return Err(Error::InvalidTarget(
        "at least one knowledge point must be required".into(),
      ));
    }
    if self.item_count() == 0 {
      return Err(Error::InvalidTarget(
        "at least one item must be requested".into(),
      ));
    }
    Ok(())
  }
}
