//! Read-only item bank the engine draws from.

use std::collections::{BTreeSet, HashSet};

use crate::{
  error::{Error, Result},
  item::{Category, Item, KnowledgePoint, Question, CATEGORY_COUNT},
};

/// Query surface of an item bank.
///
/// The engine never mutates a catalog; every query hands out shared
/// references that stay valid for as long as the catalog is borrowed, which is
/// what lets candidates hold `&'c Self::Item` instead of owned copies.
pub trait Catalog {
  /// Catalog entry type.
  type Item: Question;

  /// All items of `category`, in a stable order.
  fn items_of_category(&self, category: Category) -> &[Self::Item];

  /// Items of `category` worth exactly `score`.
  fn items_of_category_and_score(
    &self,
    category: Category,
    score: u32,
  ) -> Vec<&Self::Item> {
    self
      .items_of_category(category)
      .iter()
      .filter(|item| item.score() == score)
      .collect()
  }

  /// Items of any category exercising at least one of `points`.
  fn items_intersecting(
    &self,
    points: &BTreeSet<KnowledgePoint>,
  ) -> Vec<&Self::Item> {
    Category::ALL
      .iter()
      .flat_map(|&c| self.items_of_category(c))
      .filter(|item| item.covers_any(points))
      .collect()
  }

  /// Total number of items.
  fn len(&self) -> usize {
    Category::ALL
      .iter()
      .map(|&c| self.items_of_category(c).len())
      .sum()
  }

  /// Returns `true` if the catalog holds no items.
  fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

/// An immutable in-memory snapshot of items, bucketed by category.
#[derive(Clone, Debug, Default)]
pub struct ItemCatalog {
  buckets: [Vec<Item>; CATEGORY_COUNT],
}

impl ItemCatalog {
  /// Builds a catalog from `items`, keeping their relative order within each
  /// category.
  ///
  /// # Errors
  ///
  /// Returns [`Error::DuplicateItem`] if two items share an id.
  pub fn new(items: impl IntoIterator<Item = Item>) -> Result<Self> {
    let mut seen = HashSet::new();
    let mut buckets: [Vec<Item>; CATEGORY_COUNT] = Default::default();
    for item in items {
      if !seen.insert(item.id()) {
        return Err(Error::DuplicateItem(item.id()));
      }
      buckets[item.category().index()].push(item);
    }
    Ok(Self { buckets })
  }
}

impl Catalog for ItemCatalog {
  type Item = Item;

  fn items_of_category(&self, category: Category) -> &[Item] {
    &self.buckets[category.index()]
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn catalog() -> ItemCatalog {
    ItemCatalog::new([
      Item::new(1, Category::Choice, 1, 0.3, [1, 2]).unwrap(),
      Item::new(2, Category::Essay, 8, 0.8, [4]).unwrap(),
      Item::new(3, Category::Choice, 2, 0.5, [2]).unwrap(),
      Item::new(4, Category::Choice, 1, 0.6, [7]).unwrap(),
    ])
    .unwrap()
  }

  #[test]
  fn test_items_of_category() {
    let catalog = catalog();
    let ids: Vec<_> = catalog
      .items_of_category(Category::Choice)
      .iter()
      .map(Item::id)
      .collect();
    assert_eq!(ids, [1, 3, 4]);
    assert!(catalog.items_of_category(Category::FillIn).is_empty());
    assert_eq!(catalog.len(), 4);
  }

  #[test]
  fn test_items_of_category_and_score() {
    let catalog = catalog();
    let ids: Vec<_> = catalog
      .items_of_category_and_score(Category::Choice, 1)
      .into_iter()
      .map(Item::id)
      .collect();
    assert_eq!(ids, [1, 4]);
  }

  #[test]
  fn test_items_intersecting() {
    let catalog = catalog();
    let ids: Vec<_> = catalog
      .items_intersecting(&BTreeSet::from([2, 4]))
      .into_iter()
      .map(Item::id)
      .collect();
    assert_eq!(ids, [1, 3, 2]);
  }

  #[test]
  fn test_duplicate_ids_are_rejected() {
    let result = ItemCatalog::new([
      Item::new(1, Category::Choice, 1, 0.3, [1]).unwrap(),
      Item::new(1, Category::FillIn, 2, 0.3, [1]).unwrap(),
    ]);
    assert_eq!(result.unwrap_err(), Error::DuplicateItem(1));
  }
}
