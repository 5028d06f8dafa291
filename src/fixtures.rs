//! Shared test data: a seeded synthetic item bank shaped like a real one.

use std::collections::BTreeSet;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
  catalog::ItemCatalog,
  item::{Category, Item},
  target::TargetSpecification,
};

/// 1000 items, 200 per category, knowledge points drawn from `1..=40`.
pub(crate) fn catalog(seed: u64) -> ItemCatalog {
  let mut rng = StdRng::seed_from_u64(seed);
  let items = (1..=1000).map(|id| {
    let category = Category::ALL[(id as usize - 1) / 200];
    let difficulty = f64::from(rng.gen_range(30u32..=100)) / 100.0;
    let score = match category {
      Category::Choice => 1,
      Category::FillIn | Category::TrueFalse => 2,
      Category::ShortAnswer => rng.gen_range(1..=5),
      Category::Essay => ((difficulty * 10.0).round() as u32).max(3),
    };
    let point_count = rng.gen_range(1..=5);
    let points: Vec<u32> =
      (0..point_count).map(|_| rng.gen_range(1..=40)).collect();
    Item::new(id, category, score, difficulty, points)
      .expect("generated items are valid")
  });
  ItemCatalog::new(items).expect("generated ids are unique")
}

/// A 47-item, 100-point paper over the odd knowledge points below 40.
pub(crate) fn target() -> TargetSpecification {
  TargetSpecification::builder()
    .total_score(100)
    .target_difficulty(0.72)
    .required_knowledge_points((1..40).step_by(2).collect::<BTreeSet<_>>())
    .per_category_count([20, 5, 10, 7, 5])
    .build()
}
