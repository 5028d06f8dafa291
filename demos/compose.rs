//! Composes a 100-point paper from a synthetic bank of 5000 items.
//!
//! `cargo run --example compose -- [seed]`; set `RUST_LOG=debug` to follow
//! the generations. The initial population is written to `initial.csv` and
//! the accepted papers, if any, to `final.csv`.

use std::{error::Error, path::Path};

use papergen::{
  candidate::{Candidate, PaperRecord},
  catalog::{Catalog, ItemCatalog},
  config::EngineConfig,
  initialization::Initializer,
  item::{Category, Item},
  optimizer::{paper::PaperOptimizer, Optimizer, Outcome},
  target::TargetSpecification,
};
use rand::prelude::*;

fn main() -> Result<(), Box<dyn Error>> {
  env_logger::init();

  let seed = match std::env::args().nth(1) {
    Some(arg) => arg.parse()?,
    None => 2024,
  };
  let mut rng = StdRng::seed_from_u64(seed);

  let catalog = synthetic_catalog(&mut rng)?;
  println!("item bank of {} items", catalog.len());

  // 20 choice, 5 fill-in, 10 true/false, 7 short answer and 5 essay items
  let target = TargetSpecification::builder()
    .total_score(100)
    .target_difficulty(0.72)
    .required_knowledge_points((1..82).step_by(2).collect())
    .per_category_count([20, 5, 10, 7, 5])
    .build();
  target.validate()?;

  let config = EngineConfig::builder().seed(seed).build();
  let population = Initializer::builder()
    .population_size(config.population_size)
    .max_attempts(config.max_construction_attempts)
    .execution(config.execution)
    .build()
    .initialize(&catalog, &target, &config.weights, &mut rng)?;

  println!("initial population:");
  print_papers(&population);
  write_csv("initial.csv", &population)?;

  let outcome = PaperOptimizer::from_config(&catalog, target, &config)?
    .with_population(population)
    .optimize()?;

  match outcome {
    Outcome::Converged { generation, papers } => {
      println!("converged after {generation} generation(s):");
      print_papers(&papers);
      write_csv("final.csv", &papers)?;
    }
    Outcome::Exhausted {
      generations,
      best_adaptation_degree,
    } => {
      println!(
        "no paper found in {generations} generations, best adaptation \
         degree {best_adaptation_degree:.4}"
      );
    }
  }
  Ok(())
}

/// Item bank laid out by id: 1000 items per category, choice items worth 1,
/// fill-in and true/false items worth 2, short answers worth 1 to 5 and
/// essays worth ten times their difficulty, at least 3.
fn synthetic_catalog(rng: &mut impl Rng) -> papergen::Result<ItemCatalog> {
  let items = (1..=5000)
    .map(|id| {
      let category = Category::ALL[(id as usize - 1) / 1000];
      let difficulty = f64::from(rng.gen_range(30u32..=100)) / 100.0;
      let score = match category {
        Category::Choice => 1,
        Category::FillIn | Category::TrueFalse => 2,
        Category::ShortAnswer => rng.gen_range(1..=5),
        Category::Essay => ((difficulty * 10.0).round() as u32).max(3),
      };
      let point_count = rng.gen_range(1..=5);
      let points: Vec<u32> =
        (0..point_count).map(|_| rng.gen_range(1..=100)).collect();
      Item::new(id, category, score, difficulty, points)
    })
    .collect::<papergen::Result<Vec<_>>>()?;
  ItemCatalog::new(items)
}

fn print_papers(papers: &[Candidate]) {
  println!(
    "{:>4} {:>6} {:>10} {:>9} {:>10}",
    "id", "score", "difficulty", "coverage", "adaptation"
  );
  for paper in papers {
    let metrics = paper.metrics();
    println!(
      "{:>4} {:>6} {:>10.4} {:>9.4} {:>10.4}",
      paper.id(),
      metrics.total_score,
      metrics.difficulty,
      metrics.coverage,
      metrics.adaptation_degree
    );
  }
}

fn write_csv(path: impl AsRef<Path>, papers: &[Candidate]) -> csv::Result<()> {
  let mut writer = csv::Writer::from_path(path)?;
  writer.write_record(PaperRecord::HEADERS)?;
  for paper in papers {
    writer.write_record(paper.record().fields())?;
  }
  writer.flush()?;
  Ok(())
}
