//! **papergen** composes exam papers from an item bank with a genetic
//! algorithm. Given a catalog of questions and a target profile, it searches
//! for papers that add up to an exact total score, hold a fixed number of
//! items per category, cover the required knowledge points and match a target
//! difficulty.
//!
//! Here's a [quick start example](#example) for the impatient.
//!
//! The crate is built around a few abstractions:
//! - **Catalog** - a read-only item bank behind the [`Catalog`] trait. The
//!   engine only ever sees items through the narrow [`Question`] capability
//!   trait, and candidates borrow items instead of copying them
//! - **Target** - a [`TargetSpecification`] with the hard constraints (total
//!   score, items per category) and the soft goals (knowledge points,
//!   difficulty)
//! - **Candidate** - one paper proposal, see [`Candidate`]. Every candidate at
//!   rest satisfies the hard constraints
//! - **Operators** - the steps of the genetic algorithm loop:
//!   1. **Initialize** a feasible population by constrained rejection sampling
//!   2. **Select** parents with a roulette wheel
//!   3. **Recombine** parents by swapping score-balanced item windows
//!   4. **Mutate** each child by replacing one item with a compatible one
//!   5. **Terminate** once a paper is good enough or generations run out
//! - **Optimizer** - [`PaperOptimizer`] runs the loop through the
//!   [`Optimizer`] trait and reports an [`Outcome`]
//!
//! # Fitness
//!
//! A paper's **adaptation degree** blends two penalties:
//! `1 - (1 - coverage) * 0.4 - |difficulty - target| * 0.6` with the default
//! [`FitnessWeights`]. It is not clamped; a paper far off the target
//! difficulty scores negative, and the roulette wheel treats such papers as
//! unreachable.
//!
//! # Parallelization
//!
//! Initialization and mutation work on each candidate independently. Each
//! candidate gets its own random stream forked from the optimizer's source, so
//! both steps can run on a [rayon] pool through [`Execution`] without changing
//! the result: a seeded run is reproducible under every strategy.
//!
//! For small populations, the overhead introduced by parallelization usually
//! only decreases performance. Benchmark, if in doubt.
//!
//! # Example
//!
//! ```no_run
//! use papergen::{
//!   catalog::ItemCatalog,
//!   config::EngineConfig,
//!   item::{Category, Item},
//!   optimizer::{paper::PaperOptimizer, Optimizer, Outcome},
//!   target::TargetSpecification,
//! };
//!
//! # fn main() -> papergen::Result<()> {
//! # let items: Vec<Item> = vec![];
//! // the item bank, loaded from wherever questions live
//! let catalog = ItemCatalog::new(items)?;
//! let target = TargetSpecification::builder()
//!   .total_score(100)
//!   .target_difficulty(0.72)
//!   .required_knowledge_points((1..82).step_by(2).collect())
//!   .per_category_count([20, 5, 10, 7, 5])
//!   .build();
//! // defaults: 20 candidates, 10 parents, up to 1000 generations
//! let config = EngineConfig::builder().seed(42).build();
//!
//! match PaperOptimizer::from_config(&catalog, target, &config)?.optimize()? {
//!   Outcome::Converged { generation, papers } => {
//!     for paper in papers {
//!       println!("{generation}: {:?}", paper.record());
//!     }
//!   }
//!   Outcome::Exhausted { best_adaptation_degree, .. } => {
//!     println!("no paper found, best was {best_adaptation_degree}");
//!   }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! A runnable version over a synthetic item bank lives in the *demos* folder:
//! `cargo run --example compose`.
//!
//! [`Catalog`]: crate::catalog::Catalog
//! [`Question`]: crate::item::Question
//! [`TargetSpecification`]: crate::target::TargetSpecification
//! [`Candidate`]: crate::candidate::Candidate
//! [`PaperOptimizer`]: crate::optimizer::paper::PaperOptimizer
//! [`Optimizer`]: crate::optimizer::Optimizer
//! [`Outcome`]: crate::optimizer::Outcome
//! [`FitnessWeights`]: crate::fitness::FitnessWeights
//! [`Execution`]: crate::execution::Execution

#![warn(missing_docs)]

pub mod candidate;
pub mod catalog;
pub mod config;
pub mod error;
pub mod execution;
pub mod fitness;
pub mod initialization;
pub mod item;
pub mod mutation;
pub mod optimizer;
pub mod recombination;
pub mod selection;
pub mod target;
pub mod termination;

#[cfg(test)]
mod fixtures;

pub use error::{Error, Result};
