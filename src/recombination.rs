//! Recombination operator: score-balanced window exchange.

use rand::{seq::index, Rng};
use typed_builder::TypedBuilder;

use crate::{
  candidate::Candidate,
  error::{CrossoverFailure, Error, Result},
  fitness::{self, FitnessWeights},
  item::Question,
  target::TargetSpecification,
};

/// Creates offspring by swapping a two-item window between parents.
///
/// An attempt picks two distinct parents and a window `(i, i + 1)`. If both
/// windows are worth the same score, the parents are copied, the window is
/// exchanged and both children are emitted. Equal window sums keep each child's
/// total score identical to its parent's. Only windows holding the same
/// categories slot by slot are exchanged, which keeps the per-category counts
/// even for parents laid out in different orders. An exchange that would put
/// one item into a child twice is rejected like an unbalanced one.
///
/// # Examples
/// ```
/// use papergen::recombination::WindowCrossover;
///
/// let crossover = WindowCrossover::builder().offspring(20).build();
/// assert_eq!(crossover.offspring(), 20);
/// ```
#[derive(TypedBuilder, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct WindowCrossover {
  /// Number of children to create.
  offspring: usize,
  /// Failed attempts tolerated per call.
  #[builder(default = 10_000)]
  max_attempts: usize,
}

impl WindowCrossover {
  /// Number of children created per call.
  pub fn offspring(&self) -> usize {
    self.offspring
  }

  /// Recombines `parents` into `offspring` children with ids
  /// `1..=offspring` and freshly evaluated metrics.
  ///
  /// # Errors
  ///
  /// Returns [`Error::CrossoverInfeasible`] if fewer than two parents are
  /// given, parents hold fewer than two items, or no balanced window is found
  /// within the attempt budget.
  pub fn recombine<'c, Q, R>(
    &self,
    parents: &[&Candidate<'c, Q>],
    target: &TargetSpecification,
    weights: &FitnessWeights,
    rng: &mut R,
  ) -> Result<Vec<Candidate<'c, Q>>>
  where
    Q: Question,
    R: Rng + ?Sized,
  {
    if self.offspring == 0 {
      return Ok(Vec::new());
    }
    if parents.len() < 2 {
      return Err(Error::CrossoverInfeasible(CrossoverFailure::TooFewParents {
        count: parents.len(),
      }));
    }
    let item_count = parents
      .iter()
      .map(|p| p.item_count())
      .min()
      .unwrap_or_default();
    if item_count < 2 {
      return Err(Error::CrossoverInfeasible(CrossoverFailure::TooFewItems {
        count: item_count,
      }));
    }

    let mut children = Vec::with_capacity(self.offspring);
    let mut failures = 0;
    while children.len() < self.offspring {
      let pair = index::sample(rng, parents.len(), 2);
      let (a, b) = (parents[pair.index(0)], parents[pair.index(1)]);
      let position = rng.gen_range(0..item_count - 1);

      match exchange(a.items(), b.items(), position) {
        Some((a_items, b_items)) => {
          children.push(Candidate::new(
            children.len() + 1,
            a_items,
            target,
            weights,
          ));
          if children.len() < self.offspring {
            children.push(Candidate::new(
              children.len() + 1,
              b_items,
              target,
              weights,
            ));
          }
        }
        None => {
          failures += 1;
          if failures >= self.max_attempts {
            return Err(Error::CrossoverInfeasible(
              CrossoverFailure::AttemptsExhausted {
                attempts: self.max_attempts,
              },
            ));
          }
        }
      }
    }
    Ok(children)
  }
}

/// Swaps the window starting at `position` between copies of `a` and `b`, or
/// returns `None` if the windows differ in score or category layout, or a
/// child would end up holding one item twice.
fn exchange<'c, Q: Question>(
  a: &[&'c Q],
  b: &[&'c Q],
  position: usize,
) -> Option<(Vec<&'c Q>, Vec<&'c Q>)> {
  let window = position..position + 2;
  let aligned = window
    .clone()
    .all(|i| a[i].category() == b[i].category());
  if !aligned {
    return None;
  }
  if fitness::total_score(&a[window.clone()])
    != fitness::total_score(&b[window.clone()])
  {
    return None;
  }
  // window items of one parent must not appear elsewhere in the other
  let clashes = |incoming: &[&Q], host: &[&Q]| {
    incoming.iter().any(|q| {
      host
        .iter()
        .enumerate()
        .any(|(i, h)| !window.contains(&i) && h.id() == q.id())
    })
  };
  if clashes(&b[window.clone()], a) || clashes(&a[window.clone()], b) {
    return None;
  }
  let mut a_child = a.to_vec();
  let mut b_child = b.to_vec();
  a_child[window.clone()].swap_with_slice(&mut b_child[window]);
  Some((a_child, b_child))
}
