//! Random Selection
//!
//! Weighted and uniform choice over candidate moves.

use rand::seq::SliceRandom;
use rand::Rng;

/// Perform weighted random selection from `(item, weight)` pairs.
///
/// Returns `None` for an empty slice.
pub fn weighted_choice<'a, T, R: Rng>(rng: &mut R, candidates: &'a [(T, f64)]) -> Option<&'a T> {
    let (first, _) = candidates.first()?;

    // Calculate total weight
    let total_weight: f64 = candidates.iter().map(|(_, w)| w).sum();

    if total_weight <= 0.0 {
        return Some(first);
    }

    // Generate random value in [0, total_weight)
    let mut roll: f64 = rng.gen::<f64>() * total_weight;

    for (item, weight) in candidates {
        if *weight <= 0.0 {
            continue;
        }
        roll -= weight;
        if roll < 0.0 {
            return Some(item);
        }
    }

    // Rounding can leave a sliver of roll; take the last weighted item
    candidates
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(item, _)| item)
}

/// Uniform choice, copying the chosen value out.
pub fn uniform_choice<T: Copy, R: Rng>(rng: &mut R, candidates: &[T]) -> Option<T> {
    candidates.choose(rng).copied()
}
