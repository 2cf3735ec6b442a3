//! Rating-weighted random choice between candidate images.
//!
//! Roulette-wheel selection: each candidate gets a weight derived from its
//! rating, a uniform draw over the total weight picks the slot.

use rand::Rng;

use crate::models::ImageRecord;

/// Ratings needed before the score influences the weight
pub const MIN_RATINGS_FOR_WEIGHT: u32 = 5;
pub const MIN_WEIGHT: f64 = 0.1;
pub const MAX_WEIGHT: f64 = 3.0;
const NEUTRAL_WEIGHT: f64 = 1.0;

/// Selection weight for one image
pub fn rating_weight(image: &ImageRecord) -> f64 {
    if image.total_ratings < MIN_RATINGS_FOR_WEIGHT {
        return NEUTRAL_WEIGHT;
    }
    (NEUTRAL_WEIGHT + image.rating_score as f64 / 10.0).clamp(MIN_WEIGHT, MAX_WEIGHT)
}

/// Running totals of candidate weights, in candidate order
fn cumulative_weights(candidates: &[ImageRecord]) -> Vec<f64> {
    candidates
        .iter()
        .scan(0.0, |total, image| {
            *total += rating_weight(image);
            Some(*total)
        })
        .collect()
}

/// Draws one candidate with probability proportional to its weight.
///
/// Returns `None` only for an empty slice. A single candidate is returned
/// without touching `rng`.
pub fn select<'a, R>(candidates: &'a [ImageRecord], rng: &mut R) -> Option<&'a ImageRecord>
where
    R: Rng + ?Sized,
{
    match candidates {
        [] => None,
        [only] => Some(only),
        _ => {
            let cumulative = cumulative_weights(candidates);
            let total = *cumulative.last()?;
            let r = rng.random_range(0.0..total);

            // First slot whose running total exceeds the draw; rounding can
            // leave r at the very end, which belongs to the last candidate.
            let index = cumulative
                .partition_point(|&c| c <= r)
                .min(candidates.len() - 1);
            candidates.get(index)
        }
    }
}
