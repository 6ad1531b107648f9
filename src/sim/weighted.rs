//! Cumulative-weight random selection

use rand::Rng;

/// Pick an item by cumulative weight.
///
/// `roll` is a uniform sample in `[0, 1)`. The roll is scaled to the total
/// weight and each item's weight is subtracted in table order until the
/// remainder drops to zero or below. Items with non-positive weight are never
/// chosen. Returns `None` only when no item carries weight.
pub fn pick_by_weight<T>(items: &[T], weight: impl Fn(&T) -> f32, roll: f32) -> Option<&T> {
    let total: f32 = items.iter().map(|i| weight(i).max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }

    let mut remaining = roll.clamp(0.0, 1.0) * total;
    let mut last_weighted = None;
    for item in items {
        let w = weight(item);
        if w <= 0.0 {
            continue;
        }
        last_weighted = Some(item);
        remaining -= w;
        if remaining <= 0.0 {
            return Some(item);
        }
    }

    // Float rounding can leave a sliver of remainder at roll ~= 1.0
    last_weighted
}

/// [`pick_by_weight`] with the roll drawn from `rng`
pub fn pick_by_weight_with<'a, T, R: Rng>(
    items: &'a [T],
    weight: impl Fn(&T) -> f32,
    rng: &mut R,
) -> Option<&'a T> {
    let roll: f32 = rng.random();
    pick_by_weight(items, weight, roll)
}
