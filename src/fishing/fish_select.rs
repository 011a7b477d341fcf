//! Weighted fish selection.
//!
//! Walks the catalog in declared order accumulating spawn weights and picks
//! the first entry whose running total exceeds the roll. When the weights sum
//! to less than the roll (rounding, or a catalog that leaves mass
//! unassigned) the first entry is returned, so a fixed roll always maps to
//! the same fish.

use rand::Rng;

use crate::shared::*;

/// Select a fish for a bite. Returns `None` only for an empty catalog.
pub fn select_fish<'a>(registry: &'a FishRegistry, rng: &mut impl Rng) -> Option<&'a FishType> {
    let roll: f64 = rng.gen::<f64>();
    pick_with_roll(&registry.fish, roll)
}

/// Deterministic core of [`select_fish`] for a roll in `[0, 1)`.
pub fn pick_with_roll(catalog: &[FishType], roll: f64) -> Option<&FishType> {
    let mut cumulative = 0.0;
    for fish in catalog {
        cumulative += fish.spawn_weight;
        if roll < cumulative {
            return Some(fish);
        }
    }
    catalog.first()
}
