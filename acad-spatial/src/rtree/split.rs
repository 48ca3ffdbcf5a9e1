//! Quadratic node split.
//!
//! Seeds are the pair of entries that would waste the most area if placed in
//! the same node. The remaining entries are then assigned one at a time,
//! always taking the entry with the strongest preference for one group next,
//! until one group is so full that the rest must go to the other to keep it
//! above the minimum fill.

use crate::rectangle::Rectangle;

use super::node::Entry;

struct Group {
    entries: Vec<Entry>,
    mbr: Rectangle,
}

impl Group {
    fn seeded(seed: Entry, capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        let mbr = seed.rect;
        entries.push(seed);
        Self { entries, mbr }
    }

    fn push(&mut self, entry: Entry) {
        self.mbr.expand(&entry.rect);
        self.entries.push(entry);
    }

    fn absorb(&mut self, rest: &mut Vec<Entry>) {
        for entry in rest.drain(..) {
            self.push(entry);
        }
    }
}

/// Splits an overflowing set of entries into two groups, each holding at
/// least `min_node_entries` entries.
pub(crate) fn quadratic_split(
    mut entries: Vec<Entry>,
    min_node_entries: usize,
) -> (Vec<Entry>, Vec<Entry>) {
    debug_assert!(
        entries.len() >= 2 * min_node_entries,
        "not enough entries to split into two valid nodes"
    );
    let total = entries.len();

    let (first_seed, second_seed) = pick_seeds(&entries);
    // remove the higher index first so the lower one stays put
    let second = entries.remove(second_seed);
    let first = entries.remove(first_seed);

    let mut a = Group::seeded(first, total);
    let mut b = Group::seeded(second, total);

    while !entries.is_empty() {
        if a.entries.len() + entries.len() <= min_node_entries {
            a.absorb(&mut entries);
            break;
        }
        if b.entries.len() + entries.len() <= min_node_entries {
            b.absorb(&mut entries);
            break;
        }

        let (index, cost_a, cost_b) = pick_next(&entries, &a.mbr, &b.mbr);
        let entry = entries.remove(index);
        if prefers_first(&a, &b, cost_a, cost_b) {
            a.push(entry);
        } else {
            b.push(entry);
        }
    }

    (a.entries, b.entries)
}

/// Picks the two entries whose combined rectangle wastes the most area.
fn pick_seeds(entries: &[Entry]) -> (usize, usize) {
    let mut seeds = (0, 1);
    let mut worst_waste = f64::NEG_INFINITY;

    for (i, first) in entries.iter().enumerate() {
        for (j, second) in entries.iter().enumerate().skip(i + 1) {
            let waste =
                first.rect.union(&second.rect).area() - first.rect.area() - second.rect.area();
            if waste > worst_waste {
                worst_waste = waste;
                seeds = (i, j);
            }
        }
    }
    seeds
}

/// Picks the unassigned entry with the largest difference between the
/// enlargement each group would need to admit it.
fn pick_next(entries: &[Entry], mbr_a: &Rectangle, mbr_b: &Rectangle) -> (usize, f64, f64) {
    let mut best = (0, 0.0, 0.0);
    let mut best_preference = f64::NEG_INFINITY;

    for (i, entry) in entries.iter().enumerate() {
        let cost_a = mbr_a.enlargement(&entry.rect);
        let cost_b = mbr_b.enlargement(&entry.rect);
        let preference = (cost_a - cost_b).abs();
        if preference > best_preference {
            best_preference = preference;
            best = (i, cost_a, cost_b);
        }
    }
    best
}

/// Smaller enlargement wins, then smaller group area, then fewer entries,
/// then the first group.
fn prefers_first(a: &Group, b: &Group, cost_a: f64, cost_b: f64) -> bool {
    if cost_a != cost_b {
        return cost_a < cost_b;
    }
    let (area_a, area_b) = (a.mbr.area(), b.mbr.area());
    if area_a != area_b {
        return area_a < area_b;
    }
    a.entries.len() <= b.entries.len()
}
