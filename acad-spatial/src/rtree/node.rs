//! Tree nodes.
//!
//! A node is a list of `(Rectangle, id)` entries plus the cached bounding
//! rectangle of those entries. Leaf entries (level 0) point at payload
//! slots, internal entries point at child nodes.

use crate::rectangle::Rectangle;

/// A single slot of a node.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Entry {
    pub(crate) rect: Rectangle,
    /// Payload slot for leaf entries, child node index otherwise
    pub(crate) id: usize,
}

impl Entry {
    pub(crate) fn new(rect: Rectangle, id: usize) -> Self {
        Self { rect, id }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    level: u32,
    entries: Vec<Entry>,
    mbr: Option<Rectangle>,
}

impl Node {
    /// Creates an empty node able to hold `capacity` entries plus the one
    /// extra entry that triggers a split.
    pub(crate) fn new(level: u32, capacity: usize) -> Self {
        Self {
            level,
            entries: Vec::with_capacity(capacity + 1),
            mbr: None,
        }
    }

    pub(crate) fn from_entries(level: u32, entries: Vec<Entry>) -> Self {
        let mut node = Self {
            level,
            entries,
            mbr: None,
        };
        node.recompute_mbr();
        node
    }

    pub(crate) fn level(&self) -> u32 {
        self.level
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.level == 0
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub(crate) fn entry(&self, index: usize) -> &Entry {
        &self.entries[index]
    }

    pub(crate) fn mbr(&self) -> Option<Rectangle> {
        self.mbr
    }

    /// Appends an entry and grows the cached MBR.
    ///
    /// Returns `true` when the node now holds more than `max_node_entries`
    /// entries; the caller must split it before adding again.
    pub(crate) fn add_entry(&mut self, rect: Rectangle, id: usize, max_node_entries: usize) -> bool {
        debug_assert!(
            self.entries.len() <= max_node_entries,
            "node overflow was not split before adding"
        );
        self.entries.push(Entry::new(rect, id));
        match self.mbr.as_mut() {
            Some(mbr) => mbr.expand(&rect),
            None => self.mbr = Some(rect),
        }
        self.entries.len() > max_node_entries
    }

    /// Removes the entry at `index` by moving the last entry into its slot.
    ///
    /// Entry order is not stable across deletes. While the node still holds
    /// at least `min_node_entries` entries the MBR stays exact; it is only
    /// recomputed when the removed rectangle touched its boundary. Below that
    /// the node is about to be dissolved and the MBR is left as an upper
    /// bound.
    pub(crate) fn delete_entry(
        &mut self,
        index: usize,
        min_node_entries: usize,
        tolerance: f64,
    ) -> Entry {
        let removed = self.entries.swap_remove(index);
        if self.entries.is_empty() {
            self.mbr = None;
        } else if self.entries.len() >= min_node_entries {
            if let Some(mbr) = self.mbr {
                if mbr.edge_overlaps(&removed.rect, tolerance) {
                    self.recompute_mbr();
                }
            }
        }
        removed
    }

    /// Replaces the rectangle of the entry at `index`, keeping the MBR exact.
    pub(crate) fn update_entry(&mut self, index: usize, rect: Rectangle, tolerance: f64) {
        let old = std::mem::replace(&mut self.entries[index].rect, rect);
        match self.mbr {
            Some(mut mbr) if !mbr.edge_overlaps(&old, tolerance) => {
                mbr.expand(&rect);
                self.mbr = Some(mbr);
            }
            _ => self.recompute_mbr(),
        }
    }

    /// Linear scan for an entry whose rectangle equals `rect` within
    /// `tolerance` and whose id satisfies `matches`.
    pub(crate) fn find_entry<F>(&self, rect: &Rectangle, tolerance: f64, mut matches: F) -> Option<usize>
    where
        F: FnMut(usize) -> bool,
    {
        self.entries
            .iter()
            .position(|e| e.rect.approx_eq(rect, tolerance) && matches(e.id))
    }

    /// Moves every entry out of the node, leaving it empty.
    pub(crate) fn take_entries(&mut self) -> Vec<Entry> {
        self.mbr = None;
        std::mem::take(&mut self.entries)
    }

    pub(crate) fn recompute_mbr(&mut self) {
        self.mbr = compute_mbr(&self.entries);
    }
}

/// The exact union of the rectangles of `entries`.
pub(crate) fn compute_mbr(entries: &[Entry]) -> Option<Rectangle> {
    let (first, rest) = entries.split_first()?;
    let mut mbr = first.rect;
    for e in rest {
        mbr.expand(&e.rect);
    }
    Some(mbr)
}
