//! Query plumbing: lazy traversal, nearest-neighbour candidates and
//! cooperative cancellation.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use crate::rectangle::Rectangle;

use super::rtree_impl::RTree;
use super::rtree_types::{NodeId, SpatialError, SpatialResult};

/// A flag shared between a long-running query and whoever may abort it.
///
/// Cancellable queries check the token once per visited node and stop with
/// [`SpatialError::Cancelled`] as soon as it is set.
///
/// # Examples
///
/// ```rust
/// use acad_spatial::{CancellationToken, RTree, Rectangle, SpatialError};
///
/// let mut tree = RTree::new(8, 3).unwrap();
/// tree.insert(Rectangle::new_2d(0.0, 0.0, 1.0, 1.0), 1u32).unwrap();
///
/// let token = CancellationToken::new();
/// token.cancel();
/// let result = tree.search_cancellable(&Rectangle::new_2d(0.0, 0.0, 5.0, 5.0), &token);
/// assert_eq!(result.unwrap_err(), SpatialError::Cancelled);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Every clone of this token observes it.
    pub fn cancel(&self) {
        self.cancelled.store(true, AtomicOrdering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(AtomicOrdering::Acquire)
    }

    pub(crate) fn check(&self) -> SpatialResult<()> {
        if self.is_cancelled() {
            Err(SpatialError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Which stored rectangles a traversal yields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchMode {
    /// Rectangles overlapping the query
    Intersects,
    /// Rectangles lying entirely inside the query
    ContainedBy,
    /// Every stored rectangle
    All,
}

impl SearchMode {
    pub(crate) fn descend(self, rect: &Rectangle, query: &Rectangle) -> bool {
        match self {
            SearchMode::All => true,
            SearchMode::Intersects | SearchMode::ContainedBy => rect.intersects(query),
        }
    }

    pub(crate) fn accept(self, rect: &Rectangle, query: &Rectangle) -> bool {
        match self {
            SearchMode::All => true,
            SearchMode::Intersects => rect.intersects(query),
            SearchMode::ContainedBy => rect.contained_by(query),
        }
    }
}

/// Lazy depth-first traversal returned by [`RTree::search`] and
/// [`RTree::search_contained`].
///
/// Each call to a search method starts a fresh traversal. Every payload is
/// yielded at most once; the order is unspecified.
pub struct Search<'a, T> {
    tree: &'a RTree<T>,
    query: Rectangle,
    mode: SearchMode,
    /// Nodes being walked and the next entry to look at in each
    stack: Vec<(NodeId, usize)>,
}

impl<'a, T> Search<'a, T> {
    pub(crate) fn new(tree: &'a RTree<T>, query: Rectangle, mode: SearchMode) -> Self {
        let stack = if tree.is_empty() {
            Vec::new()
        } else {
            vec![(tree.root_id(), 0)]
        };
        Self {
            tree,
            query,
            mode,
            stack,
        }
    }

    fn next_entry(&mut self) -> Option<(Rectangle, &'a T)> {
        let tree = self.tree;
        loop {
            let (node_id, position) = *self.stack.last()?;
            let node = tree.node(node_id);
            let Some(entry) = node.entries().get(position) else {
                self.stack.pop();
                continue;
            };
            if let Some(top) = self.stack.last_mut() {
                top.1 += 1;
            }

            if node.is_leaf() {
                if self.mode.accept(&entry.rect, &self.query) {
                    return Some((entry.rect, tree.payload(entry.id)));
                }
            } else if self.mode.descend(&entry.rect, &self.query) {
                self.stack.push((NodeId::new(entry.id), 0));
            }
        }
    }
}

impl<'a, T> Iterator for Search<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().map(|(_, payload)| payload)
    }
}

/// Iterator over every stored `(rectangle, payload)` pair, returned by
/// [`RTree::iter`].
pub struct Iter<'a, T> {
    inner: Search<'a, T>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a RTree<T>) -> Self {
        Self {
            inner: Search::new(tree, Rectangle::default(), SearchMode::All),
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (Rectangle, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next_entry()
    }
}

/// A payload found by a nearest-neighbour query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor<'a, T> {
    pub payload: &'a T,
    /// The stored rectangle of the payload
    pub rect: Rectangle,
    /// Distance from the query to `rect`
    pub distance: f64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Target {
    Node(NodeId),
    Payload { slot: usize, rect: Rectangle },
}

/// Work item of the best-first nearest-neighbour search.
///
/// Ordered so that a `BinaryHeap` pops the smallest distance first; ties go
/// to the candidate queued earliest.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    pub(crate) distance: f64,
    pub(crate) sequence: u64,
    pub(crate) target: Target,
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .distance
            .total_cmp(&self.distance)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}
