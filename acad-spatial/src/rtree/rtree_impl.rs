//! RTree implementation.

use std::collections::BinaryHeap;

use crate::rectangle::{Point, Rectangle};

use super::config::RTreeConfig;
use super::node::{compute_mbr, Entry, Node};
use super::query::{
    CancellationToken, Candidate, Iter, Neighbor, Search, SearchMode, Target,
};
use super::rtree_types::{IntegrityReport, NodeId, RTreeStats, SpatialError, SpatialResult};
use super::split::quadratic_split;

/// Path from the root down to a node: each step is a node and the index of
/// the entry that was followed out of it.
type Path = Vec<(NodeId, usize)>;

/// An in-memory R-tree mapping axis-aligned rectangles to payloads.
///
/// Nodes live in an arena and refer to each other by [`NodeId`]; payloads
/// live in a separate slot store referenced from leaf entries. The tree is
/// height-balanced: every leaf sits at level 0 and the root at
/// `height() - 1`.
///
/// Mutation needs `&mut self`, so the borrow checker serializes inserts and
/// deletes. Searches take `&self` and may run concurrently with each other.
/// See [`SharedRTree`](crate::SharedRTree) for a handle that can be shared
/// across threads.
///
/// # Examples
///
/// ```rust
/// use acad_spatial::{Point, RTree, Rectangle};
///
/// let mut tree = RTree::new(8, 3).unwrap();
/// tree.insert(Rectangle::new_2d(0.0, 0.0, 10.0, 10.0), 1).unwrap();
/// tree.insert(Rectangle::new_2d(20.0, 20.0, 30.0, 30.0), 2).unwrap();
/// tree.insert(Rectangle::new_2d(5.0, 5.0, 15.0, 15.0), 3).unwrap();
///
/// let mut hits: Vec<i32> = tree
///     .search(&Rectangle::new_2d(0.0, 0.0, 12.0, 12.0))
///     .copied()
///     .collect();
/// hits.sort();
/// assert_eq!(hits, vec![1, 3]);
///
/// assert_eq!(tree.nearest(&Point::new_2d(40.0, 40.0), 1), vec![&2]);
///
/// tree.delete(&Rectangle::new_2d(20.0, 20.0, 30.0, 30.0), &2).unwrap();
/// assert_eq!(tree.search(&Rectangle::new_2d(20.0, 20.0, 30.0, 30.0)).count(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct RTree<T> {
    config: RTreeConfig,
    nodes: Vec<Option<Node>>,
    free_nodes: Vec<usize>,
    payloads: Vec<Option<T>>,
    free_payloads: Vec<usize>,
    root: NodeId,
    height: u32,
    size: usize,
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::empty(RTreeConfig::default())
    }
}

impl<T> RTree<T> {
    /// Creates an empty tree with the given node capacity and minimum fill,
    /// using the default coordinate tolerance.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] unless
    /// `0 < min_node_entries <= max_node_entries / 2`.
    pub fn new(max_node_entries: usize, min_node_entries: usize) -> SpatialResult<Self> {
        Self::with_config(
            RTreeConfig::new()
                .with_max_node_entries(max_node_entries)
                .with_min_node_entries(min_node_entries),
        )
    }

    /// Creates an empty tree from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] if the configuration
    /// does not validate.
    pub fn with_config(config: RTreeConfig) -> SpatialResult<Self> {
        config.validate()?;
        Ok(Self::empty(config))
    }

    /// Builds a tree by inserting every pair in turn.
    ///
    /// There is no packing step: the result has exactly the shape repeated
    /// [`insert`](Self::insert) calls would produce.
    ///
    /// # Errors
    ///
    /// Fails on an invalid configuration or on the first invalid rectangle.
    pub fn bulk_load<I>(config: RTreeConfig, items: I) -> SpatialResult<Self>
    where
        I: IntoIterator<Item = (Rectangle, T)>,
    {
        let mut tree = Self::with_config(config)?;
        for (rect, payload) in items {
            tree.insert(rect, payload)?;
        }
        log::debug!(
            "Bulk loaded {} entries into R-tree of height {}",
            tree.size,
            tree.height
        );
        Ok(tree)
    }

    fn empty(config: RTreeConfig) -> Self {
        let root = Node::new(0, config.max_node_entries());
        Self {
            config,
            nodes: vec![Some(root)],
            free_nodes: Vec::new(),
            payloads: Vec::new(),
            free_payloads: Vec::new(),
            root: NodeId::new(0),
            height: 1,
            size: 0,
        }
    }

    pub fn config(&self) -> &RTreeConfig {
        &self.config
    }

    /// Number of stored payloads.
    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of levels; a tree whose root is a leaf has height 1.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free_nodes.len()
    }

    /// The rectangle covering every stored entry, `None` when empty.
    pub fn bounds(&self) -> Option<Rectangle> {
        self.node(self.root).mbr()
    }

    /// Removes every entry and releases all nodes.
    pub fn clear(&mut self) {
        let config = self.config.clone();
        *self = Self::empty(config);
    }

    // ------------------------------------------------------------------
    // Insert
    // ------------------------------------------------------------------

    /// Stores `payload` under `rect`.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidRectangle`] if `rect` has a NaN or
    /// infinite coordinate. The tree is left untouched in that case.
    pub fn insert(&mut self, rect: Rectangle, payload: T) -> SpatialResult<()> {
        if !rect.is_valid() {
            return Err(SpatialError::InvalidRectangle(format!(
                "cannot index {}",
                rect
            )));
        }

        let slot = self.alloc_payload(payload);
        self.insert_entry(Entry::new(rect, slot), 0);
        self.size += 1;
        log::trace!("Inserted {} into slot {}", rect, slot);
        Ok(())
    }

    /// Adds an entry to a node at `level`, splitting and propagating upward
    /// as needed.
    fn insert_entry(&mut self, entry: Entry, level: u32) {
        let (path, target) = self.choose_node(&entry.rect, level);
        let max_node_entries = self.config.max_node_entries();

        let overflowed = self
            .node_mut(target)
            .add_entry(entry.rect, entry.id, max_node_entries);
        let split = overflowed.then(|| self.split_node(target));

        self.adjust_tree(path, target, split);
    }

    /// Descends from the root to a node at `level`, following at each step
    /// the entry needing the least enlargement to admit `rect`. Ties go to
    /// the smaller area, then to the lower index.
    fn choose_node(&self, rect: &Rectangle, level: u32) -> (Path, NodeId) {
        let mut path = Vec::with_capacity(self.height as usize);
        let mut node_id = self.root;

        loop {
            let node = self.node(node_id);
            debug_assert!(node.level() >= level, "target level below the leaves");
            if node.level() == level {
                return (path, node_id);
            }

            let mut best_index = 0;
            let mut best_enlargement = f64::INFINITY;
            let mut best_area = f64::INFINITY;
            for (i, child) in node.entries().iter().enumerate() {
                let enlargement = child.rect.enlargement(rect);
                let area = child.rect.area();
                if enlargement < best_enlargement
                    || (enlargement == best_enlargement && area < best_area)
                {
                    best_enlargement = enlargement;
                    best_area = area;
                    best_index = i;
                }
            }

            path.push((node_id, best_index));
            node_id = NodeId::new(node.entry(best_index).id);
        }
    }

    /// Splits an overflowing node in two. The node keeps the first group and
    /// the returned new sibling takes the second.
    fn split_node(&mut self, node_id: NodeId) -> NodeId {
        let min_node_entries = self.config.min_node_entries();
        let node = self.node_mut(node_id);
        let level = node.level();
        let (first, second) = quadratic_split(node.take_entries(), min_node_entries);

        log::debug!(
            "Splitting node {} at level {} into {} + {} entries",
            node_id,
            level,
            first.len(),
            second.len()
        );
        *node = Node::from_entries(level, first);
        self.alloc_node(Node::from_entries(level, second))
    }

    /// Walks `path` bottom-up, refreshing each parent entry with its child's
    /// MBR and adding the sibling produced by a split, splitting parents in
    /// turn. A split that reaches the root grows a new root.
    fn adjust_tree(&mut self, path: Path, mut node_id: NodeId, mut split: Option<NodeId>) {
        let max_node_entries = self.config.max_node_entries();
        let tolerance = self.config.tolerance();

        for (parent_id, index) in path.into_iter().rev() {
            let child_mbr = self.mbr_of(node_id);
            let sibling = split.map(|id| (id, self.mbr_of(id)));

            let parent = self.node_mut(parent_id);
            parent.update_entry(index, child_mbr, tolerance);
            split = match sibling {
                Some((sibling_id, sibling_mbr)) => parent
                    .add_entry(sibling_mbr, sibling_id.get(), max_node_entries)
                    .then(|| self.split_node(parent_id)),
                None => None,
            };
            node_id = parent_id;
        }

        if let Some(sibling_id) = split {
            self.grow_root(sibling_id);
        }
    }

    fn grow_root(&mut self, sibling_id: NodeId) {
        let old_root = self.root;
        let level = self.node(old_root).level() + 1;
        let mut root = Node::new(level, self.config.max_node_entries());
        root.add_entry(self.mbr_of(old_root), old_root.get(), usize::MAX);
        root.add_entry(self.mbr_of(sibling_id), sibling_id.get(), usize::MAX);

        self.root = self.alloc_node(root);
        self.height += 1;
        log::debug!(
            "Root split: new root {} at level {}, height now {}",
            self.root,
            level,
            self.height
        );
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Removes the entry stored under `rect` (matched within the configured
    /// tolerance) whose payload equals `payload`, and returns the stored
    /// payload.
    ///
    /// Nodes left under-full are dissolved and their remaining entries are
    /// reinserted, so surviving entries may move to other leaves.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::NotFound`] if no such entry exists.
    pub fn delete(&mut self, rect: &Rectangle, payload: &T) -> SpatialResult<T>
    where
        T: PartialEq,
    {
        let mut path = Vec::with_capacity(self.height as usize);
        let Some((leaf_id, index)) = self.find_leaf(self.root, rect, payload, &mut path) else {
            log::warn!("Delete of {} did not match any stored entry", rect);
            return Err(SpatialError::NotFound);
        };

        let min_node_entries = self.config.min_node_entries();
        let tolerance = self.config.tolerance();
        let removed = self
            .node_mut(leaf_id)
            .delete_entry(index, min_node_entries, tolerance);
        let payload = self.release_payload(removed.id);
        self.size -= 1;

        self.condense_tree(path, leaf_id);
        log::trace!("Deleted {} from slot {}", rect, removed.id);
        Ok(payload)
    }

    /// Depth-first search for the leaf holding a matching entry, recording
    /// the path taken in `path`.
    fn find_leaf(
        &self,
        node_id: NodeId,
        rect: &Rectangle,
        payload: &T,
        path: &mut Path,
    ) -> Option<(NodeId, usize)>
    where
        T: PartialEq,
    {
        let tolerance = self.config.tolerance();
        let node = self.node(node_id);

        if node.is_leaf() {
            return node
                .find_entry(rect, tolerance, |slot| {
                    self.payloads[slot].as_ref() == Some(payload)
                })
                .map(|index| (node_id, index));
        }

        for (index, child) in node.entries().iter().enumerate() {
            if !child.rect.inflate(tolerance).contains(rect) {
                continue;
            }
            path.push((node_id, index));
            if let Some(found) = self.find_leaf(NodeId::new(child.id), rect, payload, path) {
                return Some(found);
            }
            path.pop();
        }
        None
    }

    /// Walks back up from a leaf that lost an entry. Under-full nodes are
    /// unlinked from their parent and their entries queued for reinsertion;
    /// surviving nodes get their parent entry tightened. Finally the root is
    /// collapsed while it is an internal node with a single child.
    fn condense_tree(&mut self, path: Path, leaf_id: NodeId) {
        let min_node_entries = self.config.min_node_entries();
        let tolerance = self.config.tolerance();
        let mut orphans: Vec<(Entry, u32)> = Vec::new();
        let mut node_id = leaf_id;

        for (parent_id, index) in path.into_iter().rev() {
            if self.node(node_id).len() < min_node_entries {
                let mut node = self.release_node(node_id);
                let level = node.level();
                orphans.extend(node.take_entries().into_iter().map(|e| (e, level)));
                self.node_mut(parent_id)
                    .delete_entry(index, min_node_entries, tolerance);
            } else {
                let mbr = self.mbr_of(node_id);
                self.node_mut(parent_id).update_entry(index, mbr, tolerance);
            }
            node_id = parent_id;
        }

        // the root may sit below the minimum fill, keep its MBR exact
        self.node_mut(self.root).recompute_mbr();

        if !orphans.is_empty() {
            log::debug!("Condense: reinserting {} orphaned entries", orphans.len());
        }
        for (entry, level) in orphans {
            self.insert_entry(entry, level);
        }

        while !self.node(self.root).is_leaf() && self.node(self.root).len() == 1 {
            let old_root = self.root;
            let child = NodeId::new(self.node(old_root).entry(0).id);
            self.release_node(old_root);
            self.root = child;
            self.height -= 1;
            log::debug!(
                "Collapsed root {} into {}, height now {}",
                old_root,
                child,
                self.height
            );
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Lazily yields every payload whose rectangle intersects `query`.
    pub fn search(&self, query: &Rectangle) -> Search<'_, T> {
        Search::new(self, *query, SearchMode::Intersects)
    }

    /// Lazily yields every payload whose rectangle lies entirely inside
    /// `query`.
    pub fn search_contained(&self, query: &Rectangle) -> Search<'_, T> {
        Search::new(self, *query, SearchMode::ContainedBy)
    }

    /// Like [`search`](Self::search), but checks `token` before visiting each
    /// node.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::Cancelled`] once the token is cancelled.
    pub fn search_cancellable(
        &self,
        query: &Rectangle,
        token: &CancellationToken,
    ) -> SpatialResult<Vec<&T>> {
        let mut results = Vec::new();
        if self.is_empty() {
            return Ok(results);
        }

        let mut stack = vec![self.root];
        while let Some(node_id) = stack.pop() {
            token.check()?;
            let node = self.node(node_id);
            for entry in node.entries() {
                if !entry.rect.intersects(query) {
                    continue;
                }
                if node.is_leaf() {
                    results.push(self.payload(entry.id));
                } else {
                    stack.push(NodeId::new(entry.id));
                }
            }
        }
        Ok(results)
    }

    /// Iterates over every stored `(rectangle, payload)` pair.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    // ------------------------------------------------------------------
    // Nearest neighbours
    // ------------------------------------------------------------------

    /// The payloads of the `k` entries nearest to `point`, nearest first.
    pub fn nearest(&self, point: &Point, k: usize) -> Vec<&T> {
        self.nearest_with_distance(point, k, None)
            .into_iter()
            .map(|n| n.payload)
            .collect()
    }

    /// Finds up to `k` entries nearest to `point`, optionally ignoring
    /// anything farther than `max_distance`.
    ///
    /// Uses best-first branch-and-bound: candidates are expanded in order of
    /// their lower-bound distance, so no subtree farther than the k-th
    /// result is ever opened.
    pub fn nearest_with_distance(
        &self,
        point: &Point,
        k: usize,
        max_distance: Option<f64>,
    ) -> Vec<Neighbor<'_, T>> {
        if !point.is_valid() {
            return Vec::new();
        }
        self.best_first(|rect| rect.distance_to_point(point), k, max_distance, None)
            .unwrap_or_default()
    }

    /// Finds up to `k` entries nearest to the rectangle `query`.
    pub fn nearest_to_rect(&self, query: &Rectangle, k: usize) -> Vec<Neighbor<'_, T>> {
        if !query.is_valid() {
            return Vec::new();
        }
        self.best_first(|rect| rect.distance(query), k, None, None)
            .unwrap_or_default()
    }

    /// Every entry within `distance` of `point`, nearest first.
    pub fn within_distance(&self, point: &Point, distance: f64) -> Vec<Neighbor<'_, T>> {
        self.nearest_with_distance(point, usize::MAX, Some(distance))
    }

    /// Like [`nearest_with_distance`](Self::nearest_with_distance), but
    /// checks `token` before expanding each node.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::Cancelled`] once the token is cancelled.
    pub fn nearest_cancellable(
        &self,
        point: &Point,
        k: usize,
        max_distance: Option<f64>,
        token: &CancellationToken,
    ) -> SpatialResult<Vec<Neighbor<'_, T>>> {
        self.best_first(
            |rect| rect.distance_to_point(point),
            k,
            max_distance,
            Some(token),
        )
    }

    fn best_first<F>(
        &self,
        distance: F,
        k: usize,
        max_distance: Option<f64>,
        token: Option<&CancellationToken>,
    ) -> SpatialResult<Vec<Neighbor<'_, T>>>
    where
        F: Fn(&Rectangle) -> f64,
    {
        let mut found = Vec::new();
        let Some(root_mbr) = self.bounds() else {
            return Ok(found);
        };
        if k == 0 {
            return Ok(found);
        }

        let limit = max_distance.unwrap_or(f64::INFINITY);
        let mut queue = BinaryHeap::new();
        let mut sequence = 0u64;
        queue.push(Candidate {
            distance: distance(&root_mbr),
            sequence,
            target: Target::Node(self.root),
        });

        while let Some(candidate) = queue.pop() {
            match candidate.target {
                Target::Payload { slot, rect } => {
                    found.push(Neighbor {
                        payload: self.payload(slot),
                        rect,
                        distance: candidate.distance,
                    });
                    if found.len() == k {
                        break;
                    }
                }
                Target::Node(node_id) => {
                    if let Some(token) = token {
                        token.check()?;
                    }
                    let node = self.node(node_id);
                    for entry in node.entries() {
                        let d = distance(&entry.rect);
                        // also drops NaN distances
                        if !(d <= limit) {
                            continue;
                        }
                        sequence += 1;
                        let target = if node.is_leaf() {
                            Target::Payload {
                                slot: entry.id,
                                rect: entry.rect,
                            }
                        } else {
                            Target::Node(NodeId::new(entry.id))
                        };
                        queue.push(Candidate {
                            distance: d,
                            sequence,
                            target,
                        });
                    }
                }
            }
        }
        Ok(found)
    }

    // ------------------------------------------------------------------
    // Diagnostics
    // ------------------------------------------------------------------

    /// Collects shape statistics by walking the whole tree.
    pub fn stats(&self) -> RTreeStats {
        let mut node_count = 0u64;
        let mut leaf_count = 0u64;
        let mut slots_used = 0u64;

        let mut stack = vec![self.root];
        while let Some(node_id) = stack.pop() {
            let node = self.node(node_id);
            node_count += 1;
            slots_used += node.len() as u64;
            if node.is_leaf() {
                leaf_count += 1;
            } else {
                stack.extend(node.entries().iter().map(|e| NodeId::new(e.id)));
            }
        }

        let capacity = node_count * self.config.max_node_entries() as u64;
        RTreeStats {
            total_entries: self.size as u64,
            node_count,
            leaf_count,
            tree_height: self.height,
            fill_factor: if capacity > 0 {
                slots_used as f64 / capacity as f64
            } else {
                0.0
            },
        }
    }

    /// Verifies the structural invariants of the tree:
    /// - every node sits exactly one level below its parent and all leaves
    ///   are at level 0
    /// - every parent entry contains its child's MBR and every cached MBR is
    ///   the exact union of its entries
    /// - non-root nodes hold between the minimum and maximum entry counts and
    ///   an internal root has at least two children
    /// - every stored payload is reachable exactly once and every live node
    ///   is reachable from the root
    pub fn check_integrity(&self) -> IntegrityReport {
        let mut report = IntegrityReport::new();
        let root = self.node(self.root);

        if root.level() + 1 != self.height {
            report.fail(format!(
                "Root level {} does not match height {}",
                root.level(),
                self.height
            ));
        }
        if !root.is_leaf() && root.len() < 2 {
            report.fail(format!("Internal root has {} entries", root.len()));
        }

        let mut stack = vec![(self.root, root.level())];
        while let Some((node_id, expected_level)) = stack.pop() {
            let Some(node) = self.nodes.get(node_id.get()).and_then(Option::as_ref) else {
                report.fail(format!("Entry points at released node {}", node_id));
                continue;
            };
            report.nodes_checked += 1;
            self.check_node(node_id, node, expected_level, &mut report);

            if node.is_leaf() {
                for entry in node.entries() {
                    report.entries_checked += 1;
                    if self.payloads.get(entry.id).and_then(Option::as_ref).is_none() {
                        report.fail(format!(
                            "Leaf {} references empty payload slot {}",
                            node_id, entry.id
                        ));
                    }
                }
                continue;
            }

            for entry in node.entries() {
                let child_id = NodeId::new(entry.id);
                if let Some(child_mbr) = self
                    .nodes
                    .get(entry.id)
                    .and_then(Option::as_ref)
                    .and_then(Node::mbr)
                {
                    if !entry.rect.contains(&child_mbr) {
                        report.fail(format!(
                            "Entry {} in node {} does not contain child MBR {}",
                            entry.rect, node_id, child_mbr
                        ));
                    }
                }
                stack.push((child_id, node.level().saturating_sub(1)));
            }
        }

        if report.entries_checked != self.size as u64 {
            report.fail(format!(
                "Reached {} entries but the tree holds {}",
                report.entries_checked, self.size
            ));
        }
        if report.nodes_checked != self.node_count() as u64 {
            report.fail(format!(
                "Reached {} nodes but {} are live",
                report.nodes_checked,
                self.node_count()
            ));
        }
        report
    }

    fn check_node(
        &self,
        node_id: NodeId,
        node: &Node,
        expected_level: u32,
        report: &mut IntegrityReport,
    ) {
        if node.level() != expected_level {
            report.fail(format!(
                "Node {} is at level {} but expected {}",
                node_id,
                node.level(),
                expected_level
            ));
        }
        if node.len() > self.config.max_node_entries() {
            report.fail(format!("Node {} overflows with {} entries", node_id, node.len()));
        }
        if node_id != self.root && node.len() < self.config.min_node_entries() {
            report.fail(format!("Node {} underflows with {} entries", node_id, node.len()));
        }
        let exact = compute_mbr(node.entries());
        let tight = match (node.mbr(), exact) {
            (Some(cached), Some(exact)) => cached.approx_eq(&exact, 0.0),
            (None, None) => true,
            _ => false,
        };
        if !tight {
            report.fail(format!("Node {} has a stale MBR", node_id));
        }
    }

    // ------------------------------------------------------------------
    // Arena plumbing
    // ------------------------------------------------------------------

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        match self.nodes.get(id.get()).and_then(Option::as_ref) {
            Some(node) => node,
            None => unreachable!("node {id} is not live"),
        }
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match self.nodes.get_mut(id.get()).and_then(Option::as_mut) {
            Some(node) => node,
            None => unreachable!("node {id} is not live"),
        }
    }

    pub(crate) fn payload(&self, slot: usize) -> &T {
        match self.payloads.get(slot).and_then(Option::as_ref) {
            Some(payload) => payload,
            None => unreachable!("payload slot {slot} is empty"),
        }
    }

    fn mbr_of(&self, id: NodeId) -> Rectangle {
        let node = self.node(id);
        debug_assert!(!node.is_empty(), "non-root node {id} is empty");
        node.mbr().unwrap_or_default()
    }

    fn alloc_node(&mut self, node: Node) -> NodeId {
        match self.free_nodes.pop() {
            Some(index) => {
                self.nodes[index] = Some(node);
                NodeId::new(index)
            }
            None => {
                self.nodes.push(Some(node));
                NodeId::new(self.nodes.len() - 1)
            }
        }
    }

    fn release_node(&mut self, id: NodeId) -> Node {
        match self.nodes.get_mut(id.get()).and_then(Option::take) {
            Some(node) => {
                self.free_nodes.push(id.get());
                node
            }
            None => unreachable!("node {id} released twice"),
        }
    }

    fn alloc_payload(&mut self, payload: T) -> usize {
        match self.free_payloads.pop() {
            Some(slot) => {
                self.payloads[slot] = Some(payload);
                slot
            }
            None => {
                self.payloads.push(Some(payload));
                self.payloads.len() - 1
            }
        }
    }

    fn release_payload(&mut self, slot: usize) -> T {
        match self.payloads.get_mut(slot).and_then(Option::take) {
            Some(payload) => {
                self.free_payloads.push(slot);
                payload
            }
            None => unreachable!("payload slot {slot} released twice"),
        }
    }
}

impl<'a, T> IntoIterator for &'a RTree<T> {
    type Item = (Rectangle, &'a T);
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
