//! Shared, thread-safe access to an R-tree.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::rectangle::{Point, Rectangle};
use crate::rtree::{RTree, RTreeConfig, SpatialResult};

/// A spatial index that can be shared between threads.
///
/// All methods take `&self`; implementations serialize mutation internally.
/// Query results are returned by value because they must outlive any lock
/// held while computing them.
pub trait SpatialIndex<T>: Send + Sync {
    /// Adds a payload under the given rectangle.
    fn add(&self, rect: &Rectangle, payload: T) -> SpatialResult<()>;

    /// Removes the entry stored under `rect` with an equal payload and
    /// returns the stored payload.
    fn remove(&self, rect: &Rectangle, payload: &T) -> SpatialResult<T>;

    /// Payloads whose rectangles intersect `query`.
    fn find_intersecting(&self, query: &Rectangle) -> SpatialResult<Vec<T>>;

    /// Payloads whose rectangles lie entirely inside `query`.
    fn find_contained(&self, query: &Rectangle) -> SpatialResult<Vec<T>>;

    /// The `k` payloads nearest to `point` with their distances, nearest
    /// first, ignoring anything beyond `max_distance`.
    fn find_nearest(
        &self,
        point: &Point,
        k: usize,
        max_distance: Option<f64>,
    ) -> SpatialResult<Vec<(T, f64)>>;

    /// Every payload within `distance` of `point`, nearest first.
    fn find_within_distance(&self, point: &Point, distance: f64) -> SpatialResult<Vec<(T, f64)>> {
        self.find_nearest(point, usize::MAX, Some(distance))
    }

    /// Number of stored payloads.
    fn size(&self) -> usize;

    /// Removes every entry.
    fn clear(&self) -> SpatialResult<()>;
}

/// A cloneable handle to an [`RTree`] guarded by a reader-writer lock.
///
/// Clones share the same tree. Any number of readers may query at once while
/// inserts and deletes take the lock exclusively.
///
/// # Examples
///
/// ```rust
/// use acad_spatial::{Rectangle, RTreeConfig, SharedRTree, SpatialIndex};
/// use std::thread;
///
/// let index = SharedRTree::new(RTreeConfig::default()).unwrap();
/// let writer = index.clone();
/// thread::spawn(move || {
///     writer.add(&Rectangle::new_2d(0.0, 0.0, 1.0, 1.0), 7u64).unwrap();
/// })
/// .join()
/// .unwrap();
///
/// assert_eq!(index.find_intersecting(&Rectangle::new_2d(0.5, 0.5, 2.0, 2.0)).unwrap(), vec![7]);
/// ```
#[derive(Debug)]
pub struct SharedRTree<T> {
    inner: Arc<RwLock<RTree<T>>>,
}

impl<T> Clone for SharedRTree<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> SharedRTree<T> {
    /// Creates a shared handle to a new, empty tree.
    pub fn new(config: RTreeConfig) -> SpatialResult<Self> {
        Ok(Self::from_tree(RTree::with_config(config)?))
    }

    /// Wraps an existing tree.
    pub fn from_tree(tree: RTree<T>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// Locks the tree for reading, for queries that borrow payloads.
    pub fn read(&self) -> RwLockReadGuard<'_, RTree<T>> {
        self.inner.read()
    }

    /// Locks the tree for writing.
    pub fn write(&self) -> RwLockWriteGuard<'_, RTree<T>> {
        self.inner.write()
    }
}

impl<T> SpatialIndex<T> for SharedRTree<T>
where
    T: Clone + PartialEq + Send + Sync,
{
    fn add(&self, rect: &Rectangle, payload: T) -> SpatialResult<()> {
        self.inner.write().insert(*rect, payload)
    }

    fn remove(&self, rect: &Rectangle, payload: &T) -> SpatialResult<T> {
        self.inner.write().delete(rect, payload)
    }

    fn find_intersecting(&self, query: &Rectangle) -> SpatialResult<Vec<T>> {
        Ok(self.inner.read().search(query).cloned().collect())
    }

    fn find_contained(&self, query: &Rectangle) -> SpatialResult<Vec<T>> {
        Ok(self.inner.read().search_contained(query).cloned().collect())
    }

    fn find_nearest(
        &self,
        point: &Point,
        k: usize,
        max_distance: Option<f64>,
    ) -> SpatialResult<Vec<(T, f64)>> {
        let tree = self.inner.read();
        Ok(tree
            .nearest_with_distance(point, k, max_distance)
            .into_iter()
            .map(|n| (n.payload.clone(), n.distance))
            .collect())
    }

    fn size(&self) -> usize {
        self.inner.read().len()
    }

    fn clear(&self) -> SpatialResult<()> {
        self.inner.write().clear();
        Ok(())
    }
}
