//! Building trees from collections of bounded items.

use crate::rectangle::{Point, Rectangle};
use crate::rtree::{RTree, RTreeConfig, SpatialResult};

/// Anything that can report the axis-aligned box enclosing it.
pub trait Bounded {
    fn bounding_rect(&self) -> Rectangle;
}

impl Bounded for Rectangle {
    fn bounding_rect(&self) -> Rectangle {
        *self
    }
}

impl Bounded for Point {
    fn bounding_rect(&self) -> Rectangle {
        Rectangle::from_point(self)
    }
}

impl<B: Bounded + ?Sized> Bounded for &B {
    fn bounding_rect(&self) -> Rectangle {
        (**self).bounding_rect()
    }
}

/// Collects an iterator into an [`RTree`].
///
/// Every item is inserted one at a time, so the resulting tree has the same
/// shape as one built with repeated [`RTree::insert`] calls.
///
/// # Examples
///
/// ```rust
/// use acad_spatial::{Point, Rectangle, ToRTree};
///
/// let tree = vec![
///     Point::new(0.0, 0.0, 5.0),
///     Point::new(3.0, 4.0, 9.0),
/// ]
/// .into_iter()
/// .to_rtree_2d()
/// .unwrap();
///
/// // z is dropped, so a flat query finds both points
/// assert_eq!(tree.search(&Rectangle::new_2d(-1.0, -1.0, 4.0, 4.0)).count(), 2);
/// ```
pub trait ToRTree<T>: Iterator<Item = T> + Sized {
    /// Indexes every item under its own bounding rectangle with the default
    /// configuration.
    fn to_rtree(self) -> SpatialResult<RTree<T>>
    where
        T: Bounded,
    {
        self.to_rtree_with(RTreeConfig::default())
    }

    /// Indexes every item under its own bounding rectangle.
    fn to_rtree_with(self, config: RTreeConfig) -> SpatialResult<RTree<T>>
    where
        T: Bounded,
    {
        self.to_rtree_by(config, |item| item.bounding_rect())
    }

    /// Indexes every item under its bounding rectangle projected onto the
    /// xy plane.
    fn to_rtree_2d(self) -> SpatialResult<RTree<T>>
    where
        T: Bounded,
    {
        self.to_rtree_by(RTreeConfig::default(), |item| item.bounding_rect().flatten_z())
    }

    /// Indexes every item under the rectangle computed by `bounds`.
    fn to_rtree_by<F>(self, config: RTreeConfig, bounds: F) -> SpatialResult<RTree<T>>
    where
        F: FnMut(&T) -> Rectangle,
    {
        let mut bounds = bounds;
        RTree::bulk_load(config, self.map(|item| (bounds(&item), item)))
    }
}

impl<T, I> ToRTree<T> for I where I: Iterator<Item = T> {}
