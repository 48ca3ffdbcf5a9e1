use std::fmt::{Display, Formatter};

use crate::rtree::rtree_constants::DEFAULT_TOLERANCE;
use crate::rtree::rtree_types::{SpatialError, SpatialResult};

/// Number of axes carried by every [`Rectangle`] and [`Point`].
///
/// Planar data collapses the third axis to zero.
pub const DIMENSIONS: usize = 3;

/// A point in three-dimensional space.
///
/// Used as the query for nearest-neighbour lookups. Two-dimensional callers
/// should use [`Point::new_2d`], which pins the z coordinate to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    coords: [f64; DIMENSIONS],
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64, z: f64) -> Point {
        Point { coords: [x, y, z] }
    }

    /// Creates a point on the z = 0 plane.
    pub fn new_2d(x: f64, y: f64) -> Point {
        Point::new(x, y, 0.0)
    }

    /// Creates a point from a coordinate slice.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] unless the slice holds
    /// exactly [`DIMENSIONS`] values.
    pub fn try_from_slice(coords: &[f64]) -> SpatialResult<Point> {
        let coords: [f64; DIMENSIONS] =
            coords
                .try_into()
                .map_err(|_| SpatialError::DimensionMismatch {
                    expected: DIMENSIONS,
                    actual: coords.len(),
                })?;
        Ok(Point { coords })
    }

    /// Returns all coordinates.
    pub fn coords(&self) -> [f64; DIMENSIONS] {
        self.coords
    }

    pub fn x(&self) -> f64 {
        self.coords[0]
    }

    pub fn y(&self) -> f64 {
        self.coords[1]
    }

    pub fn z(&self) -> f64 {
        self.coords[2]
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        self.coords
            .iter()
            .zip(other.coords.iter())
            .map(|(a, b)| (a - b) * (a - b))
            .sum::<f64>()
            .sqrt()
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.coords.iter().all(|c| !c.is_nan())
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Point({}, {}, {})", self.x(), self.y(), self.z())
    }
}

/// An axis-aligned bounding box.
///
/// `Rectangle` is the only geometry the index understands. Entity extents are
/// converted into a rectangle by the caller, stored by value inside tree
/// nodes, and compared against query rectangles during traversal.
///
/// Equality is tolerant: two rectangles are equal when every coordinate
/// matches within [`DEFAULT_TOLERANCE`]. The relation is not transitive. Use
/// [`Rectangle::approx_eq`] to pick a different tolerance.
///
/// # Examples
///
/// ```rust
/// use acad_spatial::Rectangle;
///
/// let a = Rectangle::new_2d(0.0, 0.0, 10.0, 10.0);
/// let b = Rectangle::new_2d(5.0, 5.0, 15.0, 15.0);
///
/// assert!(a.intersects(&b));
/// assert_eq!(a.union(&b), Rectangle::new_2d(0.0, 0.0, 15.0, 15.0));
/// ```
#[derive(Clone, Copy, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    min: [f64; DIMENSIONS],
    max: [f64; DIMENSIONS],
}

impl PartialEq for Rectangle {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, DEFAULT_TOLERANCE)
    }
}

impl Display for Rectangle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Rectangle([{}, {}, {}] - [{}, {}, {}])",
            self.min[0], self.min[1], self.min[2], self.max[0], self.max[1], self.max[2]
        )
    }
}

impl Rectangle {
    /// Creates a rectangle from two opposite corners.
    ///
    /// The corners may be given in any order; each axis is normalised so
    /// that `min <= max` holds afterwards.
    pub fn new(corner_a: [f64; DIMENSIONS], corner_b: [f64; DIMENSIONS]) -> Rectangle {
        let mut min = [0.0; DIMENSIONS];
        let mut max = [0.0; DIMENSIONS];
        for axis in 0..DIMENSIONS {
            let (a, b) = (corner_a[axis], corner_b[axis]);
            // a NaN never compares less, so it survives for is_valid to catch
            (min[axis], max[axis]) = if b < a { (b, a) } else { (a, b) };
        }
        Rectangle { min, max }
    }

    /// Creates a planar rectangle with a collapsed z axis.
    pub fn new_2d(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Rectangle {
        Rectangle::new([min_x, min_y, 0.0], [max_x, max_y, 0.0])
    }

    /// Creates a rectangle from two coordinate slices.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::DimensionMismatch`] if either slice does not
    /// hold exactly [`DIMENSIONS`] values. Nothing is truncated or padded.
    pub fn try_from_slices(min: &[f64], max: &[f64]) -> SpatialResult<Rectangle> {
        let min = Point::try_from_slice(min)?;
        let max = Point::try_from_slice(max)?;
        Ok(Rectangle::new(min.coords, max.coords))
    }

    /// A degenerate rectangle covering a single point.
    pub fn from_point(point: &Point) -> Rectangle {
        Rectangle {
            min: point.coords,
            max: point.coords,
        }
    }

    /// The extents of a set of points, or `None` if the set is empty.
    pub fn from_points<I>(points: I) -> Option<Rectangle>
    where
        I: IntoIterator<Item = Point>,
    {
        points
            .into_iter()
            .map(|p| Rectangle::from_point(&p))
            .reduce(|acc, r| acc.union(&r))
    }

    pub fn min(&self) -> [f64; DIMENSIONS] {
        self.min
    }

    pub fn max(&self) -> [f64; DIMENSIONS] {
        self.max
    }

    /// Returns a copy of this rectangle projected onto the z = 0 plane.
    pub fn flatten_z(&self) -> Rectangle {
        let mut flat = *self;
        flat.min[2] = 0.0;
        flat.max[2] = 0.0;
        flat
    }

    /// Returns the center of the rectangle.
    pub fn center(&self) -> Point {
        let mut coords = [0.0; DIMENSIONS];
        for (axis, c) in coords.iter_mut().enumerate() {
            *c = (self.min[axis] + self.max[axis]) / 2.0;
        }
        Point { coords }
    }

    /// Checks that every coordinate is finite and that `min <= max` on every
    /// axis.
    pub fn is_valid(&self) -> bool {
        (0..DIMENSIONS).all(|axis| {
            self.min[axis].is_finite()
                && self.max[axis].is_finite()
                && self.min[axis] <= self.max[axis]
        })
    }

    /// Area of the x/y projection.
    ///
    /// This is the cost metric used to route inserts and to split nodes.
    pub fn area(&self) -> f64 {
        (self.max[0] - self.min[0]) * (self.max[1] - self.min[1])
    }

    /// Returns the smallest rectangle covering both `self` and `other`.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        let mut merged = *self;
        merged.expand(other);
        merged
    }

    /// Grows this rectangle in place to cover `other`.
    pub(crate) fn expand(&mut self, other: &Rectangle) {
        for axis in 0..DIMENSIONS {
            self.min[axis] = self.min[axis].min(other.min[axis]);
            self.max[axis] = self.max[axis].max(other.max[axis]);
        }
    }

    /// Area that would be added to this rectangle to also cover `other`.
    pub fn enlargement(&self, other: &Rectangle) -> f64 {
        self.union(other).area() - self.area()
    }

    /// Checks if the rectangles overlap. Touching edges count as overlap.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        (0..DIMENSIONS)
            .all(|axis| self.min[axis] <= other.max[axis] && self.max[axis] >= other.min[axis])
    }

    /// Returns the overlapping region, if the rectangles intersect.
    pub fn intersection(&self, other: &Rectangle) -> Option<Rectangle> {
        if !self.intersects(other) {
            return None;
        }
        let mut min = [0.0; DIMENSIONS];
        let mut max = [0.0; DIMENSIONS];
        for axis in 0..DIMENSIONS {
            min[axis] = self.min[axis].max(other.min[axis]);
            max[axis] = self.max[axis].min(other.max[axis]);
        }
        Some(Rectangle { min, max })
    }

    /// Checks if `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rectangle) -> bool {
        (0..DIMENSIONS)
            .all(|axis| self.min[axis] <= other.min[axis] && self.max[axis] >= other.max[axis])
    }

    /// Checks if this rectangle lies entirely inside `other`.
    pub fn contained_by(&self, other: &Rectangle) -> bool {
        other.contains(self)
    }

    pub fn contains_point(&self, point: &Point) -> bool {
        (0..DIMENSIONS).all(|axis| {
            point.coords[axis] >= self.min[axis] && point.coords[axis] <= self.max[axis]
        })
    }

    /// Euclidean gap between two rectangles, zero when they overlap.
    pub fn distance(&self, other: &Rectangle) -> f64 {
        (0..DIMENSIONS)
            .map(|axis| {
                let gap = (other.min[axis] - self.max[axis])
                    .max(self.min[axis] - other.max[axis])
                    .max(0.0);
                gap * gap
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Euclidean distance from a point to the nearest point of this
    /// rectangle, zero when the point is inside.
    pub fn distance_to_point(&self, point: &Point) -> f64 {
        (0..DIMENSIONS)
            .map(|axis| {
                let c = point.coords[axis];
                let gap = c - c.max(self.min[axis]).min(self.max[axis]);
                gap * gap
            })
            .sum::<f64>()
            .sqrt()
    }

    /// Checks whether any boundary coordinate of `other` lies on the matching
    /// boundary of this rectangle.
    ///
    /// When a child rectangle does not touch its parent's boundary, removing
    /// or shrinking it cannot shrink the parent. Axes on which this rectangle
    /// has no extent are skipped: nothing can shrink along them, and planar
    /// data would otherwise touch the z boundary every time.
    pub fn edge_overlaps(&self, other: &Rectangle, tolerance: f64) -> bool {
        (0..DIMENSIONS)
            .filter(|&axis| self.min[axis] < self.max[axis])
            .any(|axis| {
                (self.min[axis] - other.min[axis]).abs() <= tolerance
                    || (self.max[axis] - other.max[axis]).abs() <= tolerance
            })
    }

    /// Coordinate-wise equality within `tolerance`.
    pub fn approx_eq(&self, other: &Rectangle, tolerance: f64) -> bool {
        (0..DIMENSIONS).all(|axis| {
            (self.min[axis] - other.min[axis]).abs() <= tolerance
                && (self.max[axis] - other.max[axis]).abs() <= tolerance
        })
    }

    /// Returns this rectangle grown by `margin` on every side.
    pub(crate) fn inflate(&self, margin: f64) -> Rectangle {
        let mut grown = *self;
        for axis in 0..DIMENSIONS {
            grown.min[axis] -= margin;
            grown.max[axis] += margin;
        }
        grown
    }
}

impl From<([f64; DIMENSIONS], [f64; DIMENSIONS])> for Rectangle {
    fn from((a, b): ([f64; DIMENSIONS], [f64; DIMENSIONS])) -> Self {
        Rectangle::new(a, b)
    }
}

impl From<Point> for Rectangle {
    fn from(point: Point) -> Self {
        Rectangle::from_point(&point)
    }
}
