//! # Acad Spatial - In-Memory R-Tree for Drawing Geometry
//!
//! This crate provides an in-memory R-tree over 3D axis-aligned rectangles,
//! used to answer "which entities overlap this region" and "which entity is
//! closest to this point" over large sets of drawing entities.
//!
//! ## Features
//!
//! - **Generic Payloads**: Stores any `T`; the index knows nothing about the
//!   entities it points at
//! - **Guttman R-Tree**: Least-enlargement insert, quadratic split,
//!   condense-and-reinsert delete
//! - **Lazy Queries**: Range searches are iterators that borrow the tree
//! - **Nearest Neighbours**: Best-first k-nearest search with optional
//!   distance limit
//! - **Tolerant Matching**: Stored boxes are found again despite small
//!   coordinate noise, within a configurable tolerance
//! - **Thread Safe Handle**: [`SharedRTree`] for concurrent readers with
//!   serialized writers
//! - **Cancellation**: Long queries can be aborted through a
//!   [`CancellationToken`]
//!
//! ## Quick Start
//!
//! ```rust
//! use acad_spatial::{Point, RTree, RTreeConfig, Rectangle};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = RTreeConfig::new()
//!     .with_max_node_entries(16)
//!     .with_min_node_entries(6);
//! let mut tree = RTree::with_config(config)?;
//!
//! tree.insert(Rectangle::new_2d(0.0, 0.0, 10.0, 10.0), "wall")?;
//! tree.insert(Rectangle::new_2d(20.0, 20.0, 30.0, 30.0), "door")?;
//! tree.insert(Rectangle::new_2d(5.0, 5.0, 15.0, 15.0), "window")?;
//!
//! let mut hits: Vec<_> = tree.search(&Rectangle::new_2d(0.0, 0.0, 12.0, 12.0)).collect();
//! hits.sort();
//! assert_eq!(hits, vec![&"wall", &"window"]);
//!
//! let nearest = tree.nearest(&Point::new_2d(31.0, 31.0), 1);
//! assert_eq!(nearest, vec![&"door"]);
//!
//! let removed = tree.delete(&Rectangle::new_2d(20.0, 20.0, 30.0, 30.0), &"door")?;
//! assert_eq!(removed, "door");
//! assert_eq!(tree.len(), 2);
//! # Ok(())
//! # }
//! ```

// Geometry
pub mod rectangle;

// R-Tree
pub mod rtree;

// Shared access and construction helpers
pub mod bulk;
pub mod spatial_index;

// Re-export geometry types
pub use rectangle::{Point, Rectangle, DIMENSIONS};

// Re-export R-Tree types
pub use rtree::{
    CancellationToken, IntegrityReport, Iter, Neighbor, NodeId, RTree, RTreeConfig, RTreeStats,
    Search, SpatialError, SpatialResult, DEFAULT_MAX_NODE_ENTRIES, DEFAULT_MIN_NODE_ENTRIES,
    DEFAULT_TOLERANCE,
};

// Re-export helpers
pub use bulk::{Bounded, ToRTree};
pub use spatial_index::{SharedRTree, SpatialIndex};
