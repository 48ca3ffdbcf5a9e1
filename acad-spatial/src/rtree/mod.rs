//! In-memory R-tree over 3D axis-aligned rectangles.
//!
//! The tree follows the classic Guttman layout:
//! - Least-enlargement descent to pick the node that receives a new entry
//! - Quadratic split when a node overflows, propagated up to the root
//! - Condense-and-reinsert on delete, with root collapse when it is left
//!   with a single child
//! - Lazy depth-first range queries and best-first nearest-neighbour search
//!
//! Nodes are kept in an arena and addressed by [`NodeId`], so parent links
//! never need reference counting or interior mutability.

pub mod rtree_types;
pub mod rtree_constants;
mod config;
mod node;
mod query;
mod rtree_impl;
mod split;

pub use config::RTreeConfig;
pub use query::{CancellationToken, Iter, Neighbor, Search};
pub use rtree_constants::{DEFAULT_MAX_NODE_ENTRIES, DEFAULT_MIN_NODE_ENTRIES, DEFAULT_TOLERANCE};
pub use rtree_impl::RTree;
pub use rtree_types::{IntegrityReport, NodeId, RTreeStats, SpatialError, SpatialResult};
