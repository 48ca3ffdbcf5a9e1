//! Constants for the R-tree implementation.

/// Default maximum number of entries per node
pub const DEFAULT_MAX_NODE_ENTRIES: usize = 50;

/// Default minimum number of entries before a node underflows
pub const DEFAULT_MIN_NODE_ENTRIES: usize = 20;

/// Default tolerance for coordinate comparisons
pub const DEFAULT_TOLERANCE: f64 = 1e-4;
