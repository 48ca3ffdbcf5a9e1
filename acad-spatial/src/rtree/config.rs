use super::rtree_constants::{
    DEFAULT_MAX_NODE_ENTRIES, DEFAULT_MIN_NODE_ENTRIES, DEFAULT_TOLERANCE,
};
use super::rtree_types::{SpatialError, SpatialResult};

/// Tuning parameters for an [`RTree`](super::RTree).
///
/// `RTreeConfig` is a small value type built with a fluent API and validated
/// when the tree is constructed. Invalid combinations never reach the tree.
///
/// Defaults:
/// - `max_node_entries`: 50
/// - `min_node_entries`: 20
/// - `tolerance`: 1e-4 (coordinate noise accepted when matching stored boxes)
///
/// # Examples
///
/// ```rust
/// use acad_spatial::{RTree, RTreeConfig};
///
/// let config = RTreeConfig::new()
///     .with_max_node_entries(8)
///     .with_min_node_entries(3)
///     .with_tolerance(1e-6);
///
/// let tree: RTree<u64> = RTree::with_config(config).unwrap();
/// assert_eq!(tree.config().max_node_entries(), 8);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RTreeConfig {
    max_node_entries: usize,
    min_node_entries: usize,
    tolerance: f64,
}

impl RTreeConfig {
    /// Creates a configuration with default values.
    pub fn new() -> RTreeConfig {
        RTreeConfig {
            max_node_entries: DEFAULT_MAX_NODE_ENTRIES,
            min_node_entries: DEFAULT_MIN_NODE_ENTRIES,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    /// Sets the node capacity.
    pub fn with_max_node_entries(mut self, max_node_entries: usize) -> Self {
        self.max_node_entries = max_node_entries;
        self
    }

    /// Sets the fill level below which a node is dissolved on delete.
    pub fn with_min_node_entries(mut self, min_node_entries: usize) -> Self {
        self.min_node_entries = min_node_entries;
        self
    }

    /// Sets the tolerance used when matching stored rectangles.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn max_node_entries(&self) -> usize {
        self.max_node_entries
    }

    pub fn min_node_entries(&self) -> usize {
        self.min_node_entries
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    /// Checks that `0 < min_node_entries <= max_node_entries / 2` and that the
    /// tolerance is a finite, non-negative number.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidConfiguration`] describing the first
    /// violated rule.
    pub fn validate(&self) -> SpatialResult<()> {
        if self.min_node_entries == 0 {
            return Err(SpatialError::InvalidConfiguration(
                "min_node_entries must be greater than zero".into(),
            ));
        }
        if self.min_node_entries > self.max_node_entries / 2 {
            return Err(SpatialError::InvalidConfiguration(format!(
                "min_node_entries ({}) must not exceed half of max_node_entries ({})",
                self.min_node_entries, self.max_node_entries
            )));
        }
        if !self.tolerance.is_finite() || self.tolerance < 0.0 {
            return Err(SpatialError::InvalidConfiguration(format!(
                "tolerance must be finite and non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self::new()
    }
}
