//! Core types shared by the R-tree implementation.
//!
//! This module defines:
//! - Error types and result types
//! - Node and entry identifiers
//! - Statistics and integrity report structures

use std::fmt::{Display, Formatter};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur in spatial indexing operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SpatialError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid rectangle: {0}")]
    InvalidRectangle(String),

    #[error("Entry not found")]
    NotFound,

    #[error("Operation cancelled")]
    Cancelled,
}

/// Result type for spatial operations
pub type SpatialResult<T> = Result<T, SpatialError>;

// ============================================================================
// Identifiers
// ============================================================================

/// Identity of a node inside the tree's node arena.
///
/// Ids of released nodes are recycled by later splits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Statistics about the shape of an R-tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RTreeStats {
    /// Number of stored payloads
    pub total_entries: u64,
    /// Number of live nodes (leaf and internal)
    pub node_count: u64,
    /// Number of live leaf nodes
    pub leaf_count: u64,
    /// Number of levels, a single leaf root counts as 1
    pub tree_height: u32,
    /// Average entries per node divided by the node capacity (0-1)
    pub fill_factor: f64,
}

/// Result of a structural integrity check.
#[derive(Debug, Clone)]
pub struct IntegrityReport {
    /// Total nodes visited from the root
    pub nodes_checked: u64,
    /// Total leaf entries reached from the root
    pub entries_checked: u64,
    /// Summary of findings
    pub is_valid: bool,
    /// Detailed error messages
    pub errors: Vec<String>,
}

impl IntegrityReport {
    pub fn new() -> Self {
        Self {
            nodes_checked: 0,
            entries_checked: 0,
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub(crate) fn fail(&mut self, message: String) {
        self.is_valid = false;
        self.errors.push(message);
    }
}

impl Default for IntegrityReport {
    fn default() -> Self {
        Self::new()
    }
}
