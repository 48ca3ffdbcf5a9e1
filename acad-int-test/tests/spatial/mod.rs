//! Spatial integration test module.
//!
//! These tests drive the R-tree through long randomized workloads and
//! compare every answer against a brute-force scan.

mod concurrency_test;
mod delete_test;
mod invariant_test;
mod nearest_test;
mod search_test;
