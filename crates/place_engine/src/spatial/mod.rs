//! Spatial partitioning data structures
//!
//! Provides the uniform spatial hash used as the broad phase for entity and
//! tile collision queries.

pub mod hash_grid;

pub use hash_grid::{CellKey, CellSet, SpatialHash};
