//! Spatial partitioning data structures
//!
//! Provides the broad phase for collision detection: colliders are only
//! tested against colliders sharing a grid cell.

mod grid;

pub use grid::{GridCell, SpatialGrid, CELL_SIZE, MAX_CELLS};
