//! # Algorithm Toolbox
//!
//! Direct access to the grid analytics without the [`crate::Explorer`] and
//! its store. Use these to run the algorithms over tile sets you already
//! hold in memory.
//!
//! ## Core Algorithms
//!
//! - **Cluster Labeling**: depth-first connected components over fully
//!   surrounded tiles
//! - **Maximum Squares**: rolling-column dynamic program over the dense
//!   rank matrix
//!
//! # Example
//!
//! ```rust
//! use tile_explorer::algorithms::{analyse, TileSet};
//!
//! let tiles = TileSet::new(14, (0..4).flat_map(|x| (0..4).map(move |y| (x, y))));
//! let (labels, squares) = analyse(&tiles);
//! assert_eq!(labels.cluster_count(), 1);
//! assert_eq!(squares.size(), 4);
//! ```

// =============================================================================
// Core Types (re-exported from lib)
// =============================================================================

pub use crate::{ClusterLabels, MaxSquares, Tile, TileGrid, TileSet};

// =============================================================================
// Grid Analytics
// =============================================================================

/// Label the clusters of a tile set.
///
/// Algorithm:
/// 1. Visit tiles in canonical order, starting a component at each unlabeled one
/// 2. Admit a tile only if all four orthogonal neighbours are present
/// 3. Spread the label through the neighbours of admitted tiles
///
/// Labels follow first-encounter order; use
/// [`ClusterLabels::renumbered`] for a numbering independent of traversal.
pub use crate::clusters::label_clusters;

/// Find all anchors of the largest all-present square in a grid.
pub use crate::squares::find_max_squares;

/// Label clusters and find maximum squares over the same tile set.
///
/// Clusters are renumbered `1..=k` by each cluster's smallest tile.
pub fn analyse(tiles: &TileSet) -> (ClusterLabels, MaxSquares) {
    let labels = label_clusters(tiles).renumbered();
    let squares = find_max_squares(&TileGrid::from_tile_set(tiles));
    (labels, squares)
}
