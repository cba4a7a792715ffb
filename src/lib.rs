//! # Tile Explorer
//!
//! Visited-tile analytics for fitness activities.
//!
//! Every activity passes through a number of map tiles at a fixed zoom level.
//! This library accumulates those visits and derives two structures over the
//! resulting sparse tile set:
//!
//! - **Clusters**: 4-connected components of tiles whose four orthogonal
//!   neighbours have all been visited
//! - **Max squares**: the largest solid square of visited tiles and every
//!   cell anchoring a square of that size
//!
//! The analytics are pure functions. The [`explorer`] module wires them into
//! an ingest → cluster → square run over a [`store::TileStore`].
//!
//! ## Features
//!
//! - **`parallel`** - Resolve activity tiles in parallel with rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use tile_explorer::{find_max_squares, label_clusters, TileGrid, TileSet};
//!
//! // A solid 3x3 block of visited tiles at zoom 14
//! let tiles = TileSet::new(14, (0..3).flat_map(|x| (0..3).map(move |y| (x, y))));
//!
//! let clusters = label_clusters(&tiles);
//! assert_eq!(clusters.len(), 1); // only the centre has all four neighbours
//!
//! let squares = find_max_squares(&TileGrid::from_tile_set(&tiles));
//! assert_eq!(squares.size(), 3);
//! ```

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

// Unified error handling
pub mod error;
pub use error::{ExplorerError, OptionExt, Result};

// Connected-component labeling
pub mod clusters;
pub use clusters::{label_clusters, ClusterLabels};

// Dense rank matrix over a tile set
pub mod grid;
pub use grid::TileGrid;

// Maximum square detection
pub mod squares;
pub use squares::{find_max_squares, MaxSquares};

// Visit accounting (counts, first/last visit dates)
pub mod visits;
pub use visits::{Activity, TileVisit};

// Tile store seam and in-memory implementation
pub mod store;
pub use store::{MemoryTileStore, TileSource, TileStore};

// Ingest → cluster → square orchestration
pub mod explorer;
pub use explorer::{Explorer, ExplorerSummary, SkippedActivity, UpdateReport};

// Algorithm toolbox - standalone access to the grid analytics
pub mod algorithms;

// ============================================================================
// Core Types
// ============================================================================

/// Orthogonal neighbour offsets: right, up, left, down.
const DX: [i64; 4] = [1, 0, -1, 0];
const DY: [i64; 4] = [0, 1, 0, -1];

/// A cell of the fixed-resolution tile grid at a given zoom level.
///
/// # Example
/// ```
/// use tile_explorer::Tile;
/// let tile = Tile::new(8710, 5400, 14);
/// assert_eq!(tile.neighbours()[0], Some(Tile::new(8711, 5400, 14)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tile {
    pub x: i64,
    pub y: i64,
    pub zoom: i32,
}

impl Tile {
    pub fn new(x: i64, y: i64, zoom: i32) -> Self {
        Self { x, y, zoom }
    }

    /// The four orthogonal neighbours at the same zoom level.
    ///
    /// A neighbour beyond the `i64` coordinate range is `None`.
    pub fn neighbours(&self) -> [Option<Tile>; 4] {
        std::array::from_fn(|d| {
            let x = self.x.checked_add(DX[d])?;
            let y = self.y.checked_add(DY[d])?;
            Some(Tile::new(x, y, self.zoom))
        })
    }
}

/// A set of unique tiles scoped to a single zoom level.
///
/// Iteration is in canonical order (ascending by `x`, then `y`);
/// membership lookups are constant time.
#[derive(Debug, Clone, Default)]
pub struct TileSet {
    zoom: i32,
    members: HashSet<Tile>,
    ordered: Vec<Tile>,
}

impl TileSet {
    /// Build a tile set from `(x, y)` pairs at the given zoom.
    ///
    /// Duplicates are collapsed.
    pub fn new<I>(zoom: i32, coords: I) -> Self
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        Self::from_tiles(zoom, coords.into_iter().map(|(x, y)| Tile::new(x, y, zoom)))
    }

    /// Build a tile set from tiles, keeping only those at `zoom`.
    pub fn from_tiles<I>(zoom: i32, tiles: I) -> Self
    where
        I: IntoIterator<Item = Tile>,
    {
        let members: HashSet<Tile> = tiles.into_iter().filter(|t| t.zoom == zoom).collect();
        let mut ordered: Vec<Tile> = members.iter().copied().collect();
        ordered.sort_unstable();

        Self {
            zoom,
            members,
            ordered,
        }
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        self.members.contains(tile)
    }

    /// Whether all four orthogonal neighbours of `tile` are in the set.
    pub fn is_surrounded(&self, tile: &Tile) -> bool {
        tile.neighbours()
            .iter()
            .all(|n| n.is_some_and(|n| self.members.contains(&n)))
    }

    /// Tiles in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

impl<'a> IntoIterator for &'a TileSet {
    type Item = &'a Tile;
    type IntoIter = std::slice::Iter<'a, Tile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Highest zoom level accepted in configuration.
pub const MAX_ZOOM: i32 = 22;

/// Zoom level of the classic explorer tiles.
pub const DEFAULT_ZOOM: i32 = 14;

/// Configuration for an explorer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Zoom levels to maintain. Each is analysed independently.
    /// Default: [14]
    pub zoom_levels: Vec<i32>,

    /// Resolve activity tiles on the rayon pool when the `parallel`
    /// feature is enabled. Ignored otherwise.
    /// Default: true
    pub parallel_ingest: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            zoom_levels: vec![DEFAULT_ZOOM],
            parallel_ingest: true,
        }
    }
}

impl ExplorerConfig {
    /// Parse and validate a JSON configuration.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ExplorerConfig =
            serde_json::from_str(json).map_err(|e| ExplorerError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.zoom_levels.is_empty() {
            return Err(ExplorerError::config("at least one zoom level is required"));
        }
        if let Some(zoom) = self
            .zoom_levels
            .iter()
            .find(|z| !(0..=MAX_ZOOM).contains(*z))
        {
            return Err(ExplorerError::config(format!(
                "zoom level {} outside 0..={}",
                zoom, MAX_ZOOM
            )));
        }
        Ok(())
    }
}
