//! Maximum square detection.
//!
//! Finds the largest square of present cells in a [`TileGrid`] using the
//! classic "maximum size square sub-matrix" dynamic program, reduced to a
//! single rolling column plus one carried diagonal value.
//!
//! The scan runs column by column from the last column to the first, and
//! within each column from the bottom row up. `dp[i]` holds the side of the
//! largest square whose corner is at row `i` of the current column and which
//! extends towards higher rows and columns. The recorded anchor of a square is
//! therefore its lowest-rank cell: smallest `x`, smallest `y`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Tile, TileGrid};

/// Squares of the largest size seen so far.
///
/// Ties at the current size accumulate; a strictly larger square discards
/// every anchor recorded for smaller sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaxSquares {
    size: u32,
    anchors: Vec<Tile>,
}

impl MaxSquares {
    /// Record a square of side `size` anchored at `tile`.
    ///
    /// Sizes below the current maximum (and zero) are ignored.
    pub fn observe(&mut self, size: u32, tile: Tile) {
        if size == 0 || size < self.size {
            return;
        }
        if size > self.size {
            self.size = size;
            self.anchors.clear();
        }
        self.anchors.push(tile);
    }

    /// Side length of the largest square, `0` when none was found.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Anchors of every square of the largest size, in discovery order.
    pub fn anchors(&self) -> &[Tile] {
        &self.anchors
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Size → anchors mapping. Holds at most one entry.
    pub fn to_map(&self) -> BTreeMap<u32, Vec<Tile>> {
        let mut map = BTreeMap::new();
        if !self.anchors.is_empty() {
            map.insert(self.size, self.anchors.clone());
        }
        map
    }
}

/// Find every square of the globally largest size in `grid`.
///
/// # Example
/// ```
/// use tile_explorer::{find_max_squares, Tile, TileGrid, TileSet};
///
/// let tiles = TileSet::new(14, vec![(0, 0), (0, 1), (1, 0), (1, 1), (7, 7)]);
/// let squares = find_max_squares(&TileGrid::from_tile_set(&tiles));
/// assert_eq!(squares.size(), 2);
/// assert_eq!(squares.anchors(), &[Tile::new(0, 0, 14)]);
/// ```
pub fn find_max_squares(grid: &TileGrid) -> MaxSquares {
    let mut result = MaxSquares::default();
    if grid.is_empty() {
        return result;
    }

    let n = grid.rows();
    let m = grid.cols();

    // dp[n] stays 0 as the sentinel below the last row
    let mut dp = vec![0u32; n + 1];
    // Previous column's dp[i + 1], saved before it is overwritten
    let mut diagonal = 0u32;

    for j in (0..m).rev() {
        for i in (0..n).rev() {
            let previous = dp[i];

            match grid.get(i, j) {
                Some(tile) => {
                    dp[i] = 1 + previous.min(diagonal).min(dp[i + 1]);
                    result.observe(dp[i], *tile);
                }
                None => dp[i] = 0,
            }

            diagonal = previous;
        }
    }

    result
}
