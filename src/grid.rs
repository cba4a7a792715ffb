//! Dense rank matrix over a sparse tile set.
//!
//! Rows are the distinct `x` values in ascending order, columns the distinct
//! `y` values. A cell holds the tile present at that `(x, y)` pair, so the
//! square finder can report real tile coordinates rather than matrix indices.
//!
//! Gaps between distinct coordinates collapse: two tiles whose `x` values are
//! not adjacent still land in adjacent rows.

use std::collections::HashMap;

use crate::{Tile, TileSet};

/// Rectangular matrix of optional tiles, stored row-major.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Tile>>,
}

impl TileGrid {
    /// Pivot a tile set into its rank matrix.
    pub fn from_tile_set(tiles: &TileSet) -> Self {
        let mut xs: Vec<i64> = tiles.iter().map(|t| t.x).collect();
        xs.dedup(); // canonical order keeps equal x adjacent
        let mut ys: Vec<i64> = tiles.iter().map(|t| t.y).collect();
        ys.sort_unstable();
        ys.dedup();

        let row_of: HashMap<i64, usize> = xs.iter().enumerate().map(|(i, x)| (*x, i)).collect();
        let col_of: HashMap<i64, usize> = ys.iter().enumerate().map(|(j, y)| (*y, j)).collect();

        let rows = xs.len();
        let cols = ys.len();
        let mut cells = vec![None; rows * cols];
        for tile in tiles {
            cells[row_of[&tile.x] * cols + col_of[&tile.y]] = Some(*tile);
        }

        Self { rows, cols, cells }
    }

    /// Build a grid from explicit rows.
    ///
    /// Rows shorter than the widest one are padded with empty cells.
    pub fn from_rows(rows: Vec<Vec<Option<Tile>>>) -> Self {
        let cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        let n = rows.len();
        let mut cells = Vec::with_capacity(n * cols);
        for mut row in rows {
            row.resize(cols, None);
            cells.extend(row);
        }

        Self {
            rows: if cols == 0 { 0 } else { n },
            cols,
            cells,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the grid has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The tile at row `i`, column `j`, if present.
    pub fn get(&self, i: usize, j: usize) -> Option<&Tile> {
        if i >= self.rows || j >= self.cols {
            return None;
        }
        self.cells[i * self.cols + j].as_ref()
    }
}
