//! Visit accounting per tile.
//!
//! Every processed activity counts as one visit for each distinct tile it
//! passed through, regardless of how many track points fell into that tile.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::Tile;

/// An activity whose track may contribute tile visits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: i64,
    pub started_on: NaiveDate,
    /// Whether a track exists for this activity at all
    pub track_available: bool,
}

impl Activity {
    pub fn new(id: i64, started_on: NaiveDate) -> Self {
        Self {
            id,
            started_on,
            track_available: true,
        }
    }
}

/// Accumulated visits of a single tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileVisit {
    pub tile: Tile,
    pub visited_count: u32,
    pub visited_first_on: NaiveDate,
    pub visited_last_on: NaiveDate,
}

impl TileVisit {
    /// First visit of a tile.
    pub fn first(tile: Tile, on: NaiveDate) -> Self {
        Self {
            tile,
            visited_count: 1,
            visited_first_on: on,
            visited_last_on: on,
        }
    }

    /// Count another visit, widening the visited date range.
    pub fn revisit(&mut self, on: NaiveDate) {
        self.visited_count += 1;
        self.visited_first_on = self.visited_first_on.min(on);
        self.visited_last_on = self.visited_last_on.max(on);
    }
}

/// Distinct tiles of an activity in canonical order.
pub fn distinct_tiles(tiles: &[Tile]) -> Vec<Tile> {
    let mut distinct = tiles.to_vec();
    distinct.sort_unstable();
    distinct.dedup();
    distinct
}
