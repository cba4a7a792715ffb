//! Seams to the outside world: where activity tiles come from and where
//! visits, cluster labels and squares are kept.
//!
//! The analytics never touch these traits. The [`crate::Explorer`] drives
//! them, so any backing store only has to provide plain reads and
//! replace-style writes.

use std::collections::{HashMap, HashSet};

use crate::error::Result;
use crate::visits::{distinct_tiles, Activity, TileVisit};
use crate::{ClusterLabels, MaxSquares, Tile, TileSet};

/// Resolves the tiles an activity passed through at a zoom level.
///
/// Implementations report a missing track as
/// [`crate::ExplorerError::SourceNotFound`] and an unreadable one as
/// [`crate::ExplorerError::MalformedInput`]. A missing lookup converts with
/// [`crate::OptionExt::ok_or_source_not_found`].
pub trait TileSource: Sync {
    fn tiles(&self, activity: &Activity, zoom: i32) -> Result<Vec<Tile>>;
}

impl<F> TileSource for F
where
    F: Fn(&Activity, i32) -> Result<Vec<Tile>> + Sync,
{
    fn tiles(&self, activity: &Activity, zoom: i32) -> Result<Vec<Tile>> {
        self(activity, zoom)
    }
}

/// Storage of activities, tile visits and derived tile attributes.
///
/// Every write must be atomic on its own. Any error is treated as a
/// [`crate::ExplorerError::PersistenceFailure`] and aborts the run.
pub trait TileStore {
    /// Activities with a track that have not contributed visits yet, newest first.
    fn unprocessed_activities(&self) -> Result<Vec<Activity>>;

    /// Upsert one visit per distinct tile for `activity` and mark the
    /// activity processed, in a single write.
    ///
    /// Either both happen or neither does, so a run that fails midway can be
    /// resumed without counting an activity twice.
    fn record_activity(&mut self, activity: &Activity, tiles: &[Tile]) -> Result<()>;

    /// All visited tiles at `zoom`.
    fn tiles(&self, zoom: i32) -> Result<TileSet>;

    /// Replace the cluster label of every tile in `tiles` (0 when unlabeled).
    fn store_clusters(&mut self, tiles: &TileSet, labels: &ClusterLabels) -> Result<()>;

    /// Clear all square marks at `zoom`, then mark each anchor with the square size.
    fn store_squares(&mut self, zoom: i32, squares: &MaxSquares) -> Result<()>;
}

/// In-memory tile store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTileStore {
    activities: HashMap<i64, Activity>,
    processed: HashSet<i64>,
    visits: HashMap<Tile, TileVisit>,
    cluster_index: HashMap<Tile, u32>,
    squares: HashMap<Tile, u32>,
}

impl MemoryTileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an activity. Re-adding an id replaces its metadata.
    pub fn add_activity(&mut self, activity: Activity) {
        self.activities.insert(activity.id, activity);
    }

    pub fn is_processed(&self, activity_id: i64) -> bool {
        self.processed.contains(&activity_id)
    }

    pub fn visit(&self, tile: &Tile) -> Option<&TileVisit> {
        self.visits.get(tile)
    }

    /// Stored cluster label, `0` for unknown or unclustered tiles.
    pub fn cluster_index(&self, tile: &Tile) -> u32 {
        self.cluster_index.get(tile).copied().unwrap_or(0)
    }

    /// Stored square size if `tile` anchors a maximum square.
    pub fn square(&self, tile: &Tile) -> Option<u32> {
        self.squares.get(tile).copied()
    }

    /// Number of visited tiles across all zoom levels.
    pub fn tile_count(&self) -> usize {
        self.visits.len()
    }
}

impl TileStore for MemoryTileStore {
    fn unprocessed_activities(&self) -> Result<Vec<Activity>> {
        let mut pending: Vec<Activity> = self
            .activities
            .values()
            .filter(|a| a.track_available && !self.processed.contains(&a.id))
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.started_on.cmp(&a.started_on).then(a.id.cmp(&b.id)));
        Ok(pending)
    }

    fn record_activity(&mut self, activity: &Activity, tiles: &[Tile]) -> Result<()> {
        if !self.processed.insert(activity.id) {
            return Ok(());
        }
        for tile in distinct_tiles(tiles) {
            self.visits
                .entry(tile)
                .and_modify(|v| v.revisit(activity.started_on))
                .or_insert_with(|| TileVisit::first(tile, activity.started_on));
        }
        Ok(())
    }

    fn tiles(&self, zoom: i32) -> Result<TileSet> {
        Ok(TileSet::from_tiles(zoom, self.visits.keys().copied()))
    }

    fn store_clusters(&mut self, tiles: &TileSet, labels: &ClusterLabels) -> Result<()> {
        for tile in tiles {
            self.cluster_index.insert(*tile, labels.get(tile));
        }
        Ok(())
    }

    fn store_squares(&mut self, zoom: i32, squares: &MaxSquares) -> Result<()> {
        self.squares.retain(|tile, _| tile.zoom != zoom);
        for anchor in squares.anchors() {
            self.squares.insert(*anchor, squares.size());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_unprocessed_activities_newest_first() {
        let mut store = MemoryTileStore::new();
        store.add_activity(Activity::new(1, date(2024, 1, 1)));
        store.add_activity(Activity::new(2, date(2024, 3, 1)));
        store.add_activity(Activity {
            track_available: false,
            ..Activity::new(3, date(2024, 4, 1))
        });
        let processed = Activity::new(4, date(2024, 2, 1));
        store.add_activity(processed.clone());
        store.record_activity(&processed, &[]).unwrap();

        let ids: Vec<i64> = store
            .unprocessed_activities()
            .unwrap()
            .iter()
            .map(|a| a.id)
            .collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_record_activity_upserts() {
        let mut store = MemoryTileStore::new();
        let tile = Tile::new(10, 20, 14);
        let first = Activity::new(1, date(2024, 6, 1));
        let second = Activity::new(2, date(2024, 2, 1));

        // Repeated tiles within one activity count once
        store.record_activity(&first, &[tile, tile]).unwrap();
        store.record_activity(&second, &[tile]).unwrap();

        let visit = store.visit(&tile).unwrap();
        assert_eq!(visit.visited_count, 2);
        assert_eq!(visit.visited_first_on, date(2024, 2, 1));
        assert_eq!(visit.visited_last_on, date(2024, 6, 1));
        assert!(store.is_processed(1));
        assert!(store.is_processed(2));
        assert_eq!(store.tile_count(), 1);
    }

    #[test]
    fn test_record_activity_once() {
        let mut store = MemoryTileStore::new();
        let tile = Tile::new(3, 3, 14);
        let activity = Activity::new(5, date(2024, 6, 1));

        store.record_activity(&activity, &[tile]).unwrap();
        store.record_activity(&activity, &[tile, Tile::new(4, 3, 14)]).unwrap();

        assert_eq!(store.visit(&tile).unwrap().visited_count, 1);
        assert_eq!(store.tile_count(), 1);
    }

    #[test]
    fn test_tiles_scoped_to_zoom() {
        let mut store = MemoryTileStore::new();
        let activity = Activity::new(1, date(2024, 6, 1));
        store
            .record_activity(&activity, &[Tile::new(1, 1, 14), Tile::new(8, 8, 17)])
            .unwrap();

        assert_eq!(store.tile_count(), 2);
        assert_eq!(store.tiles(14).unwrap().len(), 1);
        assert_eq!(store.tiles(17).unwrap().len(), 1);
        assert!(store.tiles(10).unwrap().is_empty());
    }

    #[test]
    fn test_store_squares_replaces_previous_marks() {
        let mut store = MemoryTileStore::new();
        let old = Tile::new(0, 0, 14);
        let new = Tile::new(5, 5, 14);
        let other_zoom = Tile::new(0, 0, 17);

        let mut first = MaxSquares::default();
        first.observe(2, old);
        store.store_squares(14, &first).unwrap();
        let mut at_17 = MaxSquares::default();
        at_17.observe(1, other_zoom);
        store.store_squares(17, &at_17).unwrap();

        let mut second = MaxSquares::default();
        second.observe(3, new);
        store.store_squares(14, &second).unwrap();

        assert_eq!(store.square(&old), None);
        assert_eq!(store.square(&new), Some(3));
        assert_eq!(store.square(&other_zoom), Some(1));
    }
}
