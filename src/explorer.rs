//! # Explorer
//!
//! Runs one update of the explorer tiles against a [`TileStore`]:
//!
//! 1. **Ingest**: every unprocessed activity adds one visit to each distinct
//!    tile it passed through, at every configured zoom level
//! 2. **Clusters**: tiles are relabeled from scratch and written back
//! 3. **Squares**: the maximum squares are recomputed and written back
//!
//! Activities whose track cannot be resolved are skipped and stay
//! unprocessed, so a later run retries them. Store failures abort the run.
//! Labels and squares are always recomputed in full, which makes repeated
//! runs idempotent.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ExplorerError, Result};
use crate::store::{TileSource, TileStore};
use crate::visits::Activity;
use crate::{
    find_max_squares, label_clusters, ClusterLabels, ExplorerConfig, MaxSquares, Tile, TileGrid,
    TileSet,
};

/// An activity left out of an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedActivity {
    pub activity_id: i64,
    pub reason: String,
}

/// Explorer statistics for one zoom level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerSummary {
    pub zoom: i32,
    pub total_tiles: usize,
    pub cluster_count: usize,
    /// Tiles in the largest cluster
    pub max_cluster_size: usize,
    /// Side length of the maximum square, 0 without any tile
    pub max_square_size: u32,
    /// Number of cells anchoring a maximum square
    pub square_anchor_count: usize,
}

impl ExplorerSummary {
    pub fn new(tiles: &TileSet, labels: &ClusterLabels, squares: &MaxSquares) -> Self {
        Self {
            zoom: tiles.zoom(),
            total_tiles: tiles.len(),
            cluster_count: labels.cluster_count(),
            max_cluster_size: labels.largest_cluster_size(),
            max_square_size: squares.size(),
            square_anchor_count: squares.anchors().len(),
        }
    }
}

/// Outcome of [`Explorer::update`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateReport {
    pub processed_activities: usize,
    pub skipped: Vec<SkippedActivity>,
    /// One entry per configured zoom level, in configuration order
    pub summaries: Vec<ExplorerSummary>,
}

impl UpdateReport {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ExplorerError::internal(format!("report serialization: {}", e)))
    }
}

/// Drives ingest, cluster labeling and square detection over a tile store.
pub struct Explorer<S: TileStore, T: TileSource> {
    store: S,
    source: T,
    config: ExplorerConfig,
}

impl<S: TileStore, T: TileSource> Explorer<S, T> {
    /// Create an explorer with default configuration (zoom 14).
    pub fn new(store: S, source: T) -> Self {
        Self {
            store,
            source,
            config: ExplorerConfig::default(),
        }
    }

    /// Create an explorer with custom configuration.
    pub fn with_config(store: S, source: T, config: ExplorerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            store,
            source,
            config,
        })
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Ingest new activities, then recompute clusters and squares for
    /// every configured zoom level.
    pub fn update(&mut self) -> Result<UpdateReport> {
        let (processed_activities, skipped) = self.process_new_activities()?;

        let mut summaries = Vec::with_capacity(self.config.zoom_levels.len());
        for zoom in self.config.zoom_levels.clone() {
            let tiles = self.store.tiles(zoom)?;
            let labels = self.store_clusters(&tiles)?;
            let squares = self.store_squares(&tiles)?;
            summaries.push(ExplorerSummary::new(&tiles, &labels, &squares));
        }

        info!(
            "[Explorer] Update done: {} activities processed, {} skipped",
            processed_activities,
            skipped.len()
        );

        Ok(UpdateReport {
            processed_activities,
            skipped,
            summaries,
        })
    }

    /// Add visits for every unprocessed activity and mark it processed.
    ///
    /// Each activity is committed on its own, so a store failure leaves the
    /// activities before it recorded and the rest pending for the next run.
    /// Returns the number of processed activities and the skipped ones.
    pub fn process_new_activities(&mut self) -> Result<(usize, Vec<SkippedActivity>)> {
        let pending = self.store.unprocessed_activities()?;
        if pending.is_empty() {
            debug!("[Explorer] No new activities");
            return Ok((0, Vec::new()));
        }

        info!("[Explorer] Processing {} new activities", pending.len());

        let resolved = self.resolve_activities(&pending);

        let mut processed = 0;
        let mut skipped = Vec::new();
        for (activity, result) in pending.iter().zip(resolved) {
            match result {
                Ok(tiles) => {
                    self.store.record_activity(activity, &tiles)?;
                    processed += 1;
                }
                Err(err) if !err.is_fatal() => {
                    warn!("[Explorer] Skipping activity {}: {}", activity.id, err);
                    skipped.push(SkippedActivity {
                        activity_id: activity.id,
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        Ok((processed, skipped))
    }

    /// Relabel all tiles at `zoom` and write the labels back.
    pub fn find_clusters(&mut self, zoom: i32) -> Result<ClusterLabels> {
        let tiles = self.store.tiles(zoom)?;
        self.store_clusters(&tiles)
    }

    /// Recompute the maximum squares at `zoom` and write them back.
    pub fn find_squares(&mut self, zoom: i32) -> Result<MaxSquares> {
        let tiles = self.store.tiles(zoom)?;
        self.store_squares(&tiles)
    }

    fn store_clusters(&mut self, tiles: &TileSet) -> Result<ClusterLabels> {
        let labels = label_clusters(tiles).renumbered();
        self.store.store_clusters(tiles, &labels)?;

        info!(
            "[Explorer] Zoom {}: {} tiles, {} clusters (largest {})",
            tiles.zoom(),
            tiles.len(),
            labels.cluster_count(),
            labels.largest_cluster_size()
        );
        Ok(labels)
    }

    fn store_squares(&mut self, tiles: &TileSet) -> Result<MaxSquares> {
        let grid = TileGrid::from_tile_set(tiles);
        debug!(
            "[Explorer] Zoom {}: square grid {}x{}",
            tiles.zoom(),
            grid.rows(),
            grid.cols()
        );

        let squares = find_max_squares(&grid);
        self.store.store_squares(tiles.zoom(), &squares)?;

        info!(
            "[Explorer] Zoom {}: max square {} ({} anchors)",
            tiles.zoom(),
            squares.size(),
            squares.anchors().len()
        );
        Ok(squares)
    }

    fn resolve_activities(&self, pending: &[Activity]) -> Vec<Result<Vec<Tile>>> {
        let source = &self.source;
        let zooms = &self.config.zoom_levels;

        #[cfg(feature = "parallel")]
        {
            if self.config.parallel_ingest {
                use rayon::prelude::*;
                return pending
                    .par_iter()
                    .map(|activity| resolve_tiles(source, activity, zooms))
                    .collect();
            }
        }

        pending
            .iter()
            .map(|activity| resolve_tiles(source, activity, zooms))
            .collect()
    }
}

/// Tiles of one activity across all zoom levels.
///
/// Fails as a whole if any zoom level fails, so an activity either
/// contributes at every zoom or at none.
fn resolve_tiles<T: TileSource>(source: &T, activity: &Activity, zooms: &[i32]) -> Result<Vec<Tile>> {
    let mut all = Vec::new();
    for &zoom in zooms {
        let tiles = source.tiles(activity, zoom)?;
        if let Some(stray) = tiles.iter().find(|t| t.zoom != zoom) {
            return Err(ExplorerError::MalformedInput {
                activity_id: activity.id,
                message: format!("tile {:?} returned for zoom {}", stray, zoom),
            });
        }
        all.extend(tiles);
    }
    Ok(all)
}
