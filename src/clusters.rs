//! Cluster detection over visited tiles.
//!
//! A cluster is a 4-connected component of tiles that are fully surrounded:
//! all four orthogonal neighbours have been visited as well. Tiles on the
//! edge of the visited region belong to no cluster.
//!
//! Labeling is depth first, one component at a time, driven by an explicit
//! frontier stack so large regions cannot exhaust the call stack.

use std::collections::{BTreeMap, HashMap};

use crate::{Tile, TileSet};

/// Cluster label per tile. Tiles without an entry have label `0`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterLabels {
    labels: HashMap<Tile, u32>,
}

impl ClusterLabels {
    /// Label of `tile`, `0` when it belongs to no cluster.
    pub fn get(&self, tile: &Tile) -> u32 {
        self.labels.get(tile).copied().unwrap_or(0)
    }

    /// Number of labeled tiles.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tile, &u32)> {
        self.labels.iter()
    }

    /// Members of every cluster, keyed by label, each sorted canonically.
    pub fn groups(&self) -> BTreeMap<u32, Vec<Tile>> {
        let mut groups: BTreeMap<u32, Vec<Tile>> = BTreeMap::new();
        for (tile, label) in &self.labels {
            groups.entry(*label).or_default().push(*tile);
        }
        for members in groups.values_mut() {
            members.sort_unstable();
        }
        groups
    }

    pub fn cluster_count(&self) -> usize {
        self.groups().len()
    }

    /// Size of the largest cluster, `0` when there is none.
    pub fn largest_cluster_size(&self) -> usize {
        self.groups().values().map(Vec::len).max().unwrap_or(0)
    }

    /// Relabel clusters as `1..=k`, ordered by each cluster's smallest tile.
    ///
    /// The partition is unchanged; only the label values move.
    pub fn renumbered(&self) -> ClusterLabels {
        let mut firsts: Vec<(Tile, u32)> = self
            .groups()
            .into_iter()
            .filter_map(|(label, members)| members.first().map(|t| (*t, label)))
            .collect();
        firsts.sort_unstable();

        let mapping: HashMap<u32, u32> = firsts
            .iter()
            .enumerate()
            .map(|(i, (_, label))| (*label, i as u32 + 1))
            .collect();

        ClusterLabels {
            labels: self
                .labels
                .iter()
                .map(|(tile, label)| (*tile, mapping[label]))
                .collect(),
        }
    }
}

impl FromIterator<(Tile, u32)> for ClusterLabels {
    fn from_iter<I: IntoIterator<Item = (Tile, u32)>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().filter(|(_, label)| *label > 0).collect(),
        }
    }
}

/// Label the clusters of a tile set.
///
/// Tiles are visited in canonical order. Each unlabeled tile tries to start
/// a new component with the next unused label. A tile is only admitted when
/// all four of its neighbours are in the set; admitted tiles push their
/// neighbours onto the frontier, which re-check admission on their own.
/// Tiles that fail admission stay unlabeled but never block other paths.
///
/// # Example
/// ```
/// use tile_explorer::{label_clusters, Tile, TileSet};
///
/// let plus = TileSet::new(14, vec![(1, 1), (0, 1), (2, 1), (1, 0), (1, 2)]);
/// let labels = label_clusters(&plus);
/// assert_eq!(labels.get(&Tile::new(1, 1, 14)), 1);
/// assert_eq!(labels.get(&Tile::new(0, 1, 14)), 0);
/// ```
pub fn label_clusters(tiles: &TileSet) -> ClusterLabels {
    let mut labels: HashMap<Tile, u32> = HashMap::new();
    let mut frontier: Vec<Tile> = Vec::new();
    let mut last_label = 0u32;

    for start in tiles {
        if labels.contains_key(start) {
            continue;
        }

        let label = last_label + 1;
        frontier.push(*start);

        let mut admitted = 0usize;
        while let Some(tile) = frontier.pop() {
            if labels.contains_key(&tile) || !tiles.contains(&tile) {
                continue;
            }
            if !tiles.is_surrounded(&tile) {
                continue;
            }

            labels.insert(tile, label);
            admitted += 1;
            frontier.extend(tile.neighbours().into_iter().flatten());
        }

        if admitted > 0 {
            last_label = label;
        }
    }

    ClusterLabels { labels }
}
