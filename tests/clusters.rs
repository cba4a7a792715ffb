//! Property tests for cluster labeling.

use std::collections::{HashMap, HashSet, VecDeque};

use tile_explorer::{label_clusters, ClusterLabels, Tile, TileSet};

/// Deterministic xorshift so failures are reproducible.
struct Rng(u64);

impl Rng {
    fn next(&mut self) -> u64 {
        self.0 ^= self.0 << 13;
        self.0 ^= self.0 >> 7;
        self.0 ^= self.0 << 17;
        self.0
    }
}

/// Random blobs: a few dense rectangles plus scattered single tiles.
fn random_tiles(seed: u64) -> TileSet {
    let mut rng = Rng(seed);
    let mut coords = Vec::new();
    for _ in 0..4 {
        let x0 = (rng.next() % 40) as i64;
        let y0 = (rng.next() % 40) as i64;
        let w = 2 + (rng.next() % 8) as i64;
        let h = 2 + (rng.next() % 8) as i64;
        for x in x0..x0 + w {
            for y in y0..y0 + h {
                // Punch occasional holes
                if rng.next() % 9 != 0 {
                    coords.push((x, y));
                }
            }
        }
    }
    for _ in 0..30 {
        coords.push(((rng.next() % 50) as i64, (rng.next() % 50) as i64));
    }
    TileSet::new(14, coords)
}

fn partition(labels: &ClusterLabels) -> HashSet<Vec<Tile>> {
    labels.groups().into_values().collect()
}

#[test]
fn test_labeled_tiles_are_exactly_the_surrounded_ones() {
    for seed in 1..40u64 {
        let tiles = random_tiles(seed * 7919);
        let labels = label_clusters(&tiles);

        for tile in &tiles {
            let surrounded = tiles.is_surrounded(tile);
            assert_eq!(
                labels.get(tile) != 0,
                surrounded,
                "seed {seed}: tile {tile:?}"
            );
        }
        for (tile, _) in labels.iter() {
            assert!(tiles.contains(tile));
        }
    }
}

#[test]
fn test_components_are_connected_and_separated() {
    for seed in 1..40u64 {
        let tiles = random_tiles(seed * 104_729);
        let labels = label_clusters(&tiles);

        // Adjacent labeled tiles always share a label
        for (tile, label) in labels.iter() {
            for n in tile.neighbours().into_iter().flatten() {
                let other = labels.get(&n);
                assert!(other == 0 || other == *label, "seed {seed}: {tile:?} / {n:?}");
            }
        }

        // Every label is one connected piece through labeled tiles
        for (label, members) in labels.groups() {
            let member_set: HashSet<Tile> = members.iter().copied().collect();
            let mut seen = HashSet::from([members[0]]);
            let mut queue = VecDeque::from([members[0]]);
            while let Some(tile) = queue.pop_front() {
                for n in tile.neighbours().into_iter().flatten() {
                    if member_set.contains(&n) && seen.insert(n) {
                        queue.push_back(n);
                    }
                }
            }
            assert_eq!(seen.len(), members.len(), "seed {seed}: label {label} split");
        }
    }
}

#[test]
fn test_labeling_is_idempotent() {
    for seed in 1..20u64 {
        let tiles = random_tiles(seed * 31);
        let first = label_clusters(&tiles);
        let second = label_clusters(&tiles);

        assert_eq!(partition(&first), partition(&second));
        assert_eq!(first.renumbered(), second.renumbered());
    }
}

#[test]
fn test_partition_ignores_input_order() {
    let tiles = random_tiles(42);
    let mut reversed: Vec<Tile> = tiles.iter().copied().collect();
    reversed.reverse();
    let rebuilt = TileSet::from_tiles(14, reversed);

    assert_eq!(
        partition(&label_clusters(&tiles)),
        partition(&label_clusters(&rebuilt))
    );
}

#[test]
fn test_labels_start_at_one_without_gaps() {
    for seed in 1..20u64 {
        let labels = label_clusters(&random_tiles(seed * 613));
        let values: Vec<u32> = labels.groups().keys().copied().collect();
        let expected: Vec<u32> = (1..=values.len() as u32).collect();
        assert_eq!(values, expected, "seed {seed}");
    }
}

#[test]
fn test_large_region_does_not_overflow_stack() {
    let side = 400i64;
    let tiles = TileSet::new(14, (0..side).flat_map(|x| (0..side).map(move |y| (x, y))));
    let labels = label_clusters(&tiles);

    assert_eq!(labels.cluster_count(), 1);
    assert_eq!(labels.len(), ((side - 2) * (side - 2)) as usize);
}

#[test]
fn test_renumbered_preserves_partition() {
    let tiles = random_tiles(2024);
    let labels = label_clusters(&tiles);
    let renumbered = labels.renumbered();

    assert_eq!(partition(&labels), partition(&renumbered));

    let mut firsts: HashMap<u32, Tile> = HashMap::new();
    for (label, members) in renumbered.groups() {
        firsts.insert(label, members[0]);
    }
    let mut ordered: Vec<(u32, Tile)> = firsts.into_iter().collect();
    ordered.sort();
    assert!(ordered.windows(2).all(|w| w[0].1 < w[1].1));
}
