//! Bucketed nearest-station index.
//!
//! Every live station is filed under the bucket holding its anchor tile.
//! Lookups only visit the buckets that can hold an answer, which keeps
//! "nearest station to this tile" cheap on large maps.

use std::collections::BTreeMap;

use terminus_station::StationPool;
use terminus_types::{StationId, TileArea, TileIndex};

/// Tiles per bucket side.
const BUCKET_SIZE: u32 = 16;

/// Spatial index of station anchor tiles.
#[derive(Debug, Clone, Default)]
pub struct StationSpatialIndex {
    buckets_x: u32,
    buckets_y: u32,
    buckets: Vec<Vec<(StationId, TileIndex)>>,
    positions: BTreeMap<StationId, TileIndex>,
}

impl StationSpatialIndex {
    /// Create an empty index covering a `size_x * size_y` map.
    pub fn new(size_x: u32, size_y: u32) -> Self {
        let buckets_x = size_x.div_ceil(BUCKET_SIZE).max(1);
        let buckets_y = size_y.div_ceil(BUCKET_SIZE).max(1);
        let total = usize::try_from(buckets_x.saturating_mul(buckets_y)).unwrap_or(0);
        Self {
            buckets_x,
            buckets_y,
            buckets: (0..total).map(|_| Vec::new()).collect(),
            positions: BTreeMap::new(),
        }
    }

    fn flat_index(&self, bx: u32, by: u32) -> Option<usize> {
        if bx < self.buckets_x && by < self.buckets_y {
            usize::try_from(by.saturating_mul(self.buckets_x).saturating_add(bx)).ok()
        } else {
            None
        }
    }

    const fn bucket_of(tile: TileIndex) -> (u32, u32) {
        (tile.x / BUCKET_SIZE, tile.y / BUCKET_SIZE)
    }

    /// File `station` under `tile`, moving it if it was already indexed.
    /// Tiles beyond the indexed map are ignored.
    pub fn insert(&mut self, station: StationId, tile: TileIndex) {
        self.remove(station);
        let (bx, by) = Self::bucket_of(tile);
        let Some(bucket) = self
            .flat_index(bx, by)
            .and_then(|idx| self.buckets.get_mut(idx))
        else {
            return;
        };
        bucket.push((station, tile));
        self.positions.insert(station, tile);
    }

    /// Drop `station` from the index. Returns whether it was present.
    pub fn remove(&mut self, station: StationId) -> bool {
        let Some(tile) = self.positions.remove(&station) else {
            return false;
        };
        let (bx, by) = Self::bucket_of(tile);
        if let Some(bucket) = self
            .flat_index(bx, by)
            .and_then(|idx| self.buckets.get_mut(idx))
        {
            bucket.retain(|(id, _)| *id != station);
        }
        true
    }

    /// Anchor tile `station` is filed under.
    pub fn position(&self, station: StationId) -> Option<TileIndex> {
        self.positions.get(&station).copied()
    }

    /// Replace the whole index with every live station's anchor tile.
    pub fn rebuild(&mut self, pool: &StationPool) {
        self.clear();
        for st in pool.iter() {
            self.insert(st.id, st.xy);
        }
    }

    /// Empty every bucket.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.positions.clear();
    }

    /// Number of indexed stations.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether no station is indexed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Stations whose anchor lies within Chebyshev distance `radius` of
    /// `tile`, ordered by identity.
    pub fn within(&self, tile: TileIndex, radius: u32) -> Vec<StationId> {
        let min = TileIndex::new(tile.x.saturating_sub(radius), tile.y.saturating_sub(radius));
        let max = TileIndex::new(tile.x.saturating_add(radius), tile.y.saturating_add(radius));
        let (min_bx, min_by) = Self::bucket_of(min);
        let (max_bx, max_by) = Self::bucket_of(max);

        let mut result = Vec::new();
        for by in min_by..=max_by.min(self.buckets_y.saturating_sub(1)) {
            for bx in min_bx..=max_bx.min(self.buckets_x.saturating_sub(1)) {
                let Some(bucket) = self.flat_index(bx, by).and_then(|i| self.buckets.get(i))
                else {
                    continue;
                };
                result.extend(
                    bucket
                        .iter()
                        .filter(|(_, at)| at.distance_max(tile) <= radius)
                        .map(|(id, _)| *id),
                );
            }
        }
        result.sort_unstable();
        result
    }

    /// Station whose anchor is closest to `tile` by Manhattan distance.
    /// Ties go to the lowest identity.
    pub fn nearest(&self, tile: TileIndex) -> Option<StationId> {
        let (cx, cy) = Self::bucket_of(tile);
        let max_ring = self.buckets_x.max(self.buckets_y);
        let mut best: Option<(u32, StationId)> = None;

        for ring in 0..=max_ring {
            // Anything in this ring is at least this far away.
            let bound = ring
                .checked_sub(1)
                .map_or(0, |r| r.saturating_mul(BUCKET_SIZE).saturating_add(1));
            if best.is_some_and(|(d, _)| d < bound) {
                break;
            }
            let ring_area = TileArea::from_corners(
                TileIndex::new(cx.saturating_sub(ring), cy.saturating_sub(ring)),
                TileIndex::new(cx.saturating_add(ring), cy.saturating_add(ring)),
            );
            for b in ring_area
                .iter()
                .filter(|b| b.x.abs_diff(cx).max(b.y.abs_diff(cy)) == ring)
            {
                let Some(bucket) = self.flat_index(b.x, b.y).and_then(|i| self.buckets.get(i))
                else {
                    continue;
                };
                for (id, at) in bucket {
                    let candidate = (at.distance_manhattan(tile), *id);
                    if best.is_none_or(|current| candidate < current) {
                        best = Some(candidate);
                    }
                }
            }
        }
        best.map(|(_, id)| id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(raw: u16) -> StationId {
        StationId::new(raw)
    }

    #[test]
    fn insert_and_query_window() {
        let mut index = StationSpatialIndex::new(128, 128);
        index.insert(id(1), TileIndex::new(5, 5));
        index.insert(id(2), TileIndex::new(20, 20));
        index.insert(id(3), TileIndex::new(100, 100));

        assert_eq!(index.within(TileIndex::new(10, 10), 10), vec![id(1), id(2)]);
        assert_eq!(index.within(TileIndex::new(10, 10), 5), vec![id(1)]);
        assert!(index.within(TileIndex::new(60, 60), 3).is_empty());
    }

    #[test]
    fn reinsert_moves_the_station() {
        let mut index = StationSpatialIndex::new(64, 64);
        index.insert(id(1), TileIndex::new(5, 5));
        index.insert(id(1), TileIndex::new(50, 50));
        assert_eq!(index.len(), 1);
        assert!(index.within(TileIndex::new(5, 5), 2).is_empty());
        assert_eq!(index.position(id(1)), Some(TileIndex::new(50, 50)));
    }

    #[test]
    fn remove_and_clear() {
        let mut index = StationSpatialIndex::new(64, 64);
        index.insert(id(1), TileIndex::new(5, 5));
        index.insert(id(2), TileIndex::new(6, 6));
        assert!(index.remove(id(1)));
        assert!(!index.remove(id(1)));
        assert_eq!(index.nearest(TileIndex::new(5, 5)), Some(id(2)));
        index.clear();
        assert!(index.is_empty());
        assert_eq!(index.nearest(TileIndex::new(5, 5)), None);
    }

    #[test]
    fn nearest_prefers_lower_id_on_ties() {
        let mut index = StationSpatialIndex::new(64, 64);
        index.insert(id(7), TileIndex::new(12, 10));
        index.insert(id(3), TileIndex::new(8, 10));
        assert_eq!(index.nearest(TileIndex::new(10, 10)), Some(id(3)));
    }

    #[test]
    fn nearest_crosses_bucket_boundaries() {
        let mut index = StationSpatialIndex::new(128, 128);
        // Same bucket as the probe but far away, versus a neighbour bucket
        // just across the edge.
        index.insert(id(1), TileIndex::new(17, 30));
        index.insert(id(2), TileIndex::new(15, 17));
        assert_eq!(index.nearest(TileIndex::new(17, 17)), Some(id(2)));
    }

    proptest! {
        #[test]
        fn nearest_matches_linear_scan(
            points in prop::collection::vec((1_u32..95, 1_u32..95), 1..30),
            probe in (0_u32..96, 0_u32..96),
        ) {
            let mut index = StationSpatialIndex::new(96, 96);
            let mut all = Vec::new();
            for (i, (x, y)) in points.iter().enumerate() {
                let sid = StationId::new(u16::try_from(i).unwrap());
                index.insert(sid, TileIndex::new(*x, *y));
                all.push((sid, TileIndex::new(*x, *y)));
            }
            let probe = TileIndex::new(probe.0, probe.1);
            let expected = all
                .iter()
                .map(|(sid, t)| (t.distance_manhattan(probe), *sid))
                .min()
                .map(|(_, sid)| sid);
            prop_assert_eq!(index.nearest(probe), expected);
        }
    }
}
