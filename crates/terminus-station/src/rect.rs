//! Incremental bounding rectangle of a station's tiles.
//!
//! The rect grows before tiles are placed and shrinks after they are
//! removed. Growth is checked against the station spread; shrinking
//! rescans only the one-tile strip along the edge being pulled in, so the
//! cost of a removal is bounded by the rect's perimeter.
//!
//! A rect whose `left` is 0 is empty. Column 0 is always map border, so
//! no station tile can live there.

use serde::{Deserialize, Serialize};
use terminus_types::{Rect, RectMode, StationId, TileArea, TileIndex};
use terminus_world::TileMap;
use tracing::debug;

use crate::error::StationError;
use crate::settings::StationSettings;

/// Bounding rectangle over the tiles that make up one station.
///
/// When non-empty it always contains every tile of the station. It may
/// briefly contain more, never less.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingRect {
    rect: Rect,
}

impl BoundingRect {
    /// An empty rect.
    pub const fn new() -> Self {
        Self {
            rect: Rect::new(0, 0, 0, 0),
        }
    }

    /// Whether the rect covers nothing.
    pub const fn is_empty(&self) -> bool {
        self.rect.left == 0 || self.rect.left > self.rect.right || self.rect.top > self.rect.bottom
    }

    /// Reset to the empty sentinel.
    pub const fn make_empty(&mut self) {
        self.rect = Rect::new(0, 0, 0, 0);
    }

    /// Whether `(x, y)` lies within `distance` tiles of the rect on both
    /// axes.
    pub const fn pt_in_extended_rect(&self, x: i32, y: i32, distance: i32) -> bool {
        self.rect.left.saturating_sub(distance) <= x
            && x <= self.rect.right.saturating_add(distance)
            && self.rect.top.saturating_sub(distance) <= y
            && y <= self.rect.bottom.saturating_add(distance)
    }

    /// The raw edges.
    pub const fn as_rect(&self) -> Rect {
        self.rect
    }

    /// The covered tiles as an area, or `None` when empty.
    pub fn tile_area(&self) -> Option<TileArea> {
        if self.is_empty() {
            return None;
        }
        let left = u32::try_from(self.rect.left).ok()?;
        let top = u32::try_from(self.rect.top).ok()?;
        let right = u32::try_from(self.rect.right).ok()?;
        let bottom = u32::try_from(self.rect.bottom).ok()?;
        Some(TileArea::from_corners(
            TileIndex::new(left, top),
            TileIndex::new(right, bottom),
        ))
    }

    /// Prepare to add `tile` to the station.
    ///
    /// An empty rect becomes the single tile. A tile already inside needs
    /// nothing. Otherwise the rect is grown to cover it, failing with
    /// [`StationError::SpreadTooLarge`] if that would exceed
    /// `settings.station_spread` and `mode` is not [`RectMode::Force`].
    /// [`RectMode::Test`] never changes the rect.
    pub fn before_add_tile(
        &mut self,
        tile: TileIndex,
        mode: RectMode,
        settings: &StationSettings,
    ) -> Result<(), StationError> {
        self.before_add_tile_within(tile, 0, mode, settings)
    }

    /// Like [`Self::before_add_tile`], but a tile within `distance` tiles of
    /// the rect is accepted without growing it.
    pub fn before_add_tile_within(
        &mut self,
        tile: TileIndex,
        distance: u32,
        mode: RectMode,
        settings: &StationSettings,
    ) -> Result<(), StationError> {
        let x = tile.sx();
        let y = tile.sy();
        let distance = i32::try_from(distance).unwrap_or(i32::MAX);
        if self.is_empty() {
            if mode != RectMode::Test {
                self.rect = Rect::new(x, y, x, y);
            }
        } else if !self.pt_in_extended_rect(x, y, distance) {
            let grown = Rect::new(
                x.min(self.rect.left),
                y.min(self.rect.top),
                x.max(self.rect.right),
                y.max(self.rect.bottom),
            );
            let width = grown.width();
            let height = grown.height();
            let max_spread = i32::try_from(settings.station_spread).unwrap_or(i32::MAX);
            if mode != RectMode::Force && (width > max_spread || height > max_spread) {
                return Err(StationError::SpreadTooLarge {
                    width,
                    height,
                    max_spread: settings.station_spread,
                });
            }
            if mode != RectMode::Test {
                debug!(%tile, width, height, "station rect grown");
                self.rect = grown;
            }
        }
        Ok(())
    }

    /// Prepare to add a `w * h` block anchored at `tile`.
    ///
    /// Only the two opposite corners are checked: the rect is convex, so
    /// covering both corners covers the whole block. The block is
    /// accepted or rejected as a whole; a failed [`RectMode::Try`] leaves
    /// the rect unchanged.
    pub fn before_add_rect(
        &mut self,
        tile: TileIndex,
        w: u32,
        h: u32,
        mode: RectMode,
        settings: &StationSettings,
    ) -> Result<(), StationError> {
        let Some(far) = TileArea::new(tile, w, h).end_tile() else {
            return Ok(());
        };
        // Test both corners against a scratch copy so a failure on the far
        // corner cannot leave the near corner committed.
        let mut scratch = *self;
        let scratch_mode = if mode == RectMode::Test {
            RectMode::Try
        } else {
            mode
        };
        scratch.before_add_tile(tile, scratch_mode, settings)?;
        scratch.before_add_tile(far, scratch_mode, settings)?;
        if mode != RectMode::Test {
            *self = scratch;
        }
        Ok(())
    }

    /// Whether any tile of `station`'s footprint lies in the inclusive
    /// rectangle `left..=right` x `top..=bottom`.
    pub fn scan_for_station_tiles(
        map: &TileMap,
        station: StationId,
        left: i32,
        top: i32,
        right: i32,
        bottom: i32,
    ) -> bool {
        let (Ok(l), Ok(t), Ok(r), Ok(b)) = (
            u32::try_from(left.max(0)),
            u32::try_from(top.max(0)),
            u32::try_from(right),
            u32::try_from(bottom),
        ) else {
            return false;
        };
        if l > r || t > b {
            return false;
        }
        TileArea::from_corners(TileIndex::new(l, t), TileIndex::new(r, b))
            .iter()
            .any(|tile| map.is_footprint_of(tile, station))
    }

    /// Update the rect after `tile` has been removed from `station`.
    ///
    /// While the removed tile sits on an edge whose strip no longer holds
    /// any station tile, that edge moves inward. Returns `true` if the
    /// rect is now empty.
    ///
    /// # Panics
    ///
    /// Panics if `tile` is outside the rect, which means the rect no longer
    /// matches the map.
    pub fn after_remove_tile(&mut self, map: &TileMap, station: StationId, tile: TileIndex) -> bool {
        assert!(
            self.pt_in_extended_rect(tile.sx(), tile.sy(), 0),
            "removed tile {tile} is outside the rect of station {station}"
        );
        self.shrink_from(map, station, tile)
    }

    /// Update the rect after the block `area` has been removed.
    ///
    /// # Panics
    ///
    /// Panics if either corner of `area` is outside the rect.
    pub fn after_remove_rect(&mut self, map: &TileMap, station: StationId, area: TileArea) -> bool {
        let Some(far) = area.end_tile() else {
            return self.is_empty();
        };
        assert!(
            self.pt_in_extended_rect(area.tile.sx(), area.tile.sy(), 0)
                && self.pt_in_extended_rect(far.sx(), far.sy(), 0),
            "removed block at {} is outside the rect of station {station}",
            area.tile
        );
        let empty = self.shrink_from(map, station, area.tile);
        if area.w == 1 && area.h == 1 {
            return empty;
        }
        empty || self.shrink_from(map, station, far)
    }

    fn shrink_from(&mut self, map: &TileMap, station: StationId, tile: TileIndex) -> bool {
        let mut x = tile.sx();
        let mut y = tile.sy();
        loop {
            let left_edge = x == self.rect.left;
            let right_edge = x == self.rect.right;
            let top_edge = y == self.rect.top;
            let bottom_edge = y == self.rect.bottom;

            let reduce_x = (left_edge || right_edge)
                && !Self::scan_for_station_tiles(map, station, x, self.rect.top, x, self.rect.bottom);
            let reduce_y = (top_edge || bottom_edge)
                && !Self::scan_for_station_tiles(map, station, self.rect.left, y, self.rect.right, y);
            if !(reduce_x || reduce_y) {
                break;
            }

            if reduce_x {
                if left_edge {
                    x = x.saturating_add(1);
                    self.rect.left = x;
                } else {
                    x = x.saturating_sub(1);
                    self.rect.right = x;
                }
            }
            if reduce_y {
                if top_edge {
                    y = y.saturating_add(1);
                    self.rect.top = y;
                } else {
                    y = y.saturating_sub(1);
                    self.rect.bottom = y;
                }
            }

            if self.rect.left > self.rect.right || self.rect.top > self.rect.bottom {
                self.make_empty();
                debug!(%station, "station rect emptied");
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use terminus_types::StationType;
    use terminus_world::World;

    const ST: StationId = StationId::new(1);

    fn settings(spread: u32) -> StationSettings {
        StationSettings {
            station_spread: spread,
            ..StationSettings::default()
        }
    }

    fn place(world: &mut World, rect: &mut BoundingRect, tile: TileIndex) {
        rect.before_add_tile(tile, RectMode::Force, &StationSettings::default())
            .unwrap();
        world
            .place_station_tile(tile, ST, StationType::Truck, None)
            .unwrap();
    }

    #[test]
    fn empty_rect_becomes_a_point() {
        let mut r = BoundingRect::new();
        assert!(r.is_empty());
        r.before_add_tile(TileIndex::new(5, 6), RectMode::Try, &settings(4))
            .unwrap();
        assert_eq!(r.as_rect(), Rect::new(5, 6, 5, 6));
        assert!(!r.is_empty());
    }

    #[test]
    fn test_mode_never_commits() {
        let mut r = BoundingRect::new();
        r.before_add_tile(TileIndex::new(5, 6), RectMode::Test, &settings(4))
            .unwrap();
        assert!(r.is_empty());
        r.before_add_tile(TileIndex::new(5, 6), RectMode::Try, &settings(4))
            .unwrap();
        r.before_add_tile(TileIndex::new(7, 6), RectMode::Test, &settings(4))
            .unwrap();
        assert_eq!(r.as_rect(), Rect::new(5, 6, 5, 6));
    }

    #[test]
    fn spread_limit_rejects_try_and_yields_to_force() {
        let mut r = BoundingRect::new();
        r.before_add_tile(TileIndex::new(2, 2), RectMode::Try, &settings(3))
            .unwrap();
        r.before_add_tile(TileIndex::new(4, 2), RectMode::Try, &settings(3))
            .unwrap();
        let err = r.before_add_tile(TileIndex::new(5, 2), RectMode::Try, &settings(3));
        assert!(matches!(
            err,
            Err(StationError::SpreadTooLarge {
                width: 4,
                height: 1,
                max_spread: 3
            })
        ));
        assert_eq!(r.as_rect(), Rect::new(2, 2, 4, 2));

        r.before_add_tile(TileIndex::new(5, 2), RectMode::Force, &settings(3))
            .unwrap();
        assert_eq!(r.as_rect(), Rect::new(2, 2, 5, 2));
    }

    #[test]
    fn tolerance_accepts_nearby_tiles_without_growing() {
        let mut r = BoundingRect::new();
        r.before_add_tile(TileIndex::new(5, 5), RectMode::Try, &settings(4))
            .unwrap();
        r.before_add_tile_within(TileIndex::new(6, 4), 1, RectMode::Try, &settings(4))
            .unwrap();
        assert_eq!(r.as_rect(), Rect::new(5, 5, 5, 5));

        // Outside the padded rect the tile still grows it.
        r.before_add_tile_within(TileIndex::new(7, 5), 1, RectMode::Try, &settings(4))
            .unwrap();
        assert_eq!(r.as_rect(), Rect::new(5, 5, 7, 5));
    }

    #[test]
    fn rect_block_is_all_or_nothing() {
        let mut r = BoundingRect::new();
        r.before_add_tile(TileIndex::new(5, 5), RectMode::Try, &settings(4))
            .unwrap();
        // Near corner fits, far corner does not.
        let res = r.before_add_rect(TileIndex::new(4, 4), 5, 1, RectMode::Try, &settings(4));
        assert!(res.is_err());
        assert_eq!(r.as_rect(), Rect::new(5, 5, 5, 5));

        r.before_add_rect(TileIndex::new(3, 3), 4, 2, RectMode::Try, &settings(4))
            .unwrap();
        assert_eq!(r.as_rect(), Rect::new(3, 3, 6, 5));
    }

    #[test]
    fn shrink_by_column_then_row() {
        let mut world = World::new(16, 16).unwrap();
        let mut r = BoundingRect::new();
        for tile in TileArea::new(TileIndex::new(1, 1), 4, 4) {
            place(&mut world, &mut r, tile);
        }
        assert_eq!(r.as_rect(), Rect::new(1, 1, 4, 4));

        for y in 1..=4 {
            let tile = TileIndex::new(4, y);
            world.remove_station_tile(tile).unwrap();
            assert!(!r.after_remove_tile(world.map(), ST, tile));
        }
        assert_eq!(r.as_rect().right, 3);

        for x in 1..=3 {
            let tile = TileIndex::new(x, 1);
            world.remove_station_tile(tile).unwrap();
            assert!(!r.after_remove_tile(world.map(), ST, tile));
        }
        assert_eq!(r.as_rect(), Rect::new(1, 2, 3, 4));
    }

    #[test]
    fn shrink_jumps_over_empty_strips() {
        let mut world = World::new(16, 16).unwrap();
        let mut r = BoundingRect::new();
        place(&mut world, &mut r, TileIndex::new(2, 2));
        place(&mut world, &mut r, TileIndex::new(6, 2));
        world.remove_station_tile(TileIndex::new(6, 2)).unwrap();
        assert!(!r.after_remove_tile(world.map(), ST, TileIndex::new(6, 2)));
        assert_eq!(r.as_rect(), Rect::new(2, 2, 2, 2));
    }

    #[test]
    fn round_trip_returns_to_empty() {
        let mut world = World::new(16, 16).unwrap();
        let mut r = BoundingRect::new();
        place(&mut world, &mut r, TileIndex::new(7, 7));
        world.remove_station_tile(TileIndex::new(7, 7)).unwrap();
        assert!(r.after_remove_tile(world.map(), ST, TileIndex::new(7, 7)));
        assert!(r.is_empty());
        assert_eq!(r.as_rect(), Rect::default());
    }

    #[test]
    fn tunnel_heads_keep_the_edge() {
        let mut world = World::new(16, 16).unwrap();
        let mut r = BoundingRect::new();
        place(&mut world, &mut r, TileIndex::new(3, 3));
        place(&mut world, &mut r, TileIndex::new(5, 3));
        world
            .place_tunnel_bridge(TileIndex::new(5, 4), Some(ST))
            .unwrap();
        r.before_add_tile(TileIndex::new(5, 4), RectMode::Force, &settings(12))
            .unwrap();
        world.remove_station_tile(TileIndex::new(5, 3)).unwrap();
        assert!(!r.after_remove_tile(world.map(), ST, TileIndex::new(5, 3)));
        assert_eq!(r.as_rect().right, 5);
    }

    #[test]
    fn remove_block_empties_rect() {
        let mut world = World::new(16, 16).unwrap();
        let mut r = BoundingRect::new();
        let area = TileArea::new(TileIndex::new(4, 4), 3, 2);
        r.before_add_rect(area.tile, area.w, area.h, RectMode::Try, &settings(12))
            .unwrap();
        for tile in area {
            world
                .place_station_tile(tile, ST, StationType::Bus, None)
                .unwrap();
        }
        for tile in area {
            world.remove_station_tile(tile).unwrap();
        }
        assert!(r.after_remove_rect(world.map(), ST, area));
        assert!(r.is_empty());
    }

    #[test]
    #[should_panic(expected = "outside the rect")]
    fn removing_foreign_tile_is_fatal() {
        let world = World::new(16, 16).unwrap();
        let mut r = BoundingRect::new();
        r.before_add_tile(TileIndex::new(3, 3), RectMode::Try, &settings(12))
            .unwrap();
        r.after_remove_tile(world.map(), ST, TileIndex::new(9, 9));
    }

    #[derive(Debug, Clone)]
    enum Edit {
        Add(u32, u32),
        Remove(usize),
    }

    fn arb_edit() -> impl Strategy<Value = Edit> {
        prop_oneof![
            (1_u32..19, 1_u32..19).prop_map(|(x, y)| Edit::Add(x, y)),
            (0_usize..64).prop_map(Edit::Remove),
        ]
    }

    proptest! {
        #[test]
        fn forced_edits_never_under_approximate(edits in prop::collection::vec(arb_edit(), 1..60)) {
            let mut world = World::new(20, 20).unwrap();
            let mut r = BoundingRect::new();
            let mut owned: Vec<TileIndex> = Vec::new();
            for edit in edits {
                match edit {
                    Edit::Add(x, y) => {
                        let tile = TileIndex::new(x, y);
                        if owned.contains(&tile) {
                            continue;
                        }
                        r.before_add_tile(tile, RectMode::Force, &settings(4)).unwrap();
                        world.place_station_tile(tile, ST, StationType::Rail, None).unwrap();
                        owned.push(tile);
                    }
                    Edit::Remove(i) => {
                        if owned.is_empty() {
                            continue;
                        }
                        let tile = owned.swap_remove(i % owned.len());
                        world.remove_station_tile(tile).unwrap();
                        let empty = r.after_remove_tile(world.map(), ST, tile);
                        prop_assert_eq!(empty, owned.is_empty());
                    }
                }
                prop_assert_eq!(r.is_empty(), owned.is_empty());
                for tile in &owned {
                    prop_assert!(r.pt_in_extended_rect(tile.sx(), tile.sy(), 0));
                }
            }
        }
    }
}
