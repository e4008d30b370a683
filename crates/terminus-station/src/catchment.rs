//! Catchment: the tiles a station can serve.
//!
//! Each station tile reaches a square of side `2r + 1` around itself, with
//! `r` depending on the tile's functional type. The union of those squares
//! is stored as a [`CatchmentSet`] bitmap and then walked once to find the
//! houses and industries the station touches.
//!
//! A station bound to a neutral industry skips all of that: its catchment
//! is exactly the industry's own tiles.

use serde::{Deserialize, Serialize};
use terminus_types::{AirportType, StationId, StationType, TileArea, TileIndex};
use terminus_world::{Tile, World};
use tracing::{debug, warn};

use crate::error::StationError;
use crate::nearby::NearbyIndex;
use crate::pool::StationPool;
use crate::settings::StationSettings;

/// No catchment.
pub const CA_NONE: u32 = 0;
/// Bus stop radius.
pub const CA_BUS: u32 = 3;
/// Truck stop radius.
pub const CA_TRUCK: u32 = 3;
/// Rail platform radius.
pub const CA_TRAIN: u32 = 4;
/// Dock radius.
pub const CA_DOCK: u32 = 5;
/// Flat radius used for every facility when per-facility radii are off.
pub const CA_UNMODIFIED: u32 = 4;
/// Largest radius any facility can have before the global bonus.
pub const MAX_CATCHMENT: u32 = 10;

// ---------------------------------------------------------------------------
// CatchmentSet
// ---------------------------------------------------------------------------

/// One bit per tile over a bounded area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatchmentSet {
    area: TileArea,
    bits: Vec<u64>,
}

impl Default for CatchmentSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl CatchmentSet {
    const BITS_PER_WORD: usize = 64;

    /// A set over no area.
    pub const fn empty() -> Self {
        Self {
            area: TileArea::empty(),
            bits: Vec::new(),
        }
    }

    /// Clear the set and size it to cover `area`.
    pub fn initialize(&mut self, area: TileArea) {
        self.area = area;
        self.bits.clear();
        self.bits
            .resize(area.tile_count().div_ceil(Self::BITS_PER_WORD), 0);
    }

    /// Drop the area and every bit.
    pub fn reset(&mut self) {
        *self = Self::empty();
    }

    /// Area the set can hold tiles from.
    pub const fn area(&self) -> TileArea {
        self.area
    }

    fn slot(&self, tile: TileIndex) -> Option<(usize, u32)> {
        if !self.area.contains(tile) {
            return None;
        }
        let dx = u64::from(tile.x.saturating_sub(self.area.tile.x));
        let dy = u64::from(tile.y.saturating_sub(self.area.tile.y));
        let flat = usize::try_from(dy.saturating_mul(u64::from(self.area.w)).saturating_add(dx)).ok()?;
        let bit = u32::try_from(flat % Self::BITS_PER_WORD).ok()?;
        Some((flat / Self::BITS_PER_WORD, bit))
    }

    /// Mark `tile`. Tiles outside the area are ignored; returns whether the
    /// tile was inside.
    pub fn set_tile(&mut self, tile: TileIndex) -> bool {
        let Some((word, bit)) = self.slot(tile) else {
            return false;
        };
        let mask = 1_u64.checked_shl(bit).unwrap_or(0);
        self.bits.get_mut(word).is_some_and(|w| {
            *w |= mask;
            true
        })
    }

    /// Whether `tile` is marked.
    pub fn has_tile(&self, tile: TileIndex) -> bool {
        self.slot(tile).is_some_and(|(word, bit)| {
            let mask = 1_u64.checked_shl(bit).unwrap_or(0);
            self.bits.get(word).is_some_and(|w| w & mask != 0)
        })
    }

    /// Number of marked tiles.
    pub fn len(&self) -> usize {
        self.bits
            .iter()
            .map(|w| usize::try_from(w.count_ones()).unwrap_or(0))
            .fold(0_usize, usize::saturating_add)
    }

    /// Whether no tile is marked.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|w| *w == 0)
    }

    /// Iterate over marked tiles in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = TileIndex> + '_ {
        self.area.iter().filter(|t| self.has_tile(*t))
    }
}

// ---------------------------------------------------------------------------
// Radii
// ---------------------------------------------------------------------------

/// Catchment radius of a single station tile of type `kind`.
///
/// `airport` is the layout of the owning station's airport and is only
/// consulted for airport tiles.
pub fn tile_catchment_radius(
    kind: StationType,
    airport: Option<AirportType>,
    settings: &StationSettings,
) -> u32 {
    let inc = settings.catchment_increase;
    let base = if settings.modified_catchment {
        match kind {
            StationType::Rail => CA_TRAIN,
            StationType::OilRig => CA_UNMODIFIED,
            StationType::Airport => {
                airport.map_or(CA_UNMODIFIED, |a| a.spec().catchment.min(MAX_CATCHMENT))
            }
            StationType::Truck => CA_TRUCK,
            StationType::Bus => CA_BUS,
            StationType::Dock => CA_DOCK,
            StationType::Buoy | StationType::Waypoint => return CA_NONE,
        }
    } else {
        match kind {
            StationType::Buoy | StationType::Waypoint => return CA_NONE,
            _ => CA_UNMODIFIED,
        }
    };
    base.saturating_add(inc)
}

// ---------------------------------------------------------------------------
// Recompute
// ---------------------------------------------------------------------------

/// Recompute the catchment of one station and its nearby links.
///
/// Clears the station's `industries_near`. Unless
/// `skip_nearby_list_clear` is set, the station is first removed from every
/// town's and industry's reverse set. The station tile count is refreshed
/// on the way.
pub fn recompute_catchment(
    pool: &mut StationPool,
    id: StationId,
    world: &World,
    nearby: &mut NearbyIndex,
    settings: &StationSettings,
    skip_nearby_list_clear: bool,
) -> Result<(), StationError> {
    let st = pool.get_mut(id).ok_or(StationError::StationNotFound(id))?;
    st.industries_near_mut().clear();
    if !skip_nearby_list_clear {
        nearby.remove_from_all_nearby_lists(id);
    }

    let Some(rect_area) = st.rect.tile_area() else {
        st.catchment_mut().reset();
        st.set_station_tiles(0);
        return Ok(());
    };
    let map = world.map();
    let count_own = || -> u32 {
        let n = rect_area.iter().filter(|t| map.is_station_tile_of(*t, id)).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    };

    // Exclusive binding to a neutral industry.
    if let Some(industry_id) = st.industry.filter(|_| !settings.serve_neutral_industries) {
        if let Some(industry) = world.industry(industry_id) {
            let mut set = CatchmentSet::empty();
            set.initialize(industry.location);
            for tile in industry.location.iter() {
                if map.industry_at(tile) == Some(industry_id) {
                    set.set_tile(tile);
                }
            }
            *st.catchment_mut() = set;
            st.set_station_tiles(count_own());

            let previous: Vec<StationId> = nearby.stations_near_industry(industry_id).collect();
            for other in previous {
                if let Some(other_st) = pool.get_mut(other) {
                    other_st.industries_near_mut().remove(&industry_id);
                }
            }
            nearby.set_sole_station(industry_id, id);
            if let Some(st) = pool.get_mut(id) {
                st.industries_near_mut().insert(industry_id);
            }
            debug!(station = %id, industry = %industry_id, "neutral station catchment recomputed");
            return Ok(());
        }
        warn!(station = %id, industry = %industry_id, "station bound to unknown industry");
    }

    let airport = st.airport.as_ref().map(|a| a.kind);
    let mut reach: Vec<(TileIndex, u32)> = Vec::new();
    let mut station_tiles = 0_u32;
    for tile in rect_area.iter() {
        let Tile::Station { station, kind, .. } = map.get(tile) else {
            continue;
        };
        if station != id {
            continue;
        }
        station_tiles = station_tiles.saturating_add(1);
        let r = tile_catchment_radius(kind, airport, settings);
        if r != CA_NONE {
            reach.push((tile, r));
        }
    }

    let widest = reach
        .iter()
        .map(|(_, r)| *r)
        .fold(st.catchment_radius(settings), u32::max);
    let mut set = CatchmentSet::empty();
    set.initialize(
        st.catchment_rect_using_radius(widest, map)
            .unwrap_or(rect_area),
    );
    for (tile, r) in reach {
        for t in TileArea::new(tile, 1, 1).expand(r, map.max_x(), map.max_y()) {
            set.set_tile(t);
        }
    }

    for tile in set.iter() {
        match map.get(tile) {
            Tile::House { town } => nearby.link_town(town, id),
            Tile::Industry { industry } => {
                let Some(ind) = world.industry(industry) else {
                    warn!(%tile, %industry, "industry tile without a registered industry");
                    continue;
                };
                if !settings.serve_neutral_industries && ind.neutral_station.is_some() {
                    continue;
                }
                nearby.link_industry(industry, id);
                NearbyIndex::add_industry_to_deliver(st, ind);
            }
            _ => {}
        }
    }

    debug!(
        station = %id,
        station_tiles,
        catchment_tiles = set.len(),
        industries = st.industries_near().len(),
        "catchment recomputed"
    );
    *st.catchment_mut() = set;
    st.set_station_tiles(station_tiles);
    Ok(())
}

/// Rebuild every station's catchment and every reverse set from scratch.
///
/// This is the authoritative repair pass after bulk world edits.
pub fn recompute_catchment_for_all(
    pool: &mut StationPool,
    world: &World,
    nearby: &mut NearbyIndex,
    settings: &StationSettings,
) -> Result<(), StationError> {
    nearby.clear();
    for id in pool.ids() {
        recompute_catchment(pool, id, world, nearby, settings, true)?;
    }
    debug!(stations = pool.len(), "catchment recomputed for all stations");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use terminus_types::{CargoId, IndustryId, RectMode, TownId};
    use terminus_world::{Industry, Town};

    use crate::station::Station;

    // -- helpers ---------------------------------------------------------

    struct Fixture {
        world: World,
        pool: StationPool,
        nearby: NearbyIndex,
        settings: StationSettings,
    }

    impl Fixture {
        fn new() -> Self {
            let mut world = World::new(32, 32).unwrap();
            world
                .add_town(Town::new(TownId::new(0), "Ashby", TileIndex::new(20, 20)))
                .unwrap();
            Self {
                world,
                pool: StationPool::new(),
                nearby: NearbyIndex::new(),
                settings: StationSettings::default(),
            }
        }

        fn station(&mut self) -> StationId {
            self.pool
                .allocate(|id| Station::new(id, "Test", TileIndex::new(1, 1)))
                .unwrap()
        }

        fn build(&mut self, id: StationId, tile: TileIndex, kind: StationType) {
            let st = self.pool.get_mut(id).unwrap();
            st.rect
                .before_add_tile(tile, RectMode::Force, &self.settings)
                .unwrap();
            match kind {
                StationType::Bus => st.bus_stops.push(tile),
                StationType::Truck => st.truck_stops.push(tile),
                StationType::Rail => st.train_station = Some(TileArea::new(tile, 1, 1)),
                StationType::Dock => st.dock = Some(tile),
                _ => {}
            }
            self.world.place_station_tile(tile, id, kind, None).unwrap();
        }

        fn recompute(&mut self, id: StationId) {
            recompute_catchment(
                &mut self.pool,
                id,
                &self.world,
                &mut self.nearby,
                &self.settings,
                false,
            )
            .unwrap();
        }

        fn get(&self, id: StationId) -> &Station {
            self.pool.get(id).unwrap()
        }
    }

    fn factory(id: u16, tile: TileIndex, accepts: bool) -> Industry {
        let cargo = if accepts { vec![CargoId::new(1)] } else { Vec::new() };
        Industry::new(IndustryId::new(id), "Works", TileArea::new(tile, 2, 2), cargo)
    }

    // -- CatchmentSet ----------------------------------------------------

    #[test]
    fn set_ignores_tiles_outside_area() {
        let mut set = CatchmentSet::empty();
        set.initialize(TileArea::new(TileIndex::new(10, 10), 3, 3));
        assert!(set.set_tile(TileIndex::new(12, 12)));
        assert!(!set.set_tile(TileIndex::new(13, 12)));
        assert!(set.has_tile(TileIndex::new(12, 12)));
        assert!(!set.has_tile(TileIndex::new(13, 12)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![TileIndex::new(12, 12)]);
        set.reset();
        assert!(set.is_empty());
        assert!(set.area().is_empty());
    }

    #[test]
    fn set_spans_many_words() {
        let mut set = CatchmentSet::empty();
        let area = TileArea::new(TileIndex::new(0, 0), 21, 21);
        set.initialize(area);
        for tile in area {
            set.set_tile(tile);
        }
        assert_eq!(set.len(), 441);
        assert!(set.has_tile(TileIndex::new(20, 20)));
    }

    // -- radii -----------------------------------------------------------

    #[test]
    fn tile_radius_table() {
        let modified = StationSettings::default();
        assert_eq!(tile_catchment_radius(StationType::Rail, None, &modified), CA_TRAIN);
        assert_eq!(tile_catchment_radius(StationType::Dock, None, &modified), CA_DOCK);
        assert_eq!(tile_catchment_radius(StationType::Waypoint, None, &modified), CA_NONE);
        assert_eq!(
            tile_catchment_radius(StationType::Airport, Some(AirportType::International), &modified),
            5
        );
        assert_eq!(tile_catchment_radius(StationType::OilRig, None, &modified), CA_UNMODIFIED);

        let flat = StationSettings {
            modified_catchment: false,
            catchment_increase: 1,
            ..StationSettings::default()
        };
        assert_eq!(tile_catchment_radius(StationType::Bus, None, &flat), CA_UNMODIFIED + 1);
        assert_eq!(tile_catchment_radius(StationType::Buoy, None, &flat), CA_NONE);
    }

    #[test]
    fn airport_radii_stay_under_the_cap() {
        let settings = StationSettings::default();
        for layout in [
            AirportType::Small,
            AirportType::Large,
            AirportType::Heliport,
            AirportType::Metropolitan,
            AirportType::International,
            AirportType::Commuter,
            AirportType::Helidepot,
            AirportType::Intercontinental,
            AirportType::Helistation,
            AirportType::OilRig,
        ] {
            let r = tile_catchment_radius(StationType::Airport, Some(layout), &settings);
            assert!(r <= MAX_CATCHMENT, "{layout:?} reaches {r}");
        }
    }

    // -- recompute -------------------------------------------------------

    #[test]
    fn empty_rect_gives_empty_catchment() {
        let mut fx = Fixture::new();
        let id = fx.station();
        fx.recompute(id);
        assert!(fx.get(id).catchment().is_empty());
        assert_eq!(fx.get(id).station_tiles(), 0);
    }

    #[test]
    fn bus_stop_reaches_three_tiles() {
        let mut fx = Fixture::new();
        let id = fx.station();
        fx.build(id, TileIndex::new(10, 10), StationType::Bus);
        fx.recompute(id);
        let st = fx.get(id);
        assert_eq!(st.catchment().len(), 49);
        assert_eq!(
            Some(st.catchment().area()),
            st.catchment_rect(&fx.settings, fx.world.map())
        );
        assert!(st.tile_is_in_catchment(TileIndex::new(7, 13)));
        assert!(!st.tile_is_in_catchment(TileIndex::new(6, 10)));
        assert_eq!(st.station_tiles(), 1);
    }

    #[test]
    fn waypoint_has_no_catchment() {
        let mut fx = Fixture::new();
        let id = fx.station();
        fx.build(id, TileIndex::new(10, 10), StationType::Waypoint);
        fx.recompute(id);
        assert!(fx.get(id).catchment().is_empty());
        assert_eq!(fx.get(id).station_tiles(), 1);
    }

    #[test]
    fn houses_and_accepting_industries_are_linked() {
        let mut fx = Fixture::new();
        fx.world
            .build_house(TileIndex::new(12, 10), TownId::new(0))
            .unwrap();
        fx.world
            .add_industry(factory(1, TileIndex::new(8, 8), true))
            .unwrap();
        fx.world
            .add_industry(factory(2, TileIndex::new(12, 12), false))
            .unwrap();
        fx.world
            .add_industry(factory(3, TileIndex::new(25, 25), true))
            .unwrap();
        let id = fx.station();
        fx.build(id, TileIndex::new(10, 10), StationType::Truck);
        fx.recompute(id);

        let st = fx.get(id);
        assert_eq!(
            st.industries_near().iter().copied().collect::<Vec<_>>(),
            vec![IndustryId::new(1)]
        );
        let near_two: Vec<StationId> = fx.nearby.stations_near_industry(IndustryId::new(2)).collect();
        assert_eq!(near_two, vec![id]);
        assert_eq!(fx.nearby.stations_near_industry(IndustryId::new(3)).count(), 0);
        assert_eq!(fx.nearby.stations_near_town(TownId::new(0)).collect::<Vec<_>>(), vec![id]);
    }

    #[test]
    fn recompute_is_idempotent() {
        let mut fx = Fixture::new();
        fx.world
            .add_industry(factory(1, TileIndex::new(8, 8), true))
            .unwrap();
        let id = fx.station();
        fx.build(id, TileIndex::new(10, 10), StationType::Rail);
        fx.build(id, TileIndex::new(11, 10), StationType::Rail);
        fx.recompute(id);
        let first = fx.get(id).catchment().clone();
        let first_near = fx.get(id).industries_near().clone();
        fx.recompute(id);
        assert_eq!(fx.get(id).catchment(), &first);
        assert_eq!(fx.get(id).industries_near(), &first_near);
    }

    #[test]
    fn neutral_station_catchment_is_the_industry_footprint() {
        let mut fx = Fixture::new();
        let rig_area = TileArea::new(TileIndex::new(14, 14), 3, 3);
        for tile in rig_area {
            fx.world.flood(tile).unwrap();
        }
        // A generic station nearby sees the industry first.
        let other = fx.station();
        fx.build(other, TileIndex::new(12, 12), StationType::Bus);

        let rig = fx.station();
        fx.build(rig, TileIndex::new(15, 15), StationType::OilRig);
        fx.world
            .add_industry(Industry::new(
                IndustryId::new(9),
                "Oil Rig",
                rig_area,
                vec![CargoId::new(4)],
            ))
            .unwrap();
        fx.recompute(other);
        assert!(fx.get(other).industries_near().contains(&IndustryId::new(9)));

        fx.world
            .set_neutral_station(IndustryId::new(9), Some(rig))
            .unwrap();
        fx.pool.get_mut(rig).unwrap().industry = Some(IndustryId::new(9));
        fx.settings.catchment_increase = 5;
        fx.recompute(rig);

        let st = fx.get(rig);
        assert_eq!(
            st.industries_near().iter().copied().collect::<Vec<_>>(),
            vec![IndustryId::new(9)]
        );
        assert_eq!(st.catchment().area(), rig_area);
        assert_eq!(st.catchment().len(), 8);
        assert!(!st.tile_is_in_catchment(TileIndex::new(15, 15)));
        assert_eq!(st.station_tiles(), 1);
        assert!(!fx.get(other).industries_near().contains(&IndustryId::new(9)));
        assert_eq!(
            fx.nearby.stations_near_industry(IndustryId::new(9)).collect::<Vec<_>>(),
            vec![rig]
        );

        // The generic station no longer picks the industry up.
        fx.recompute(other);
        assert!(!fx.get(other).industries_near().contains(&IndustryId::new(9)));
    }

    #[test]
    fn recompute_for_all_rebuilds_reverse_sets() {
        let mut fx = Fixture::new();
        fx.world
            .build_house(TileIndex::new(10, 12), TownId::new(0))
            .unwrap();
        let a = fx.station();
        let b = fx.station();
        fx.build(a, TileIndex::new(10, 10), StationType::Bus);
        fx.build(b, TileIndex::new(11, 14), StationType::Bus);
        recompute_catchment_for_all(&mut fx.pool, &fx.world, &mut fx.nearby, &fx.settings).unwrap();
        let near: Vec<StationId> = fx.nearby.stations_near_town(TownId::new(0)).collect();
        assert_eq!(near, vec![a, b]);

        let snapshot = fx.nearby.clone();
        recompute_catchment_for_all(&mut fx.pool, &fx.world, &mut fx.nearby, &fx.settings).unwrap();
        assert_eq!(fx.nearby, snapshot);
    }

    #[test]
    fn unknown_station_is_an_error() {
        let mut fx = Fixture::new();
        let res = recompute_catchment(
            &mut fx.pool,
            StationId::new(42),
            &fx.world,
            &mut fx.nearby,
            &fx.settings,
            false,
        );
        assert!(matches!(res, Err(StationError::StationNotFound(_))));
    }

    proptest! {
        #[test]
        fn raising_bonus_never_drops_tiles(
            tiles in prop::collection::vec((2_u32..30, 2_u32..30, 0_u8..4), 1..8),
            bonus in 0_u32..5,
        ) {
            let mut fx = Fixture::new();
            let id = fx.station();
            for (x, y, k) in tiles {
                let tile = TileIndex::new(x, y);
                if fx.world.map().get(tile) != Tile::Clear {
                    continue;
                }
                let kind = match k {
                    0 => StationType::Bus,
                    1 => StationType::Rail,
                    2 => StationType::Truck,
                    _ => StationType::Waypoint,
                };
                fx.build(id, tile, kind);
            }
            fx.settings.catchment_increase = bonus;
            fx.recompute(id);
            let before: Vec<TileIndex> = fx.get(id).catchment().iter().collect();
            fx.settings.catchment_increase = bonus.saturating_add(1);
            fx.recompute(id);
            let after = fx.get(id).catchment();
            for tile in before {
                prop_assert!(after.has_tile(tile));
            }
        }
    }
}
