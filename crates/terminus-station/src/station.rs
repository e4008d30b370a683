//! The [`Station`] record.
//!
//! A station owns its bounding rect, its catchment bitmap and its forward
//! "industries near" set. The last two are derived: they are only written
//! by [`crate::catchment`] and [`crate::nearby`].

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};
use terminus_linkgraph::GoodsEntry;
use terminus_types::{
    AirportType, Axis, CargoId, CompanyId, Facilities, IndustryId, StationFacility, StationId,
    StationType, TileArea, TileIndex, VehicleId,
};
use terminus_world::{Tile, TileMap};

use crate::catchment::{
    CA_BUS, CA_DOCK, CA_NONE, CA_TRAIN, CA_TRUCK, CA_UNMODIFIED, CatchmentSet, MAX_CATCHMENT,
};
use crate::rect::BoundingRect;
use crate::settings::StationSettings;

// ---------------------------------------------------------------------------
// Airport
// ---------------------------------------------------------------------------

/// Auxiliary per-airport storage registers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistentStorage {
    registers: BTreeMap<u32, i32>,
}

impl PersistentStorage {
    /// Read a register; unset registers read as zero.
    pub fn get(&self, register: u32) -> i32 {
        self.registers.get(&register).copied().unwrap_or(0)
    }

    /// Write a register.
    pub fn set(&mut self, register: u32, value: i32) {
        if value == 0 {
            self.registers.remove(&register);
        } else {
            self.registers.insert(register, value);
        }
    }
}

/// The airport facility of a station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airport {
    /// Layout.
    pub kind: AirportType,
    /// North corner tile.
    pub tile: TileIndex,
    /// Storage block, if one has been allocated.
    pub psa: Option<PersistentStorage>,
}

// ---------------------------------------------------------------------------
// Station
// ---------------------------------------------------------------------------

/// A station.
///
/// Stations compare and order by identity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Station {
    /// Identity handle.
    pub id: StationId,
    /// Display name.
    pub name: String,
    /// Anchor tile, fixed when the first facility is built.
    pub xy: TileIndex,
    /// Tie-break seed, fixed when the first facility is built.
    pub random_bits: u16,
    /// Facilities the station offers.
    pub facilities: Facilities,
    /// Owning company; `None` for ownerless stations such as oil rigs.
    pub owner: Option<CompanyId>,
    /// Tick of the most recent facility construction.
    pub build_tick: u64,
    /// Bounding rect over the station's tiles.
    pub rect: BoundingRect,
    /// Industry this station serves exclusively, if any.
    pub industry: Option<IndustryId>,
    /// Area spanned by the rail platforms.
    pub train_station: Option<TileArea>,
    /// Bus stop tiles.
    pub bus_stops: Vec<TileIndex>,
    /// Truck stop tiles.
    pub truck_stops: Vec<TileIndex>,
    /// Dock tile.
    pub dock: Option<TileIndex>,
    /// Water tiles from which ships can use the dock.
    pub docking_tiles: Vec<TileIndex>,
    /// Airport facility.
    pub airport: Option<Airport>,
    /// Per-cargo flow state.
    pub goods: BTreeMap<CargoId, GoodsEntry>,
    /// Vehicles currently loading or unloading here.
    pub loading_vehicles: Vec<VehicleId>,
    #[serde(skip)]
    catchment: CatchmentSet,
    #[serde(skip)]
    industries_near: BTreeSet<IndustryId>,
    #[serde(skip)]
    station_tiles: u32,
}

impl Station {
    /// Create a station with no facilities.
    pub fn new(id: StationId, name: impl Into<String>, xy: TileIndex) -> Self {
        Self {
            id,
            name: name.into(),
            xy,
            random_bits: 0,
            facilities: Facilities::NONE,
            owner: None,
            build_tick: 0,
            rect: BoundingRect::new(),
            industry: None,
            train_station: None,
            bus_stops: Vec::new(),
            truck_stops: Vec::new(),
            dock: None,
            docking_tiles: Vec::new(),
            airport: None,
            goods: BTreeMap::new(),
            loading_vehicles: Vec::new(),
            catchment: CatchmentSet::empty(),
            industries_near: BTreeSet::new(),
            station_tiles: 0,
        }
    }

    /// Tiles within reach of the station.
    pub const fn catchment(&self) -> &CatchmentSet {
        &self.catchment
    }

    pub(crate) const fn catchment_mut(&mut self) -> &mut CatchmentSet {
        &mut self.catchment
    }

    /// Industries this station can deliver to.
    pub const fn industries_near(&self) -> &BTreeSet<IndustryId> {
        &self.industries_near
    }

    pub(crate) const fn industries_near_mut(&mut self) -> &mut BTreeSet<IndustryId> {
        &mut self.industries_near
    }

    /// Number of map tiles belonging to the station, as of the last
    /// catchment recompute.
    pub const fn station_tiles(&self) -> u32 {
        self.station_tiles
    }

    pub(crate) const fn set_station_tiles(&mut self, count: u32) {
        self.station_tiles = count;
    }

    /// Whether `tile` is in the catchment.
    pub fn tile_is_in_catchment(&self, tile: TileIndex) -> bool {
        self.catchment.has_tile(tile)
    }

    /// Record construction of `facility` at `tile`.
    ///
    /// The first facility also fixes the anchor tile and draws the
    /// tie-break seed. Every call records owner and build tick.
    pub fn add_facility<R: Rng + ?Sized>(
        &mut self,
        facility: StationFacility,
        tile: TileIndex,
        owner: Option<CompanyId>,
        tick: u64,
        rng: &mut R,
    ) {
        if self.facilities.is_empty() {
            self.xy = tile;
            self.random_bits = rng.random();
        }
        self.facilities.insert(facility);
        self.owner = owner;
        self.build_tick = tick;
    }

    /// Catchment radius of the station as a whole: the largest radius of
    /// any facility present, plus the configured bonus.
    pub fn catchment_radius(&self, settings: &StationSettings) -> u32 {
        let has_any = !self.bus_stops.is_empty()
            || !self.truck_stops.is_empty()
            || self.train_station.is_some()
            || self.dock.is_some()
            || self.airport.is_some();
        let mut radius = CA_NONE;
        if settings.modified_catchment {
            if !self.bus_stops.is_empty() {
                radius = radius.max(CA_BUS);
            }
            if !self.truck_stops.is_empty() {
                radius = radius.max(CA_TRUCK);
            }
            if self.train_station.is_some() {
                radius = radius.max(CA_TRAIN);
            }
            if self.dock.is_some() {
                radius = radius.max(CA_DOCK);
            }
            if let Some(airport) = &self.airport {
                radius = radius.max(airport.kind.spec().catchment.min(MAX_CATCHMENT));
            }
        } else if has_any {
            radius = CA_UNMODIFIED;
        }
        if radius != CA_NONE {
            radius = radius.saturating_add(settings.catchment_increase);
        }
        radius
    }

    /// The station rect grown by `radius` and clamped to the map, or
    /// `None` while the station has no tiles.
    pub fn catchment_rect_using_radius(&self, radius: u32, map: &TileMap) -> Option<TileArea> {
        self.rect
            .tile_area()
            .map(|area| area.expand(radius, map.max_x(), map.max_y()))
    }

    /// The station rect grown by the station's catchment radius.
    pub fn catchment_rect(&self, settings: &StationSettings, map: &TileMap) -> Option<TileArea> {
        self.catchment_rect_using_radius(self.catchment_radius(settings), map)
    }

    /// Whether a ship at `tile` is within `max_distance` of a docking tile.
    pub fn is_within_range_of_docking_tile(
        &self,
        tile: TileIndex,
        max_distance: u32,
        settings: &StationSettings,
    ) -> bool {
        if self.xy.distance_manhattan(tile) > settings.station_spread.saturating_add(max_distance) {
            return false;
        }
        self.docking_tiles
            .iter()
            .any(|dock| dock.distance_manhattan(tile) <= max_distance)
    }

    /// Length of the platform through `tile`: the run of this station's
    /// rail tiles sharing the tile's axis. Zero if `tile` is not one.
    pub fn platform_length(&self, map: &TileMap, tile: TileIndex) -> u32 {
        let Tile::Station {
            station,
            kind: StationType::Rail,
            axis: Some(axis),
        } = map.get(tile)
        else {
            return 0;
        };
        if station != self.id {
            return 0;
        }
        let (dx, dy) = match axis {
            Axis::X => (1, 0),
            Axis::Y => (0, 1),
        };
        let same_platform = |t: TileIndex| {
            matches!(
                map.get(t),
                Tile::Station { station: s, kind: StationType::Rail, axis: Some(a) }
                    if s == self.id && a == axis
            )
        };
        let mut length = 1_u32;
        for (sx, sy) in [(dx, dy), (-dx, -dy)] {
            let mut cur = tile;
            while let Some(next) = cur.offset(sx, sy).filter(|t| same_platform(*t)) {
                length = length.saturating_add(1);
                cur = next;
            }
        }
        length
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Station {}

impl PartialOrd for Station {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Station {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}
