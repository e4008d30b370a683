//! Enumeration types shared across the station core.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Station tile types
// ---------------------------------------------------------------------------

/// Functional type of a single station tile.
///
/// The type determines the tile's catchment radius: waypoints and buoys
/// contribute no catchment at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationType {
    /// Railway platform.
    Rail,
    /// Airport tile.
    Airport,
    /// Truck loading bay.
    Truck,
    /// Bus stop.
    Bus,
    /// Oil rig platform (ownerless, attached to an industry).
    OilRig,
    /// Ship dock.
    Dock,
    /// Buoy (waypoint for ships).
    Buoy,
    /// Rail waypoint.
    Waypoint,
}

impl StationType {
    /// The facility a tile of this type provides, if any.
    pub const fn facility(self) -> Option<StationFacility> {
        match self {
            Self::Rail => Some(StationFacility::Train),
            Self::Airport | Self::OilRig => Some(StationFacility::Airport),
            Self::Truck => Some(StationFacility::TruckStop),
            Self::Bus => Some(StationFacility::BusStop),
            Self::Dock => Some(StationFacility::Dock),
            Self::Buoy | Self::Waypoint => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Facilities
// ---------------------------------------------------------------------------

/// A functional capability a station can offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationFacility {
    /// Railway platforms.
    Train,
    /// Truck loading bays.
    TruckStop,
    /// Bus stops.
    BusStop,
    /// Airport.
    Airport,
    /// Ship dock.
    Dock,
    /// Waypoint marker (rail or buoy).
    Waypoint,
}

impl StationFacility {
    const fn bit(self) -> u8 {
        match self {
            Self::Train => 1,
            Self::TruckStop => 1 << 1,
            Self::BusStop => 1 << 2,
            Self::Airport => 1 << 3,
            Self::Dock => 1 << 4,
            Self::Waypoint => 1 << 5,
        }
    }
}

/// Set of [`StationFacility`] flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Facilities(u8);

impl Facilities {
    /// No facilities.
    pub const NONE: Self = Self(0);

    /// Whether no facility is present.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether `facility` is present.
    pub const fn contains(self, facility: StationFacility) -> bool {
        self.0 & facility.bit() != 0
    }

    /// Add `facility` to the set.
    pub const fn insert(&mut self, facility: StationFacility) {
        self.0 |= facility.bit();
    }

    /// Remove `facility` from the set.
    pub const fn remove(&mut self, facility: StationFacility) {
        self.0 &= !facility.bit();
    }
}

impl From<StationFacility> for Facilities {
    fn from(facility: StationFacility) -> Self {
        Self(facility.bit())
    }
}

// ---------------------------------------------------------------------------
// Airports
// ---------------------------------------------------------------------------

/// Airport layout. Each layout has its own catchment and upkeep in
/// `terminus-station`'s airport spec table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AirportType {
    /// Small country airfield.
    Small,
    /// City airport.
    Large,
    /// Single helipad.
    Heliport,
    /// Metropolitan airport.
    Metropolitan,
    /// International airport.
    International,
    /// Commuter airport.
    Commuter,
    /// Helicopter depot.
    Helidepot,
    /// Intercontinental airport.
    Intercontinental,
    /// Helicopter station.
    Helistation,
    /// The helipad built into an oil rig.
    OilRig,
}

/// Static properties of an airport layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirportSpec {
    /// Catchment radius of every airport tile when radii are modified.
    pub catchment: u32,
    /// Upkeep factor, in eighths of the base airport price.
    pub maintenance_cost: u64,
}

impl AirportType {
    /// Static properties of this layout.
    pub const fn spec(self) -> AirportSpec {
        let (catchment, maintenance_cost) = match self {
            Self::Small => (3, 7),
            Self::Large => (4, 24),
            Self::Heliport => (4, 4),
            Self::Metropolitan => (4, 28),
            Self::International => (5, 42),
            Self::Commuter => (4, 20),
            Self::Helidepot => (4, 4),
            Self::Intercontinental => (5, 72),
            Self::Helistation => (4, 32),
            Self::OilRig => (4, 0),
        };
        AirportSpec {
            catchment,
            maintenance_cost,
        }
    }
}

// ---------------------------------------------------------------------------
// Bounding rect placement mode
// ---------------------------------------------------------------------------

/// How a bounding-rect growth request is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectMode {
    /// Compute the answer without committing any change.
    Test,
    /// Commit the change, or fail if the spread limit would be exceeded.
    Try,
    /// Commit the change, bypassing the spread limit.
    Force,
}

// ---------------------------------------------------------------------------
// Misc
// ---------------------------------------------------------------------------

/// Orientation of a rail platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Platform runs along x.
    X,
    /// Platform runs along y.
    Y,
}

/// Kind of vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    /// Train.
    Train,
    /// Road vehicle.
    Road,
    /// Ship.
    Ship,
    /// Aircraft (including helicopters).
    Aircraft,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facilities_insert_and_remove() {
        let mut f = Facilities::NONE;
        assert!(f.is_empty());
        f.insert(StationFacility::Train);
        f.insert(StationFacility::Dock);
        assert!(f.contains(StationFacility::Train));
        assert!(f.contains(StationFacility::Dock));
        assert!(!f.contains(StationFacility::Airport));
        f.remove(StationFacility::Train);
        assert!(!f.contains(StationFacility::Train));
        assert!(!f.is_empty());
    }

    #[test]
    fn waypoint_tiles_offer_no_facility() {
        assert_eq!(StationType::Waypoint.facility(), None);
        assert_eq!(StationType::Buoy.facility(), None);
        assert_eq!(StationType::OilRig.facility(), Some(StationFacility::Airport));
    }

    #[test]
    fn bigger_airports_reach_further() {
        assert!(AirportType::International.spec().catchment > AirportType::Small.spec().catchment);
        assert_eq!(AirportType::OilRig.spec().maintenance_cost, 0);
    }

    #[test]
    fn station_type_serde_snake_case() {
        let json = serde_json::to_string(&StationType::OilRig).ok();
        assert_eq!(json.as_deref(), Some("\"oil_rig\""));
    }
}
