//! Vehicles, as far as stations care about them.
//!
//! Only the references a vehicle holds to stations are modelled: where it
//! last stopped, where it last loaded, the airport it is flying to, the
//! station it is currently loading at, and its order list.

use serde::{Deserialize, Serialize};
use terminus_types::{CompanyId, StationId, TileIndex, VehicleId, VehicleType};

/// A single order in a vehicle's order list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target", rename_all = "snake_case")]
pub enum Order {
    /// Stop at a station.
    GotoStation(StationId),
    /// Pass through a waypoint.
    GotoWaypoint(StationId),
    /// Go to a depot.
    GotoDepot(TileIndex),
}

impl Order {
    /// Station the order refers to, if any.
    pub const fn destination(self) -> Option<StationId> {
        match self {
            Self::GotoStation(s) | Self::GotoWaypoint(s) => Some(s),
            Self::GotoDepot(_) => None,
        }
    }
}

/// A vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    /// Handle of the vehicle.
    pub id: VehicleId,
    /// Kind of vehicle.
    pub kind: VehicleType,
    /// Owning company.
    pub owner: CompanyId,
    /// Last station the vehicle stopped at.
    pub last_station_visited: Option<StationId>,
    /// Last station the vehicle loaded cargo at.
    pub last_loading_station: Option<StationId>,
    /// Destination airport, for aircraft.
    pub target_airport: Option<StationId>,
    /// Station the vehicle is currently loading at.
    pub current_station: Option<StationId>,
    /// Order list.
    pub orders: Vec<Order>,
}

impl Vehicle {
    /// Create an idle vehicle with no orders.
    pub const fn new(id: VehicleId, kind: VehicleType, owner: CompanyId) -> Self {
        Self {
            id,
            kind,
            owner,
            last_station_visited: None,
            last_loading_station: None,
            target_airport: None,
            current_station: None,
            orders: Vec::new(),
        }
    }

    /// Start loading at `station`.
    pub const fn begin_loading(&mut self, station: StationId) {
        self.current_station = Some(station);
        self.last_station_visited = Some(station);
        self.last_loading_station = Some(station);
    }

    /// Stop loading. Returns the station the vehicle left, if it was loading.
    pub const fn leave_station(&mut self) -> Option<StationId> {
        self.current_station.take()
    }

    /// Forget `station` as last visited or last loading station.
    pub fn scrub_station_refs(&mut self, station: StationId) {
        if self.last_station_visited == Some(station) {
            self.last_station_visited = None;
        }
        if self.last_loading_station == Some(station) {
            self.last_loading_station = None;
        }
    }

    /// Drop every order that goes to `station`. Returns how many were dropped.
    pub fn remove_orders_to(&mut self, station: StationId) -> usize {
        let before = self.orders.len();
        self.orders.retain(|o| o.destination() != Some(station));
        before.saturating_sub(self.orders.len())
    }

    /// Whether the vehicle still refers to `station` anywhere.
    pub fn references(&self, station: StationId) -> bool {
        self.last_station_visited == Some(station)
            || self.last_loading_station == Some(station)
            || self.target_airport == Some(station)
            || self.current_station == Some(station)
            || self.orders.iter().any(|o| o.destination() == Some(station))
    }
}
