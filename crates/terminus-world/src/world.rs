//! The [`World`]: map plus the registries of towns, industries and vehicles.
//!
//! Every edit that changes what a tile holds goes through here so the map
//! and the registries cannot drift apart.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use terminus_types::{Axis, IndustryId, StationId, StationType, TileIndex, TownId, VehicleId};
use tracing::debug;

use crate::error::WorldError;
use crate::industry::Industry;
use crate::tile_map::{Tile, TileMap};
use crate::town::Town;
use crate::vehicle::Vehicle;

/// The simulated world outside the station pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    map: TileMap,
    towns: BTreeMap<TownId, Town>,
    industries: BTreeMap<IndustryId, Industry>,
    vehicles: BTreeMap<VehicleId, Vehicle>,
}

impl World {
    /// Create an empty world on a fresh map.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidMapSize`] if the map is too small.
    pub fn new(size_x: u32, size_y: u32) -> Result<Self, WorldError> {
        Ok(Self {
            map: TileMap::new(size_x, size_y)?,
            towns: BTreeMap::new(),
            industries: BTreeMap::new(),
            vehicles: BTreeMap::new(),
        })
    }

    /// The tile map.
    pub const fn map(&self) -> &TileMap {
        &self.map
    }

    // -----------------------------------------------------------------------
    // Towns
    // -----------------------------------------------------------------------

    /// Register a town.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateTown`] if the handle is taken.
    pub fn add_town(&mut self, town: Town) -> Result<(), WorldError> {
        if self.towns.contains_key(&town.id) {
            return Err(WorldError::DuplicateTown(town.id));
        }
        self.towns.insert(town.id, town);
        Ok(())
    }

    /// Look up a town.
    pub fn town(&self, id: TownId) -> Option<&Town> {
        self.towns.get(&id)
    }

    /// Iterate over towns in handle order.
    pub fn towns(&self) -> impl Iterator<Item = &Town> {
        self.towns.values()
    }

    /// Build a house for `town` on a clear tile.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TownNotFound`] or [`WorldError::TileOccupied`],
    /// or a bounds error from the map.
    pub fn build_house(&mut self, tile: TileIndex, town: TownId) -> Result<(), WorldError> {
        if !self.towns.contains_key(&town) {
            return Err(WorldError::TownNotFound(town));
        }
        self.require_free(tile, false)?;
        self.map.set(tile, Tile::House { town })?;
        Ok(())
    }

    /// Demolish the house on `tile` and return the town it belonged to.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnexpectedTile`] if `tile` is not a house.
    pub fn remove_house(&mut self, tile: TileIndex) -> Result<TownId, WorldError> {
        let town = self.map.town_at(tile).ok_or(WorldError::UnexpectedTile {
            tile,
            expected: "house",
        })?;
        self.map.set(tile, Tile::Clear)?;
        Ok(town)
    }

    // -----------------------------------------------------------------------
    // Industries
    // -----------------------------------------------------------------------

    /// Register an industry and stamp its tiles onto the map.
    ///
    /// Clear and water tiles inside the industry's area become industry
    /// tiles. Anything else already there, such as an oil rig's own
    /// station tile, is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateIndustry`] if the handle is taken, or
    /// [`WorldError::VoidTile`] if the area touches the map border.
    pub fn add_industry(&mut self, industry: Industry) -> Result<(), WorldError> {
        if self.industries.contains_key(&industry.id) {
            return Err(WorldError::DuplicateIndustry(industry.id));
        }
        if let Some(bad) = industry.location.iter().find(|t| self.map.is_border(*t)) {
            return Err(WorldError::VoidTile(bad));
        }
        for tile in industry.location.iter() {
            if matches!(self.map.get(tile), Tile::Clear | Tile::Water) {
                self.map.set(
                    tile,
                    Tile::Industry {
                        industry: industry.id,
                    },
                )?;
            }
        }
        debug!(industry = %industry.id, name = %industry.name, "industry placed");
        self.industries.insert(industry.id, industry);
        Ok(())
    }

    /// Look up an industry.
    pub fn industry(&self, id: IndustryId) -> Option<&Industry> {
        self.industries.get(&id)
    }

    /// Iterate over industries in handle order.
    pub fn industries(&self) -> impl Iterator<Item = &Industry> {
        self.industries.values()
    }

    /// Bind `station` to `industry` as its neutral station, or unbind it
    /// with `None`.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::IndustryNotFound`].
    pub fn set_neutral_station(
        &mut self,
        industry: IndustryId,
        station: Option<StationId>,
    ) -> Result<(), WorldError> {
        let entry = self
            .industries
            .get_mut(&industry)
            .ok_or(WorldError::IndustryNotFound(industry))?;
        entry.neutral_station = station;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Station tiles
    // -----------------------------------------------------------------------

    /// Whether a station tile could be placed on `tile` right now.
    ///
    /// # Errors
    ///
    /// Returns the error [`Self::place_station_tile`] would return.
    pub fn check_station_site(&self, tile: TileIndex) -> Result<(), WorldError> {
        self.require_free(tile, true)
    }

    /// Place a station tile on a clear or water tile.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOccupied`] or a bounds error.
    pub fn place_station_tile(
        &mut self,
        tile: TileIndex,
        station: StationId,
        kind: StationType,
        axis: Option<Axis>,
    ) -> Result<(), WorldError> {
        self.require_free(tile, true)?;
        self.map.set(
            tile,
            Tile::Station {
                station,
                kind,
                axis,
            },
        )?;
        Ok(())
    }

    /// Clear a station tile and return the station that owned it. Water
    /// based tiles revert to water.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnexpectedTile`] if `tile` is not a station tile.
    pub fn remove_station_tile(&mut self, tile: TileIndex) -> Result<StationId, WorldError> {
        let Tile::Station { station, kind, .. } = self.map.get(tile) else {
            return Err(WorldError::UnexpectedTile {
                tile,
                expected: "station",
            });
        };
        let restored = match kind {
            StationType::Dock | StationType::Buoy | StationType::OilRig => Tile::Water,
            _ => Tile::Clear,
        };
        self.map.set(tile, restored)?;
        Ok(station)
    }

    /// Place a tunnel or bridge head, optionally part of a station's
    /// footprint.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOccupied`] or a bounds error.
    pub fn place_tunnel_bridge(
        &mut self,
        tile: TileIndex,
        station: Option<StationId>,
    ) -> Result<(), WorldError> {
        self.require_free(tile, false)?;
        self.map.set(tile, Tile::TunnelBridge { station })?;
        Ok(())
    }

    /// Detach `tile` from `station`'s footprint: station tiles are cleared
    /// as by [`Self::remove_station_tile`], tunnel and bridge heads keep
    /// standing without the station identity. Returns whether anything
    /// changed.
    pub fn release_footprint(
        &mut self,
        tile: TileIndex,
        station: StationId,
    ) -> Result<bool, WorldError> {
        match self.map.get(tile) {
            Tile::Station { station: s, .. } if s == station => {
                self.remove_station_tile(tile)?;
                Ok(true)
            }
            Tile::TunnelBridge { station: Some(s) } if s == station => {
                self.map.set(tile, Tile::TunnelBridge { station: None })?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Turn a tile into water. Only clear tiles can be flooded.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOccupied`] or a bounds error.
    pub fn flood(&mut self, tile: TileIndex) -> Result<(), WorldError> {
        self.require_free(tile, false)?;
        self.map.set(tile, Tile::Water)?;
        Ok(())
    }

    fn require_free(&self, tile: TileIndex, allow_water: bool) -> Result<(), WorldError> {
        if !self.map.contains(tile) {
            return Err(WorldError::TileOutOfBounds(tile));
        }
        match self.map.get(tile) {
            Tile::Clear => Ok(()),
            Tile::Water if allow_water => Ok(()),
            Tile::Void => Err(WorldError::VoidTile(tile)),
            _ => Err(WorldError::TileOccupied(tile)),
        }
    }

    // -----------------------------------------------------------------------
    // Vehicles
    // -----------------------------------------------------------------------

    /// Register a vehicle.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateVehicle`] if the handle is taken.
    pub fn add_vehicle(&mut self, vehicle: Vehicle) -> Result<(), WorldError> {
        if self.vehicles.contains_key(&vehicle.id) {
            return Err(WorldError::DuplicateVehicle(vehicle.id));
        }
        self.vehicles.insert(vehicle.id, vehicle);
        Ok(())
    }

    /// Look up a vehicle.
    pub fn vehicle(&self, id: VehicleId) -> Option<&Vehicle> {
        self.vehicles.get(&id)
    }

    /// Look up a vehicle for editing.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::VehicleNotFound`].
    pub fn vehicle_mut(&mut self, id: VehicleId) -> Result<&mut Vehicle, WorldError> {
        self.vehicles
            .get_mut(&id)
            .ok_or(WorldError::VehicleNotFound(id))
    }

    /// Iterate over vehicles in handle order.
    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    /// Iterate mutably over vehicles in handle order.
    pub fn vehicles_mut(&mut self) -> impl Iterator<Item = &mut Vehicle> {
        self.vehicles.values_mut()
    }
}
