//! YAML scenario files: a starting world plus the stations built on it.
//!
//! Stations are referred to by their position in the `stations` list, since
//! their handles are only known once the pool hands them out.

use std::path::Path;

use serde::Deserialize;
use terminus_types::{
    AirportType, Axis, CargoId, CompanyId, IndustryId, StationId, StationType, TileArea,
    TileIndex, TownId, VehicleId, VehicleType,
};
use terminus_world::{Industry, Order, Town, Vehicle};
use tracing::info;

use crate::config::ConfigError;
use crate::error::ScenarioError;
use crate::lifecycle::{FacilityPlan, StationLifecycle};

/// A scenario file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    /// Towns and their houses.
    #[serde(default)]
    pub towns: Vec<TownSpec>,
    /// Blocks of open water.
    #[serde(default)]
    pub water: Vec<TileArea>,
    /// Industries.
    #[serde(default)]
    pub industries: Vec<IndustrySpec>,
    /// Stations, in build order.
    #[serde(default)]
    pub stations: Vec<StationSpec>,
    /// Cargo links between stations.
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    /// Vehicles and their orders.
    #[serde(default)]
    pub vehicles: Vec<VehicleSpec>,
    /// Stations to demolish once everything is built.
    #[serde(default)]
    pub demolish: Vec<usize>,
}

/// A town.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TownSpec {
    /// Town handle.
    pub id: TownId,
    /// Display name.
    pub name: String,
    /// Centre tile.
    pub xy: TileIndex,
    /// House tiles.
    #[serde(default)]
    pub houses: Vec<TileIndex>,
}

/// An industry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndustrySpec {
    /// Industry handle.
    pub id: IndustryId,
    /// Display name.
    pub name: String,
    /// Footprint.
    pub location: TileArea,
    /// Cargo kinds accepted.
    #[serde(default)]
    pub accepts: Vec<CargoId>,
}

/// A station.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StationSpec {
    /// Display name.
    pub name: String,
    /// Building company.
    #[serde(default)]
    pub owner: Option<CompanyId>,
    /// Facilities, built in order.
    pub facilities: Vec<FacilitySpec>,
    /// Neutral industry this station is exclusively bound to.
    #[serde(default)]
    pub neutral_industry: Option<IndustryId>,
}

/// One facility of a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FacilitySpec {
    /// Tile type.
    pub kind: StationType,
    /// Covered tiles.
    pub area: TileArea,
    /// Platform axis for rail.
    #[serde(default)]
    pub axis: Option<Axis>,
    /// Airport layout.
    #[serde(default)]
    pub airport: Option<AirportType>,
}

/// A two-way cargo link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LinkSpec {
    /// Cargo carried.
    pub cargo: CargoId,
    /// First station, by list position.
    pub from: usize,
    /// Second station, by list position.
    pub to: usize,
    /// Capacity in both directions.
    pub capacity: u32,
}

/// A vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VehicleSpec {
    /// Vehicle handle.
    pub id: VehicleId,
    /// Kind of vehicle.
    pub kind: VehicleType,
    /// Owning company.
    pub owner: CompanyId,
    /// Stations to visit, by list position.
    #[serde(default)]
    pub orders: Vec<usize>,
    /// Station the vehicle is loading at when the scenario starts.
    #[serde(default)]
    pub loading_at: Option<usize>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ScenarioError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::Config`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ScenarioError> {
        let scenario: Self = serde_yml::from_str(yaml).map_err(ConfigError::from)?;
        Ok(scenario)
    }

    /// Build the scenario through `lifecycle` and return the station
    /// handles in list order. Demolished stations keep their position with
    /// the handle they had.
    pub fn apply(&self, lifecycle: &mut StationLifecycle) -> Result<Vec<StationId>, ScenarioError> {
        let world = &mut lifecycle.state_mut().world;
        for area in &self.water {
            for tile in area {
                world.flood(tile)?;
            }
        }
        for town in &self.towns {
            world.add_town(Town::new(town.id, town.name.as_str(), town.xy))?;
            for house in &town.houses {
                world.build_house(*house, town.id)?;
            }
        }
        for industry in &self.industries {
            world.add_industry(Industry::new(
                industry.id,
                industry.name.as_str(),
                industry.location,
                industry.accepts.clone(),
            ))?;
        }

        let mut ids = Vec::with_capacity(self.stations.len());
        for spec in &self.stations {
            let anchor = spec
                .facilities
                .first()
                .map_or(TileIndex::new(1, 1), |f| f.area.tile);
            let id = lifecycle.create_station(&spec.name, anchor)?;
            for facility in &spec.facilities {
                let mut plan = FacilityPlan::new(facility.kind, facility.area);
                plan.axis = facility.axis;
                plan.airport = facility.airport;
                plan.owner = spec.owner;
                lifecycle.add_facility(id, &plan)?;
            }
            if let Some(industry) = spec.neutral_industry {
                lifecycle.link_industry(id, industry)?;
            }
            ids.push(id);
        }

        let station = |index: usize| -> Result<StationId, ScenarioError> {
            ids.get(index)
                .copied()
                .ok_or(ScenarioError::UnknownStation(index))
        };
        for link in &self.links {
            lifecycle.connect(link.cargo, station(link.from)?, station(link.to)?, link.capacity)?;
        }
        for spec in &self.vehicles {
            let mut vehicle = Vehicle::new(spec.id, spec.kind, spec.owner);
            for index in &spec.orders {
                vehicle.orders.push(Order::GotoStation(station(*index)?));
            }
            lifecycle.state_mut().world.add_vehicle(vehicle)?;
            if let Some(index) = spec.loading_at {
                lifecycle.begin_loading(spec.id, station(index)?)?;
            }
        }

        lifecycle.recompute_all()?;
        for index in &self.demolish {
            lifecycle.destroy_station(station(*index)?)?;
        }
        info!(
            towns = self.towns.len(),
            industries = self.industries.len(),
            stations = ids.len(),
            links = self.links.len(),
            demolished = self.demolish.len(),
            "scenario applied"
        );
        Ok(ids)
    }
}
