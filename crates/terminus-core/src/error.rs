//! Error types for the `terminus-core` crate.

use terminus_linkgraph::LinkGraphError;
use terminus_station::StationError;
use terminus_types::{CargoId, IndustryId, LinkGraphId, StationId, TileIndex};
use terminus_world::WorldError;

use crate::config::ConfigError;

/// Errors raised while building, editing or tearing down stations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// A station bookkeeping operation failed.
    #[error("station error: {source}")]
    Station {
        /// The underlying station error.
        #[from]
        source: StationError,
    },

    /// The world rejected a tile edit.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// The flow-graph subsystem rejected a node edit.
    #[error("link graph error: {source}")]
    LinkGraph {
        /// The underlying link graph error.
        #[from]
        source: LinkGraphError,
    },

    /// A tile in the requested area does not belong to the station.
    #[error("tile {tile} is not part of station {station}")]
    NotStationTile {
        /// The station being edited.
        station: StationId,
        /// The offending tile.
        tile: TileIndex,
    },

    /// A construction or removal request covered no tiles.
    #[error("requested area is empty")]
    EmptyArea,

    /// Two stations already route the same cargo in different graphs.
    #[error("cargo {cargo} is routed in separate graphs {first} and {second}")]
    SeparateGraphs {
        /// The cargo being linked.
        cargo: CargoId,
        /// Graph of the first station.
        first: LinkGraphId,
        /// Graph of the second station.
        second: LinkGraphId,
    },

    /// The industry is already served exclusively by another station.
    #[error("industry {industry} is already bound to station {station}")]
    IndustryAlreadyBound {
        /// The neutral industry.
        industry: IndustryId,
        /// The station it is bound to.
        station: StationId,
    },

    /// The station pool is being cleaned and accepts no edits.
    #[error("station pool is shutting down")]
    PoolCleaning,
}

/// Errors raised while loading a scenario file.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// Failed to read or parse the scenario file.
    #[error("scenario file error: {source}")]
    Config {
        /// The underlying read or parse error.
        #[from]
        source: ConfigError,
    },

    /// Building the world from the scenario failed.
    #[error("scenario world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// A link, order or demolition names a station position past the end
    /// of the station list.
    #[error("scenario refers to unknown station #{0}")]
    UnknownStation(usize),

    /// Building a station from the scenario failed.
    #[error("scenario station error: {source}")]
    Lifecycle {
        /// The underlying lifecycle error.
        #[from]
        source: LifecycleError,
    },
}
