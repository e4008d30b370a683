//! Shared type definitions for the Terminus station core.
//!
//! This crate is the single source of truth for the identity, geometry and
//! enumeration types used across the workspace. Everything here is plain
//! data with serde derives so an external persistence layer can store it.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe integer handles for pooled entities
//! - [`geometry`] -- Tile coordinates, tile areas, inclusive rectangles
//! - [`enums`] -- Station tile types, facilities, airport layouts, rect modes

pub mod enums;
pub mod geometry;
pub mod ids;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AirportSpec, AirportType, Axis, Facilities, RectMode, StationFacility, StationType, VehicleType,
};
pub use geometry::{Rect, TileArea, TileAreaIter, TileIndex};
pub use ids::{CargoId, CompanyId, IndustryId, LinkGraphId, NodeId, StationId, TownId, VehicleId};
