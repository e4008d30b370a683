//! Error types for the `terminus-world` crate.
//!
//! All fallible operations in this crate return [`WorldError`].

use terminus_types::{IndustryId, TileIndex, TownId, VehicleId};

/// Errors that can occur while editing the world.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The map dimensions are too small to hold a playable interior.
    #[error("invalid map size {size_x}x{size_y}: both sides must be at least 3")]
    InvalidMapSize {
        /// Requested width.
        size_x: u32,
        /// Requested height.
        size_y: u32,
    },

    /// A tile lies outside the map.
    #[error("tile {0} is outside the map")]
    TileOutOfBounds(TileIndex),

    /// A tile lies on the void border and cannot be built on.
    #[error("tile {0} is on the map border")]
    VoidTile(TileIndex),

    /// A tile already holds something that must be cleared first.
    #[error("tile {0} is already occupied")]
    TileOccupied(TileIndex),

    /// A tile does not hold what the operation expected.
    #[error("tile {tile} is not a {expected} tile")]
    UnexpectedTile {
        /// The tile.
        tile: TileIndex,
        /// What the operation expected to find.
        expected: &'static str,
    },

    /// A town was not found.
    #[error("town not found: {0}")]
    TownNotFound(TownId),

    /// An industry was not found.
    #[error("industry not found: {0}")]
    IndustryNotFound(IndustryId),

    /// A vehicle was not found.
    #[error("vehicle not found: {0}")]
    VehicleNotFound(VehicleId),

    /// A town with this handle already exists.
    #[error("duplicate town id: {0}")]
    DuplicateTown(TownId),

    /// An industry with this handle already exists.
    #[error("duplicate industry id: {0}")]
    DuplicateIndustry(IndustryId),

    /// A vehicle with this handle already exists.
    #[error("duplicate vehicle id: {0}")]
    DuplicateVehicle(VehicleId),
}
