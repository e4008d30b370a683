//! Industries and their cargo acceptance.
//!
//! An industry occupies a rectangular [`TileArea`] on the map. Not every
//! tile in that area has to belong to it: an oil rig shares its area with
//! the station built into it.

use serde::{Deserialize, Serialize};
use terminus_types::{CargoId, IndustryId, StationId, TileArea};

/// An industry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Industry {
    /// Handle of the industry.
    pub id: IndustryId,
    /// Display name.
    pub name: String,
    /// Area covering every tile of the industry.
    pub location: TileArea,
    /// Cargo types the industry accepts for delivery.
    pub accepts_cargo: Vec<CargoId>,
    /// The station bound to this industry, which then serves it exclusively.
    pub neutral_station: Option<StationId>,
}

impl Industry {
    /// Create an industry with no neutral station.
    pub fn new(
        id: IndustryId,
        name: impl Into<String>,
        location: TileArea,
        accepts_cargo: Vec<CargoId>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            accepts_cargo,
            neutral_station: None,
        }
    }

    /// Whether the industry accepts `cargo`.
    pub fn accepts(&self, cargo: CargoId) -> bool {
        self.accepts_cargo.contains(&cargo)
    }

    /// Whether the industry accepts any cargo at all.
    pub fn accepts_any_cargo(&self) -> bool {
        !self.accepts_cargo.is_empty()
    }
}
