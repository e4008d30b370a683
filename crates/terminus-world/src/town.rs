//! Towns. A town is a name and a centre tile; its houses live on the map.

use serde::{Deserialize, Serialize};
use terminus_types::{TileIndex, TownId};

/// A town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Town {
    /// Handle of the town.
    pub id: TownId,
    /// Display name.
    pub name: String,
    /// Centre tile.
    pub xy: TileIndex,
}

impl Town {
    /// Create a town centred on `xy`.
    pub fn new(id: TownId, name: impl Into<String>, xy: TileIndex) -> Self {
        Self {
            id,
            name: name.into(),
            xy,
        }
    }
}
