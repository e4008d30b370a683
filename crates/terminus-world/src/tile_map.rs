//! The tile grid and per-tile classification.
//!
//! Each tile carries exactly one [`Tile`] classification. The outermost
//! ring of tiles is [`Tile::Void`] and can never be built on, so tile
//! column 0 never holds anything a station could own.

use serde::{Deserialize, Serialize};
use terminus_types::{Axis, IndustryId, StationId, StationType, TileArea, TileIndex, TownId};

use crate::error::WorldError;

/// Classification of a single tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tile", rename_all = "snake_case")]
pub enum Tile {
    /// Map border.
    Void,
    /// Empty land.
    #[default]
    Clear,
    /// Open water.
    Water,
    /// A house belonging to a town.
    House {
        /// Owning town.
        town: TownId,
    },
    /// Part of an industry.
    Industry {
        /// Owning industry.
        industry: IndustryId,
    },
    /// A station tile.
    Station {
        /// Owning station.
        station: StationId,
        /// Functional type of the tile.
        kind: StationType,
        /// Platform axis for rail tiles.
        axis: Option<Axis>,
    },
    /// A tunnel or bridge head, possibly sharing a station's identity.
    TunnelBridge {
        /// Station whose footprint this structure is part of.
        station: Option<StationId>,
    },
}

/// Rectangular grid of tiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileMap {
    size_x: u32,
    size_y: u32,
    tiles: Vec<Tile>,
}

impl TileMap {
    /// Create a map of `size_x * size_y` tiles with a void border and a
    /// clear interior.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidMapSize`] if either side is below 3.
    pub fn new(size_x: u32, size_y: u32) -> Result<Self, WorldError> {
        if size_x < 3 || size_y < 3 {
            return Err(WorldError::InvalidMapSize { size_x, size_y });
        }
        let count = usize::try_from(u64::from(size_x).saturating_mul(u64::from(size_y)))
            .map_err(|_overflow| WorldError::InvalidMapSize { size_x, size_y })?;
        let mut map = Self {
            size_x,
            size_y,
            tiles: vec![Tile::Clear; count],
        };
        let border: Vec<TileIndex> = TileArea::new(TileIndex::new(0, 0), size_x, size_y)
            .iter()
            .filter(|t| map.is_border(*t))
            .collect();
        for tile in border {
            if let Some(slot) = map.slot_mut(tile) {
                *slot = Tile::Void;
            }
        }
        Ok(map)
    }

    /// Width in tiles.
    pub const fn size_x(&self) -> u32 {
        self.size_x
    }

    /// Height in tiles.
    pub const fn size_y(&self) -> u32 {
        self.size_y
    }

    /// Largest valid x coordinate.
    pub const fn max_x(&self) -> u32 {
        self.size_x.saturating_sub(1)
    }

    /// Largest valid y coordinate.
    pub const fn max_y(&self) -> u32 {
        self.size_y.saturating_sub(1)
    }

    /// Whether `tile` lies on the map.
    pub const fn contains(&self, tile: TileIndex) -> bool {
        tile.x < self.size_x && tile.y < self.size_y
    }

    /// Whether `tile` is part of the void border.
    pub const fn is_border(&self, tile: TileIndex) -> bool {
        tile.x == 0 || tile.y == 0 || tile.x == self.max_x() || tile.y == self.max_y()
    }

    fn offset(&self, tile: TileIndex) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        let flat = u64::from(tile.y)
            .saturating_mul(u64::from(self.size_x))
            .saturating_add(u64::from(tile.x));
        usize::try_from(flat).ok()
    }

    fn slot_mut(&mut self, tile: TileIndex) -> Option<&mut Tile> {
        let offset = self.offset(tile)?;
        self.tiles.get_mut(offset)
    }

    /// Classification of `tile`; tiles off the map read as [`Tile::Void`].
    pub fn get(&self, tile: TileIndex) -> Tile {
        self.offset(tile)
            .and_then(|o| self.tiles.get(o))
            .copied()
            .unwrap_or(Tile::Void)
    }

    /// Overwrite the classification of an interior tile and return the old one.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::TileOutOfBounds`] or [`WorldError::VoidTile`].
    pub fn set(&mut self, tile: TileIndex, value: Tile) -> Result<Tile, WorldError> {
        if !self.contains(tile) {
            return Err(WorldError::TileOutOfBounds(tile));
        }
        if self.is_border(tile) {
            return Err(WorldError::VoidTile(tile));
        }
        let slot = self.slot_mut(tile).ok_or(WorldError::TileOutOfBounds(tile))?;
        Ok(core::mem::replace(slot, value))
    }

    /// Station owning `tile`, if it is a station tile.
    pub fn station_at(&self, tile: TileIndex) -> Option<StationId> {
        match self.get(tile) {
            Tile::Station { station, .. } => Some(station),
            _ => None,
        }
    }

    /// Functional type of a station tile.
    pub fn station_type_at(&self, tile: TileIndex) -> Option<StationType> {
        match self.get(tile) {
            Tile::Station { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// Whether `tile` is a station tile of `station`.
    pub fn is_station_tile_of(&self, tile: TileIndex, station: StationId) -> bool {
        self.station_at(tile) == Some(station)
    }

    /// Whether `tile` is part of `station`'s physical footprint: a station
    /// tile, or a tunnel/bridge head carrying the station's identity.
    pub fn is_footprint_of(&self, tile: TileIndex, station: StationId) -> bool {
        match self.get(tile) {
            Tile::Station { station: s, .. } => s == station,
            Tile::TunnelBridge { station: s } => s == Some(station),
            _ => false,
        }
    }

    /// Town owning `tile`, if it is a house.
    pub fn town_at(&self, tile: TileIndex) -> Option<TownId> {
        match self.get(tile) {
            Tile::House { town } => Some(town),
            _ => None,
        }
    }

    /// Industry owning `tile`, if it is an industry tile.
    pub fn industry_at(&self, tile: TileIndex) -> Option<IndustryId> {
        match self.get(tile) {
            Tile::Industry { industry } => Some(industry),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn border_is_void() {
        let map = TileMap::new(8, 6).unwrap();
        assert_eq!(map.get(TileIndex::new(0, 3)), Tile::Void);
        assert_eq!(map.get(TileIndex::new(7, 3)), Tile::Void);
        assert_eq!(map.get(TileIndex::new(3, 5)), Tile::Void);
        assert_eq!(map.get(TileIndex::new(3, 3)), Tile::Clear);
        assert_eq!(map.get(TileIndex::new(30, 3)), Tile::Void);
    }

    #[test]
    fn tiny_map_rejected() {
        assert!(TileMap::new(2, 10).is_err());
    }

    #[test]
    fn set_rejects_border_and_outside() {
        let mut map = TileMap::new(8, 8).unwrap();
        assert!(matches!(
            map.set(TileIndex::new(0, 2), Tile::Water),
            Err(WorldError::VoidTile(_))
        ));
        assert!(matches!(
            map.set(TileIndex::new(9, 2), Tile::Water),
            Err(WorldError::TileOutOfBounds(_))
        ));
        assert!(map.set(TileIndex::new(2, 2), Tile::Water).is_ok());
        assert_eq!(map.get(TileIndex::new(2, 2)), Tile::Water);
    }

    #[test]
    fn footprint_includes_tunnel_bridge_heads() {
        let mut map = TileMap::new(8, 8).unwrap();
        let st = StationId::new(4);
        map.set(TileIndex::new(2, 2), Tile::TunnelBridge { station: Some(st) })
            .unwrap();
        assert!(map.is_footprint_of(TileIndex::new(2, 2), st));
        assert!(!map.is_station_tile_of(TileIndex::new(2, 2), st));
    }

    #[test]
    fn station_tile_serde_keeps_its_kind() {
        let tile = Tile::Station {
            station: StationId::new(3),
            kind: StationType::Rail,
            axis: Some(Axis::Y),
        };
        let json = serde_json::to_string(&tile).unwrap();
        assert!(json.contains("\"tile\":\"station\""));
        assert!(json.contains("\"kind\":\"rail\""));
        let back: Tile = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tile);
    }
}
