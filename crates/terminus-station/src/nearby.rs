//! Links between stations and the towns and industries near them.
//!
//! Each station owns its forward set of industries it can deliver to.
//! Each town and industry has a reverse set of stations near it, kept
//! here. Both sides are written only through this module and
//! [`crate::catchment`], so a station appears in an industry's reverse set
//! whenever the industry is in the station's forward set.
//!
//! Town nearness has no stored forward set: it is read live from the
//! station's catchment by [`NearbyIndex::towns_near_station`].

use std::collections::{BTreeMap, BTreeSet};

use terminus_types::{IndustryId, StationId, TileIndex, TownId};
use terminus_world::{Industry, Tile, TileMap};
use tracing::debug;

use crate::pool::StationPool;
use crate::station::Station;

/// Reverse "stations near" sets for every town and industry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NearbyIndex {
    towns: BTreeMap<TownId, BTreeSet<StationId>>,
    industries: BTreeMap<IndustryId, BTreeSet<StationId>>,
}

impl NearbyIndex {
    /// An index with no links.
    pub const fn new() -> Self {
        Self {
            towns: BTreeMap::new(),
            industries: BTreeMap::new(),
        }
    }

    pub(crate) fn link_town(&mut self, town: TownId, station: StationId) {
        self.towns.entry(town).or_default().insert(station);
    }

    pub(crate) fn link_industry(&mut self, industry: IndustryId, station: StationId) {
        self.industries.entry(industry).or_default().insert(station);
    }

    pub(crate) fn set_sole_station(&mut self, industry: IndustryId, station: StationId) {
        let set = self.industries.entry(industry).or_default();
        set.clear();
        set.insert(station);
    }

    /// Add `industry` to `station`'s deliverable set. Industries that accept
    /// no cargo are never added. Returns whether the set changed.
    pub fn add_industry_to_deliver(station: &mut Station, industry: &Industry) -> bool {
        if !industry.accepts_any_cargo() {
            return false;
        }
        station.industries_near_mut().insert(industry.id)
    }

    /// Break the link between `station` and `industry` on both sides.
    /// Returns whether the station's forward set changed.
    pub fn unbind_industry(&mut self, station: &mut Station, industry: IndustryId) -> bool {
        if let Some(set) = self.industries.get_mut(&industry) {
            set.remove(&station.id);
            if set.is_empty() {
                self.industries.remove(&industry);
            }
        }
        station.industries_near_mut().remove(&industry)
    }

    /// Remove `station` from every town's and every industry's reverse set.
    pub fn remove_from_all_nearby_lists(&mut self, station: StationId) {
        for set in self.towns.values_mut() {
            set.remove(&station);
        }
        for set in self.industries.values_mut() {
            set.remove(&station);
        }
        self.towns.retain(|_, set| !set.is_empty());
        self.industries.retain(|_, set| !set.is_empty());
    }

    /// Whether any house of `town` lies in `station`'s catchment.
    pub fn catchment_covers_town(station: &Station, town: TownId, map: &TileMap) -> bool {
        station
            .catchment()
            .iter()
            .any(|tile| map.town_at(tile) == Some(town))
    }

    /// Stations near `town`, in handle order.
    pub fn stations_near_town(&self, town: TownId) -> impl Iterator<Item = StationId> + '_ {
        self.towns.get(&town).into_iter().flatten().copied()
    }

    /// Stations near `industry`, in handle order.
    pub fn stations_near_industry(
        &self,
        industry: IndustryId,
    ) -> impl Iterator<Item = StationId> + '_ {
        self.industries.get(&industry).into_iter().flatten().copied()
    }

    /// Towns with at least one house in `station`'s catchment.
    pub fn towns_near_station(station: &Station, map: &TileMap) -> BTreeSet<TownId> {
        station
            .catchment()
            .iter()
            .filter_map(|tile| match map.get(tile) {
                Tile::House { town } => Some(town),
                _ => None,
            })
            .collect()
    }

    /// Whether `station` appears in any reverse set.
    pub fn mentions(&self, station: StationId) -> bool {
        self.towns.values().any(|s| s.contains(&station))
            || self.industries.values().any(|s| s.contains(&station))
    }

    /// Whether every forward link in `pool` has its reverse counterpart.
    pub fn is_consistent(&self, pool: &StationPool) -> bool {
        pool.iter().all(|st| {
            st.industries_near().iter().all(|ind| {
                self.industries
                    .get(ind)
                    .is_some_and(|set| set.contains(&st.id))
            })
        })
    }

    /// Drop every reverse set.
    pub fn clear(&mut self) {
        self.towns.clear();
        self.industries.clear();
    }

    /// React to the house at `tile` of `town` having been demolished.
    ///
    /// A station whose catchment covered the tile stays linked to the town
    /// only if it still covers another of the town's houses. Returns the
    /// number of stations unlinked.
    pub fn on_house_removed(
        &mut self,
        pool: &StationPool,
        map: &TileMap,
        town: TownId,
        tile: TileIndex,
    ) -> usize {
        let Some(set) = self.towns.get_mut(&town) else {
            return 0;
        };
        let before = set.len();
        set.retain(|id| {
            pool.get(*id).is_none_or(|st| {
                !st.tile_is_in_catchment(tile) || Self::catchment_covers_town(st, town, map)
            })
        });
        let removed = before.saturating_sub(set.len());
        if set.is_empty() {
            self.towns.remove(&town);
        }
        if removed > 0 {
            debug!(%town, %tile, removed, "stations unlinked from town");
        }
        removed
    }
}
