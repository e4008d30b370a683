//! Per-station flow tables.
//!
//! For each origin station, a [`FlowStat`] records how cargo that came from
//! that origin is split across next-hop ("via") stations. A station keeps
//! one [`FlowStatMap`] per cargo.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use terminus_types::StationId;

/// Distribution of one origin's cargo across next hops.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStat {
    shares: BTreeMap<StationId, u32>,
}

impl FlowStat {
    /// Add `amount` to the share routed via `via`.
    pub fn add_share(&mut self, via: StationId, amount: u32) {
        let share = self.shares.entry(via).or_insert(0);
        *share = share.saturating_add(amount);
    }

    /// Share routed via `via`.
    pub fn share(&self, via: StationId) -> u32 {
        self.shares.get(&via).copied().unwrap_or(0)
    }

    /// Drop the share routed via `via`.
    pub fn remove_via(&mut self, via: StationId) -> bool {
        self.shares.remove(&via).is_some()
    }

    /// Whether no share remains.
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// The via with the largest share, skipping `avoid` and `avoid2`.
    /// Ties resolve to the lowest station handle.
    pub fn best_via(&self, avoid: StationId, avoid2: StationId) -> Option<StationId> {
        self.shares
            .iter()
            .filter(|(via, amount)| **via != avoid && **via != avoid2 && **amount > 0)
            .fold(None, |best: Option<(StationId, u32)>, (via, amount)| match best {
                Some((_, top)) if top >= *amount => best,
                _ => Some((*via, *amount)),
            })
            .map(|(via, _)| via)
    }

    /// Iterate over `(via, share)` pairs.
    pub fn shares(&self) -> impl Iterator<Item = (&StationId, &u32)> {
        self.shares.iter()
    }
}

/// All flows of one cargo at one station, keyed by origin station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStatMap {
    flows: BTreeMap<StationId, FlowStat>,
}

impl FlowStatMap {
    /// Create an empty flow table.
    pub const fn new() -> Self {
        Self {
            flows: BTreeMap::new(),
        }
    }

    /// Record `amount` of cargo from `origin` routed via `via`.
    pub fn add_flow(&mut self, origin: StationId, via: StationId, amount: u32) {
        self.flows.entry(origin).or_default().add_share(via, amount);
    }

    /// Flow record for cargo originating at `origin`.
    pub fn get(&self, origin: StationId) -> Option<&FlowStat> {
        self.flows.get(&origin)
    }

    /// Drop the whole record for cargo originating at `origin`.
    pub fn erase_origin(&mut self, origin: StationId) -> bool {
        self.flows.remove(&origin).is_some()
    }

    /// Remove `via` as a next hop from every record, dropping records that
    /// become empty. Returns the number of records touched.
    pub fn delete_flows(&mut self, via: StationId) -> usize {
        let mut touched = 0_usize;
        self.flows.retain(|_, stat| {
            if stat.remove_via(via) {
                touched = touched.saturating_add(1);
            }
            !stat.is_empty()
        });
        touched
    }

    /// Whether any record mentions `station` as origin or via.
    pub fn references(&self, station: StationId) -> bool {
        self.flows.contains_key(&station) || self.flows.values().any(|s| s.share(station) > 0)
    }

    /// Number of origin records.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: StationId = StationId::new(1);
    const B: StationId = StationId::new(2);
    const C: StationId = StationId::new(3);

    #[test]
    fn delete_flows_drops_empty_records() {
        let mut map = FlowStatMap::new();
        map.add_flow(A, B, 10);
        map.add_flow(C, B, 5);
        map.add_flow(C, A, 5);
        assert_eq!(map.delete_flows(B), 2);
        assert!(map.get(A).is_none());
        assert_eq!(map.get(C).map(|s| s.share(A)), Some(5));
        assert!(!map.references(B));
    }

    #[test]
    fn erase_origin_only_touches_that_origin() {
        let mut map = FlowStatMap::new();
        map.add_flow(A, B, 10);
        map.add_flow(B, A, 10);
        assert!(map.erase_origin(A));
        assert!(!map.erase_origin(A));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn best_via_skips_avoided_stations() {
        let mut stat = FlowStat::default();
        stat.add_share(A, 50);
        stat.add_share(B, 30);
        stat.add_share(C, 30);
        assert_eq!(stat.best_via(A, A), Some(B));
        assert_eq!(stat.best_via(A, B), Some(C));
        assert_eq!(stat.best_via(A, C), Some(B));
    }
}
