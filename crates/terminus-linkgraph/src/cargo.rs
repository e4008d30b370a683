//! Cargo packets and per-station cargo lists.

use serde::{Deserialize, Serialize};
use terminus_types::StationId;

use crate::flow::FlowStatMap;

/// A batch of cargo units sharing the same origin and next hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoPacket {
    /// Station the cargo was first loaded at. `None` once that station has
    /// been destroyed.
    pub source: Option<StationId>,
    /// Number of cargo units.
    pub count: u32,
    /// Station the cargo should travel to next. `None` means any.
    pub next_hop: Option<StationId>,
}

impl CargoPacket {
    /// Create a packet of `count` units from `source` bound for `next_hop`.
    pub const fn new(source: StationId, count: u32, next_hop: Option<StationId>) -> Self {
        Self {
            source: Some(source),
            count,
            next_hop,
        }
    }
}

/// Cargo waiting at a station.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationCargoList {
    packets: Vec<CargoPacket>,
}

impl StationCargoList {
    /// Create an empty list.
    pub const fn new() -> Self {
        Self {
            packets: Vec::new(),
        }
    }

    /// Add a packet.
    pub fn append(&mut self, packet: CargoPacket) {
        self.packets.push(packet);
    }

    /// Total units waiting.
    pub fn total(&self) -> u32 {
        self.packets.iter().fold(0_u32, |acc, p| acc.saturating_add(p.count))
    }

    /// Units waiting for the given next hop.
    pub fn waiting_for(&self, next_hop: Option<StationId>) -> u32 {
        self.packets
            .iter()
            .filter(|p| p.next_hop == next_hop)
            .fold(0_u32, |acc, p| acc.saturating_add(p.count))
    }

    /// Iterate over packets.
    pub fn packets(&self) -> impl Iterator<Item = &CargoPacket> {
        self.packets.iter()
    }

    /// Discard every packet without delivering it. Returns the number of
    /// units dropped.
    pub fn truncate(&mut self) -> u32 {
        let dropped = self.total();
        self.packets.clear();
        dropped
    }

    /// Release storage during bulk pool cleanup, skipping any bookkeeping.
    pub fn on_clean_pool(&mut self) {
        self.packets = Vec::new();
    }

    /// Forget `station` as the source of every packet.
    pub fn invalidate_source(&mut self, station: StationId) {
        for packet in &mut self.packets {
            if packet.source == Some(station) {
                packet.source = None;
            }
        }
    }

    /// Reassign packets whose next hop is `avoid` to a new next hop taken
    /// from `flows`, never picking `avoid` or `avoid2`. Packets without an
    /// alternative are left bound for any station. `here` is used as the
    /// flow key for packets whose source is gone. Returns the units moved.
    pub fn reroute(
        &mut self,
        here: StationId,
        avoid: StationId,
        avoid2: StationId,
        flows: &FlowStatMap,
    ) -> u32 {
        let mut moved = 0_u32;
        for packet in &mut self.packets {
            if packet.next_hop != Some(avoid) {
                continue;
            }
            let origin = packet.source.unwrap_or(here);
            packet.next_hop = flows.get(origin).and_then(|s| s.best_via(avoid, avoid2));
            moved = moved.saturating_add(packet.count);
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: StationId = StationId::new(1);
    const B: StationId = StationId::new(2);
    const C: StationId = StationId::new(3);

    #[test]
    fn truncate_drops_everything() {
        let mut list = StationCargoList::new();
        list.append(CargoPacket::new(A, 10, Some(B)));
        list.append(CargoPacket::new(A, 5, None));
        assert_eq!(list.truncate(), 15);
        assert_eq!(list.total(), 0);
    }

    #[test]
    fn reroute_uses_alternative_via() {
        let mut flows = FlowStatMap::new();
        flows.add_flow(A, B, 10);
        flows.add_flow(A, C, 4);
        let mut list = StationCargoList::new();
        list.append(CargoPacket::new(A, 7, Some(B)));
        list.append(CargoPacket::new(A, 3, Some(C)));

        assert_eq!(list.reroute(A, B, A, &flows), 7);
        assert_eq!(list.waiting_for(Some(C)), 10);
        assert_eq!(list.waiting_for(Some(B)), 0);
    }

    #[test]
    fn reroute_without_alternative_goes_anywhere() {
        let flows = FlowStatMap::new();
        let mut list = StationCargoList::new();
        list.append(CargoPacket::new(A, 7, Some(B)));
        assert_eq!(list.reroute(A, B, A, &flows), 7);
        assert_eq!(list.waiting_for(None), 7);
    }

    #[test]
    fn invalidate_source_clears_matching_packets() {
        let mut list = StationCargoList::new();
        list.append(CargoPacket::new(A, 1, None));
        list.append(CargoPacket::new(B, 1, None));
        list.invalidate_source(A);
        let sources: Vec<Option<StationId>> = list.packets().map(|p| p.source).collect();
        assert_eq!(sources, vec![None, Some(B)]);
    }
}
