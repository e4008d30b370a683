//! Per-station, per-cargo state owned by the flow subsystem.

use serde::{Deserialize, Serialize};
use terminus_types::{LinkGraphId, NodeId, StationId};

use crate::cargo::StationCargoList;
use crate::flow::FlowStatMap;

/// Everything the flow subsystem tracks for one cargo at one station.
///
/// The station holds this entry but does not own the graph: `link_graph`
/// and `node` are plain handles that may be absent until the cargo is
/// first routed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoodsEntry {
    /// Graph this station participates in for the cargo.
    pub link_graph: Option<LinkGraphId>,
    /// This station's node inside `link_graph`.
    pub node: Option<NodeId>,
    /// Flow table for the cargo.
    pub flows: FlowStatMap,
    /// Cargo waiting at the station.
    pub cargo: StationCargoList,
}

impl GoodsEntry {
    /// Reroute waiting cargo headed for `avoid` using this entry's own
    /// flow table, never choosing `avoid` or `avoid2`.
    pub fn reroute_cargo(&mut self, here: StationId, avoid: StationId, avoid2: StationId) -> u32 {
        let moved = self.cargo.reroute(here, avoid, avoid2, &self.flows);
        if moved > 0 {
            tracing::debug!(station = %here, %avoid, moved, "cargo rerouted");
        }
        moved
    }
}
