//! Link graphs: one connected routing component per cargo.
//!
//! A [`LinkGraph`] holds one [`Node`] per participating station and a
//! directed [`Edge`] per observed link between two stations. Nodes are keyed
//! by a stable [`NodeId`] that is never renumbered, so a station's goods
//! entry can keep referencing its node while other nodes come and go.
//!
//! [`LinkGraphs`] is the pool of all graphs. Handles are reused only after
//! a graph has been retired.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use terminus_types::{CargoId, LinkGraphId, NodeId, StationId};

use crate::error::LinkGraphError;

/// A directed link between two stations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Monthly capacity observed on this link.
    pub capacity: u32,
    /// Monthly usage observed on this link.
    pub usage: u32,
    /// Tick of the last capacity refresh. `None` means the link was never
    /// refreshed and carries no live flow.
    pub last_update: Option<u64>,
}

/// A station's vertex in a link graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Station this node represents.
    pub station: StationId,
    /// Outbound edges keyed by destination node.
    edges: BTreeMap<NodeId, Edge>,
}

impl Node {
    const fn new(station: StationId) -> Self {
        Self {
            station,
            edges: BTreeMap::new(),
        }
    }

    /// Outbound edge to `to`, if one exists.
    pub fn edge(&self, to: NodeId) -> Option<&Edge> {
        self.edges.get(&to)
    }

    /// Iterate over outbound edges.
    pub fn edges(&self) -> impl Iterator<Item = (&NodeId, &Edge)> {
        self.edges.iter()
    }
}

/// A connected routing component for a single cargo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkGraph {
    id: LinkGraphId,
    cargo: CargoId,
    nodes: BTreeMap<NodeId, Node>,
    next_node: u16,
}

impl LinkGraph {
    /// Create an empty graph routing `cargo`.
    pub const fn new(id: LinkGraphId, cargo: CargoId) -> Self {
        Self {
            id,
            cargo,
            nodes: BTreeMap::new(),
            next_node: 0,
        }
    }

    /// The graph's handle.
    pub const fn id(&self) -> LinkGraphId {
        self.id
    }

    /// The cargo this graph routes.
    pub const fn cargo(&self) -> CargoId {
        self.cargo
    }

    /// Number of nodes.
    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes left.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a node for `station` and return its handle.
    pub fn add_node(&mut self, station: StationId) -> NodeId {
        // Skip handles still in use after a wrap-around.
        let mut candidate = NodeId::new(self.next_node);
        while self.nodes.contains_key(&candidate) {
            candidate = NodeId::new(candidate.into_inner().wrapping_add(1));
        }
        self.next_node = candidate.into_inner().wrapping_add(1);
        self.nodes.insert(candidate, Node::new(station));
        candidate
    }

    /// Remove `node` and every edge pointing at it.
    ///
    /// # Errors
    ///
    /// Returns [`LinkGraphError::NodeNotFound`] if the node does not exist.
    pub fn remove_node(&mut self, node: NodeId) -> Result<Node, LinkGraphError> {
        let removed = self.nodes.remove(&node).ok_or(LinkGraphError::NodeNotFound {
            graph: self.id,
            node,
        })?;
        for other in self.nodes.values_mut() {
            other.edges.remove(&node);
        }
        Ok(removed)
    }

    /// Look up a node.
    pub fn node(&self, node: NodeId) -> Option<&Node> {
        self.nodes.get(&node)
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = (&NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Edge from `from` to `to`, if both nodes and the edge exist.
    pub fn edge(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.nodes.get(&from).and_then(|n| n.edge(to))
    }

    /// Record capacity on the link `from -> to`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`LinkGraphError::NodeNotFound`] if either endpoint is missing.
    pub fn update_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        capacity: u32,
        usage: u32,
        tick: u64,
    ) -> Result<(), LinkGraphError> {
        if !self.nodes.contains_key(&to) {
            return Err(LinkGraphError::NodeNotFound {
                graph: self.id,
                node: to,
            });
        }
        let source = self.nodes.get_mut(&from).ok_or(LinkGraphError::NodeNotFound {
            graph: self.id,
            node: from,
        })?;
        let edge = source.edges.entry(to).or_default();
        edge.capacity = edge.capacity.saturating_add(capacity);
        edge.usage = edge.usage.saturating_add(usage);
        edge.last_update = Some(tick);
        Ok(())
    }

    /// Add an edge that has never been refreshed (no live flow).
    ///
    /// # Errors
    ///
    /// Returns [`LinkGraphError::NodeNotFound`] if either endpoint is missing.
    pub fn add_stale_edge(&mut self, from: NodeId, to: NodeId) -> Result<(), LinkGraphError> {
        if !self.nodes.contains_key(&to) {
            return Err(LinkGraphError::NodeNotFound {
                graph: self.id,
                node: to,
            });
        }
        let source = self.nodes.get_mut(&from).ok_or(LinkGraphError::NodeNotFound {
            graph: self.id,
            node: from,
        })?;
        source.edges.entry(to).or_default();
        Ok(())
    }
}

/// Pool of all link graphs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkGraphs {
    graphs: BTreeMap<LinkGraphId, LinkGraph>,
}

impl LinkGraphs {
    /// Create an empty pool.
    pub const fn new() -> Self {
        Self {
            graphs: BTreeMap::new(),
        }
    }

    /// Create a new empty graph for `cargo`, reusing the lowest free handle.
    ///
    /// # Errors
    ///
    /// Returns [`LinkGraphError::PoolExhausted`] if every handle is taken.
    pub fn create(&mut self, cargo: CargoId) -> Result<LinkGraphId, LinkGraphError> {
        let id = (0..=u16::MAX)
            .map(LinkGraphId::new)
            .find(|id| !self.graphs.contains_key(id))
            .ok_or(LinkGraphError::PoolExhausted)?;
        self.graphs.insert(id, LinkGraph::new(id, cargo));
        Ok(id)
    }

    /// Look up a graph.
    pub fn graph(&self, id: LinkGraphId) -> Option<&LinkGraph> {
        self.graphs.get(&id)
    }

    /// Look up a graph mutably.
    pub fn graph_mut(&mut self, id: LinkGraphId) -> Option<&mut LinkGraph> {
        self.graphs.get_mut(&id)
    }

    /// Dispose of a graph and free its handle.
    pub fn retire(&mut self, id: LinkGraphId) -> Option<LinkGraph> {
        let retired = self.graphs.remove(&id);
        if retired.is_some() {
            tracing::info!(graph = %id, "link graph retired");
        }
        retired
    }

    /// Number of live graphs.
    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    /// Whether no graphs exist.
    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_node_graph() -> (LinkGraph, NodeId, NodeId) {
        let mut lg = LinkGraph::new(LinkGraphId::new(0), CargoId::new(1));
        let a = lg.add_node(StationId::new(10));
        let b = lg.add_node(StationId::new(11));
        (lg, a, b)
    }

    #[test]
    fn update_edge_sets_last_update() {
        let (mut lg, a, b) = two_node_graph();
        assert!(lg.update_edge(a, b, 40, 10, 7).is_ok());
        let edge = lg.edge(a, b).copied().unwrap_or_default();
        assert_eq!(edge.capacity, 40);
        assert_eq!(edge.last_update, Some(7));
        assert!(lg.edge(b, a).is_none());
    }

    #[test]
    fn remove_node_drops_incoming_edges() {
        let (mut lg, a, b) = two_node_graph();
        let _ = lg.update_edge(a, b, 1, 0, 1);
        assert!(lg.remove_node(b).is_ok());
        assert_eq!(lg.size(), 1);
        assert!(lg.edge(a, b).is_none());
        assert!(lg.remove_node(b).is_err());
    }

    #[test]
    fn node_ids_are_stable_after_removal() {
        let (mut lg, a, b) = two_node_graph();
        let _ = lg.remove_node(a);
        let c = lg.add_node(StationId::new(12));
        assert_ne!(c, b);
        assert_eq!(lg.node(b).map(|n| n.station), Some(StationId::new(11)));
    }

    #[test]
    fn stale_edge_has_no_update() {
        let (mut lg, a, b) = two_node_graph();
        assert!(lg.add_stale_edge(a, b).is_ok());
        assert_eq!(lg.edge(a, b).and_then(|e| e.last_update), None);
    }

    #[test]
    fn pool_reuses_retired_handles() {
        let mut pool = LinkGraphs::new();
        let first = pool.create(CargoId::new(0)).ok();
        let second = pool.create(CargoId::new(0)).ok();
        assert_eq!(first, Some(LinkGraphId::new(0)));
        assert_eq!(second, Some(LinkGraphId::new(1)));
        assert!(pool.retire(LinkGraphId::new(0)).is_some());
        assert_eq!(pool.create(CargoId::new(2)).ok(), Some(LinkGraphId::new(0)));
        assert_eq!(pool.len(), 2);
    }
}
