//! Cargo flow graphs for the Terminus station core.
//!
//! This crate is the flow-routing subsystem the station core talks to. It
//! does not compute routes itself; it stores the graphs, flow tables and
//! waiting cargo that a routing job would read and write, and exposes the
//! small contract station teardown relies on: drop a node, delete flows via
//! a station, reroute cargo, and retire an empty graph.
//!
//! # Modules
//!
//! - [`graph`] -- [`LinkGraph`] nodes and edges, the [`LinkGraphs`] pool
//! - [`flow`] -- [`FlowStat`] / [`FlowStatMap`] per-origin next-hop shares
//! - [`cargo`] -- [`CargoPacket`] and [`StationCargoList`]
//! - [`goods`] -- [`GoodsEntry`], the per-station per-cargo bundle
//! - [`schedule`] -- [`LinkGraphSchedule`] job queue
//! - [`error`] -- [`LinkGraphError`]

pub mod cargo;
pub mod error;
pub mod flow;
pub mod goods;
pub mod graph;
pub mod schedule;

pub use cargo::{CargoPacket, StationCargoList};
pub use error::LinkGraphError;
pub use flow::{FlowStat, FlowStatMap};
pub use goods::GoodsEntry;
pub use graph::{Edge, LinkGraph, LinkGraphs, Node};
pub use schedule::LinkGraphSchedule;
