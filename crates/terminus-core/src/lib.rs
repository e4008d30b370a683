//! Station lifecycle orchestration for the Terminus simulation.
//!
//! This crate ties the station bookkeeping in `terminus-station` to the
//! world, the flow graphs and the other consumers of station identity. It
//! owns the ordered teardown that keeps every one of them consistent when a
//! station disappears.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `terminus-config.yaml` into
//!   strongly-typed structs.
//! - [`lifecycle`] -- [`StationLifecycle`]: construction, edits, teardown,
//!   bulk pool cleanup, post-destroy hooks.
//! - [`state`] -- [`SimulationState`], the bundle every operation mutates.
//! - [`spatial`] -- [`StationSpatialIndex`] nearest-station lookups.
//! - [`news`] -- [`NewsFeed`] of queued notifications.
//! - [`maintenance`] -- Airport upkeep.
//! - [`scenario`] -- YAML scenario loading.
//! - [`error`] -- [`LifecycleError`] and [`ScenarioError`].

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod maintenance;
pub mod news;
pub mod scenario;
pub mod spatial;
pub mod state;

pub use error::{LifecycleError, ScenarioError};
pub use lifecycle::{FacilityPlan, LifecyclePhase, PostDestroyHook, StationLifecycle};
pub use news::NewsFeed;
pub use spatial::StationSpatialIndex;
pub use state::SimulationState;
