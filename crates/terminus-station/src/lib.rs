//! Station bookkeeping for the Terminus simulation.
//!
//! A station keeps several derived indices that must agree with the map
//! and with each other: a bounding rect over its tiles, a catchment bitmap
//! derived from that rect, and links to the towns and industries the
//! catchment touches. This crate owns those indices and the rules that
//! keep them in step. Orchestration of creation and teardown lives in
//! `terminus-core`.
//!
//! # Modules
//!
//! - [`rect`] -- [`BoundingRect`], grown before tile placement, shrunk after removal
//! - [`catchment`] -- [`CatchmentSet`] bitmap, radius table, recompute passes
//! - [`nearby`] -- [`NearbyIndex`] reverse town/industry sets
//! - [`station`] -- [`Station`] record, facilities, airport storage
//! - [`pool`] -- [`StationPool`] with reusable handles
//! - [`settings`] -- [`StationSettings`]
//! - [`error`] -- [`StationError`]

pub mod catchment;
pub mod error;
pub mod nearby;
pub mod pool;
pub mod rect;
pub mod settings;
pub mod station;

pub use catchment::{
    CA_BUS, CA_DOCK, CA_NONE, CA_TRAIN, CA_TRUCK, CA_UNMODIFIED, CatchmentSet, MAX_CATCHMENT,
    recompute_catchment, recompute_catchment_for_all, tile_catchment_radius,
};
pub use error::StationError;
pub use nearby::NearbyIndex;
pub use pool::{MAX_STATIONS, StationPool};
pub use rect::BoundingRect;
pub use settings::StationSettings;
pub use station::{Airport, PersistentStorage, Station};
