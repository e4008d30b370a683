//! The world the station core lives in.
//!
//! Stations read the tile map to find their own tiles and the houses and
//! industries their catchment covers. Teardown scrubs vehicles. Nothing in
//! this crate knows about station internals; it only stores station
//! handles.
//!
//! # Modules
//!
//! - [`tile_map`] -- [`TileMap`] grid with a void border, [`Tile`] classification
//! - [`town`] -- [`Town`] records
//! - [`industry`] -- [`Industry`] records, cargo acceptance, neutral station binding
//! - [`vehicle`] -- [`Vehicle`] station references and [`Order`] lists
//! - [`world`] -- [`World`], the owner of all of the above
//! - [`error`] -- [`WorldError`]

pub mod error;
pub mod industry;
pub mod tile_map;
pub mod town;
pub mod vehicle;
pub mod world;

pub use error::WorldError;
pub use industry::Industry;
pub use tile_map::{Tile, TileMap};
pub use town::Town;
pub use vehicle::{Order, Vehicle};
pub use world::World;
