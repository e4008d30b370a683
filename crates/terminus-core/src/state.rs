//! The mutable simulation state every lifecycle operation works on.

use rand::SeedableRng;
use rand::rngs::StdRng;
use terminus_linkgraph::{LinkGraphSchedule, LinkGraphs};
use terminus_station::{NearbyIndex, StationPool, StationSettings};
use terminus_world::{World, WorldError};

use crate::config::SimulationConfig;
use crate::news::NewsFeed;
use crate::spatial::StationSpatialIndex;

/// Everything a single simulation step mutates.
///
/// There is exactly one mutator; the lifecycle borrows the whole bundle
/// mutably for each operation.
#[derive(Debug)]
pub struct SimulationState {
    /// Tile map, towns, industries and vehicles.
    pub world: World,
    /// Live stations.
    pub stations: StationPool,
    /// Town and industry reverse sets.
    pub nearby: NearbyIndex,
    /// Flow graphs, one per connected cargo network.
    pub link_graphs: LinkGraphs,
    /// Graphs waiting for a routing job.
    pub schedule: LinkGraphSchedule,
    /// Nearest-station lookups.
    pub spatial: StationSpatialIndex,
    /// Queued notifications.
    pub news: NewsFeed,
    /// Station rules in force.
    pub settings: StationSettings,
    /// Source of station tie-break bits.
    pub rng: StdRng,
    /// Current simulation tick.
    pub tick: u64,
}

impl SimulationState {
    /// Build an empty world sized and seeded from `config`.
    pub fn new(config: &SimulationConfig) -> Result<Self, WorldError> {
        let world = World::new(config.world.size_x, config.world.size_y)?;
        Ok(Self {
            world,
            stations: StationPool::new(),
            nearby: NearbyIndex::new(),
            link_graphs: LinkGraphs::new(),
            schedule: LinkGraphSchedule::new(),
            spatial: StationSpatialIndex::new(config.world.size_x, config.world.size_y),
            news: NewsFeed::new(),
            settings: config.station.clone(),
            rng: StdRng::seed_from_u64(config.world.seed),
            tick: 0,
        })
    }

    /// Advance the clock by one tick.
    pub const fn advance(&mut self) {
        self.tick = self.tick.saturating_add(1);
    }
}
