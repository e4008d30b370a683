//! Human-readable summaries logged by the engine.

use std::collections::BTreeSet;

use terminus_core::maintenance::airport_maintenance_cost;
use terminus_core::{LifecyclePhase, PostDestroyHook, SimulationState};
use terminus_station::{NearbyIndex, StationPool};
use terminus_types::{CompanyId, StationId};
use tracing::{debug, info};

/// Base price of one airport upkeep unit used for the report.
const AIRPORT_BASE_PRICE: u64 = 400;

/// Teardown hook that logs every freed station handle.
#[derive(Debug, Default)]
pub struct TeardownLog {
    destroyed: usize,
}

impl TeardownLog {
    /// Create a hook with an empty count.
    pub const fn new() -> Self {
        Self { destroyed: 0 }
    }
}

impl PostDestroyHook for TeardownLog {
    fn teardown_started(
        &mut self,
        station: StationId,
        phase: LifecyclePhase,
        stations: &StationPool,
    ) {
        debug!(%station, ?phase, live = stations.len(), "station teardown begun");
    }

    fn post_destroy(&mut self, station: StationId, stations: &StationPool) {
        self.destroyed = self.destroyed.saturating_add(1);
        info!(
            %station,
            remaining = stations.len(),
            destroyed = self.destroyed,
            "station handle freed"
        );
    }
}

/// Log one line per station with its footprint and what it reaches, then
/// one line per company with its airport upkeep.
pub fn log_catchment_report(state: &SimulationState) {
    let map = state.world.map();
    let mut owners = BTreeSet::new();
    for st in state.stations.iter() {
        let towns = NearbyIndex::towns_near_station(st, map);
        let town_names: Vec<&str> = towns
            .iter()
            .filter_map(|t| state.world.town(*t))
            .map(|t| t.name.as_str())
            .collect();
        let industry_names: Vec<&str> = st
            .industries_near()
            .iter()
            .filter_map(|i| state.world.industry(*i))
            .map(|i| i.name.as_str())
            .collect();
        info!(
            station = %st.id,
            name = %st.name,
            anchor = %st.xy,
            station_tiles = st.station_tiles(),
            catchment_tiles = st.catchment().len(),
            radius = st.catchment_radius(&state.settings),
            towns = ?town_names,
            industries = ?industry_names,
            "station report"
        );
        if let Some(owner) = st.owner {
            owners.insert(owner);
        }
    }
    for owner in owners {
        log_owner_upkeep(&state.stations, owner);
    }
}

fn log_owner_upkeep(stations: &StationPool, owner: CompanyId) {
    let upkeep = airport_maintenance_cost(stations, owner, AIRPORT_BASE_PRICE);
    if upkeep > 0 {
        info!(%owner, upkeep, "airport upkeep");
    }
}
