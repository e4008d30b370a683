//! Station lifecycle: construction, edits, and ordered teardown.
//!
//! A station moves through four phases:
//!
//! 1. **Unbuilt** -- allocated but without facilities. A station whose last
//!    facility is removed reads as unbuilt again.
//! 2. **Active** -- at least one facility. The first facility fixes the
//!    anchor tile and the tie-break bits.
//! 3. **`TearingDown`** -- inside [`StationLifecycle::destroy_station`], which
//!    always runs to completion before returning.
//! 4. **Destroyed** -- the handle no longer resolves and may be reused.
//!
//! Teardown runs these steps in order:
//!
//! 1. Vehicles loading at the station leave; aircraft lose it as target.
//! 2. Flow graphs drop the station's node and every live flow through it;
//!    waiting cargo elsewhere is rerouted. Emptied graphs are retired.
//! 3. Vehicle back-references (last visited, last loading) are scrubbed.
//! 4. Reverse town/industry sets, the neutral industry binding and the
//!    spatial index forget the station.
//! 5. The airport's persistent storage is released.
//! 6. Orders to the station and queued news about it are dropped.
//! 7. Waiting cargo is truncated and cargo elsewhere stops naming the
//!    station as its source.
//!
//! The steps cannot fail: a dangling reference met on the way is logged
//! and skipped, so a station is either fully torn down or untouched. The
//! slot is freed after step 7, and only then do post-destroy hooks run.

use terminus_linkgraph::{LinkGraphError, LinkGraphSchedule, LinkGraphs};
use terminus_station::{
    Airport, Station, StationError, StationPool, recompute_catchment, recompute_catchment_for_all,
};
use terminus_types::{
    AirportType, Axis, CargoId, CompanyId, IndustryId, LinkGraphId, NodeId, RectMode,
    StationFacility, StationId, StationType, TileArea, TileIndex, VehicleId, VehicleType,
};
use terminus_world::{Tile, TileMap, WorldError};
use tracing::{debug, info, warn};

use crate::error::LifecycleError;
use crate::state::SimulationState;

/// Where a station is in its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// Allocated, no facilities.
    Unbuilt,
    /// Has at least one facility.
    Active,
    /// Being destroyed.
    TearingDown,
    /// Handle no longer resolves.
    Destroyed,
}

/// Consumer notified around station teardown.
///
/// [`Self::post_destroy`] sees the pool without the station, so "does this
/// handle still resolve" already answers no.
pub trait PostDestroyHook {
    /// Called once teardown of `station` has begun, before anything is
    /// released. `phase` is [`LifecyclePhase::TearingDown`].
    fn teardown_started(
        &mut self,
        station: StationId,
        phase: LifecyclePhase,
        stations: &StationPool,
    ) {
        let _ = (station, phase, stations);
    }

    /// Called once per destroyed station, after its slot was reclaimed.
    fn post_destroy(&mut self, station: StationId, stations: &StationPool);
}

/// One facility construction request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacilityPlan {
    /// Tile type to place.
    pub kind: StationType,
    /// Tiles to cover.
    pub area: TileArea,
    /// Platform axis for rail tiles.
    pub axis: Option<Axis>,
    /// Airport layout, for airport tiles.
    pub airport: Option<AirportType>,
    /// Building company; `None` for ownerless stations such as oil rigs.
    pub owner: Option<CompanyId>,
}

impl FacilityPlan {
    /// A plan for `kind` over `area` with no axis, layout or owner.
    pub const fn new(kind: StationType, area: TileArea) -> Self {
        Self {
            kind,
            area,
            axis: None,
            airport: None,
            owner: None,
        }
    }

    /// Set the platform axis.
    #[must_use]
    pub const fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Set the airport layout.
    #[must_use]
    pub const fn with_airport(mut self, airport: AirportType) -> Self {
        self.airport = Some(airport);
        self
    }

    /// Set the building company.
    #[must_use]
    pub const fn owned_by(mut self, owner: CompanyId) -> Self {
        self.owner = Some(owner);
        self
    }
}

/// Drives every station through its lifetime against one
/// [`SimulationState`].
pub struct StationLifecycle {
    state: SimulationState,
    hooks: Vec<Box<dyn PostDestroyHook>>,
    tearing_down: Option<StationId>,
}

impl core::fmt::Debug for StationLifecycle {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StationLifecycle")
            .field("stations", &self.state.stations.len())
            .field("hooks", &self.hooks.len())
            .field("tearing_down", &self.tearing_down)
            .finish_non_exhaustive()
    }
}

impl StationLifecycle {
    /// Wrap `state`.
    pub const fn new(state: SimulationState) -> Self {
        Self {
            state,
            hooks: Vec::new(),
            tearing_down: None,
        }
    }

    /// The state being driven.
    pub const fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Mutable access for world edits that do not go through a station,
    /// such as founding towns or registering vehicles.
    pub const fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    /// Give the state back.
    pub fn into_state(self) -> SimulationState {
        self.state
    }

    /// Register a post-destroy hook.
    pub fn register_hook(&mut self, hook: Box<dyn PostDestroyHook>) {
        self.hooks.push(hook);
    }

    /// Current phase of `id`.
    pub fn phase(&self, id: StationId) -> LifecyclePhase {
        if self.tearing_down == Some(id) {
            return LifecyclePhase::TearingDown;
        }
        match self.state.stations.get(id) {
            None => LifecyclePhase::Destroyed,
            Some(st) if st.facilities.is_empty() => LifecyclePhase::Unbuilt,
            Some(_) => LifecyclePhase::Active,
        }
    }

    const fn ensure_open(&self) -> Result<(), LifecycleError> {
        if self.state.stations.is_cleaning() {
            return Err(LifecycleError::PoolCleaning);
        }
        Ok(())
    }

    fn recompute(&mut self, id: StationId) -> Result<(), LifecycleError> {
        let s = &mut self.state;
        recompute_catchment(&mut s.stations, id, &s.world, &mut s.nearby, &s.settings, false)?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Construction and edits
    // -----------------------------------------------------------------------

    /// Allocate an unbuilt station named `name` near `tile`.
    pub fn create_station(
        &mut self,
        name: &str,
        tile: TileIndex,
    ) -> Result<StationId, LifecycleError> {
        self.ensure_open()?;
        let id = self
            .state
            .stations
            .allocate(|id| Station::new(id, name, tile))?;
        self.state.spatial.insert(id, tile);
        info!(station = %id, name, %tile, "station created");
        Ok(id)
    }

    /// Build a facility for `id` over `plan.area`.
    ///
    /// The rect is dry-run first and every tile checked, so a rejected
    /// plan changes nothing. On success the tiles are placed, the
    /// facility recorded and the catchment recomputed.
    pub fn add_facility(&mut self, id: StationId, plan: &FacilityPlan) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        let area = plan.area;
        if area.is_empty() {
            return Err(LifecycleError::EmptyArea);
        }
        let s = &mut self.state;
        let st = s
            .stations
            .get_mut(id)
            .ok_or(StationError::StationNotFound(id))?;

        st.rect
            .before_add_rect(area.tile, area.w, area.h, RectMode::Test, &s.settings)?;
        for tile in area {
            s.world.check_station_site(tile)?;
        }
        st.rect
            .before_add_rect(area.tile, area.w, area.h, RectMode::Try, &s.settings)?;
        for tile in area {
            s.world.place_station_tile(tile, id, plan.kind, plan.axis)?;
        }

        let map = s.world.map();
        match plan.kind {
            StationType::Rail => {
                st.train_station = Some(st.train_station.map_or(area, |a| union(a, area)));
            }
            StationType::Bus => st.bus_stops.extend(area.iter()),
            StationType::Truck => st.truck_stops.extend(area.iter()),
            StationType::Dock => {
                st.dock.get_or_insert(area.tile);
                add_docking_tiles(st, map, area);
            }
            StationType::Airport | StationType::OilRig => {
                let default_layout = if plan.kind == StationType::OilRig {
                    AirportType::OilRig
                } else {
                    AirportType::Small
                };
                st.airport = Some(Airport {
                    kind: plan.airport.unwrap_or(default_layout),
                    tile: area.tile,
                    psa: None,
                });
            }
            StationType::Buoy => {
                for tile in area {
                    if !st.docking_tiles.contains(&tile) {
                        st.docking_tiles.push(tile);
                    }
                }
            }
            StationType::Waypoint => {}
        }

        let first = st.facilities.is_empty();
        let facility = plan.kind.facility().unwrap_or(StationFacility::Waypoint);
        st.add_facility(facility, area.tile, plan.owner, s.tick, &mut s.rng);
        if first {
            s.spatial.insert(id, st.xy);
            s.news
                .post(s.tick, Some(id), format!("{} opens for business", st.name));
        }
        info!(
            station = %id,
            kind = ?plan.kind,
            tiles = area.tile_count(),
            first,
            "facility built"
        );
        self.recompute(id)
    }

    /// Remove every station tile of `id` in `area`.
    ///
    /// Returns whether the station is left with no tiles at all. Facilities
    /// whose last tile went are dropped from the station.
    pub fn remove_tiles(&mut self, id: StationId, area: TileArea) -> Result<bool, LifecycleError> {
        self.ensure_open()?;
        if area.is_empty() {
            return Err(LifecycleError::EmptyArea);
        }
        let s = &mut self.state;
        let st = s
            .stations
            .get_mut(id)
            .ok_or(StationError::StationNotFound(id))?;
        if let Some(tile) = area
            .iter()
            .find(|t| !s.world.map().is_station_tile_of(*t, id))
        {
            return Err(LifecycleError::NotStationTile { station: id, tile });
        }
        for tile in area {
            s.world.remove_station_tile(tile)?;
        }

        let map = s.world.map();
        let now_empty = if area.tile_count() == 1 {
            st.rect.after_remove_tile(map, id, area.tile)
        } else {
            st.rect.after_remove_rect(map, id, area)
        };
        refresh_facilities(st, map);
        debug!(station = %id, tiles = area.tile_count(), now_empty, "station tiles removed");
        self.recompute(id)?;
        Ok(now_empty)
    }

    /// Bind `id` exclusively to the neutral industry `industry` and
    /// recompute its catchment.
    ///
    /// An industry serves at most one station this way; binding it to a
    /// second station fails with [`LifecycleError::IndustryAlreadyBound`].
    /// A station moving to another industry releases its previous one.
    pub fn link_industry(
        &mut self,
        id: StationId,
        industry: IndustryId,
    ) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        let s = &mut self.state;
        let st = s
            .stations
            .get_mut(id)
            .ok_or(StationError::StationNotFound(id))?;
        let bound = s
            .world
            .industry(industry)
            .ok_or(WorldError::IndustryNotFound(industry))?
            .neutral_station;
        if let Some(other) = bound.filter(|other| *other != id) {
            return Err(LifecycleError::IndustryAlreadyBound {
                industry,
                station: other,
            });
        }
        let previous = st
            .industry
            .filter(|prev| *prev != industry)
            .filter(|prev| {
                s.world
                    .industry(*prev)
                    .is_some_and(|i| i.neutral_station == Some(id))
            });
        if let Some(prev) = previous {
            s.world.set_neutral_station(prev, None)?;
            s.nearby.unbind_industry(st, prev);
            debug!(station = %id, industry = %prev, "previous neutral binding released");
        }
        s.world.set_neutral_station(industry, Some(id))?;
        st.industry = Some(industry);
        info!(station = %id, %industry, "station bound to neutral industry");
        self.recompute(id)
    }

    /// Give `id` a node for `cargo`, in `graph` if given or in a new graph
    /// otherwise. A station already joined for `cargo` keeps its node.
    pub fn join_flow_graph(
        &mut self,
        id: StationId,
        cargo: CargoId,
        graph: Option<LinkGraphId>,
    ) -> Result<(LinkGraphId, NodeId), LifecycleError> {
        self.ensure_open()?;
        let s = &mut self.state;
        let st = s
            .stations
            .get_mut(id)
            .ok_or(StationError::StationNotFound(id))?;
        if let Some(joined) = st
            .goods
            .get(&cargo)
            .and_then(|g| g.link_graph.zip(g.node))
        {
            return Ok(joined);
        }

        let graph_id = match graph {
            Some(g) => g,
            None => s.link_graphs.create(cargo)?,
        };
        let lg = s
            .link_graphs
            .graph_mut(graph_id)
            .ok_or(LinkGraphError::GraphNotFound(graph_id))?;
        if lg.cargo() != cargo {
            return Err(LinkGraphError::CargoMismatch {
                graph: graph_id,
                expected: lg.cargo(),
                actual: cargo,
            }
            .into());
        }
        let node = lg.add_node(id);
        let goods = st.goods.entry(cargo).or_default();
        goods.link_graph = Some(graph_id);
        goods.node = Some(node);
        s.schedule.queue(graph_id);
        debug!(station = %id, %cargo, graph = %graph_id, %node, "station joined flow graph");
        Ok((graph_id, node))
    }

    /// Open a two-way `cargo` link between `a` and `b` carrying `capacity`,
    /// with live edges in both directions and a flow from each station
    /// through the other.
    pub fn connect(
        &mut self,
        cargo: CargoId,
        a: StationId,
        b: StationId,
        capacity: u32,
    ) -> Result<LinkGraphId, LifecycleError> {
        let (graph, node_a) = self.join_flow_graph(a, cargo, None)?;
        let joined = self
            .state
            .stations
            .get(b)
            .and_then(|st| st.goods.get(&cargo))
            .and_then(|g| g.link_graph);
        if let Some(other) = joined.filter(|g| *g != graph) {
            return Err(LifecycleError::SeparateGraphs {
                cargo,
                first: graph,
                second: other,
            });
        }
        let (_, node_b) = self.join_flow_graph(b, cargo, Some(graph))?;

        let s = &mut self.state;
        let lg = s
            .link_graphs
            .graph_mut(graph)
            .ok_or(LinkGraphError::GraphNotFound(graph))?;
        lg.update_edge(node_a, node_b, capacity, 0, s.tick)?;
        lg.update_edge(node_b, node_a, capacity, 0, s.tick)?;
        for (here, via) in [(a, b), (b, a)] {
            if let Some(goods) = s
                .stations
                .get_mut(here)
                .and_then(|st| st.goods.get_mut(&cargo))
            {
                goods.flows.add_flow(here, via, capacity);
            }
        }
        debug!(%cargo, %a, %b, capacity, %graph, "stations connected");
        Ok(graph)
    }

    /// Vehicle `vehicle` starts loading at `station`, leaving whatever
    /// station it was loading at before.
    pub fn begin_loading(
        &mut self,
        vehicle: VehicleId,
        station: StationId,
    ) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        let s = &mut self.state;
        if !s.stations.contains(station) {
            return Err(StationError::StationNotFound(station).into());
        }
        let v = s.world.vehicle_mut(vehicle)?;
        let previous = v.leave_station();
        v.begin_loading(station);
        if let Some(prev) = previous.and_then(|p| s.stations.get_mut(p)) {
            prev.loading_vehicles.retain(|other| *other != vehicle);
        }
        if let Some(st) = s
            .stations
            .get_mut(station)
            .filter(|st| !st.loading_vehicles.contains(&vehicle))
        {
            st.loading_vehicles.push(vehicle);
        }
        Ok(())
    }

    /// Demolish the house at `tile` and unlink stations that no longer
    /// reach its town. Returns how many stations were unlinked.
    pub fn remove_house(&mut self, tile: TileIndex) -> Result<usize, LifecycleError> {
        let s = &mut self.state;
        let town = s.world.remove_house(tile)?;
        Ok(s
            .nearby
            .on_house_removed(&s.stations, s.world.map(), town, tile))
    }

    /// Recompute every station's catchment and rebuild every reverse set
    /// and the spatial index from scratch.
    pub fn recompute_all(&mut self) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        let s = &mut self.state;
        recompute_catchment_for_all(&mut s.stations, &s.world, &mut s.nearby, &s.settings)?;
        s.spatial.rebuild(&s.stations);
        info!(stations = s.stations.len(), "all catchments recomputed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------------

    /// Destroy station `id`, releasing its tiles and every reference to it.
    ///
    /// See the module docs for the step order. Hooks hear
    /// [`PostDestroyHook::teardown_started`] first. The slot is freed before
    /// any post-destroy hook runs. Only an unknown handle or a pool being
    /// cleaned is refused; once started, teardown always completes.
    pub fn destroy_station(&mut self, id: StationId) -> Result<(), LifecycleError> {
        self.ensure_open()?;
        if !self.state.stations.contains(id) {
            return Err(StationError::StationNotFound(id).into());
        }
        self.tearing_down = Some(id);
        let phase = self.phase(id);
        info!(station = %id, ?phase, "station teardown started");
        for hook in &mut self.hooks {
            hook.teardown_started(id, phase, &self.state.stations);
        }

        self.run_teardown(id);
        self.tearing_down = None;

        self.state.stations.remove(id);
        info!(station = %id, "station destroyed");
        self.on_post_destroy(id);
        Ok(())
    }

    fn run_teardown(&mut self, id: StationId) {
        self.release_footprint(id);
        self.evict_vehicles(id);
        self.detach_flow_graphs(id);
        self.scrub_vehicle_refs(id);
        self.forget_station(id);
        self.release_storage(id);
        self.drop_orders_and_news(id);
        self.drain_cargo(id);
    }

    /// Clear the station's remaining tiles from the map.
    fn release_footprint(&mut self, id: StationId) {
        let s = &mut self.state;
        let Some(st) = s.stations.get_mut(id) else {
            return;
        };
        let Some(area) = st.rect.tile_area() else {
            return;
        };
        let mut released = 0_usize;
        for tile in area {
            match s.world.release_footprint(tile, id) {
                Ok(true) => released = released.saturating_add(1),
                Ok(false) => {}
                Err(err) => {
                    warn!(station = %id, %tile, %err, "footprint tile not released");
                }
            }
        }
        st.rect.make_empty();
        refresh_facilities(st, s.world.map());
        debug!(station = %id, released, "station footprint released");
    }

    /// Step 1: loading vehicles leave and aircraft drop the airport.
    fn evict_vehicles(&mut self, id: StationId) {
        let s = &mut self.state;
        let loading = s
            .stations
            .get_mut(id)
            .map(|st| core::mem::take(&mut st.loading_vehicles))
            .unwrap_or_default();
        for vehicle in &loading {
            match s.world.vehicle_mut(*vehicle) {
                Ok(v) => {
                    v.leave_station();
                }
                Err(err) => warn!(station = %id, %vehicle, %err, "loading vehicle not registered"),
            }
        }
        for v in s.world.vehicles_mut() {
            if v.kind == VehicleType::Aircraft && v.target_airport == Some(id) {
                v.target_airport = None;
            }
        }
        debug!(station = %id, evicted = loading.len(), "vehicles left station");
    }

    /// Step 2: every flow graph forgets the station.
    fn detach_flow_graphs(&mut self, id: StationId) {
        let s = &mut self.state;
        let joined: Vec<(CargoId, LinkGraphId, NodeId)> = s
            .stations
            .get(id)
            .map(|st| {
                st.goods
                    .iter()
                    .filter_map(|(cargo, g)| Some((*cargo, g.link_graph?, g.node?)))
                    .collect()
            })
            .unwrap_or_default();

        for (cargo, graph_id, node) in joined {
            let Some(graph) = s.link_graphs.graph_mut(graph_id) else {
                warn!(station = %id, graph = %graph_id, "station names a missing link graph");
                continue;
            };
            let peers: Vec<(StationId, bool)> = graph
                .nodes()
                .filter(|(n, _)| **n != node)
                .map(|(n, peer)| {
                    let live = graph
                        .edge(*n, node)
                        .is_some_and(|e| e.last_update.is_some());
                    (peer.station, live)
                })
                .collect();

            for (peer, live) in peers {
                let Some(goods) = s
                    .stations
                    .get_mut(peer)
                    .and_then(|st| st.goods.get_mut(&cargo))
                else {
                    continue;
                };
                goods.flows.erase_origin(id);
                if live {
                    goods.flows.delete_flows(id);
                    goods.reroute_cargo(peer, id, peer);
                }
            }

            match graph.remove_node(node) {
                Ok(_) => {
                    debug!(station = %id, %cargo, graph = %graph_id, %node, "flow node removed");
                }
                Err(err) => {
                    warn!(station = %id, %cargo, %err, "station names a missing flow node");
                }
            }
            if graph.is_empty() {
                s.schedule.unqueue(graph_id);
                s.link_graphs.retire(graph_id);
                info!(graph = %graph_id, %cargo, "link graph retired");
            }
        }
    }

    /// Step 3: vehicles forget where they last stopped and loaded.
    fn scrub_vehicle_refs(&mut self, id: StationId) {
        for v in self.state.world.vehicles_mut() {
            v.scrub_station_refs(id);
        }
    }

    /// Step 4: reverse sets, the neutral binding and the spatial index.
    fn forget_station(&mut self, id: StationId) {
        let s = &mut self.state;
        s.nearby.remove_from_all_nearby_lists(id);
        let bound = s.stations.get(id).and_then(|st| st.industry).filter(|industry| {
            s.world
                .industry(*industry)
                .is_some_and(|i| i.neutral_station == Some(id))
        });
        let released =
            bound.map(|industry| (industry, s.world.set_neutral_station(industry, None)));
        if let Some((industry, Err(err))) = released {
            warn!(station = %id, %industry, %err, "neutral binding not released");
        }
        s.spatial.remove(id);
    }

    /// Step 5.
    fn release_storage(&mut self, id: StationId) {
        let psa = self
            .state
            .stations
            .get_mut(id)
            .and_then(|st| st.airport.as_mut())
            .and_then(|airport| airport.psa.take());
        if psa.is_some() {
            debug!(station = %id, "airport storage released");
        }
    }

    /// Step 6: orders to the station and news about it.
    fn drop_orders_and_news(&mut self, id: StationId) {
        let s = &mut self.state;
        let orders = s
            .world
            .vehicles_mut()
            .map(|v| v.remove_orders_to(id))
            .fold(0_usize, usize::saturating_add);
        let news = s.news.delete_station_news(id);
        debug!(station = %id, orders, news, "orders and news dropped");
    }

    /// Step 7: truncate waiting cargo and untag packets elsewhere.
    fn drain_cargo(&mut self, id: StationId) {
        let s = &mut self.state;
        let truncated = s.stations.get_mut(id).map_or(0, |st| {
            st.goods
                .values_mut()
                .map(|g| g.cargo.truncate())
                .fold(0_u32, u32::saturating_add)
        });
        for st in s.stations.iter_mut().filter(|st| st.id != id) {
            for goods in st.goods.values_mut() {
                goods.cargo.invalidate_source(id);
            }
        }
        debug!(station = %id, truncated, "station cargo drained");
    }

    /// Run every post-destroy hook for `id`. Called by
    /// [`Self::destroy_station`] once the slot is free.
    pub fn on_post_destroy(&mut self, id: StationId) {
        for hook in &mut self.hooks {
            hook.post_destroy(id, &self.state.stations);
        }
    }

    /// Discard every station at once for shutdown.
    ///
    /// Only waiting cargo is flushed; cross-references are not scrubbed
    /// station by station. Reverse sets, flow graphs, the spatial index and
    /// queued news are reset wholesale. Returns how many stations were
    /// discarded.
    pub fn clean_pool(&mut self) -> usize {
        let s = &mut self.state;
        let drained = s.stations.drain_for_cleaning();
        let mut ids = Vec::with_capacity(drained.len());
        for mut st in drained {
            for goods in st.goods.values_mut() {
                goods.cargo.on_clean_pool();
            }
            ids.push(st.id);
        }
        s.nearby.clear();
        s.spatial.clear();
        s.news.clear();
        s.link_graphs = LinkGraphs::new();
        s.schedule = LinkGraphSchedule::new();
        s.stations.finish_cleaning();
        for id in &ids {
            self.on_post_destroy(*id);
        }
        info!(stations = ids.len(), "station pool cleaned");
        ids.len()
    }
}

/// Smallest area covering both `a` and `b`.
fn union(a: TileArea, b: TileArea) -> TileArea {
    let (Some(a_end), Some(b_end)) = (a.end_tile(), b.end_tile()) else {
        return if a.is_empty() { b } else { a };
    };
    TileArea::from_corners(
        TileIndex::new(a.tile.x.min(b.tile.x), a.tile.y.min(b.tile.y)),
        TileIndex::new(a_end.x.max(b_end.x), a_end.y.max(b_end.y)),
    )
}

const NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

fn add_docking_tiles(st: &mut Station, map: &TileMap, area: TileArea) {
    for tile in area {
        for (dx, dy) in NEIGHBOURS {
            let Some(next) = tile
                .offset(dx, dy)
                .filter(|n| !area.contains(*n) && map.get(*n) == Tile::Water)
            else {
                continue;
            };
            if !st.docking_tiles.contains(&next) {
                st.docking_tiles.push(next);
            }
        }
    }
}

/// A docking tile is either one of the station's buoys or water next to
/// one of its dock tiles.
fn is_docking_tile(map: &TileMap, id: StationId, tile: TileIndex) -> bool {
    let own = |t: TileIndex, kind: StationType| {
        map.is_station_tile_of(t, id) && map.station_type_at(t) == Some(kind)
    };
    own(tile, StationType::Buoy)
        || NEIGHBOURS.iter().any(|(dx, dy)| {
            tile.offset(*dx, *dy)
                .is_some_and(|n| own(n, StationType::Dock))
        })
}

/// Bring per-facility fields and flags back in line with the map after
/// tiles were removed.
fn refresh_facilities(st: &mut Station, map: &TileMap) {
    let id = st.id;
    let own = |t: TileIndex, kind: StationType| {
        map.is_station_tile_of(t, id) && map.station_type_at(t) == Some(kind)
    };
    let remaining = st.rect.tile_area();
    let any_left = |kind: StationType| remaining.is_some_and(|a| a.iter().any(|t| own(t, kind)));

    st.bus_stops.retain(|t| own(*t, StationType::Bus));
    st.truck_stops.retain(|t| own(*t, StationType::Truck));
    if !any_left(StationType::Rail) {
        st.train_station = None;
    }
    if st.dock.is_some_and(|t| !own(t, StationType::Dock)) {
        st.dock = remaining.and_then(|a| a.iter().find(|t| own(*t, StationType::Dock)));
    }
    st.docking_tiles.retain(|t| is_docking_tile(map, id, *t));
    if !any_left(StationType::Airport) && !any_left(StationType::OilRig) {
        st.airport = None;
    }

    let present = [
        (StationFacility::Train, st.train_station.is_some()),
        (StationFacility::BusStop, !st.bus_stops.is_empty()),
        (StationFacility::TruckStop, !st.truck_stops.is_empty()),
        (StationFacility::Dock, st.dock.is_some()),
        (StationFacility::Airport, st.airport.is_some()),
        (
            StationFacility::Waypoint,
            any_left(StationType::Buoy) || any_left(StationType::Waypoint),
        ),
    ];
    for (facility, on) in present {
        if !on {
            st.facilities.remove(facility);
        }
    }
}
