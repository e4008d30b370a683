//! Pool of live stations with reusable identity handles.
//!
//! A handle is the station's slot index. Freed slots are reused lowest
//! first, so a handle only comes back after its previous owner is gone.

use serde::{Deserialize, Serialize};
use terminus_types::StationId;

use crate::error::StationError;
use crate::station::Station;

/// Maximum number of live stations.
pub const MAX_STATIONS: usize = 64_000;

/// Slot storage for stations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationPool {
    slots: Vec<Option<Station>>,
    capacity: usize,
    #[serde(skip)]
    cleaning: bool,
}

impl Default for StationPool {
    fn default() -> Self {
        Self::new()
    }
}

impl StationPool {
    /// An empty pool holding up to [`MAX_STATIONS`].
    pub const fn new() -> Self {
        Self::with_capacity(MAX_STATIONS)
    }

    /// An empty pool holding up to `capacity` stations.
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            cleaning: false,
        }
    }

    /// Claim the lowest free handle and store the station `make` builds
    /// for it.
    pub fn allocate(
        &mut self,
        make: impl FnOnce(StationId) -> Station,
    ) -> Result<StationId, StationError> {
        let index = self
            .slots
            .iter()
            .position(Option::is_none)
            .unwrap_or(self.slots.len());
        if index >= self.capacity {
            return Err(StationError::PoolExhausted {
                capacity: self.capacity,
            });
        }
        let raw = u16::try_from(index).map_err(|_too_many| StationError::PoolExhausted {
            capacity: self.capacity,
        })?;
        let id = StationId::new(raw);
        let station = make(id);
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(station);
        } else {
            self.slots.push(Some(station));
        }
        Ok(id)
    }

    /// Look up a station.
    pub fn get(&self, id: StationId) -> Option<&Station> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Look up a station for editing.
    pub fn get_mut(&mut self, id: StationId) -> Option<&mut Station> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Whether `id` resolves to a live station.
    pub fn contains(&self, id: StationId) -> bool {
        self.get(id).is_some()
    }

    /// Free the slot of `id`, returning the station that was in it.
    pub fn remove(&mut self, id: StationId) -> Option<Station> {
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    /// Live stations in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.slots.iter().flatten()
    }

    /// Live stations in handle order, mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Station> {
        self.slots.iter_mut().flatten()
    }

    /// Handles of live stations in handle order.
    pub fn ids(&self) -> Vec<StationId> {
        self.iter().map(|s| s.id).collect()
    }

    /// Number of live stations.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Whether no station is live.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Whether the whole pool is being torn down.
    pub const fn is_cleaning(&self) -> bool {
        self.cleaning
    }

    /// Take every station out of the pool for bulk cleanup.
    ///
    /// [`Self::is_cleaning`] reads `true` until [`Self::finish_cleaning`].
    pub fn drain_for_cleaning(&mut self) -> Vec<Station> {
        self.cleaning = true;
        self.slots.drain(..).flatten().collect()
    }

    /// End a bulk cleanup started with [`Self::drain_for_cleaning`].
    pub const fn finish_cleaning(&mut self) {
        self.cleaning = false;
    }
}
