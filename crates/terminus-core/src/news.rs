//! Queued player-facing notifications.

use serde::{Deserialize, Serialize};
use terminus_types::StationId;

/// One queued notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    /// Tick the item was posted.
    pub tick: u64,
    /// Station the item is about, if any.
    pub station: Option<StationId>,
    /// Display text.
    pub headline: String,
}

/// Notifications waiting to be shown, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsFeed {
    items: Vec<NewsItem>,
}

impl NewsFeed {
    /// Create an empty feed.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Queue an item.
    pub fn post(&mut self, tick: u64, station: Option<StationId>, headline: impl Into<String>) {
        self.items.push(NewsItem {
            tick,
            station,
            headline: headline.into(),
        });
    }

    /// Drop every queued item about `station`. Returns how many were dropped.
    pub fn delete_station_news(&mut self, station: StationId) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.station != Some(station));
        before.saturating_sub(self.items.len())
    }

    /// Whether any queued item is about `station`.
    pub fn mentions(&self, station: StationId) -> bool {
        self.items.iter().any(|item| item.station == Some(station))
    }

    /// Queued items, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &NewsItem> {
        self.items.iter()
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drop everything.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
