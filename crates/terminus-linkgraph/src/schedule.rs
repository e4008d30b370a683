//! Job schedule for link graph recalculation.
//!
//! Graphs are queued for periodic flow recalculation. A graph that is
//! retired must be unqueued first so the scheduler never spawns a job for a
//! handle that has been freed (and may be reused).

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use terminus_types::LinkGraphId;

/// FIFO of graphs awaiting recalculation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkGraphSchedule {
    queue: VecDeque<LinkGraphId>,
}

impl LinkGraphSchedule {
    /// Create an empty schedule.
    pub const fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Append `graph` to the back of the queue unless it is already queued.
    pub fn queue(&mut self, graph: LinkGraphId) {
        if !self.queue.contains(&graph) {
            self.queue.push_back(graph);
        }
    }

    /// Remove `graph` from the queue. Returns whether it was queued.
    pub fn unqueue(&mut self, graph: LinkGraphId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|g| *g != graph);
        self.queue.len() != before
    }

    /// Whether `graph` is waiting in the queue.
    pub fn is_queued(&self, graph: LinkGraphId) -> bool {
        self.queue.contains(&graph)
    }

    /// Take the next graph to process and requeue it at the back.
    pub fn next_job(&mut self) -> Option<LinkGraphId> {
        let next = self.queue.pop_front()?;
        self.queue.push_back(next);
        Some(next)
    }

    /// Number of queued graphs.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
