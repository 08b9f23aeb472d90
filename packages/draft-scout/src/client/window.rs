//! Sliding window of recent request timestamps.

use std::collections::VecDeque;
use std::time::Duration;
use tokio::time::Instant;

/// Bounded record of the most recent attempted requests.
///
/// Holds at most `capacity` timestamps; pushing into a full window evicts
/// the oldest. The window slides by timestamp: a new request may leave
/// once the oldest retained stamp is at least `cooldown` old.
#[derive(Debug, Clone)]
pub struct RequestWindow {
    stamps: VecDeque<Instant>,
    capacity: usize,
}

impl RequestWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            stamps: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record an attempted request at `at`.
    pub fn record(&mut self, at: Instant) {
        if self.stamps.len() == self.capacity {
            self.stamps.pop_front();
        }
        self.stamps.push_back(at);
    }

    /// How long to wait at `now` before another request fits, if at all.
    pub fn wait_time(&self, now: Instant, cooldown: Duration) -> Option<Duration> {
        if !self.is_full() {
            return None;
        }
        let elapsed = now.saturating_duration_since(*self.stamps.front()?);
        (elapsed < cooldown).then(|| cooldown - elapsed)
    }

    pub fn oldest(&self) -> Option<Instant> {
        self.stamps.front().copied()
    }

    pub fn is_full(&self) -> bool {
        self.stamps.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
