//! Bounded reading history
//!
//! The dashboard works off a short in-memory window of recent readings,
//! not an archive. `ReadingHistory` is a fixed-capacity ring: pushing
//! past capacity drops the oldest entry. Synchronous and lock-free; the
//! monitor service wraps it in an RwLock.

use chrono::{DateTime, Utc};
use std::collections::VecDeque;

use crate::classifier::GlucoseReading;

/// Default window: 24 readings, two hours at the five-minute cadence
pub const DEFAULT_HISTORY_CAPACITY: usize = 24;

/// Fixed-capacity ring of readings in arrival order
#[derive(Debug, Clone)]
pub struct ReadingHistory {
    readings: VecDeque<GlucoseReading>,
    capacity: usize,
}

impl ReadingHistory {
    /// Create a history retaining up to `capacity` readings
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            readings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a reading, evicting the oldest when full.
    ///
    /// Returns the evicted reading, if any.
    pub fn push(&mut self, reading: GlucoseReading) -> Option<GlucoseReading> {
        let evicted = if self.readings.len() >= self.capacity {
            self.readings.pop_front()
        } else {
            None
        };
        self.readings.push_back(reading);
        evicted
    }

    /// The most recently pushed reading
    pub fn latest(&self) -> Option<&GlucoseReading> {
        self.readings.back()
    }

    /// All retained readings, oldest first
    pub fn snapshot(&self) -> Vec<GlucoseReading> {
        self.readings.iter().copied().collect()
    }

    /// Retained readings measured at or after `since`, oldest first
    pub fn since(&self, since: DateTime<Utc>) -> Vec<GlucoseReading> {
        self.readings
            .iter()
            .filter(|r| r.timestamp() >= since)
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ReadingHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
