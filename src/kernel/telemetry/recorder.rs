use std::collections::VecDeque;

use super::event::SweepEvent;
use super::metrics::{compute_snapshot, TelemetrySnapshot};

const MAX_EVENTS: usize = 10_000;

/// Keeps the most recent events and running totals for the life of the process.
#[derive(Debug)]
pub struct TelemetryRecorder {
    buffer: VecDeque<SweepEvent>,
    totals: TelemetrySnapshot,
}

impl Default for TelemetryRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_EVENTS),
            totals: TelemetrySnapshot::default(),
        }
    }

    pub fn record(&mut self, event: SweepEvent) {
        if self.buffer.len() >= MAX_EVENTS {
            self.buffer.pop_front();
        }
        self.totals.apply(&event);
        self.buffer.push_back(event);
    }

    /// Lifetime totals, including events already evicted from the buffer.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.totals.clone()
    }

    /// Snapshot over the last `n` recorded events.
    pub fn recent(&self, n: usize) -> TelemetrySnapshot {
        let skip = self.buffer.len().saturating_sub(n);
        compute_snapshot(self.buffer.iter().skip(skip))
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.totals = TelemetrySnapshot::default();
    }
}
