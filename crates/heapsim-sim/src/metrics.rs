//! Aggregate workload metrics.
//!
//! [`SimMetrics`] accumulates over a whole run; the driver updates it after
//! every event it emits.

use heapsim_arena::ArenaStats;

use crate::event::SimEvent;

/// Counters and high-water marks for one simulation run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimMetrics {
    /// Successful allocations.
    pub allocations: u32,
    /// Allocation attempts that found no large-enough free block.
    pub allocation_failures: u32,
    /// Blocks released.
    pub releases: u32,
    /// Total units requested across all attempts.
    pub units_requested: u64,
    /// Highest number of used units observed after any event.
    pub peak_used: usize,
    /// Highest block count observed after any event.
    pub peak_block_count: usize,
    /// Highest external fragmentation observed after any event.
    pub peak_fragmentation: f64,
}

impl SimMetrics {
    /// Fold one event and the arena state it produced into the totals.
    pub fn record(&mut self, event: &SimEvent, stats: &ArenaStats) {
        match *event {
            SimEvent::Allocated { size, .. } => {
                self.allocations += 1;
                self.units_requested += size as u64;
            }
            SimEvent::AllocationFailed { size, .. } => {
                self.allocation_failures += 1;
                self.units_requested += size as u64;
            }
            SimEvent::Released { .. } => self.releases += 1,
        }
        self.peak_used = self.peak_used.max(stats.used);
        self.peak_block_count = self.peak_block_count.max(stats.block_count);
        self.peak_fragmentation = self.peak_fragmentation.max(stats.fragmentation());
    }

    /// Fraction of attempts that failed.
    pub fn failure_rate(&self) -> f64 {
        let attempts = self.allocations + self.allocation_failures;
        if attempts == 0 {
            return 0.0;
        }
        self.allocation_failures as f64 / attempts as f64
    }
}
