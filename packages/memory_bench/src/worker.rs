use std::time::Instant;

use tracing::debug;

use crate::affinity::AffinityBinder;
use crate::start_gate::StartGate;
use crate::{BenchmarkConfig, IndexSource, SharedArray, WorkerReport};

/// Everything one worker needs for its run. Each worker owns its state exclusively; only the
/// configuration and the array are shared, both through shared references.
#[derive(Debug)]
pub(crate) struct WorkerState<'a> {
    index: usize,
    config: &'a BenchmarkConfig,
    array: &'a SharedArray,
    seed: u64,
}

impl<'a> WorkerState<'a> {
    #[must_use]
    pub(crate) const fn new(
        index: usize,
        config: &'a BenchmarkConfig,
        array: &'a SharedArray,
    ) -> Self {
        Self {
            index,
            config,
            array,
            seed: config.worker_seed(index),
        }
    }

    /// Pins the current thread to the processor matching the worker index, waits for the gate
    /// and then runs the timed loop.
    ///
    /// Failing to pin is not fatal, the worker just runs wherever the scheduler puts it.
    #[must_use]
    pub(crate) fn run(self, binder: &AffinityBinder, gate: &StartGate) -> WorkerReport {
        if let Err(e) = binder.pin_current_thread_to(self.index) {
            debug!(
                worker = self.index,
                error = %e,
                "continuing without processor pinning"
            );
        }

        if !gate.wait() {
            debug!(worker = self.index, "run cancelled before start");
            return WorkerReport::new(self.index, 0);
        }

        let operations = self.run_timed_loop();

        debug!(worker = self.index, operations, "worker finished");

        WorkerReport::new(self.index, operations)
    }

    /// Performs operations until the configured runtime has elapsed, returning how many
    /// operations were completed.
    ///
    /// The clock is read once per iteration, before the operation, so an operation is never
    /// interrupted and a zero runtime completes no operations.
    #[expect(
        clippy::indexing_slicing,
        reason = "the index source only yields indices below the slot count of the array"
    )]
    fn run_timed_loop(&self) -> u64 {
        let slots = self.array.slots();
        let operation = self.config.operation();
        let runtime = self.config.runtime();

        let mut indices = IndexSource::new(
            self.config.access_pattern(),
            self.array.slot_count(),
            self.seed,
        );

        let mut operations: u64 = 0;
        let start = Instant::now();

        while start.elapsed() < runtime {
            let index = indices.next_index();

            operation.perform(&slots[index], operations);

            // Cannot overflow: that would take centuries at any achievable rate.
            operations = operations.wrapping_add(1);
        }

        operations
    }
}
