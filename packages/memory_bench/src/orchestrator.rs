use std::panic;
use std::thread::{self, Scope, ScopedJoinHandle};

use tracing::info;

use crate::affinity::AffinityBinder;
use crate::start_gate::StartGate;
use crate::worker::WorkerState;
use crate::{BenchmarkConfig, BenchmarkReport, Error, Result, SharedArray, WorkerReport};

/// Runs one benchmark: allocates the shared array, runs one pinned worker per configured thread
/// for the configured runtime and aggregates their operation counts.
///
/// Worker `i` pins itself to processor `i`. Pinning is best-effort; a worker whose processor does
/// not exist or is not available runs unpinned.
///
/// This blocks the calling thread for the configured runtime.
///
/// # Errors
///
/// Returns an error if the shared array cannot be allocated or if a worker thread cannot be
/// started. Both are detected before any worker starts its timed loop.
///
/// # Panics
///
/// Re-raises the panic of a worker thread, if one panics.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use memory_bench::{AccessPattern, BenchmarkConfig, Operation, run_benchmark};
///
/// let config = BenchmarkConfig::new(
///     NonZero::new(2).unwrap(),
///     0,
///     Operation::Cas,
///     AccessPattern::Random,
///     NonZero::new(1024).unwrap(),
///     42,
/// );
///
/// let report = run_benchmark(&config)?;
///
/// assert_eq!(report.workers().len(), 2);
/// assert_eq!(report.total_operations(), 0);
/// # Ok::<(), memory_bench::Error>(())
/// ```
pub fn run_benchmark(config: &BenchmarkConfig) -> Result<BenchmarkReport> {
    run_benchmark_with_binder(config, &AffinityBinder::target())
}

fn run_benchmark_with_binder(
    config: &BenchmarkConfig,
    binder: &AffinityBinder,
) -> Result<BenchmarkReport> {
    info!(
        threads = config.thread_count().get(),
        runtime = ?config.runtime(),
        operation = %config.operation(),
        access_pattern = %config.access_pattern(),
        array_size = config.array_size().get(),
        seed = config.seed(),
        "starting benchmark"
    );

    let array = SharedArray::new(config.array_size())?;

    let workers = run_workers(config, &array, binder)?;

    // Every worker has been joined, so nothing borrows the array anymore.
    drop(array);

    let report = BenchmarkReport::new(workers, config.runtime());

    info!(
        total_operations = report.total_operations(),
        throughput_mops = report.throughput_mops(),
        "benchmark finished"
    );

    Ok(report)
}

/// Starts all workers, then joins them in index order and collects their reports.
fn run_workers(
    config: &BenchmarkConfig,
    array: &SharedArray,
    binder: &AffinityBinder,
) -> Result<Vec<WorkerReport>> {
    let gate = StartGate::new();

    thread::scope(|scope| {
        let handles = match spawn_workers(scope, config, array, binder, &gate) {
            Ok(handles) => handles,
            Err(e) => {
                // Workers that did start are waiting at the gate; release them without running.
                // The scope joins them before returning.
                gate.cancel();
                return Err(e);
            }
        };

        gate.open();

        Ok(handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|payload| panic::resume_unwind(payload))
            })
            .collect())
    })
}

fn spawn_workers<'scope, 'env>(
    scope: &'scope Scope<'scope, 'env>,
    config: &'env BenchmarkConfig,
    array: &'env SharedArray,
    binder: &'env AffinityBinder,
    gate: &'env StartGate,
) -> Result<Vec<ScopedJoinHandle<'scope, WorkerReport>>> {
    (0..config.thread_count().get())
        .map(|index| {
            let worker = WorkerState::new(index, config, array);

            thread::Builder::new()
                .name(format!("memory-bench-{index}"))
                .spawn_scoped(scope, move || worker.run(binder, gate))
                .map_err(|source| Error::ThreadSpawn { index, source })
        })
        .collect()
}
