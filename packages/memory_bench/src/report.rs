use std::fmt;
use std::time::Duration;

/// The result of one worker: how many operations it completed in its timed loop.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WorkerReport {
    index: usize,
    operations: u64,
}

impl WorkerReport {
    pub(crate) const fn new(index: usize, operations: u64) -> Self {
        Self { index, operations }
    }

    /// Index of the worker, which is also the processor it was pinned to.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of operations the worker completed, successful or not.
    #[must_use]
    pub const fn operations(&self) -> u64 {
        self.operations
    }
}

/// Aggregated result of a benchmark run.
///
/// The `Display` implementation renders the two lines the command-line tool prints:
///
/// ```text
/// Total operations: 123456789
/// Throughput: 123.46 million operations per second
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BenchmarkReport {
    workers: Box<[WorkerReport]>,
    total_operations: u64,
    runtime: Duration,
}

impl BenchmarkReport {
    pub(crate) fn new(workers: Vec<WorkerReport>, runtime: Duration) -> Self {
        let total_operations = workers
            .iter()
            .map(WorkerReport::operations)
            .fold(0, u64::saturating_add);

        Self {
            workers: workers.into_boxed_slice(),
            total_operations,
            runtime,
        }
    }

    /// Per-worker results, in worker index order.
    #[must_use]
    pub fn workers(&self) -> &[WorkerReport] {
        &self.workers
    }

    /// Sum of the operation counts of all workers.
    #[must_use]
    pub const fn total_operations(&self) -> u64 {
        self.total_operations
    }

    /// The configured runtime that throughput is calculated against.
    #[must_use]
    pub const fn runtime(&self) -> Duration {
        self.runtime
    }

    /// Throughput in millions of operations per second.
    ///
    /// A run with zero runtime completes no operations and reports zero throughput.
    #[must_use]
    pub fn throughput_mops(&self) -> f64 {
        if self.runtime.is_zero() {
            return 0.0;
        }

        #[expect(
            clippy::cast_precision_loss,
            reason = "throughput is reported with two decimals, far coarser than the precision lost"
        )]
        let total_operations = self.total_operations as f64;

        total_operations / self.runtime.as_secs_f64() / 1_000_000.0
    }
}

impl fmt::Display for BenchmarkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total operations: {}", self.total_operations)?;
        write!(
            f,
            "Throughput: {:.2} million operations per second",
            self.throughput_mops()
        )
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    // Floating point comparison tolerance.
    const CLOSE_ENOUGH: f64 = 0.000_001;

    fn report(counts: &[u64], runtime: Duration) -> BenchmarkReport {
        let workers = counts
            .iter()
            .enumerate()
            .map(|(index, &operations)| WorkerReport::new(index, operations))
            .collect();

        BenchmarkReport::new(workers, runtime)
    }

    #[test]
    fn total_is_sum_of_workers() {
        let report = report(&[10, 20, 30, 40], Duration::from_secs(1));

        assert_eq!(report.total_operations(), 100);
        assert_eq!(report.workers().len(), 4);
        assert_eq!(
            report
                .workers()
                .iter()
                .map(WorkerReport::index)
                .collect::<Vec<_>>(),
            [0, 1, 2, 3]
        );
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let report = report(&[u64::MAX, 1], Duration::from_secs(1));

        assert_eq!(report.total_operations(), u64::MAX);
    }

    #[test]
    fn throughput_is_millions_per_second() {
        let report = report(&[1_500_000, 1_500_000], Duration::from_secs(2));

        assert!((report.throughput_mops() - 1.5).abs() < CLOSE_ENOUGH);
    }

    #[test]
    fn zero_runtime_has_zero_throughput() {
        let report = report(&[0, 0], Duration::ZERO);

        assert!(report.throughput_mops().abs() < CLOSE_ENOUGH);
    }

    #[test]
    fn display_renders_two_lines() {
        let report = report(&[123_456_789], Duration::from_secs(1));

        assert_eq!(
            report.to_string(),
            "Total operations: 123456789\nThroughput: 123.46 million operations per second"
        );
    }

    #[test]
    fn display_rounds_to_two_decimals() {
        let report = report(&[1_000_000], Duration::from_secs(3));

        assert_eq!(
            report.to_string(),
            "Total operations: 1000000\nThroughput: 0.33 million operations per second"
        );
    }

    #[test]
    fn display_zero_runtime() {
        let report = report(&[0], Duration::ZERO);

        assert_eq!(
            report.to_string(),
            "Total operations: 0\nThroughput: 0.00 million operations per second"
        );
    }
}
