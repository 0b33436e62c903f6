use std::num::{NonZero, ParseIntError};
use std::time::Duration;

use crate::{AccessPattern, Operation};

/// Parameters of one benchmark run.
///
/// The configuration is immutable once created and is shared by reference with every worker.
/// Thread count and array size are non-zero by construction, so a configuration that exists is
/// always a valid one.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
/// use std::time::Duration;
///
/// use memory_bench::{AccessPattern, BenchmarkConfig, Operation};
///
/// let config = BenchmarkConfig::new(
///     NonZero::new(4).unwrap(),
///     1,
///     Operation::Write,
///     AccessPattern::Sequential,
///     NonZero::new(1024).unwrap(),
///     42,
/// );
///
/// assert_eq!(config.runtime(), Duration::from_secs(1));
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BenchmarkConfig {
    thread_count: NonZero<usize>,
    runtime: Duration,
    operation: Operation,
    access_pattern: AccessPattern,
    array_size: NonZero<usize>,
    seed: u64,
}

impl BenchmarkConfig {
    /// Creates a configuration for a run of `runtime_seconds` whole seconds.
    ///
    /// A runtime of zero is allowed; every worker then stops before its first operation.
    #[must_use]
    pub const fn new(
        thread_count: NonZero<usize>,
        runtime_seconds: u64,
        operation: Operation,
        access_pattern: AccessPattern,
        array_size: NonZero<usize>,
        seed: u64,
    ) -> Self {
        Self {
            thread_count,
            runtime: Duration::from_secs(runtime_seconds),
            operation,
            access_pattern,
            array_size,
            seed,
        }
    }

    /// Replaces the runtime with one that need not be a whole number of seconds.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn with_runtime(mut self, runtime: Duration) -> Self {
        self.runtime = runtime;
        self
    }

    /// Number of worker threads. Worker `i` is pinned to processor `i`.
    #[must_use]
    pub const fn thread_count(&self) -> NonZero<usize> {
        self.thread_count
    }

    /// How long each worker runs its timed loop.
    #[must_use]
    pub const fn runtime(&self) -> Duration {
        self.runtime
    }

    /// The operation every worker performs.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation
    }

    /// How workers choose slots.
    #[must_use]
    pub const fn access_pattern(&self) -> AccessPattern {
        self.access_pattern
    }

    /// Number of 64-bit slots in the shared array.
    #[must_use]
    pub const fn array_size(&self) -> NonZero<usize> {
        self.array_size
    }

    /// Base seed from which every worker derives its own seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// The seed of the random generator of the worker with the given index.
    ///
    /// Each worker gets `seed + index`, so workers never share a random sequence.
    #[must_use]
    pub const fn worker_seed(&self, index: usize) -> u64 {
        self.seed.wrapping_add(index as u64)
    }
}

/// Parses a base seed from its command-line form.
///
/// Any value that fits in a `u64` or an `i64` is accepted. Negative values wrap around to the
/// `u64` with the same bit pattern, so `-1` is the same seed as `u64::MAX`.
///
/// # Errors
///
/// Returns an error if the value is not an integer or does not fit in 64 bits.
///
/// # Examples
///
/// ```
/// assert_eq!(memory_bench::parse_seed("42"), Ok(42));
/// assert_eq!(memory_bench::parse_seed("-1"), Ok(u64::MAX));
/// assert!(memory_bench::parse_seed("forty-two").is_err());
/// ```
pub fn parse_seed(value: &str) -> Result<u64, ParseIntError> {
    value.parse::<u64>().or_else(|unsigned_error| {
        value
            .parse::<i64>()
            .map(|signed| u64::from_ne_bytes(signed.to_ne_bytes()))
            // Report why the unsigned form failed, unless only the signed form can work.
            .map_err(|signed_error| {
                if value.starts_with('-') {
                    signed_error
                } else {
                    unsigned_error
                }
            })
    })
}
