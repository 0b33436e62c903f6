#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Measures how many atomic memory operations per second a group of threads can perform on a
//! shared array of 64-bit slots.
//!
//! Each worker thread is pinned to its own processor and, for a fixed wall-clock duration,
//! repeatedly picks a slot (sequentially or at random) and performs one relaxed atomic read,
//! write or compare-and-swap on it. The operation counts of all workers are summed into a total
//! and reported as millions of operations per second.
//!
//! The numbers describe the cost of keeping processor caches coherent under contention: small
//! arrays make every worker fight over the same cache lines, large arrays spread the load.
//!
//! # Example
//!
//! ```
//! use std::num::NonZero;
//!
//! use memory_bench::{AccessPattern, BenchmarkConfig, Operation, run_benchmark};
//!
//! let config = BenchmarkConfig::new(
//!     NonZero::new(2).unwrap(),
//!     1,
//!     Operation::Write,
//!     AccessPattern::Sequential,
//!     NonZero::new(1024).unwrap(),
//!     42,
//! );
//!
//! let report = run_benchmark(&config)?;
//!
//! println!("{report}");
//! # Ok::<(), memory_bench::Error>(())
//! ```
//!
//! The `memory_bench` binary exposes the same functionality on the command line:
//!
//! ```text
//! memory_bench <num_threads> <runtime> <operation> <access_pattern> <array_size> <seed>
//! memory_bench 4 1 WRITE SEQUENTIAL 1024 42
//! ```

mod access;
mod affinity;
mod config;
mod error;
mod operation;
mod orchestrator;
#[cfg(target_os = "linux")]
mod pal;
mod report;
mod shared_array;
mod start_gate;
mod worker;

pub use access::{AccessPattern, IndexSource};
pub use config::{BenchmarkConfig, parse_seed};
pub use error::{Error, ParseTokenError};
pub(crate) use error::Result;
pub use operation::Operation;
pub use orchestrator::run_benchmark;
pub use report::{BenchmarkReport, WorkerReport};
pub use shared_array::{CACHE_LINE_SIZE, SharedArray};
