#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for the `memory_bench` tool.
//!
//! This module is excluded from mutation testing because testing process entry/exit behavior
//! requires spawning subprocesses and checking exit codes, which the integration tests do.

use std::{io, iter};
use std::num::NonZero;
use std::process::ExitCode;

use argh::FromArgs;
use memory_bench::{AccessPattern, BenchmarkConfig, Operation, parse_seed, run_benchmark};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "<num_threads> <runtime> <operation> <access_pattern> <array_size> <seed>";

/// Measures the throughput of atomic READ, WRITE or CAS operations performed by pinned worker
/// threads against a shared array of 64-bit slots.
#[derive(FromArgs)]
struct Args {
    /// number of worker threads; worker N is pinned to processor N
    #[argh(positional)]
    num_threads: NonZero<usize>,

    /// how many seconds each worker runs
    #[argh(positional)]
    runtime: u64,

    /// operation to perform: READ, WRITE or CAS
    #[argh(positional)]
    operation: Operation,

    /// how workers pick slots: SEQUENTIAL or RANDOM
    #[argh(positional)]
    access_pattern: AccessPattern,

    /// number of 64-bit slots in the shared array
    #[argh(positional)]
    array_size: NonZero<usize>,

    /// base seed of the per-worker random generators; negative values wrap around
    #[argh(positional, from_str_fn(seed_from_str))]
    seed: u64,
}

fn seed_from_str(value: &str) -> Result<u64, String> {
    parse_seed(value).map_err(|e| e.to_string())
}

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    init_logging();

    let env_args: Vec<String> = std::env::args().collect();
    let str_args: Vec<&str> = env_args.iter().map(String::as_str).collect();

    let (program_name, arguments) = str_args
        .split_first()
        .map_or(("memory_bench", &[][..]), |(name, rest)| (*name, rest));

    // argh takes anything starting with '-' for an option, which would reject a negative seed.
    // Everything after "--" is positional, so insert one unless help or "--" is already there.
    let arguments: Vec<&str> = if arguments
        .iter()
        .any(|arg| matches!(*arg, "--help" | "-h" | "--"))
    {
        arguments.to_vec()
    } else {
        iter::once("--").chain(arguments.iter().copied()).collect()
    };

    let args = match Args::from_args(&[program_name], &arguments) {
        Ok(args) => args,
        Err(early_exit) => {
            return match early_exit.status {
                Ok(()) => {
                    println!("{}", early_exit.output);
                    ExitCode::SUCCESS
                }
                Err(()) => {
                    eprintln!("{}", early_exit.output);
                    eprintln!("Usage: {program_name} {USAGE}");
                    ExitCode::FAILURE
                }
            };
        }
    };

    let config = BenchmarkConfig::new(
        args.num_threads,
        args.runtime,
        args.operation,
        args.access_pattern,
        args.array_size,
        args.seed,
    );

    match run_benchmark(&config) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr, leaving stdout for the results. `RUST_LOG` selects the level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
