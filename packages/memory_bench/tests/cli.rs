//! Runs the `memory_bench` binary to verify its exit codes and console output.

#![cfg(not(miri))]

use std::process::{Command, Output};
use std::time::{Duration, Instant};

/// Helper to run `memory_bench` with the given arguments.
fn run_tool(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_memory_bench"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to start memory_bench binary")
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// Extracts the total from the `Total operations: N` line.
fn total_operations(stdout: &str) -> u64 {
    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Total operations: "))
        .expect("missing total operations line")
        .parse()
        .expect("total operations is not an integer")
}

#[test]
fn no_arguments_prints_usage() {
    let output = run_tool(&[]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    assert!(
        stderr_of(&output).contains("Usage:"),
        "stderr: {}",
        stderr_of(&output)
    );
}

#[test]
fn too_few_arguments_fails() {
    let output = run_tool(&["4", "1", "WRITE", "SEQUENTIAL", "1024"]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    assert!(stderr_of(&output).contains("Usage:"));
}

#[test]
fn too_many_arguments_fails() {
    let output = run_tool(&["4", "1", "WRITE", "SEQUENTIAL", "1024", "42", "extra"]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    assert!(stderr_of(&output).contains("Usage:"));
}

#[test]
fn unknown_operation_fails() {
    let output = run_tool(&["1", "0", "FOO", "SEQUENTIAL", "16", "42"]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    assert!(
        stderr_of(&output).contains("FOO"),
        "stderr: {}",
        stderr_of(&output)
    );
}

#[test]
fn lowercase_operation_fails() {
    let output = run_tool(&["1", "0", "write", "SEQUENTIAL", "16", "42"]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn unknown_access_pattern_fails() {
    let output = run_tool(&["1", "0", "READ", "STRIDED", "16", "42"]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    assert!(stderr_of(&output).contains("STRIDED"));
}

#[test]
fn zero_threads_fails() {
    let output = run_tool(&["0", "0", "READ", "RANDOM", "16", "42"]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn zero_array_size_fails() {
    let output = run_tool(&["1", "0", "READ", "RANDOM", "0", "42"]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
}

#[test]
fn oversized_array_fails_with_diagnostic() {
    let size = usize::MAX.to_string();
    let output = run_tool(&["1", "60", "WRITE", "SEQUENTIAL", &size, "42"]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    assert!(stderr_of(&output).contains("cannot allocate"));
}

#[test]
fn negative_seed_is_accepted() {
    let output = run_tool(&["1", "0", "READ", "RANDOM", "16", "-1"]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(stdout_of(&output).lines().count(), 2);
}

#[test]
fn non_integer_seed_fails() {
    let output = run_tool(&["1", "0", "READ", "RANDOM", "16", "seed"]);

    assert!(!output.status.success());
    assert!(stdout_of(&output).is_empty());
    assert!(stderr_of(&output).contains("Usage:"));
}

#[test]
fn help_succeeds() {
    let output = run_tool(&["--help"]);

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("seed"));
}

#[test]
fn zero_runtime_prints_exact_report() {
    let output = run_tool(&["2", "0", "CAS", "RANDOM", "16", "42"]);

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert_eq!(
        stdout_of(&output),
        "Total operations: 0\nThroughput: 0.00 million operations per second\n"
    );
}

#[test]
fn four_thread_write_run_reports_throughput() {
    let started = Instant::now();
    let output = run_tool(&["4", "1", "WRITE", "SEQUENTIAL", "1024", "42"]);
    let elapsed = started.elapsed();

    assert!(output.status.success(), "stderr: {}", stderr_of(&output));
    assert!(elapsed >= Duration::from_secs(1));
    assert!(elapsed < Duration::from_secs(10));

    let stdout = stdout_of(&output);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "stdout: {stdout}");

    let total = total_operations(&stdout);
    assert!(total > 0);

    let throughput = lines[1]
        .strip_prefix("Throughput: ")
        .and_then(|rest| rest.strip_suffix(" million operations per second"))
        .expect("malformed throughput line");

    // Exactly two decimals, matching total / 1 second / 1e6.
    assert_eq!(throughput.split_once('.').map(|(_, d)| d.len()), Some(2));

    #[expect(clippy::cast_precision_loss, reason = "test tolerance is far coarser")]
    let expected = total as f64 / 1_000_000.0;
    assert_eq!(throughput, format!("{expected:.2}"));
}

#[test]
fn every_operation_and_pattern_runs() {
    for operation in ["READ", "WRITE", "CAS"] {
        for pattern in ["SEQUENTIAL", "RANDOM"] {
            let output = run_tool(&["2", "1", operation, pattern, "64", "7"]);

            assert!(
                output.status.success(),
                "{operation} {pattern} failed: {}",
                stderr_of(&output)
            );
            assert!(total_operations(&stdout_of(&output)) > 0);
        }
    }
}
