use std::io;

use thiserror::Error;

/// Errors that prevent a benchmark run from starting.
///
/// All of these are detected before any worker begins its timed loop, so a failed run never
/// produces partial results.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The shared array could not be allocated, either because the requested size does not fit
    /// in the address space or because the memory allocator refused the request.
    #[error("cannot allocate a shared array of {slots} slots: {problem}")]
    Allocation {
        /// The number of 64-bit slots that was requested.
        slots: usize,

        /// A human-readable description of the problem.
        problem: String,
    },

    /// The operating system refused to start a worker thread.
    #[error("cannot start worker thread {index}: {source}")]
    ThreadSpawn {
        /// The index of the worker that could not be started.
        index: usize,

        /// The error reported by the operating system.
        source: io::Error,
    },
}

/// A specialized `Result` type for benchmark operations, returning the crate's
/// [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;

/// A command-line token did not name any of the recognized operations or access patterns.
///
/// Tokens are matched exactly, including case.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("unrecognized {kind} '{token}', expected one of: {}", .expected.join(", "))]
pub struct ParseTokenError {
    kind: &'static str,
    token: String,
    expected: &'static [&'static str],
}

impl ParseTokenError {
    pub(crate) fn new(kind: &'static str, token: &str, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            token: token.to_string(),
            expected,
        }
    }

    /// The token that was rejected.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}
