use std::fmt;
use std::hint::black_box;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::ParseTokenError;

/// The atomic operation that every worker performs once per iteration of its timed loop.
///
/// All operations use relaxed memory ordering. The benchmark measures the raw cost of moving
/// cache lines between processors, not the cost of synchronization, so no ordering between
/// workers is requested or needed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Operation {
    /// Atomically load the slot and discard the value.
    Read,

    /// Atomically store the worker's current operation count into the slot.
    Write,

    /// Load the slot, then attempt to replace that value with the worker's current operation
    /// count. A failed exchange still counts as a completed operation and is never retried.
    Cas,
}

impl Operation {
    const TOKENS: &'static [&'static str] = &["READ", "WRITE", "CAS"];

    /// Performs this operation once against `slot`.
    ///
    /// `value` is what a write or a successful compare-and-swap leaves in the slot.
    #[inline]
    pub fn perform(self, slot: &AtomicU64, value: u64) {
        match self {
            Self::Read => {
                black_box(slot.load(Ordering::Relaxed));
            }
            Self::Write => slot.store(value, Ordering::Relaxed),
            Self::Cas => {
                let expected = slot.load(Ordering::Relaxed);

                // Another worker may have changed the slot since we loaded it. That is a normal
                // outcome, not something to retry.
                let outcome =
                    slot.compare_exchange(expected, value, Ordering::Relaxed, Ordering::Relaxed);

                black_box(&outcome);
            }
        }
    }

    /// The command-line token that names this operation.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Read => "READ",
            Self::Write => "WRITE",
            Self::Cas => "CAS",
        }
    }
}

impl FromStr for Operation {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READ" => Ok(Self::Read),
            "WRITE" => Ok(Self::Write),
            "CAS" => Ok(Self::Cas),
            _ => Err(ParseTokenError::new("operation", s, Self::TOKENS)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
