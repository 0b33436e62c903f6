use std::fmt;
use std::num::NonZero;
use std::str::FromStr;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::ParseTokenError;

/// How a worker chooses the array slot for each operation.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum AccessPattern {
    /// Walk the array from the first slot to the last, then start over.
    Sequential,

    /// Pick each slot with a seeded pseudo-random generator private to the worker.
    Random,
}

impl AccessPattern {
    const TOKENS: &'static [&'static str] = &["SEQUENTIAL", "RANDOM"];

    /// The command-line token that names this access pattern.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Sequential => "SEQUENTIAL",
            Self::Random => "RANDOM",
        }
    }
}

impl FromStr for AccessPattern {
    type Err = ParseTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEQUENTIAL" => Ok(Self::Sequential),
            "RANDOM" => Ok(Self::Random),
            _ => Err(ParseTokenError::new("access pattern", s, Self::TOKENS)),
        }
    }
}

impl fmt::Display for AccessPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Endless source of array indices for one worker, following an [`AccessPattern`].
///
/// Every index is below the slot count the source was created with. A sequential source
/// yields `k mod slot_count` on its k-th call; a random source is fully determined by its seed,
/// so two sources with the same seed yield the same indices.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
///
/// use memory_bench::{AccessPattern, IndexSource};
///
/// let source = IndexSource::new(AccessPattern::Sequential, NonZero::new(3).unwrap(), 0);
///
/// assert_eq!(source.take(5).collect::<Vec<_>>(), [0, 1, 2, 0, 1]);
/// ```
#[derive(Debug)]
pub struct IndexSource {
    slot_count: NonZero<usize>,
    state: SourceState,
}

#[derive(Debug)]
#[allow(
    variant_size_differences,
    reason = "there is one source per worker, so the size of the state does not matter"
)]
enum SourceState {
    Sequential { next: usize },
    Random { rng: SmallRng },
}

impl IndexSource {
    /// Creates a source of indices in `0..slot_count`.
    ///
    /// The seed is only used by [`AccessPattern::Random`].
    #[must_use]
    pub fn new(pattern: AccessPattern, slot_count: NonZero<usize>, seed: u64) -> Self {
        let state = match pattern {
            AccessPattern::Sequential => SourceState::Sequential { next: 0 },
            AccessPattern::Random => SourceState::Random {
                rng: SmallRng::seed_from_u64(seed),
            },
        };

        Self { slot_count, state }
    }

    /// Returns the index for the next operation.
    #[inline]
    pub fn next_index(&mut self) -> usize {
        match &mut self.state {
            SourceState::Sequential { next } => {
                let index = *next;

                // Cannot overflow because index < slot_count <= usize::MAX.
                let following = index.wrapping_add(1);

                *next = if following == self.slot_count.get() {
                    0
                } else {
                    following
                };

                index
            }
            SourceState::Random { rng } => rng.random_range(0..self.slot_count.get()),
        }
    }
}

impl Iterator for IndexSource {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_index())
    }
}
