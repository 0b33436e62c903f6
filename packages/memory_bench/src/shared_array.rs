use std::alloc::{Layout, alloc_zeroed, dealloc};
use std::num::NonZero;
use std::ptr::NonNull;
use std::sync::atomic::AtomicU64;
use std::{fmt, slice};

use crate::{Error, Result};

/// Alignment of the shared array, in bytes.
///
/// This matches the cache line size of the processors we expect to run on, so the first slot
/// always starts a new cache line and the allocator cannot place unrelated data in the same line.
pub const CACHE_LINE_SIZE: usize = 64;

/// A cache-line-aligned array of 64-bit slots that all workers of a run access concurrently.
///
/// Slots are only ever accessed through atomic operations, so sharing the array between threads
/// needs no locking. All slots start at zero.
///
/// # Examples
///
/// ```
/// use std::num::NonZero;
/// use std::sync::atomic::Ordering;
///
/// use memory_bench::SharedArray;
///
/// let array = SharedArray::new(NonZero::new(16).unwrap())?;
///
/// array.slots()[3].store(42, Ordering::Relaxed);
/// assert_eq!(array.slots()[3].load(Ordering::Relaxed), 42);
/// # Ok::<(), memory_bench::Error>(())
/// ```
pub struct SharedArray {
    first_slot: NonNull<AtomicU64>,
    slot_count: NonZero<usize>,
    layout: Layout,
}

impl SharedArray {
    /// Allocates a zero-initialized array of `slot_count` slots, aligned to [`CACHE_LINE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Allocation`] if the array does not fit in the address space or if the
    /// memory allocator cannot satisfy the request.
    pub fn new(slot_count: NonZero<usize>) -> Result<Self> {
        let layout = Layout::array::<AtomicU64>(slot_count.get())
            .and_then(|layout| layout.align_to(CACHE_LINE_SIZE))
            .map_err(|e| Error::Allocation {
                slots: slot_count.get(),
                problem: e.to_string(),
            })?;

        // SAFETY: The layout has a non-zero size because slot_count is non-zero
        // and AtomicU64 is not a zero-sized type.
        let ptr = unsafe { alloc_zeroed(layout) };

        #[expect(
            clippy::cast_ptr_alignment,
            reason = "the layout is aligned to CACHE_LINE_SIZE, which exceeds the alignment of AtomicU64"
        )]
        let first_slot =
            NonNull::new(ptr.cast::<AtomicU64>()).ok_or_else(|| Error::Allocation {
                slots: slot_count.get(),
                problem: "the memory allocator returned no memory".to_string(),
            })?;

        Ok(Self {
            first_slot,
            slot_count,
            layout,
        })
    }

    /// Number of slots in the array.
    #[must_use]
    pub const fn slot_count(&self) -> NonZero<usize> {
        self.slot_count
    }

    /// The slots of the array.
    #[must_use]
    pub fn slots(&self) -> &[AtomicU64] {
        // SAFETY: The allocation holds slot_count initialized (zeroed) slots and lives until
        // self is dropped, which cannot happen while the returned borrow is alive.
        unsafe { slice::from_raw_parts(self.first_slot.as_ptr(), self.slot_count.get()) }
    }
}

// SAFETY: The array exclusively owns its allocation and the slots are atomics,
// so moving the owner to another thread is sound.
unsafe impl Send for SharedArray {}

// SAFETY: Shared references only permit atomic access to the slots, which is sound
// from any number of threads at once.
unsafe impl Sync for SharedArray {}

impl Drop for SharedArray {
    fn drop(&mut self) {
        // SAFETY: We allocated this memory in new() with the same layout and nothing else
        // deallocates it. AtomicU64 has no drop logic, so the slots need no cleanup.
        unsafe {
            dealloc(self.first_slot.as_ptr().cast(), self.layout);
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))] // No API contract to test.
impl fmt::Debug for SharedArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedArray")
            .field("slot_count", &self.slot_count)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::Ordering;
    use std::thread;

    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(SharedArray: Send, Sync);

    #[test]
    fn first_slot_is_cache_line_aligned() {
        for slot_count in [1, 3, 8, 1000] {
            let array = SharedArray::new(NonZero::new(slot_count).unwrap()).unwrap();

            assert_eq!(array.slots().as_ptr().addr() % CACHE_LINE_SIZE, 0);
        }
    }

    #[test]
    fn slots_start_zeroed() {
        let array = SharedArray::new(NonZero::new(1024).unwrap()).unwrap();

        assert_eq!(array.slot_count().get(), 1024);
        assert_eq!(array.slots().len(), 1024);
        assert!(
            array
                .slots()
                .iter()
                .all(|slot| slot.load(Ordering::Relaxed) == 0)
        );
    }

    #[test]
    fn oversized_array_is_allocation_error() {
        let result = SharedArray::new(NonZero::new(usize::MAX).unwrap());

        assert!(matches!(
            result,
            Err(Error::Allocation {
                slots: usize::MAX,
                ..
            })
        ));
    }

    #[test]
    fn slots_are_shared_between_threads() {
        let array = SharedArray::new(NonZero::new(4).unwrap()).unwrap();

        thread::scope(|s| {
            for index in 0..4_u64 {
                let array = &array;
                s.spawn(move || {
                    array.slots()[usize::try_from(index).unwrap()]
                        .store(index + 10, Ordering::Relaxed);
                });
            }
        });

        let values: Vec<_> = array
            .slots()
            .iter()
            .map(|slot| slot.load(Ordering::Relaxed))
            .collect();
        assert_eq!(values, [10, 11, 12, 13]);
    }
}
