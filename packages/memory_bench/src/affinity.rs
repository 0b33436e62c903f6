use std::io;
#[cfg(target_os = "linux")]
use std::mem;

#[cfg(target_os = "linux")]
use crate::pal::{Bindings, BindingsFacade};

/// Binds the calling thread to a single logical processor.
///
/// Binding is best-effort from the point of view of the benchmark: callers get the error back
/// but a worker that fails to pin itself still runs, merely without the pinning guarantee.
#[derive(Clone, Debug)]
pub(crate) struct AffinityBinder {
    #[cfg(target_os = "linux")]
    bindings: BindingsFacade,
}

#[cfg(target_os = "linux")]
impl AffinityBinder {
    #[must_use]
    pub(crate) const fn target() -> Self {
        Self {
            bindings: BindingsFacade::target(),
        }
    }

    #[cfg(test)]
    pub(crate) const fn with_bindings(bindings: BindingsFacade) -> Self {
        Self { bindings }
    }

    /// Restricts the current thread to the processor with the given index for the rest of
    /// its life.
    ///
    /// Fails if the index is outside the range the operating system affinity mask can express
    /// or if the operating system rejects the mask (e.g. because that processor does not exist
    /// or is not available to this process).
    pub(crate) fn pin_current_thread_to(&self, processor: usize) -> io::Result<()> {
        let capacity = usize::try_from(libc::CPU_SETSIZE).unwrap_or(0);

        if processor >= capacity {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "processor {processor} is beyond the {capacity} processors an affinity mask can hold"
                ),
            ));
        }

        // SAFETY: All zeroes is a valid cpu_set_t.
        let mut cpu_set: libc::cpu_set_t = unsafe { mem::zeroed() };

        // SAFETY: We checked above that the processor index is within the bounds of the set.
        unsafe {
            libc::CPU_SET(processor, &mut cpu_set);
        }

        self.bindings.sched_setaffinity_current(&cpu_set)
    }
}

#[cfg(not(target_os = "linux"))]
impl AffinityBinder {
    #[must_use]
    pub(crate) const fn target() -> Self {
        Self {}
    }

    /// Processor pinning is not implemented on this platform, so this always fails.
    #[expect(clippy::unused_self, reason = "matches the signature used on Linux")]
    pub(crate) fn pin_current_thread_to(&self, processor: usize) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot pin to processor {processor}: not supported on this platform"),
        ))
    }
}
