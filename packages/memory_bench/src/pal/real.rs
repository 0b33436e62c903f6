use std::io;

use libc::cpu_set_t;

use crate::pal::Bindings;

/// FFI bindings that target the real operating system that the build is targeting.
///
/// Unit tests that need to observe or fail the calls use mock bindings instead.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetBindings;

// Error paths require OS-level failures that are impractical to trigger in tests.
#[cfg_attr(coverage_nightly, coverage(off))]
impl Bindings for BuildTargetBindings {
    #[cfg_attr(test, mutants::skip)] // Real FFI, verified by the binder tests on real hardware.
    fn sched_setaffinity_current(&self, cpuset: &cpu_set_t) -> Result<(), io::Error> {
        // 0 means current thread.
        // SAFETY: No safety requirements beyond passing valid arguments.
        let result = unsafe { libc::sched_setaffinity(0, size_of::<cpu_set_t>(), cpuset) };

        if result == 0 {
            Ok(())
        } else {
            Err(io::Error::last_os_error())
        }
    }
}
