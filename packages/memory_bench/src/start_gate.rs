use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use rsevents::{Awaitable, EventState, ManualResetEvent};

/// One-shot gate that holds workers back until every worker of the run has been started.
///
/// Workers cross the gate once, before their timed loop, so the loops of all workers start at
/// essentially the same moment. If starting the run fails halfway, the gate is cancelled instead
/// of opened and the workers that did start exit without running.
pub(crate) struct StartGate {
    released: ManualResetEvent,

    // Set at most once, by whoever releases the gate first.
    decided: AtomicBool,
    cancelled: AtomicBool,
}

impl StartGate {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            released: ManualResetEvent::new(EventState::Unset),
            decided: AtomicBool::new(false),
            cancelled: AtomicBool::new(false),
        }
    }

    /// Lets all current and future waiters through, telling them to run.
    pub(crate) fn open(&self) {
        self.release(false);
    }

    /// Lets all current and future waiters through, telling them not to run.
    pub(crate) fn cancel(&self) {
        self.release(true);
    }

    /// Blocks until the gate is opened or cancelled. Returns `true` if the caller should run.
    pub(crate) fn wait(&self) -> bool {
        self.released.wait();

        !self.cancelled.load(Ordering::Acquire)
    }

    fn release(&self, cancel: bool) {
        // The first decision wins; a released gate never changes its mind.
        if self.decided.swap(true, Ordering::AcqRel) {
            return;
        }

        self.cancelled.store(cancel, Ordering::Release);
        self.released.set();
    }
}

impl fmt::Debug for StartGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartGate")
            .field("decided", &self.decided)
            .field("cancelled", &self.cancelled)
            .finish_non_exhaustive()
    }
}
