//! Interrupt-to-task handoff
//!
//! An interrupt handler that needs follow-up work posts a deferred task,
//! but never more than one at a time. Further completions while the task
//! is queued only update the data the task will read, so a slow consumer
//! sees the latest value rather than a backlog.

use portable_atomic::{AtomicBool, Ordering};

use echolot_hal::{TaskId, TaskPoster, TaskPriority};

/// At-most-one-outstanding deferred task guard
///
/// Single producer (interrupt context), single consumer (the deferred
/// task itself).
#[derive(Debug, Default)]
pub struct DeferredSignal {
    queued: AtomicBool,
}

impl DeferredSignal {
    /// Create an idle signal
    pub const fn new() -> Self {
        Self {
            queued: AtomicBool::new(false),
        }
    }

    /// Post `task` unless a run is already outstanding
    ///
    /// The flag is only set if the dispatcher accepted the task, so a full
    /// queue leaves the next completion free to try again. Returns whether
    /// a task was posted.
    pub fn post_once<T: TaskPoster + ?Sized>(
        &self,
        poster: &T,
        task: TaskId,
        priority: TaskPriority,
    ) -> bool {
        if self.queued.load(Ordering::Acquire) {
            return false;
        }

        if poster.post(task, priority) {
            self.queued.store(true, Ordering::Release);
            true
        } else {
            false
        }
    }

    /// Mark the outstanding run finished
    ///
    /// Called by the deferred task after it has consumed the data.
    pub fn complete(&self) {
        self.queued.store(false, Ordering::Release);
    }

    /// Check if a run is outstanding
    pub fn is_queued(&self) -> bool {
        self.queued.load(Ordering::Acquire)
    }
}
