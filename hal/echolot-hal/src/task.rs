//! Deferred task posting
//!
//! Work that cannot run in interrupt context is posted to the platform's
//! cooperative task dispatcher by numeric id and runs later, between
//! main-loop iterations.

/// Numeric task identifier handed out by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId(pub u16);

/// Task dispatch priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskPriority {
    /// Background work
    Low = 0,
    /// Sensor callbacks and other user-visible work
    #[default]
    Medium = 1,
    /// Latency-sensitive work
    High = 2,
}

impl TaskPriority {
    /// Number of priority levels
    pub const COUNT: usize = 3;

    /// Index of this priority (0 = lowest)
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Posts tasks to the deferred dispatcher
///
/// `post` must be callable from interrupt context.
pub trait TaskPoster {
    /// Queue a task run
    ///
    /// Returns `false` if the dispatcher could not accept the task.
    fn post(&self, task: TaskId, priority: TaskPriority) -> bool;
}

impl<T: TaskPoster + ?Sized> TaskPoster for &T {
    fn post(&self, task: TaskId, priority: TaskPriority) -> bool {
        (**self).post(task, priority)
    }
}
