//! Cooperative deferred-task queue
//!
//! Tasks are posted by id (from interrupt context or normal code) into one
//! of three priority lanes and drained by the main loop between
//! iterations. Each lane is a fixed-capacity FIFO; a full lane rejects the
//! post instead of growing.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;

use echolot_hal::{TaskId, TaskPoster, TaskPriority};

/// Fixed-capacity priority task queue
///
/// `N` is the capacity of each priority lane.
pub struct TaskQueue<const N: usize> {
    lanes: Mutex<RefCell<[Deque<TaskId, N>; TaskPriority::COUNT]>>,
}

impl<const N: usize> Default for TaskQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> TaskQueue<N> {
    /// Create an empty queue (usable in a `static`)
    pub const fn new() -> Self {
        Self {
            lanes: Mutex::new(RefCell::new([Deque::new(), Deque::new(), Deque::new()])),
        }
    }

    /// Take the next task: highest priority first, FIFO within a priority
    pub fn pop(&self) -> Option<TaskId> {
        critical_section::with(|cs| {
            let mut lanes = self.lanes.borrow_ref_mut(cs);
            lanes.iter_mut().rev().find_map(|lane| lane.pop_front())
        })
    }

    /// Number of queued tasks across all priorities
    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.lanes.borrow_ref(cs).iter().map(|lane| lane.len()).sum())
    }

    /// Check if nothing is queued
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drain the queue, running `f` for each task outside the critical section
    ///
    /// Tasks posted by `f` itself are run in the same drain. Returns the
    /// number of tasks run.
    pub fn run_pending<F: FnMut(TaskId)>(&self, mut f: F) -> usize {
        let mut ran = 0;
        while let Some(task) = self.pop() {
            f(task);
            ran += 1;
        }
        ran
    }
}

impl<const N: usize> TaskPoster for TaskQueue<N> {
    fn post(&self, task: TaskId, priority: TaskPriority) -> bool {
        critical_section::with(|cs| {
            self.lanes.borrow_ref_mut(cs)[priority.index()]
                .push_back(task)
                .is_ok()
        })
    }
}
