//! Deferred task scheduling for the UI thread.
//!
//! The scheduler holds one-shot tasks ordered by due time. It never spawns
//! threads or sleeps: the host's event loop asks how long to wait
//! ([`TaskScheduler::time_until_next`]) and then runs whatever is due
//! ([`SchedulerHandle::process_ready`]). Time comes from a [`Clock`], so tests
//! drive it with a [`ManualClock`](crate::ManualClock).
//!
//! Tasks are not `Send`; they run on the thread that owns the scheduler,
//! interleaved with other UI work but never concurrently with it.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use horizon_popup_core::{ManualClock, SchedulerHandle};
//!
//! let clock = ManualClock::new();
//! let scheduler = SchedulerHandle::new(clock.clone());
//!
//! scheduler.schedule_once(Duration::from_millis(10), || println!("ran"));
//! assert_eq!(scheduler.time_until_next(), Some(Duration::from_millis(10)));
//!
//! clock.advance(Duration::from_millis(10));
//! assert_eq!(scheduler.process_ready(), 1);
//! ```

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::time::Duration;

use slotmap::{SlotMap, new_key_type};

use crate::clock::Clock;
use crate::error::{Result, SchedulerError};
use crate::logging::{PerfSpan, span_names, targets};

new_key_type! {
    /// A unique identifier for a scheduled task.
    ///
    /// Acts as the cancellation token for the task. Ids are never reused, so a
    /// stale id can be cancelled safely after its task ran.
    pub struct ScheduledTaskId;
}

/// A boxed task closure.
type BoxedScheduledTask = Box<dyn FnOnce() + 'static>;

/// Internal scheduled task data.
struct ScheduledTaskData {
    /// When this task should run, relative to the clock's epoch.
    next_run: Duration,
    /// The task closure to execute.
    task: BoxedScheduledTask,
}

/// An entry in the scheduler queue (min-heap by run time, then insertion order).
#[derive(Debug, Clone, Copy)]
struct SchedulerQueueEntry {
    id: ScheduledTaskId,
    run_time: Duration,
    seq: u64,
}

impl PartialEq for SchedulerQueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.run_time == other.run_time && self.seq == other.seq
    }
}

impl Eq for SchedulerQueueEntry {}

impl PartialOrd for SchedulerQueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SchedulerQueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap (BinaryHeap is max-heap by default).
        other
            .run_time
            .cmp(&self.run_time)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Manages scheduled one-shot tasks.
pub struct TaskScheduler {
    /// Source of the current time.
    clock: Box<dyn Clock>,
    /// All pending tasks.
    tasks: SlotMap<ScheduledTaskId, ScheduledTaskData>,
    /// Priority queue of pending executions.
    queue: BinaryHeap<SchedulerQueueEntry>,
    /// Tie-breaker so tasks due at the same time run in scheduling order.
    next_seq: u64,
}

impl TaskScheduler {
    /// Create a new task scheduler driven by `clock`.
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            tasks: SlotMap::with_key(),
            queue: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    /// The scheduler's current time.
    pub fn now(&self) -> Duration {
        self.clock.now()
    }

    fn push_entry(&mut self, id: ScheduledTaskId, run_time: Duration) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(SchedulerQueueEntry { id, run_time, seq });
    }

    /// Schedule a one-shot task to execute after the specified delay.
    ///
    /// Returns the task ID that can be used to cancel or reschedule the task.
    pub fn schedule_once<F>(&mut self, delay: Duration, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + 'static,
    {
        let next_run = self.now().saturating_add(delay);
        let id = self.tasks.insert(ScheduledTaskData {
            next_run,
            task: Box::new(task),
        });
        self.push_entry(id, next_run);

        tracing::trace!(target: targets::SCHEDULER, ?id, ?delay, "task scheduled");
        id
    }

    /// Cancel a scheduled task.
    ///
    /// Returns `true` if a pending task was removed. Cancelling a task that
    /// already ran or was already cancelled is a no-op returning `false`.
    pub fn cancel(&mut self, id: ScheduledTaskId) -> bool {
        let removed = self.tasks.remove(id).is_some();
        if removed {
            tracing::trace!(target: targets::SCHEDULER, ?id, "task cancelled");
        }
        removed
    }

    /// Move a pending task to run `delay` from now.
    pub fn reschedule(&mut self, id: ScheduledTaskId, delay: Duration) -> Result<()> {
        let next_run = self.now().saturating_add(delay);
        let Some(task) = self.tasks.get_mut(id) else {
            return Err(SchedulerError::InvalidTaskId.into());
        };
        task.next_run = next_run;

        // The old queue entry is skipped when it surfaces.
        self.push_entry(id, next_run);
        Ok(())
    }

    /// Check if a task is still pending.
    pub fn is_active(&self, id: ScheduledTaskId) -> bool {
        self.tasks.contains_key(id)
    }

    /// Drop queue entries whose task was cancelled or rescheduled.
    fn prune_stale(&mut self) {
        while let Some(entry) = self.queue.peek() {
            match self.tasks.get(entry.id) {
                Some(task) if task.next_run == entry.run_time => break,
                _ => {
                    self.queue.pop();
                }
            }
        }
    }

    /// Get the duration until the next task should execute, if any.
    pub fn time_until_next(&mut self) -> Option<Duration> {
        self.prune_stale();
        let now = self.now();
        self.queue
            .peek()
            .map(|entry| entry.run_time.saturating_sub(now))
    }

    /// Check if there are any tasks ready to execute now.
    pub fn has_ready(&mut self) -> bool {
        self.prune_stale();
        let now = self.now();
        self.queue.peek().is_some_and(|entry| entry.run_time <= now)
    }

    /// Capture the current time and scheduling position for a processing pass.
    pub fn cutoff(&self) -> ReadyCutoff {
        ReadyCutoff {
            now: self.now(),
            seq: self.next_seq,
        }
    }

    /// Remove and return the next task that was due when `cutoff` was taken.
    ///
    /// Tasks scheduled or rescheduled after the cutoff are left for a later
    /// pass. The task is no longer pending once returned; the caller runs it.
    pub fn take_ready(&mut self, cutoff: ReadyCutoff) -> Option<(ScheduledTaskId, BoxedTask)> {
        self.prune_stale();
        let entry = self.queue.peek().copied()?;
        if entry.run_time > cutoff.now || entry.seq >= cutoff.seq {
            return None;
        }
        self.queue.pop();
        self.tasks
            .remove(entry.id)
            .map(|data| (entry.id, BoxedTask(data.task)))
    }

    /// Run all tasks that are due now.
    ///
    /// Returns the number of tasks that were executed.
    pub fn process_ready(&mut self) -> usize {
        let cutoff = self.cutoff();
        let mut executed = 0;
        while let Some((id, task)) = self.take_ready(cutoff) {
            tracing::trace!(target: targets::SCHEDULER, ?id, "executing scheduled task");
            task.run();
            executed += 1;
        }
        executed
    }

    /// Get the number of pending tasks.
    pub fn active_count(&self) -> usize {
        self.tasks.len()
    }
}

/// The point in time and scheduling order a processing pass runs up to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyCutoff {
    now: Duration,
    seq: u64,
}

/// A task removed from the scheduler, ready to run.
pub struct BoxedTask(BoxedScheduledTask);

impl BoxedTask {
    /// Run the task, consuming it.
    pub fn run(self) {
        (self.0)()
    }
}

impl std::fmt::Debug for BoxedTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BoxedTask")
    }
}

/// A shared handle to a [`TaskScheduler`] owned by the UI thread.
///
/// Clones refer to the same scheduler. Unlike [`TaskScheduler::process_ready`],
/// [`SchedulerHandle::process_ready`] runs each task with the scheduler
/// unborrowed, so a task may schedule or cancel other tasks.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Rc<RefCell<TaskScheduler>>,
}

impl SchedulerHandle {
    /// Create a scheduler driven by `clock` and return a handle to it.
    pub fn new(clock: impl Clock + 'static) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TaskScheduler::new(clock))),
        }
    }

    /// The scheduler's current time.
    pub fn now(&self) -> Duration {
        self.inner.borrow().now()
    }

    /// See [`TaskScheduler::schedule_once`].
    pub fn schedule_once<F>(&self, delay: Duration, task: F) -> ScheduledTaskId
    where
        F: FnOnce() + 'static,
    {
        self.inner.borrow_mut().schedule_once(delay, task)
    }

    /// See [`TaskScheduler::cancel`].
    pub fn cancel(&self, id: ScheduledTaskId) -> bool {
        self.inner.borrow_mut().cancel(id)
    }

    /// See [`TaskScheduler::reschedule`].
    pub fn reschedule(&self, id: ScheduledTaskId, delay: Duration) -> Result<()> {
        self.inner.borrow_mut().reschedule(id, delay)
    }

    /// See [`TaskScheduler::is_active`].
    pub fn is_active(&self, id: ScheduledTaskId) -> bool {
        self.inner.borrow().is_active(id)
    }

    /// See [`TaskScheduler::time_until_next`].
    pub fn time_until_next(&self) -> Option<Duration> {
        self.inner.borrow_mut().time_until_next()
    }

    /// See [`TaskScheduler::has_ready`].
    pub fn has_ready(&self) -> bool {
        self.inner.borrow_mut().has_ready()
    }

    /// See [`TaskScheduler::active_count`].
    pub fn active_count(&self) -> usize {
        self.inner.borrow().active_count()
    }

    /// Run all tasks that are due now, without holding the scheduler borrowed.
    ///
    /// Tasks scheduled while processing are considered on the next call, even
    /// with a zero delay.
    pub fn process_ready(&self) -> usize {
        let _perf = PerfSpan::new(span_names::SCHEDULER);
        let cutoff = self.inner.borrow().cutoff();
        let mut executed = 0;
        loop {
            let next = self.inner.borrow_mut().take_ready(cutoff);
            let Some((id, task)) = next else {
                break;
            };
            tracing::trace!(target: targets::SCHEDULER, ?id, "executing scheduled task");
            task.run();
            executed += 1;
        }
        executed
    }
}

impl std::fmt::Debug for SchedulerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchedulerHandle")
            .field("active_count", &self.active_count())
            .finish()
    }
}
