//! Core systems for Horizon Popup.
//!
//! This crate provides the foundational services the popup engine is built on:
//!
//! - **Errors**: Shared error types for the core services
//! - **Logging**: `tracing` targets, span names and convenience macros
//! - **Thread Affinity**: Checks that UI-thread-only state is not touched from
//!   other threads
//! - **Clock**: Monotonic and manually advanced time sources
//! - **Scheduler**: Single-threaded, cancelable one-shot tasks driven by a clock
//!
//! # Scheduler Example
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use horizon_popup_core::{ManualClock, SchedulerHandle};
//!
//! let clock = ManualClock::new();
//! let scheduler = SchedulerHandle::new(clock.clone());
//!
//! let fired = Rc::new(Cell::new(false));
//! let flag = fired.clone();
//! let id = scheduler.schedule_once(Duration::from_millis(2000), move || flag.set(true));
//!
//! clock.advance(Duration::from_millis(1000));
//! assert_eq!(scheduler.process_ready(), 0);
//!
//! // Cancelling is idempotent.
//! assert!(scheduler.cancel(id));
//! assert!(!scheduler.cancel(id));
//!
//! clock.advance(Duration::from_millis(5000));
//! assert_eq!(scheduler.process_ready(), 0);
//! assert!(!fired.get());
//! ```

mod clock;
mod error;
pub mod logging;
mod scheduler;
pub mod thread_check;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, Result, SchedulerError};
pub use logging::PerfSpan;
pub use scheduler::{BoxedTask, ReadyCutoff, ScheduledTaskId, SchedulerHandle, TaskScheduler};
pub use thread_check::ThreadAffinity;
