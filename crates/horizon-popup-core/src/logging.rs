//! Logging facilities for Horizon Popup.
//!
//! Horizon Popup uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! tracing_subscriber::fmt()
//!     .with_env_filter(EnvFilter::new("horizon_popup=debug"))
//!     .init();
//! ```
//!
//! Every subsystem logs under one of the [`targets`], so a filter such as
//! `horizon_popup::positioning=trace` isolates the placement math.

/// Span names used throughout Horizon Popup for tracing.
pub mod span_names {
    /// Showing a popup (style resolution, measuring, placement, surface creation).
    pub const SHOW: &str = "horizon_popup::show";
    /// Scheduler processing pass.
    pub const SCHEDULER: &str = "horizon_popup::scheduler";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Scheduler target.
    pub const SCHEDULER: &str = "horizon_popup_core::scheduler";
    /// Popup controller lifecycle target.
    pub const CONTROLLER: &str = "horizon_popup::controller";
    /// Positioning engine target.
    pub const POSITIONING: &str = "horizon_popup::positioning";
    /// Dynamic section updater target.
    pub const UPDATER: &str = "horizon_popup::updater";
    /// Configuration loading target.
    pub const CONFIG: &str = "horizon_popup::config";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_popup::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` macros with a fixed target.
#[macro_export]
macro_rules! popup_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_popup", $($arg)*)
    };
}

#[macro_export]
macro_rules! popup_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_popup", $($arg)*)
    };
}

#[macro_export]
macro_rules! popup_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_popup", $($arg)*)
    };
}
