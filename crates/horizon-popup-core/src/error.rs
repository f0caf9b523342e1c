//! Error types for Horizon Popup core services.

/// The main error type for core operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Scheduler-related error.
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Scheduler-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// The task ID is invalid, or the task has already run or been cancelled.
    #[error("Invalid or expired scheduled task ID")]
    InvalidTaskId,
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
