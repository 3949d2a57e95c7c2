use thiserror::Error;

/// Error types for the compute module
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ComputeError {
    /// The requested period cannot be turned into a date interval
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// A date fell outside the range chrono can represent
    #[error("Date error: {0}")]
    Date(String),
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;
