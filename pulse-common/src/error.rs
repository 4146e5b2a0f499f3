//! Common error types for LivePulse

use thiserror::Error;

/// Common result type for LivePulse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across LivePulse crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Identity token storage error
    #[error("Identity storage error: {0}")]
    Identity(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
