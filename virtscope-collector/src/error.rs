//! Error types for the collector client.

use thiserror::Error;

/// Errors that can occur while talking to the property collector.
///
/// A canceled or timed-out long poll is not an error; it surfaces as
/// `Ok(None)` from the wait call instead.
#[derive(Error, Debug)]
pub enum CollectorError {
    /// The transport layer failed to deliver the request or response.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The remote side rejected the request with a fault.
    #[error("Remote fault: {0}")]
    RemoteFault(String),

    /// Invalid client settings.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;
