//! # Error Types
//!
//! Custom error types for the gamepad arm bridge using `thiserror`.

use thiserror::Error;

/// Errors reported by a [`RobotCommandSink`](crate::sink::RobotCommandSink).
///
/// Only [`SinkError::Recoverable`] is contained by the session; every other
/// variant ends the worker.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The robot reported a resettable error code
    #[error("Robot error: {code}")]
    Recoverable { code: i32 },

    /// The executor refused the command outright
    #[error("Command rejected: {0}")]
    Rejected(String),

    /// Writing the command failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The command could not be serialized
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SinkError {
    /// Returns `true` for faults the session can recover from.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SinkError::Recoverable { .. })
    }
}

/// Main error type for the gamepad arm bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Input packet could not be decoded
    #[error("Invalid packet: expected {expected} bytes, got {actual}")]
    InvalidPacket { expected: usize, actual: usize },

    /// Robot command errors
    #[error("Robot command error: {0}")]
    Sink(#[from] SinkError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the gamepad arm bridge
pub type Result<T> = std::result::Result<T, BridgeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_classification() {
        assert!(SinkError::Recoverable { code: 14 }.is_recoverable());
        assert!(!SinkError::Rejected("busy".to_string()).is_recoverable());
        assert!(!SinkError::Io(std::io::Error::other("closed")).is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = BridgeError::from(SinkError::Recoverable { code: 101 });
        assert_eq!(err.to_string(), "Robot command error: Robot error: 101");

        let err = BridgeError::InvalidPacket { expected: 64, actual: 12 };
        assert_eq!(err.to_string(), "Invalid packet: expected 64 bytes, got 12");
    }
}
