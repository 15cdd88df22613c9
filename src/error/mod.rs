//! Error handling for the relay node
//!
//! One error type covers every failure the node can report. The first six
//! variants are the protocol-level failures; the rest are ambient.

use std::fmt;

/// Result type alias for node operations
pub type Result<T> = std::result::Result<T, NodeError>;

/// Error types for node operations
#[derive(Debug, Clone, PartialEq)]
pub enum NodeError {
    /// Inbound bytes were not a decodable message envelope
    Decode(String),
    /// Write to a dead or broken connection
    Send(String),
    /// Outbound connection could not be established
    Dial(String),
    /// Ledger file write failed
    Persist(String),
    /// Bind/listen failed at startup
    Listen(String),
    /// Ledger file exists but could not be read back
    Load(String),
    /// Shared-state or task-level network failures
    Network(String),
    /// Configuration errors
    Config(String),
    /// File and socket I/O errors
    Io(String),
    /// Serialization/deserialization errors
    Serialization(String),
}

impl NodeError {
    /// Whether this error must abort node startup
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            NodeError::Listen(_) | NodeError::Load(_) | NodeError::Config(_)
        )
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeError::Decode(msg) => write!(f, "Decode error: {msg}"),
            NodeError::Send(msg) => write!(f, "Send error: {msg}"),
            NodeError::Dial(msg) => write!(f, "Dial error: {msg}"),
            NodeError::Persist(msg) => write!(f, "Persist error: {msg}"),
            NodeError::Listen(msg) => write!(f, "Listen error: {msg}"),
            NodeError::Load(msg) => write!(f, "Load error: {msg}"),
            NodeError::Network(msg) => write!(f, "Network error: {msg}"),
            NodeError::Config(msg) => write!(f, "Configuration error: {msg}"),
            NodeError::Io(msg) => write!(f, "I/O error: {msg}"),
            NodeError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for NodeError {}

impl From<std::io::Error> for NodeError {
    fn from(err: std::io::Error) -> Self {
        NodeError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for NodeError {
    fn from(err: serde_json::Error) -> Self {
        NodeError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_errors_are_fatal() {
        assert!(NodeError::Listen("in use".to_string()).is_fatal());
        assert!(NodeError::Load("bad json".to_string()).is_fatal());
        assert!(!NodeError::Persist("disk full".to_string()).is_fatal());
        assert!(!NodeError::Decode("eof".to_string()).is_fatal());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: NodeError = io.into();
        assert_eq!(err.to_string(), "I/O error: pipe closed");
    }
}
