use std::fmt;
use std::time::Duration;

use syllabix_core::StreamEvent;
use thiserror::Error;

pub use syllabix_core::JobId;

/// Everything a subscription reports, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The server accepted the stream request.
    Opened,
    /// A decoded push message.
    Message(StreamEvent),
    /// A frame whose payload did not decode; already discarded.
    Malformed { reason: String },
    /// The connection dropped; the next attempt starts after `delay`.
    Reconnecting { attempt: u32, delay: Duration },
    /// The channel gave up. No more messages follow.
    Failed(StreamError),
    /// The subscription finished. Always the last event.
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct StreamError {
    pub kind: FailureKind,
    pub message: String,
}

impl StreamError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    UnexpectedContentType { content_type: String },
    Timeout,
    Network,
    /// The server closed the stream before a terminal event.
    EndedEarly,
    /// The background runtime could not be started.
    Runtime,
}

impl FailureKind {
    /// Whether a fresh connection attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FailureKind::Timeout | FailureKind::Network | FailureKind::EndedEarly => true,
            FailureKind::HttpStatus(code) => *code >= 500,
            FailureKind::InvalidUrl
            | FailureKind::UnexpectedContentType { .. }
            | FailureKind::Runtime => false,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::UnexpectedContentType { content_type } => {
                write!(f, "unexpected content type {content_type}")
            }
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::EndedEarly => write!(f, "stream ended early"),
            FailureKind::Runtime => write!(f, "runtime error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_failures_are_retryable() {
        assert!(FailureKind::Network.is_retryable());
        assert!(FailureKind::EndedEarly.is_retryable());
        assert!(FailureKind::HttpStatus(503).is_retryable());
        assert!(!FailureKind::HttpStatus(404).is_retryable());
        assert!(!FailureKind::InvalidUrl.is_retryable());
    }

    #[test]
    fn error_display_includes_kind_and_message() {
        let err = StreamError::new(FailureKind::HttpStatus(404), "Job not found");
        assert_eq!(err.to_string(), "http status 404: Job not found");
    }
}
