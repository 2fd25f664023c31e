//! Typed errors for discovery and for the per-item stages (read, parse, submit).
//!
//! Per-item errors carry their [`ErrorKind`] from the stage that produced them, so the
//! recorder classifies by matching on the variant rather than on message text.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Discovery failed; fatal to the whole run before any job is created.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{} is not a .{expected} file", .path.display())]
    UnsupportedFile { path: PathBuf, expected: String },
    #[error("no .{expected} files found under {}", .path.display())]
    NoMatches { path: PathBuf, expected: String },
    #[error("strict mode: {0}")]
    Walk(String),
    #[error("cannot resolve {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The record parser rejected the input. Never retryable.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("empty input")]
    Empty,
    #[error("malformed message: {0}")]
    Malformed(String),
    #[error("missing required header: {0}")]
    MissingHeader(&'static str),
}

impl From<mailparse::MailParseError> for ParseError {
    fn from(err: mailparse::MailParseError) -> Self {
        ParseError::Malformed(err.to_string())
    }
}

/// Category of a failed remote call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// Connection, TLS, timeout or body decoding failure.
    Transport,
    /// The service rejected the item as invalid.
    Validation,
    /// The service could not persist the item.
    Storage,
    /// Any other non-success answer from the service.
    Service,
}

/// A remote call failed. Returned by every [`IngestService`](crate::remote::IngestService) method.
#[derive(Debug, Error)]
#[error("{kind:?} error: {message}")]
pub struct RemoteError {
    pub kind: RemoteErrorKind,
    pub message: String,
}

impl RemoteError {
    pub fn new(kind: RemoteErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Transport, message)
    }

    pub fn service(message: impl Into<String>) -> Self {
        Self::new(RemoteErrorKind::Service, message)
    }
}

/// Why a single item failed.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("read failed: {0}")]
    Read(#[from] std::io::Error),
    #[error("parse failed: {0}")]
    Parse(#[from] ParseError),
    #[error("submit failed: {0}")]
    Submit(#[from] RemoteError),
    #[error("worker thread panicked before reporting an outcome")]
    WorkerPanicked,
}

impl ItemError {
    /// Bucket this error for reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ItemError::Parse(_) => ErrorKind::Parse,
            ItemError::Submit(remote) => match remote.kind {
                RemoteErrorKind::Validation => ErrorKind::Validation,
                RemoteErrorKind::Storage => ErrorKind::Storage,
                RemoteErrorKind::Transport | RemoteErrorKind::Service => ErrorKind::Unknown,
            },
            ItemError::Read(_) | ItemError::WorkerPanicked => ErrorKind::Unknown,
        }
    }
}

/// Reported error classification for a failed item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    #[serde(rename = "parse_error")]
    Parse,
    #[serde(rename = "validation_error")]
    Validation,
    #[serde(rename = "storage_error")]
    Storage,
    #[serde(rename = "unknown")]
    Unknown,
}

impl ErrorKind {
    /// Parse failures are deterministic; everything else may succeed on a later attempt.
    pub fn is_retryable(self) -> bool {
        !matches!(self, ErrorKind::Parse)
    }

    /// Wire name sent with error reports.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Parse => "parse_error",
            ErrorKind::Validation => "validation_error",
            ErrorKind::Storage => "storage_error",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
