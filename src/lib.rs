//! emlpush: bulk email ingestion into a remote content service.
//!
//! A run discovers `.eml` files under a path, creates (or resumes) a remote batch job,
//! parses and submits every file through a worker pool, and finalizes the job with the
//! aggregate counts. Use [`ingest_path`] for a live run and [`preview_path`] for a dry run.

pub mod engine;
pub mod error;
pub mod ingest;
pub mod parser;
pub mod pipeline;
pub mod preview;
pub mod remote;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use error::{DiscoveryError, ErrorKind, ItemError, ParseError, RemoteError, RemoteErrorKind};
pub use ingest::ingest_path;
pub use parser::{MailParser, RecordParser};
pub use preview::preview_path;
pub use remote::{HttpIngestService, IngestService};

/// Result alias used by public emlpush API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
