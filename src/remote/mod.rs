//! Remote ingestion surface. The engine only talks to [`IngestService`]; transport lives in
//! implementations such as [`HttpIngestService`].

pub mod endpoints;
pub mod http;

pub use http::HttpIngestService;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::ParsedRecord;
use crate::error::{ErrorKind, RemoteError};

/// Body of a create-job call.
#[derive(Clone, Debug, Serialize)]
pub struct CreateJobRequest {
    pub tenant_id: String,
    pub name: String,
    pub platform: String,
    pub total_items: usize,
    pub source_path: String,
    pub metadata: BTreeMap<String, String>,
}

/// One item submission. `content_id` is the locally minted idempotency key.
#[derive(Debug, Serialize)]
pub struct SubmitItemRequest<'a> {
    pub job_id: &'a str,
    pub tenant_id: &'a str,
    pub content_id: &'a str,
    pub source: &'a str,
    pub source_path: &'a Path,
    pub labels: &'a [String],
    pub record: &'a ParsedRecord,
}

/// Answer to a submission. `was_duplicate` is the service's verdict.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmitItemResponse {
    /// Duplicate replies may omit it; the worker falls back to the minted ID.
    #[serde(default)]
    pub content_id: String,
    #[serde(default)]
    pub source_id: Option<String>,
    #[serde(default)]
    pub was_duplicate: bool,
    #[serde(default)]
    pub existing_source_id: Option<String>,
}

/// Counts processed since the previous progress update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ProgressDelta {
    pub processed: usize,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl ProgressDelta {
    pub fn is_empty(&self) -> bool {
        self.processed == 0
    }
}

/// Body of a record-error call.
#[derive(Debug, Serialize)]
pub struct ErrorReport<'a> {
    pub job_id: &'a str,
    pub file_path: &'a Path,
    pub error_kind: ErrorKind,
    pub message: &'a str,
    pub retryable: bool,
}

/// Blocking calls into the ingestion service. Shared across worker threads.
pub trait IngestService: Send + Sync {
    /// Create a batch job and return its authoritative ID.
    fn create_job(&self, request: &CreateJobRequest) -> Result<String, RemoteError>;

    fn submit_item(&self, request: &SubmitItemRequest<'_>)
    -> Result<SubmitItemResponse, RemoteError>;

    /// Best-effort; callers ignore failures.
    fn update_progress(&self, job_id: &str, delta: &ProgressDelta) -> Result<(), RemoteError>;

    /// Best-effort; callers ignore failures.
    fn record_error(&self, report: &ErrorReport<'_>) -> Result<(), RemoteError>;

    /// Called exactly once at the end of a live run.
    fn complete_job(
        &self,
        job_id: &str,
        success: bool,
        error_message: Option<&str>,
    ) -> Result<(), RemoteError>;
}
