//! Shared fixtures: a recording stub ingestion service and `.eml` file helpers.

#![allow(dead_code)]

use emlpush::error::{ErrorKind, RemoteError, RemoteErrorKind};
use emlpush::remote::{
    CreateJobRequest, ErrorReport, IngestService, ProgressDelta, SubmitItemRequest,
    SubmitItemResponse,
};
use emlpush::{IngestConfig, MailParser, RunResult, ingest_path};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const JOB_ID: &str = "job-1";
pub const TENANT: &str = "tenant-a";

/// One call seen by [`StubService`].
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    CreateJob(CreateJobSeen),
    Submit {
        job_id: String,
        content_id: String,
        path: PathBuf,
        subject: String,
    },
    Progress(ProgressDelta),
    RecordError {
        path: PathBuf,
        kind: ErrorKind,
        retryable: bool,
    },
    Complete {
        job_id: String,
        success: bool,
        message: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct CreateJobSeen {
    pub tenant_id: String,
    pub name: String,
    pub platform: String,
    pub total_items: usize,
    pub metadata: Vec<(String, String)>,
}

/// In-memory [`IngestService`] that records every call.
///
/// Reports a duplicate when the same content hash is submitted twice. Failure toggles are
/// plain fields so tests can use struct update syntax.
#[derive(Default)]
pub struct StubService {
    pub calls: Mutex<Vec<Call>>,
    pub fail_create: bool,
    pub fail_complete: bool,
    /// Fail every update_progress and record_error call.
    pub fail_best_effort: bool,
    /// Reject submissions whose subject matches, with the given kind.
    pub reject_subjects: HashMap<String, RemoteErrorKind>,
    /// Set the flag after this many successful submissions.
    pub cancel_after: Option<(usize, Arc<AtomicBool>)>,
    /// content_hash -> source_id of first submission.
    pub seen_hashes: Mutex<HashMap<String, String>>,
    pub submitted: AtomicUsize,
}

impl StubService {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> Vec<CreateJobSeen> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateJob(seen) => Some(seen),
                _ => None,
            })
            .collect()
    }

    /// Submitted paths in call order.
    pub fn submitted_paths(&self) -> Vec<PathBuf> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Submit { path, .. } => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn submitted_content_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Submit { content_id, .. } => Some(content_id),
                _ => None,
            })
            .collect()
    }

    pub fn progress_deltas(&self) -> Vec<ProgressDelta> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Progress(d) => Some(d),
                _ => None,
            })
            .collect()
    }

    pub fn error_reports(&self) -> Vec<(PathBuf, ErrorKind, bool)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::RecordError {
                    path,
                    kind,
                    retryable,
                } => Some((path, kind, retryable)),
                _ => None,
            })
            .collect()
    }

    /// (job_id, success, message) for every completion call.
    pub fn completions(&self) -> Vec<(String, bool, Option<String>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Complete {
                    job_id,
                    success,
                    message,
                } => Some((job_id, success, message)),
                _ => None,
            })
            .collect()
    }
}

impl IngestService for StubService {
    fn create_job(&self, request: &CreateJobRequest) -> Result<String, RemoteError> {
        self.push(Call::CreateJob(CreateJobSeen {
            tenant_id: request.tenant_id.clone(),
            name: request.name.clone(),
            platform: request.platform.clone(),
            total_items: request.total_items,
            metadata: request
                .metadata
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }));
        if self.fail_create {
            return Err(RemoteError::service("create refused"));
        }
        Ok(JOB_ID.to_string())
    }

    fn submit_item(
        &self,
        request: &SubmitItemRequest<'_>,
    ) -> Result<SubmitItemResponse, RemoteError> {
        self.push(Call::Submit {
            job_id: request.job_id.to_string(),
            content_id: request.content_id.to_string(),
            path: request.source_path.to_path_buf(),
            subject: request.record.subject.clone(),
        });
        if let Some(kind) = self.reject_subjects.get(&request.record.subject) {
            return Err(RemoteError::new(*kind, "rejected by stub"));
        }

        let response = {
            let mut seen = self.seen_hashes.lock().unwrap();
            match seen.get(&request.record.content_hash) {
                Some(existing) => SubmitItemResponse {
                    content_id: request.content_id.to_string(),
                    source_id: None,
                    was_duplicate: true,
                    existing_source_id: Some(existing.clone()),
                },
                None => {
                    let source_id = format!("src-{}", seen.len() + 1);
                    seen.insert(request.record.content_hash.clone(), source_id.clone());
                    SubmitItemResponse {
                        content_id: request.content_id.to_string(),
                        source_id: Some(source_id),
                        was_duplicate: false,
                        existing_source_id: None,
                    }
                }
            }
        };

        let n = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some((after, flag)) = &self.cancel_after
            && n >= *after
        {
            flag.store(true, Ordering::SeqCst);
        }
        Ok(response)
    }

    fn update_progress(&self, _job_id: &str, delta: &ProgressDelta) -> Result<(), RemoteError> {
        self.push(Call::Progress(*delta));
        if self.fail_best_effort {
            return Err(RemoteError::transport("progress endpoint down"));
        }
        Ok(())
    }

    fn record_error(&self, report: &ErrorReport<'_>) -> Result<(), RemoteError> {
        self.push(Call::RecordError {
            path: report.file_path.to_path_buf(),
            kind: report.error_kind,
            retryable: report.retryable,
        });
        if self.fail_best_effort {
            return Err(RemoteError::transport("error endpoint down"));
        }
        Ok(())
    }

    fn complete_job(
        &self,
        job_id: &str,
        success: bool,
        error_message: Option<&str>,
    ) -> Result<(), RemoteError> {
        self.push(Call::Complete {
            job_id: job_id.to_string(),
            success,
            message: error_message.map(str::to_string),
        });
        if self.fail_complete {
            return Err(RemoteError::service("complete refused"));
        }
        Ok(())
    }
}

// --- fixtures ---

/// A minimal valid message.
pub fn email(subject: &str, body: &str) -> String {
    format!(
        "From: Alice <alice@example.com>\r\n\
         To: bob@example.com\r\n\
         Subject: {subject}\r\n\
         Message-ID: <{id}@example.com>\r\n\
         Date: Tue, 1 Jul 2025 10:00:00 +0000\r\n\
         \r\n\
         {body}\r\n",
        id = subject.replace(' ', "-"),
    )
}

/// A message without a From header; the mail parser rejects it.
pub const MISSING_FROM: &str = "To: bob@example.com\r\nSubject: orphan\r\n\r\nno sender\r\n";

/// Write `contents` to `dir/rel`, creating parent directories.
pub fn write_file(dir: &Path, rel: &str, contents: &str) -> PathBuf {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}

/// Write `n` distinct valid messages named `msg-000.eml`, `msg-001.eml`, …
pub fn write_emails(dir: &Path, n: usize) -> Vec<PathBuf> {
    (0..n)
        .map(|i| {
            write_file(
                dir,
                &format!("msg-{i:03}.eml"),
                &email(&format!("message {i}"), &format!("body {i}")),
            )
        })
        .collect()
}

pub fn config(concurrency: usize) -> IngestConfig {
    IngestConfig {
        tenant_id: TENANT.to_string(),
        concurrency,
        ..Default::default()
    }
}

/// Live run against `stub` with the mail parser and a fresh cancel flag.
pub fn run(dir: &Path, config: &IngestConfig, stub: &Arc<StubService>) -> RunResult {
    run_with_cancel(dir, config, stub, Arc::new(AtomicBool::new(false)))
}

pub fn run_with_cancel(
    dir: &Path,
    config: &IngestConfig,
    stub: &Arc<StubService>,
    cancel: Arc<AtomicBool>,
) -> RunResult {
    ingest_path(
        dir,
        config,
        Arc::clone(stub) as Arc<dyn IngestService>,
        Arc::new(MailParser),
        cancel,
    )
    .unwrap()
}
