//! Job controller: create or resume the remote batch job, finalize it at the end.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::Path;

use crate::remote::{CreateJobRequest, IngestService};
use crate::{IngestConfig, RunResult};

/// Build the create-job request for a fresh run over `root` with `total` items.
pub fn create_job_request(root: &Path, config: &IngestConfig, total: usize) -> CreateJobRequest {
    let mut metadata = BTreeMap::new();
    metadata.insert("source".to_string(), config.source.clone());
    if !config.labels.is_empty() {
        metadata.insert("labels".to_string(), config.labels.join(","));
    }
    let name = config
        .job_name
        .clone()
        .unwrap_or_else(|| format!("{} import: {}", config.source, root.display()));
    CreateJobRequest {
        tenant_id: config.tenant_id.clone(),
        name,
        platform: config.source.clone(),
        total_items: total,
        source_path: root.display().to_string(),
        metadata,
    }
}

/// Return the job ID for this run: the resume ID unchanged, or a freshly created job.
///
/// Resume only skips job creation. Items processed under the earlier run are not tracked,
/// so every discovered file is submitted again and the service's duplicate detection is the
/// only thing preventing double ingestion.
pub fn establish_job(
    service: &dyn IngestService,
    root: &Path,
    config: &IngestConfig,
    total: usize,
) -> Result<String> {
    if let Some(job_id) = &config.resume_job_id {
        info!("Resuming job {}", job_id);
        warn!(
            "Resume re-submits all {} discovered files; already-ingested items are left to server-side duplicate detection",
            total
        );
        return Ok(job_id.clone());
    }
    let request = create_job_request(root, config, total);
    let job_id = service
        .create_job(&request)
        .with_context(|| format!("create ingestion job for {}", root.display()))?;
    info!("Created job {} ({} items)", job_id, total);
    Ok(job_id)
}

/// Message sent with the completion call, if any.
pub fn completion_message(result: &RunResult) -> Option<String> {
    if result.failed > 0 {
        Some(format!("{} of {} items failed", result.failed, result.total))
    } else if result.cancelled {
        Some("cancelled before all items were processed".to_string())
    } else {
        None
    }
}

/// Single completion call. Items are already submitted, so a failure here is only logged.
pub fn finalize_job(service: &dyn IngestService, job_id: &str, result: &RunResult) {
    let success = result.failed == 0;
    let message = completion_message(result);
    match service.complete_job(job_id, success, message.as_deref()) {
        Ok(()) => debug!("Completed job {} (success={})", job_id, success),
        Err(e) => warn!("Could not finalize job {}: {}", job_id, e),
    }
}
