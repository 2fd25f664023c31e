//! Ingestion API URL builders.

/// Build jobs collection URL (create job)
pub fn jobs_url(base_url: &str) -> String {
    format!("{}/api/v1/ingest/jobs", base_url.trim_end_matches('/'))
}

/// Build job URL
pub fn job_url(base_url: &str, job_id: &str) -> String {
    format!("{}/{}", jobs_url(base_url), job_id)
}

/// Build item submission URL
pub fn items_url(base_url: &str, job_id: &str) -> String {
    format!("{}/items", job_url(base_url, job_id))
}

/// Build progress update URL
pub fn progress_url(base_url: &str, job_id: &str) -> String {
    format!("{}/progress", job_url(base_url, job_id))
}

/// Build error report URL
pub fn errors_url(base_url: &str, job_id: &str) -> String {
    format!("{}/errors", job_url(base_url, job_id))
}

/// Build job completion URL
pub fn complete_url(base_url: &str, job_id: &str) -> String {
    format!("{}/complete", job_url(base_url, job_id))
}
