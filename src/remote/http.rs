//! Blocking HTTP/JSON client for the ingestion API.

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::endpoints;
use super::{
    CreateJobRequest, ErrorReport, IngestService, ProgressDelta, SubmitItemRequest,
    SubmitItemResponse,
};
use crate::error::{RemoteError, RemoteErrorKind};

/// Error code some gateways put in the body when persistence failed.
const STORAGE_ERROR_CODE: &str = "storage_error";

#[derive(Deserialize)]
struct CreateJobResponse {
    #[serde(alias = "id")]
    job_id: String,
}

#[derive(Serialize)]
struct CompleteJobBody<'a> {
    success: bool,
    error_message: Option<&'a str>,
}

/// [`IngestService`] over HTTP. Every request carries the client timeout, which is the only
/// per-item deadline in the pipeline.
pub struct HttpIngestService {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpIngestService {
    pub fn new(
        base_url: String,
        api_token: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn send<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        let response = self
            .authorized(self.client.post(url).json(body))
            .send()
            .map_err(|e| RemoteError::transport(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().unwrap_or_default();
        let message = if text.trim().is_empty() {
            status.to_string()
        } else {
            format!("{}: {}", status, text.trim())
        };
        Err(RemoteError::new(classify_status(status, &text), message))
    }

    fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, RemoteError> {
        self.send(url, body)?
            .json::<R>()
            .map_err(|e| RemoteError::transport(format!("decode response from {url}: {e}")))
    }

    fn post_empty<B: Serialize + ?Sized>(&self, url: &str, body: &B) -> Result<(), RemoteError> {
        self.send(url, body).map(|_| ())
    }
}

/// Map a non-success status (and its body) to a remote error kind.
pub fn classify_status(status: StatusCode, body: &str) -> RemoteErrorKind {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => RemoteErrorKind::Validation,
        StatusCode::INSUFFICIENT_STORAGE => RemoteErrorKind::Storage,
        _ if body.contains(STORAGE_ERROR_CODE) => RemoteErrorKind::Storage,
        _ => RemoteErrorKind::Service,
    }
}

impl IngestService for HttpIngestService {
    fn create_job(&self, request: &CreateJobRequest) -> Result<String, RemoteError> {
        let response: CreateJobResponse =
            self.post_json(&endpoints::jobs_url(&self.base_url), request)?;
        Ok(response.job_id)
    }

    fn submit_item(
        &self,
        request: &SubmitItemRequest<'_>,
    ) -> Result<SubmitItemResponse, RemoteError> {
        self.post_json(
            &endpoints::items_url(&self.base_url, request.job_id),
            request,
        )
    }

    fn update_progress(&self, job_id: &str, delta: &ProgressDelta) -> Result<(), RemoteError> {
        self.post_empty(&endpoints::progress_url(&self.base_url, job_id), delta)
    }

    fn record_error(&self, report: &ErrorReport<'_>) -> Result<(), RemoteError> {
        self.post_empty(&endpoints::errors_url(&self.base_url, report.job_id), report)
    }

    fn complete_job(
        &self,
        job_id: &str,
        success: bool,
        error_message: Option<&str>,
    ) -> Result<(), RemoteError> {
        self.post_empty(
            &endpoints::complete_url(&self.base_url, job_id),
            &CompleteJobBody {
                success,
                error_message,
            },
        )
    }
}
