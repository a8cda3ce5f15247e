//! Transcription vendor client
//!
//! The job state machine only needs three remote calls, expressed by
//! [`TranscriptionService`]. [`RevAiClient`] implements them against the
//! rev.ai asynchronous speech-to-text API.

use crate::items::model::JobStatus;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

pub const REV_AI_BASE_URL: &str = "https://api.rev.ai/speechtotext/v1";
const USER_AGENT: &str = concat!("interview-manager/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Transcription vendor errors
#[derive(Debug, Error)]
pub enum VendorError {
    #[error("no transcription API key configured; add one in settings")]
    MissingCredential,

    #[error("the transcription service rejected the API key")]
    Unauthorized,

    #[error("network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("unexpected response: {0}")]
    Parse(String),

    #[error("cannot read audio file {path}: {reason}")]
    AudioFile { path: String, reason: String },
}

/// Vendor reply to an upload
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmittedJob {
    #[serde(rename = "id")]
    pub job_id: String,
    pub status: JobStatus,
}

/// Vendor reply to a status check
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobDetails {
    pub status: JobStatus,
    #[serde(default)]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub failure_detail: Option<String>,
    #[serde(default)]
    pub created_on: Option<String>,
}

/// The remote operations an audio job needs
#[allow(async_fn_in_trait)]
pub trait TranscriptionService {
    /// Upload an audio file and start a job
    async fn submit(&self, audio_path: &Path) -> Result<SubmittedJob, VendorError>;

    /// Current status of a job
    async fn check_status(&self, job_id: &str) -> Result<JobDetails, VendorError>;

    /// Plain-text transcript of a finished job
    async fn fetch_transcript(&self, job_id: &str) -> Result<String, VendorError>;
}

/// rev.ai API client
pub struct RevAiClient {
    http_client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl RevAiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, VendorError> {
        Self::with_base_url(api_key, REV_AI_BASE_URL)
    }

    /// Client for a different endpoint, e.g. a regional deployment
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, VendorError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(VendorError::MissingCredential);
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| VendorError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn jobs_url(&self) -> String {
        format!("{}/jobs", self.base_url)
    }

    fn job_url(&self, job_id: &str) -> String {
        format!("{}/jobs/{}", self.base_url, job_id)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    async fn checked(response: reqwest::Response) -> Result<reqwest::Response, VendorError> {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(VendorError::Unauthorized);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(VendorError::Api(status.as_u16(), error_text));
        }

        Ok(response)
    }
}

impl TranscriptionService for RevAiClient {
    async fn submit(&self, audio_path: &Path) -> Result<SubmittedJob, VendorError> {
        let bytes = tokio::fs::read(audio_path)
            .await
            .map_err(|e| VendorError::AudioFile {
                path: audio_path.display().to_string(),
                reason: e.to_string(),
            })?;
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio")
            .to_string();

        debug!(file = %file_name, bytes = bytes.len(), "Uploading audio to rev.ai");

        let form = Form::new().part("media", Part::bytes(bytes).file_name(file_name));
        let response = self
            .http_client
            .post(self.jobs_url())
            .header(AUTHORIZATION, self.bearer())
            .multipart(form)
            .send()
            .await
            .map_err(|e| VendorError::Network(e.to_string()))?;

        let body = Self::checked(response)
            .await?
            .text()
            .await
            .map_err(|e| VendorError::Network(e.to_string()))?;
        let job = parse_submitted_job(&body)?;

        info!(job_id = %job.job_id, status = %job.status, "Transcription job submitted");
        Ok(job)
    }

    async fn check_status(&self, job_id: &str) -> Result<JobDetails, VendorError> {
        debug!(job_id, "Checking rev.ai job status");

        let response = self
            .http_client
            .get(self.job_url(job_id))
            .header(AUTHORIZATION, self.bearer())
            .send()
            .await
            .map_err(|e| VendorError::Network(e.to_string()))?;

        let body = Self::checked(response)
            .await?
            .text()
            .await
            .map_err(|e| VendorError::Network(e.to_string()))?;
        parse_job_details(&body)
    }

    async fn fetch_transcript(&self, job_id: &str) -> Result<String, VendorError> {
        debug!(job_id, "Fetching rev.ai transcript");

        let response = self
            .http_client
            .get(format!("{}/transcript", self.job_url(job_id)))
            .header(AUTHORIZATION, self.bearer())
            .header(ACCEPT, "text/plain")
            .send()
            .await
            .map_err(|e| VendorError::Network(e.to_string()))?;

        Self::checked(response)
            .await?
            .text()
            .await
            .map_err(|e| VendorError::Network(e.to_string()))
    }
}

pub fn parse_submitted_job(body: &str) -> Result<SubmittedJob, VendorError> {
    serde_json::from_str(body).map_err(|e| VendorError::Parse(e.to_string()))
}

pub fn parse_job_details(body: &str) -> Result<JobDetails, VendorError> {
    serde_json::from_str(body).map_err(|e| VendorError::Parse(e.to_string()))
}
