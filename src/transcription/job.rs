//! Audio transcription job lifecycle
//!
//! `NoCheck -> InProgress -> Transcribed | Failed`. A transcribed job can be
//! converted into an interview once; the caller owns persistence.

use super::client::TranscriptionService;
use super::formatter::format_transcript;
use crate::core::error::{Error, Result};
use crate::items::model::{AudioJob, Interview, JobStatus};
use std::path::Path;
use tracing::{debug, info};

/// What a refresh did to a job
#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    /// The job was already terminal; the vendor was not called
    Unchanged,
    /// The vendor reported this state
    Updated(AudioJob),
}

/// Upload `audio_path` and build the job item that tracks it.
///
/// The job is named after the audio file and dated `date`. Nothing is
/// created if the upload fails.
pub async fn submit<S: TranscriptionService>(
    service: &S,
    audio_path: &Path,
    date: &str,
) -> Result<AudioJob> {
    let submitted = service.submit(audio_path).await?;

    let name = audio_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or("Untitled")
        .to_string();

    // An upload acknowledgement is not a confirmed status
    let status = match submitted.status {
        JobStatus::InProgress => JobStatus::NoCheck,
        other => other,
    };

    Ok(AudioJob {
        name,
        date: date.to_string(),
        job_id: submitted.job_id,
        status,
        source_path: audio_path.display().to_string(),
        failure_detail: None,
        duration_seconds: None,
        created_on: None,
    })
}

/// Poll the vendor for the job's status.
///
/// Terminal jobs are returned as [`RefreshOutcome::Unchanged`] without a
/// remote call.
pub async fn refresh<S: TranscriptionService>(service: &S, job: &AudioJob) -> Result<RefreshOutcome> {
    if job.status.is_terminal() {
        debug!(job_id = %job.job_id, status = %job.status, "Job is terminal, skipping refresh");
        return Ok(RefreshOutcome::Unchanged);
    }

    let details = service.check_status(&job.job_id).await?;
    info!(job_id = %job.job_id, from = %job.status, to = %details.status, "Job refreshed");

    Ok(RefreshOutcome::Updated(AudioJob {
        status: details.status,
        failure_detail: details.failure_detail,
        duration_seconds: details.duration_seconds,
        created_on: details.created_on,
        ..job.clone()
    }))
}

/// Fetch and format the transcript of a finished job as a new interview
pub async fn convert_to_interview<S: TranscriptionService>(
    service: &S,
    job: &AudioJob,
) -> Result<Interview> {
    if job.status != JobStatus::Transcribed {
        return Err(Error::InvalidState(format!(
            "job {} is {}, only transcribed jobs can be converted",
            job.job_id, job.status
        )));
    }
    if job.job_id.is_empty() {
        return Err(Error::InvalidState("job has no vendor id".to_string()));
    }

    let transcript = service.fetch_transcript(&job.job_id).await?;

    Ok(Interview {
        name: job.name.clone(),
        date: job.date.clone(),
        body: format_transcript(&transcript),
        notes: String::new(),
    })
}
