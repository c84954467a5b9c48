//! Handlers for the `/jobs` resource.
//!
//! Jobs are created by the API and advanced by the external worker through
//! `PATCH /jobs/{id}/status`. The list is not polled: clients pass the last
//! queue version they saw and get `304 Not Modified` until a new submission
//! lands.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use genq_core::error::CoreError;
use genq_core::gate;
use genq_core::job::{Job, StatusUpdate, StatusView};
use genq_core::params::Configuration;
use genq_core::store::NewJob;
use genq_core::types::DbId;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// A job as shown in the history: the row, its status view, and the command
/// rebuilt from its stored parameters.
#[derive(Debug, Serialize)]
pub struct JobEntry {
    #[serde(flatten)]
    pub job: Job,
    pub display: StatusView,
    pub summary: String,
    /// `None` when the stored parameters cannot be decoded.
    pub command: Option<String>,
}

impl From<Job> for JobEntry {
    fn from(job: Job) -> Self {
        let command = match job.command() {
            Ok(command) => Some(command.render()),
            Err(e) => {
                tracing::warn!(job_id = job.id, error = %e, "Cannot rebuild job command");
                None
            }
        };
        let display = job.status_view();
        Self {
            summary: display.summary(),
            display,
            command,
            job,
        }
    }
}

/// Query parameters for `GET /api/v1/jobs`.
#[derive(Debug, Deserialize)]
pub struct JobListQuery {
    /// Queue version the caller last loaded.
    pub since_version: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct JobList {
    pub version: u64,
    pub jobs: Vec<JobEntry>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Job", id }
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs
///
/// The newest 50 jobs, newest first. With `since_version` equal to the
/// current queue version, returns 304 without touching the store.
pub async fn list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> AppResult<Response> {
    let version = state.queue_version.get();
    if params.since_version == Some(version) {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let jobs = state.jobs.list().await?;
    let jobs = jobs.into_iter().map(JobEntry::from).collect();
    Ok(Json(DataResponse {
        data: JobList { version, jobs },
    })
    .into_response())
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

/// POST /api/v1/jobs
///
/// Queue a complete configuration without a form. Same gate and range
/// checks as a form submit.
pub async fn create_job(
    State(state): State<AppState>,
    Json(config): Json<Configuration>,
) -> AppResult<impl IntoResponse> {
    config.validate_ranges()?;
    gate::ensure_ready(&config)?;

    let job = state.jobs.create(NewJob::from_configuration(&config)?).await?;
    let version = state.queue_version.bump();
    tracing::info!(job_id = job.id, task = %job.task, queue_version = version, "Job queued");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: JobEntry::from(job),
        }),
    ))
}

// ---------------------------------------------------------------------------
// Get / delete
// ---------------------------------------------------------------------------

/// GET /api/v1/jobs/{id}
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let job = state.jobs.find(id).await?.ok_or_else(|| not_found(id))?;
    Ok(Json(DataResponse {
        data: JobEntry::from(job),
    }))
}

/// DELETE /api/v1/jobs/{id}
///
/// Idempotent: 204 whether or not the job existed. A worker still holding
/// the job will find nothing to update.
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    state.jobs.delete(id).await?;
    tracing::info!(job_id = id, "Job deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// PATCH /api/v1/jobs/{id}/status
///
/// Worker-facing. 400 when the payload's fields do not match its status,
/// 409 when the transition moves backward, 404 when the job was deleted.
pub async fn update_job_status(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(update): Json<StatusUpdate>,
) -> AppResult<impl IntoResponse> {
    update.validate()?;
    let job = state
        .jobs
        .update_status(id, &update)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(job_id = id, status = %job.status, "Job status updated");
    Ok(Json(DataResponse {
        data: JobEntry::from(job),
    }))
}
