//! Handlers for the `/forms` resource.
//!
//! A form is a server-held [`FormSession`](genq_core::session::FormSession):
//! every PATCH recompiles its command, and submit is gated and guarded
//! against double submission.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use genq_core::params::ConfigurationUpdate;
use genq_core::session::FormView;
use genq_core::task::TaskVariant;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::forms::{self, SharedSession};
use crate::handlers::jobs::JobEntry;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /api/v1/forms`.
#[derive(Debug, Deserialize)]
pub struct OpenForm {
    pub task: TaskVariant,
}

#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub form: FormView,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_form(state: &AppState, id: Uuid) -> AppResult<SharedSession> {
    state
        .forms
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Form {id} not found")))
}

// ---------------------------------------------------------------------------
// Open / get / close
// ---------------------------------------------------------------------------

/// POST /api/v1/forms
pub async fn open_form(
    State(state): State<AppState>,
    Json(input): Json<OpenForm>,
) -> AppResult<impl IntoResponse> {
    let (id, session) = state.forms.open(input.task).await;
    let form = session.lock().await.view();
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: FormResponse { id, form },
        }),
    ))
}

/// GET /api/v1/forms/{id}
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_form(&state, id).await?;
    let form = session.lock().await.view();
    Ok(Json(DataResponse {
        data: FormResponse { id, form },
    }))
}

/// DELETE /api/v1/forms/{id}
///
/// Closing an unknown form is not an error.
pub async fn close_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    if state.forms.close(id).await {
        tracing::debug!(form_id = %id, "Form closed");
    }
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

/// PATCH /api/v1/forms/{id}
///
/// Apply a partial update. The response carries the recompiled command.
pub async fn update_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<ConfigurationUpdate>,
) -> AppResult<impl IntoResponse> {
    let session = find_form(&state, id).await?;
    let form = {
        let mut guard = session.lock().await;
        guard.update(update)?;
        guard.view()
    };
    Ok(Json(DataResponse {
        data: FormResponse { id, form },
    }))
}

// ---------------------------------------------------------------------------
// Submit
// ---------------------------------------------------------------------------

/// POST /api/v1/forms/{id}/submit
///
/// Returns 201 with the queued job, 400 when required fields are blank or a
/// value is out of range, 409 while a previous submit from the same form is
/// outstanding, 503 when the store is unreachable. The form keeps its
/// configuration in every case.
pub async fn submit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let session = find_form(&state, id).await?;
    let job = forms::submit(&session, state.jobs.as_ref()).await?;
    let version = state.queue_version.bump();

    tracing::info!(
        job_id = job.id,
        task = %job.task,
        form_id = %id,
        queue_version = version,
        "Job queued from form",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: JobEntry::from(job),
        }),
    ))
}
