//! Handlers for the `/tasks` resource: the fixed catalogue of variants.

use axum::extract::Path;
use axum::response::IntoResponse;
use axum::Json;
use genq_core::command::compile;
use genq_core::params::{Configuration, FieldState};
use genq_core::task::{TaskMeta, TaskVariant};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;

/// One entry of the task catalogue.
#[derive(Debug, Serialize)]
pub struct TaskSummary {
    pub task: TaskVariant,
    #[serde(flatten)]
    pub meta: TaskMeta,
}

/// A variant's default configuration, ready to render as a form.
#[derive(Debug, Serialize)]
pub struct TaskDefaults {
    pub task: TaskVariant,
    pub params: Configuration,
    pub command: String,
    pub fields: Vec<FieldState>,
}

/// GET /api/v1/tasks
pub async fn list_tasks() -> impl IntoResponse {
    let tasks: Vec<TaskSummary> = TaskVariant::ALL
        .into_iter()
        .map(|task| TaskSummary {
            task,
            meta: task.meta(),
        })
        .collect();
    Json(DataResponse { data: tasks })
}

/// GET /api/v1/tasks/{task}/defaults
///
/// Unknown task names are a 400 listing the valid ones.
pub async fn task_defaults(Path(task): Path<String>) -> AppResult<impl IntoResponse> {
    let task: TaskVariant = task.parse()?;
    let params = Configuration::defaults(task);
    Ok(Json(DataResponse {
        data: TaskDefaults {
            task,
            command: compile(&params).render(),
            fields: params.fields(),
            params,
        },
    }))
}
