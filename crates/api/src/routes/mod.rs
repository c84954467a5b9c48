pub mod commands;
pub mod forms;
pub mod health;
pub mod jobs;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /tasks                         list variants
/// /tasks/{task}/defaults         default configuration + command
///
/// /commands/preview              compile a configuration (POST)
///
/// /forms                         open (POST)
/// /forms/{id}                    get, update (PATCH), close (DELETE)
/// /forms/{id}/submit             gated submit (POST)
///
/// /jobs                          list, create
/// /jobs/{id}                     get, delete
/// /jobs/{id}/status              worker status report (PATCH)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/tasks", tasks::router())
        .nest("/commands", commands::router())
        .nest("/forms", forms::router())
        .nest("/jobs", jobs::router())
}
