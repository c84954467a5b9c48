use axum::routing::get;
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /                  -> list_tasks
/// GET    /{task}/defaults   -> task_defaults
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tasks::list_tasks))
        .route("/{task}/defaults", get(tasks::task_defaults))
}
