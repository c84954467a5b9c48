//! Route definitions for the `/forms` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::forms;
use crate::state::AppState;

/// Routes mounted at `/forms`.
///
/// ```text
/// POST   /                -> open_form
/// GET    /{id}            -> get_form
/// PATCH  /{id}            -> update_form
/// DELETE /{id}            -> close_form
/// POST   /{id}/submit     -> submit_form
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(forms::open_form))
        .route(
            "/{id}",
            get(forms::get_form)
                .patch(forms::update_form)
                .delete(forms::close_form),
        )
        .route("/{id}/submit", post(forms::submit_form))
}
