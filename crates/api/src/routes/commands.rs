use axum::routing::post;
use axum::Router;

use crate::handlers::commands;
use crate::state::AppState;

/// Routes mounted at `/commands`.
pub fn router() -> Router<AppState> {
    Router::new().route("/preview", post(commands::preview))
}
