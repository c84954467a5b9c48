//! Stateless command preview.

use axum::response::IntoResponse;
use axum::Json;
use genq_core::command::compile;
use genq_core::gate::{self, Readiness};
use genq_core::params::{Configuration, FieldState};
use serde::Serialize;

use crate::response::DataResponse;

#[derive(Debug, Serialize)]
pub struct CommandPreview {
    /// Multi-line display form.
    pub command: String,
    pub single_line: String,
    pub args: Vec<String>,
    pub readiness: Readiness,
    pub fields: Vec<FieldState>,
    /// Set when a numeric value is outside its accepted range. Does not
    /// affect `readiness`.
    pub range_error: Option<String>,
}

/// POST /api/v1/commands/preview
///
/// Compile any complete configuration without opening a form.
pub async fn preview(Json(config): Json<Configuration>) -> impl IntoResponse {
    let command = compile(&config);
    let preview = CommandPreview {
        command: command.render(),
        single_line: command.to_single_line(),
        args: command.args().to_vec(),
        readiness: gate::check(&config),
        fields: config.fields(),
        range_error: config.validate_ranges().err().map(|e| e.to_string()),
    };
    Json(DataResponse { data: preview })
}
