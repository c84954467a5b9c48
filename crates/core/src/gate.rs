//! Submission gate: whether "add to queue" is allowed for a configuration.
//!
//! Only non-empty text requirements are gated. The speech-to-video audio/TTS
//! requirement is shown on the form (see [`Configuration::fields`]) but does
//! not block submission.

use serde::Serialize;

use crate::error::CoreError;
use crate::params::{Configuration, Field};

/// Outcome of the gate for one form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Readiness {
    /// Submission is allowed.
    Ready,
    /// Required fields are blank.
    Blocked { missing: Vec<Field> },
    /// A submission from this form is still outstanding.
    Busy,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

fn blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Fields that must be non-blank before the configuration can be queued.
pub fn missing_fields(config: &Configuration) -> Vec<Field> {
    let checks: Vec<(Field, &str)> = match config {
        Configuration::TextToVideo(p) => vec![(Field::Prompt, p.prompt.as_str())],
        Configuration::ImageToVideo(p) => vec![(Field::ImagePath, p.image_path.as_str())],
        Configuration::TextAndImageToVideo(p) => vec![
            (Field::ImagePath, p.image_path.as_str()),
            (Field::Prompt, p.prompt.as_str()),
        ],
        Configuration::SpeechToVideo(p) => vec![(Field::ImagePath, p.image_path.as_str())],
        Configuration::Animate(p) => {
            vec![(Field::SourceDataPath, p.source_data_path.as_str())]
        }
    };

    checks
        .into_iter()
        .filter(|(_, value)| blank(value))
        .map(|(field, _)| field)
        .collect()
}

/// Evaluate the gate from configuration state alone.
pub fn check(config: &Configuration) -> Readiness {
    let missing = missing_fields(config);
    if missing.is_empty() {
        Readiness::Ready
    } else {
        Readiness::Blocked { missing }
    }
}

/// [`check`] as a `Result`: blocked becomes [`CoreError::Validation`] naming
/// the empty fields.
pub fn ensure_ready(config: &Configuration) -> Result<(), CoreError> {
    let missing = missing_fields(config);
    if missing.is_empty() {
        return Ok(());
    }
    let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
    Err(CoreError::Validation(format!(
        "Required fields are empty: {}",
        names.join(", ")
    )))
}
