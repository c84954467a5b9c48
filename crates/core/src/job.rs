//! Queued jobs and their lifecycle.
//!
//! ```text
//! pending ──> running ──> completed
//!    │           └──────> failed
//!    └──────────────────> completed | failed
//! ```
//!
//! Transitions are driven by the external worker and only ever move
//! forward. `completed` carries an output path, `failed` an error message,
//! and `pending`/`running` carry neither.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::command::{compile, CommandLine};
use crate::error::CoreError;
use crate::params::Configuration;
use crate::task::TaskVariant;
use crate::types::{DbId, Timestamp};

/// Shown for a completed job whose worker did not report an output path.
pub const MISSING_OUTPUT_PATH: &str = "(output path not reported)";

/// Shown for a failed job whose worker did not report an error message.
pub const MISSING_ERROR_MESSAGE: &str = "(no error message reported)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub const ALL: [JobStatus; 4] = [
        JobStatus::Pending,
        JobStatus::Running,
        JobStatus::Completed,
        JobStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    /// `completed` and `failed` are final.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    fn rank(self) -> u8 {
        match self {
            JobStatus::Pending => 0,
            JobStatus::Running => 1,
            JobStatus::Completed | JobStatus::Failed => 2,
        }
    }

    /// Whether a worker may move a job from `self` to `next`.
    ///
    /// Forward moves are allowed, including skipping `running`. A
    /// non-terminal status may be re-reported (e.g. a `running` heartbeat);
    /// a terminal one may not.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        if self == next {
            return !self.is_terminal();
        }
        next.rank() > self.rank()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JobStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Unknown job status '{s}'")))
    }
}

/// A persisted queue entry.
///
/// `params` is kept as raw JSON: the store never interprets it. It is the
/// serialized [`Configuration`] the job was submitted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: DbId,
    pub task: TaskVariant,
    pub prompt: String,
    pub params: serde_json::Value,
    pub status: JobStatus,
    pub output_path: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// Decode the stored configuration.
    pub fn configuration(&self) -> Result<Configuration, CoreError> {
        let config: Configuration = serde_json::from_value(self.params.clone()).map_err(|e| {
            CoreError::Internal(format!("Job {} has unreadable params: {e}", self.id))
        })?;
        if config.task() != self.task {
            return Err(CoreError::Internal(format!(
                "Job {} is a '{}' job but its params describe '{}'",
                self.id,
                self.task,
                config.task()
            )));
        }
        Ok(config)
    }

    /// Recompile the command this job was submitted with.
    pub fn command(&self) -> Result<CommandLine, CoreError> {
        self.configuration().map(|config| compile(&config))
    }

    pub fn status_view(&self) -> StatusView {
        StatusView::of(self)
    }
}

/// What a history entry shows for its status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusView {
    Pending,
    Running,
    Completed { output_path: String },
    Failed { error_message: String },
}

fn reported(value: Option<&str>, placeholder: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => placeholder.to_string(),
    }
}

impl StatusView {
    /// Completed and failed views always carry a non-empty value; pending
    /// and running never carry one, whatever the row holds.
    pub fn of(job: &Job) -> Self {
        match job.status {
            JobStatus::Pending => StatusView::Pending,
            JobStatus::Running => StatusView::Running,
            JobStatus::Completed => StatusView::Completed {
                output_path: reported(job.output_path.as_deref(), MISSING_OUTPUT_PATH),
            },
            JobStatus::Failed => StatusView::Failed {
                error_message: reported(job.error_message.as_deref(), MISSING_ERROR_MESSAGE),
            },
        }
    }

    pub fn status(&self) -> JobStatus {
        match self {
            StatusView::Pending => JobStatus::Pending,
            StatusView::Running => JobStatus::Running,
            StatusView::Completed { .. } => JobStatus::Completed,
            StatusView::Failed { .. } => JobStatus::Failed,
        }
    }

    pub fn is_final(&self) -> bool {
        self.status().is_terminal()
    }

    /// One-line summary for a history row.
    pub fn summary(&self) -> String {
        match self {
            StatusView::Pending => "Waiting in queue".to_string(),
            StatusView::Running => "Generating".to_string(),
            StatusView::Completed { output_path } => format!("Output: {output_path}"),
            StatusView::Failed { error_message } => format!("Failed: {error_message}"),
        }
    }
}

/// A status report from the worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: JobStatus,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
}

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

impl StatusUpdate {
    pub fn running() -> Self {
        Self {
            status: JobStatus::Running,
            output_path: None,
            error_message: None,
        }
    }

    pub fn completed(output_path: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Completed,
            output_path: Some(output_path.into()),
            error_message: None,
        }
    }

    pub fn failed(error_message: impl Into<String>) -> Self {
        Self {
            status: JobStatus::Failed,
            output_path: None,
            error_message: Some(error_message.into()),
        }
    }

    /// Check that the update carries exactly the fields its status needs.
    pub fn validate(&self) -> Result<(), CoreError> {
        let (needs_output, needs_error) = match self.status {
            JobStatus::Pending | JobStatus::Running => (false, false),
            JobStatus::Completed => (true, false),
            JobStatus::Failed => (false, true),
        };

        if needs_output && !filled(&self.output_path) {
            return Err(CoreError::Validation(
                "A completed job must report a non-empty output_path".into(),
            ));
        }
        if needs_error && !filled(&self.error_message) {
            return Err(CoreError::Validation(
                "A failed job must report a non-empty error_message".into(),
            ));
        }
        if !needs_output && self.output_path.is_some() {
            return Err(CoreError::Validation(format!(
                "output_path cannot be set on a {} job",
                self.status
            )));
        }
        if !needs_error && self.error_message.is_some() {
            return Err(CoreError::Validation(format!(
                "error_message cannot be set on a {} job",
                self.status
            )));
        }
        Ok(())
    }

    /// Validate the update against the job's current status.
    pub fn check_transition(&self, current: JobStatus) -> Result<(), CoreError> {
        self.validate()?;
        if !current.can_transition_to(self.status) {
            return Err(CoreError::Conflict(format!(
                "Job status cannot move from {current} to {}",
                self.status
            )));
        }
        Ok(())
    }

    /// Write the update into a job. Callers check the transition first.
    pub fn apply_to(&self, job: &mut Job, now: Timestamp) {
        job.status = self.status;
        job.output_path = self.output_path.clone();
        job.error_message = self.error_message.clone();
        job.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn job(status: JobStatus) -> Job {
        let config = Configuration::defaults(TaskVariant::TextToVideo);
        Job {
            id: 1,
            task: TaskVariant::TextToVideo,
            prompt: String::new(),
            params: serde_json::to_value(&config).unwrap(),
            status,
            output_path: None,
            error_message: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // -- transitions --

    #[test]
    fn forward_transitions_allowed() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Running));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Completed));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Failed));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Running));
    }

    #[test]
    fn backward_and_terminal_transitions_rejected() {
        assert!(!JobStatus::Running.can_transition_to(JobStatus::Pending));
        for terminal in [JobStatus::Completed, JobStatus::Failed] {
            for next in JobStatus::ALL {
                assert!(
                    !terminal.can_transition_to(next),
                    "{terminal} -> {next} must be rejected"
                );
            }
        }
    }

    #[test]
    fn status_strings_parse_back() {
        for status in JobStatus::ALL {
            assert_eq!(status.as_str().parse::<JobStatus>().unwrap(), status);
        }
        assert!("cancelled".parse::<JobStatus>().is_err());
    }

    // -- updates --

    #[test]
    fn completed_update_requires_output_path() {
        let update = StatusUpdate {
            status: JobStatus::Completed,
            output_path: Some("  ".into()),
            error_message: None,
        };
        assert_matches!(update.validate(), Err(CoreError::Validation(_)));
        assert!(StatusUpdate::completed("out.mp4").validate().is_ok());
    }

    #[test]
    fn failed_update_requires_error_message() {
        let update = StatusUpdate {
            status: JobStatus::Failed,
            output_path: None,
            error_message: None,
        };
        assert_matches!(update.validate(), Err(CoreError::Validation(_)));
        assert!(StatusUpdate::failed("CUDA out of memory").validate().is_ok());
    }

    #[test]
    fn running_update_carries_nothing() {
        let update = StatusUpdate {
            status: JobStatus::Running,
            output_path: Some("early.mp4".into()),
            error_message: None,
        };
        assert_matches!(update.validate(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn check_transition_reports_conflict() {
        assert_matches!(
            StatusUpdate::running().check_transition(JobStatus::Completed),
            Err(CoreError::Conflict(_))
        );
        assert!(StatusUpdate::running()
            .check_transition(JobStatus::Pending)
            .is_ok());
    }

    #[test]
    fn apply_sets_fields_and_timestamp() {
        let mut j = job(JobStatus::Running);
        let later = j.updated_at + chrono::Duration::seconds(5);
        StatusUpdate::completed("/out/a.mp4").apply_to(&mut j, later);
        assert_eq!(j.status, JobStatus::Completed);
        assert_eq!(j.output_path.as_deref(), Some("/out/a.mp4"));
        assert_eq!(j.updated_at, later);
    }

    // -- status view --

    #[test]
    fn completed_view_always_has_output_path() {
        let mut j = job(JobStatus::Completed);
        assert_eq!(
            j.status_view(),
            StatusView::Completed {
                output_path: MISSING_OUTPUT_PATH.into()
            }
        );
        j.output_path = Some("/out/a.mp4".into());
        assert_eq!(
            j.status_view(),
            StatusView::Completed {
                output_path: "/out/a.mp4".into()
            }
        );
        assert!(j.status_view().is_final());
    }

    #[test]
    fn failed_view_always_has_error_message() {
        let mut j = job(JobStatus::Failed);
        j.error_message = Some("".into());
        assert_eq!(
            j.status_view(),
            StatusView::Failed {
                error_message: MISSING_ERROR_MESSAGE.into()
            }
        );
    }

    #[test]
    fn pending_and_running_views_show_neither() {
        let mut j = job(JobStatus::Pending);
        j.output_path = Some("stale.mp4".into());
        j.error_message = Some("stale".into());
        assert_eq!(j.status_view(), StatusView::Pending);
        j.status = JobStatus::Running;
        assert_eq!(j.status_view(), StatusView::Running);
        assert!(!j.status_view().is_final());
    }

    #[test]
    fn status_views_render_distinctly() {
        let summaries: Vec<String> = [
            StatusView::Pending,
            StatusView::Running,
            StatusView::Completed {
                output_path: "a".into(),
            },
            StatusView::Failed {
                error_message: "a".into(),
            },
        ]
        .iter()
        .map(StatusView::summary)
        .collect();
        for (i, a) in summaries.iter().enumerate() {
            for b in &summaries[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    // -- params --

    #[test]
    fn command_reconstructed_from_params() {
        let j = job(JobStatus::Pending);
        let expected = compile(&Configuration::defaults(TaskVariant::TextToVideo));
        assert_eq!(j.command().unwrap(), expected);
    }

    #[test]
    fn mismatched_params_reported() {
        let mut j = job(JobStatus::Pending);
        j.task = TaskVariant::Animate;
        assert_matches!(j.configuration(), Err(CoreError::Internal(_)));
    }
}
