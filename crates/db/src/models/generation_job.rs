//! The `generation_jobs` row.

use genq_core::error::CoreError;
use genq_core::job::{Job, JobStatus};
use genq_core::task::TaskVariant;
use genq_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `generation_jobs` table.
///
/// `task` and `status` are stored as text and parsed on conversion, so a row
/// written by another client with an unknown value surfaces as an error
/// rather than a silently wrong job.
#[derive(Debug, Clone, FromRow)]
pub struct GenerationJobRow {
    pub id: DbId,
    pub task: String,
    pub prompt: String,
    pub params: serde_json::Value,
    pub status: String,
    pub output_path: Option<String>,
    pub error_message: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<GenerationJobRow> for Job {
    type Error = CoreError;

    fn try_from(row: GenerationJobRow) -> Result<Self, Self::Error> {
        let task: TaskVariant = row.task.parse().map_err(|_| {
            CoreError::Store(format!("job {} has unknown task '{}'", row.id, row.task))
        })?;
        let status: JobStatus = row.status.parse().map_err(|_| {
            CoreError::Store(format!("job {} has unknown status '{}'", row.id, row.status))
        })?;
        Ok(Job {
            id: row.id,
            task,
            prompt: row.prompt,
            params: row.params,
            status,
            output_path: row.output_path,
            error_message: row.error_message,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
