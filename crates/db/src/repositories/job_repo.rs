//! Repository for the `generation_jobs` table.
//!
//! Status and task are bound as their text names. Transition rules live in
//! `genq_core::job`; this layer only reads and writes rows.

use genq_core::job::{JobStatus, StatusUpdate};
use genq_core::store::NewJob;
use genq_core::types::DbId;
use sqlx::{PgPool, Postgres, Transaction};

use crate::models::generation_job::GenerationJobRow;

/// Column list for `generation_jobs` queries.
const COLUMNS: &str = "\
    id, task, prompt, params, status, output_path, error_message, \
    created_at, updated_at";

/// Provides persistence for queued generation jobs.
pub struct JobRepo;

impl JobRepo {
    /// Insert a new `pending` job.
    pub async fn create(pool: &PgPool, input: &NewJob) -> Result<GenerationJobRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO generation_jobs (task, prompt, params, status) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationJobRow>(&query)
            .bind(input.task.as_str())
            .bind(&input.prompt)
            .bind(&input.params)
            .bind(JobStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// The newest `limit` jobs, newest first. Ties on `created_at` fall back
    /// to id so the order is stable.
    pub async fn list_recent(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<GenerationJobRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM generation_jobs \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, GenerationJobRow>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<GenerationJobRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generation_jobs WHERE id = $1");
        sqlx::query_as::<_, GenerationJobRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a job. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM generation_jobs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // -----------------------------------------------------------------------
    // Status updates
    // -----------------------------------------------------------------------

    /// Lock a job row for the rest of the transaction.
    pub async fn find_for_update(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
    ) -> Result<Option<GenerationJobRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM generation_jobs WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, GenerationJobRow>(&query)
            .bind(id)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Write a status report. The caller has already checked the transition
    /// against the locked row.
    pub async fn write_status(
        tx: &mut Transaction<'_, Postgres>,
        id: DbId,
        update: &StatusUpdate,
    ) -> Result<Option<GenerationJobRow>, sqlx::Error> {
        let query = format!(
            "UPDATE generation_jobs \
             SET status = $2, output_path = $3, error_message = $4, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GenerationJobRow>(&query)
            .bind(id)
            .bind(update.status.as_str())
            .bind(&update.output_path)
            .bind(&update.error_message)
            .fetch_optional(&mut **tx)
            .await
    }
}
