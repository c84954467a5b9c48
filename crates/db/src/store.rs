//! [`JobStore`] backed by Postgres.

use async_trait::async_trait;
use genq_core::error::CoreError;
use genq_core::job::{Job, StatusUpdate};
use genq_core::store::{JobStore, NewJob, LIST_LIMIT};
use genq_core::types::DbId;

use crate::models::generation_job::GenerationJobRow;
use crate::repositories::JobRepo;
use crate::DbPool;

/// Production job store. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct PgJobStore {
    pool: DbPool,
}

impl PgJobStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Log a database failure and surface it as a store error.
fn store_error(op: &'static str, err: sqlx::Error) -> CoreError {
    tracing::error!(op, error = %err, "Job store call failed");
    CoreError::Store(format!("{op} failed: {err}"))
}

fn to_job(row: GenerationJobRow) -> Result<Job, CoreError> {
    Job::try_from(row)
}

#[async_trait]
impl JobStore for PgJobStore {
    async fn create(&self, job: NewJob) -> Result<Job, CoreError> {
        let row = JobRepo::create(&self.pool, &job)
            .await
            .map_err(|e| store_error("create job", e))?;
        to_job(row)
    }

    async fn list(&self) -> Result<Vec<Job>, CoreError> {
        let rows = JobRepo::list_recent(&self.pool, LIST_LIMIT as i64)
            .await
            .map_err(|e| store_error("list jobs", e))?;
        rows.into_iter().map(to_job).collect()
    }

    async fn find(&self, id: DbId) -> Result<Option<Job>, CoreError> {
        JobRepo::find_by_id(&self.pool, id)
            .await
            .map_err(|e| store_error("find job", e))?
            .map(to_job)
            .transpose()
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        let removed = JobRepo::delete(&self.pool, id)
            .await
            .map_err(|e| store_error("delete job", e))?;
        if !removed {
            tracing::debug!(job_id = id, "Delete of absent job ignored");
        }
        Ok(())
    }

    async fn update_status(
        &self,
        id: DbId,
        update: &StatusUpdate,
    ) -> Result<Option<Job>, CoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("begin status update", e))?;

        let Some(current) = JobRepo::find_for_update(&mut tx, id)
            .await
            .map_err(|e| store_error("lock job", e))?
        else {
            return Ok(None);
        };
        let current = to_job(current)?;
        update.check_transition(current.status)?;

        let row = JobRepo::write_status(&mut tx, id, update)
            .await
            .map_err(|e| store_error("write job status", e))?;
        tx.commit()
            .await
            .map_err(|e| store_error("commit status update", e))?;

        row.map(to_job).transpose()
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(|e| store_error("ping", e))
    }
}
