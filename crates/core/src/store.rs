//! The job store seam.
//!
//! [`JobStore`] is the only way the rest of the system touches persisted
//! jobs. A store handle is constructed once at startup and passed in
//! explicitly; [`MemoryJobStore`] stands in for the database in tests.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::error::CoreError;
use crate::job::{Job, JobStatus, StatusUpdate};
use crate::params::Configuration;
use crate::task::TaskVariant;
use crate::types::DbId;

/// Maximum number of jobs returned by [`JobStore::list`].
pub const LIST_LIMIT: usize = 50;

/// A job about to be inserted. Always stored as `pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub task: TaskVariant,
    pub prompt: String,
    pub params: serde_json::Value,
}

impl NewJob {
    /// Snapshot a configuration for insertion.
    pub fn from_configuration(config: &Configuration) -> Result<Self, CoreError> {
        let params = serde_json::to_value(config)
            .map_err(|e| CoreError::Internal(format!("Failed to serialize params: {e}")))?;
        Ok(Self {
            task: config.task(),
            prompt: config.display_text().to_string(),
            params,
        })
    }
}

/// Create/list/delete/update over the persisted job table.
///
/// No method retries: a failed call is reported once as
/// [`CoreError::Store`] and the caller decides what to do.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Insert a new `pending` job and return the stored row.
    async fn create(&self, job: NewJob) -> Result<Job, CoreError>;

    /// The newest [`LIST_LIMIT`] jobs, newest first.
    async fn list(&self) -> Result<Vec<Job>, CoreError>;

    async fn find(&self, id: DbId) -> Result<Option<Job>, CoreError>;

    /// Remove a job. Deleting an absent id is not an error.
    async fn delete(&self, id: DbId) -> Result<(), CoreError>;

    /// Apply a worker status report. Returns `None` when the job no longer
    /// exists, [`CoreError::Conflict`] when the transition moves backward.
    async fn update_status(
        &self,
        id: DbId,
        update: &StatusUpdate,
    ) -> Result<Option<Job>, CoreError>;

    /// Cheap reachability check used by the health endpoint.
    async fn ping(&self) -> Result<(), CoreError>;
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: DbId,
    /// Insertion order, which is also creation order.
    jobs: Vec<Job>,
}

/// In-process [`JobStore`] used by tests and local runs without a database.
///
/// Inserts are serialized by the inner lock. [`MemoryJobStore::set_unavailable`]
/// makes every call fail the way an unreachable database would.
#[derive(Debug, Default)]
pub struct MemoryJobStore {
    state: Mutex<MemoryState>,
    unavailable: AtomicBool,
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Total number of stored jobs, not capped.
    pub async fn len(&self) -> usize {
        self.state.lock().await.jobs.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn check_available(&self) -> Result<(), CoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(CoreError::Store("job store unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn create(&self, job: NewJob) -> Result<Job, CoreError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let now = Utc::now();
        let stored = Job {
            id: state.next_id,
            task: job.task,
            prompt: job.prompt,
            params: job.params,
            status: JobStatus::Pending,
            output_path: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        };
        state.jobs.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Job>, CoreError> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.jobs.iter().rev().take(LIST_LIMIT).cloned().collect())
    }

    async fn find(&self, id: DbId) -> Result<Option<Job>, CoreError> {
        self.check_available()?;
        let state = self.state.lock().await;
        Ok(state.jobs.iter().find(|j| j.id == id).cloned())
    }

    async fn delete(&self, id: DbId) -> Result<(), CoreError> {
        self.check_available()?;
        self.state.lock().await.jobs.retain(|j| j.id != id);
        Ok(())
    }

    async fn update_status(
        &self,
        id: DbId,
        update: &StatusUpdate,
    ) -> Result<Option<Job>, CoreError> {
        self.check_available()?;
        let mut state = self.state.lock().await;
        let Some(job) = state.jobs.iter_mut().find(|j| j.id == id) else {
            return Ok(None);
        };
        update.check_transition(job.status)?;
        update.apply_to(job, Utc::now());
        Ok(Some(job.clone()))
    }

    async fn ping(&self) -> Result<(), CoreError> {
        self.check_available()
    }
}
