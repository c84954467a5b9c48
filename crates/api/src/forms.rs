//! Registry of open form sessions.
//!
//! Each session sits behind its own lock. Submission holds that lock only to
//! claim and release the session, never across the store call, so a second
//! submit from the same form observes the in-flight flag and is rejected
//! instead of queueing behind the first.

use std::collections::HashMap;
use std::sync::Arc;

use genq_core::error::CoreError;
use genq_core::job::Job;
use genq_core::session::FormSession;
use genq_core::store::JobStore;
use genq_core::task::TaskVariant;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<FormSession>>;

#[derive(Debug, Default)]
pub struct FormRegistry {
    sessions: RwLock<HashMap<Uuid, SharedSession>>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session on the variant's defaults.
    pub async fn open(&self, task: TaskVariant) -> (Uuid, SharedSession) {
        let id = Uuid::new_v4();
        let session = Arc::new(Mutex::new(FormSession::new(task)));
        self.sessions.write().await.insert(id, Arc::clone(&session));
        tracing::debug!(form_id = %id, task = %task, "Form opened");
        (id, session)
    }

    pub async fn get(&self, id: Uuid) -> Option<SharedSession> {
        self.sessions.read().await.get(&id).cloned()
    }

    /// Returns whether a session was removed.
    pub async fn close(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Releases a claimed form when dropped, so a submission whose future is
/// cancelled mid-insert (request timeout, client disconnect) does not leave
/// the form busy.
struct SubmissionClaim {
    session: SharedSession,
    released: bool,
}

impl SubmissionClaim {
    fn new(session: &SharedSession) -> Self {
        Self {
            session: Arc::clone(session),
            released: false,
        }
    }

    async fn release(mut self) {
        self.session.lock().await.end_submission();
        self.released = true;
    }
}

impl Drop for SubmissionClaim {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        tracing::warn!("Submission cancelled before the store replied, releasing form");
        match self.session.try_lock() {
            Ok(mut guard) => guard.end_submission(),
            Err(_) => {
                let session = Arc::clone(&self.session);
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move { session.lock().await.end_submission() });
                    }
                    Err(_) => tracing::error!("No runtime to release cancelled submission"),
                }
            }
        }
    }
}

/// Range-check, claim, insert, release.
///
/// The configuration is never modified; on failure or cancellation the form
/// is released and can be resubmitted as-is.
pub async fn submit(session: &SharedSession, store: &dyn JobStore) -> Result<Job, CoreError> {
    let new_job = {
        let mut guard = session.lock().await;
        guard.configuration().validate_ranges()?;
        guard.begin_submission()?
    };
    let claim = SubmissionClaim::new(session);

    let result = store.create(new_job).await;
    claim.release().await;
    result
}
