// src/store.rs

//! Session storage.
//!
//! Handlers only see the [`SessionStore`] trait; the process ships with the
//! in-memory backing, which loses every session on restart.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::AppError,
    models::{
        catalog::Quiz,
        session::{Progress, Session, SessionId},
    },
};

pub type SharedSessionStore = Arc<dyn SessionStore>;

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Opens a session on a snapshot of `quiz` and returns its id.
    async fn create(&self, topic_id: &str, quiz: Quiz) -> Result<SessionId, AppError>;

    async fn get(&self, id: SessionId) -> Result<Option<Session>, AppError>;

    async fn save(&self, session: Session) -> Result<(), AppError>;

    /// Returns whether a session was removed.
    async fn delete(&self, id: SessionId) -> Result<bool, AppError>;

    async fn count(&self) -> Result<usize, AppError>;

    /// Runs one progression step. Completed sessions are deleted.
    ///
    /// Returns `None` for an unknown id. Backings that can do better than
    /// read-modify-write should override this.
    async fn progress(
        &self,
        id: SessionId,
        answer_id: Option<&str>,
    ) -> Result<Option<Progress>, AppError> {
        let Some(mut session) = self.get(id).await? else {
            return Ok(None);
        };

        let step = session.advance(answer_id);
        if session.completed {
            log_finished(&session);
            self.delete(id).await?;
        } else {
            self.save(session).await?;
        }

        Ok(Some(step))
    }
}

fn log_finished(session: &Session) {
    let elapsed = Utc::now() - session.started_at;
    tracing::debug!(
        "Session {} finished after {}s",
        session.id,
        elapsed.num_seconds()
    );
}

/// Process-local store. Ids come from a counter starting at 1 and are never
/// reused within the process lifetime.
pub struct InMemorySessionStore {
    sessions: Mutex<HashMap<SessionId, Session>>,
    next_id: AtomicU64,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn shared() -> SharedSessionStore {
        Arc::new(Self::new())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<SessionId, Session>>, AppError> {
        self.sessions
            .lock()
            .map_err(|e| AppError::InternalServerError(format!("session map poisoned: {}", e)))
    }
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create(&self, topic_id: &str, quiz: Quiz) -> Result<SessionId, AppError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let session = Session::new(id, topic_id, quiz);
        self.lock()?.insert(id, session);
        Ok(id)
    }

    async fn get(&self, id: SessionId) -> Result<Option<Session>, AppError> {
        Ok(self.lock()?.get(&id).cloned())
    }

    async fn save(&self, session: Session) -> Result<(), AppError> {
        self.lock()?.insert(session.id, session);
        Ok(())
    }

    async fn delete(&self, id: SessionId) -> Result<bool, AppError> {
        Ok(self.lock()?.remove(&id).is_some())
    }

    async fn count(&self) -> Result<usize, AppError> {
        Ok(self.lock()?.len())
    }

    // Mutates in place under the lock so concurrent calls for one session
    // cannot both observe the same cursor.
    async fn progress(
        &self,
        id: SessionId,
        answer_id: Option<&str>,
    ) -> Result<Option<Progress>, AppError> {
        let mut sessions = self.lock()?;
        let Some(session) = sessions.get_mut(&id) else {
            return Ok(None);
        };

        let step = session.advance(answer_id);
        if session.completed {
            log_finished(session);
            sessions.remove(&id);
        }

        Ok(Some(step))
    }
}
