//! In-memory session store using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::domain::session::{Session, SessionData, SessionStore};
use crate::domain::DomainError;

const SESSION_ID_LENGTH: usize = 32;

/// Session store backed by a moka cache
///
/// Entries are evicted after the configured lifetime. Expiry stamped on the
/// session itself is checked on every lookup as well.
#[derive(Debug)]
pub struct MokaSessionStore {
    sessions: MokaCache<String, SessionData>,
}

impl MokaSessionStore {
    pub fn new(lifetime: Duration, max_capacity: u64) -> Self {
        Self {
            sessions: MokaCache::builder()
                .max_capacity(max_capacity)
                .time_to_live(lifetime)
                .build(),
        }
    }

    fn generate_id() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(SESSION_ID_LENGTH)
            .map(char::from)
            .collect()
    }
}

#[async_trait]
impl SessionStore for MokaSessionStore {
    async fn create(&self, data: SessionData) -> Result<String, DomainError> {
        let id = Self::generate_id();
        self.sessions.insert(id.clone(), data).await;
        Ok(id)
    }

    async fn find(&self, session_id: &str) -> Result<Option<Session>, DomainError> {
        let Some(data) = self.sessions.get(session_id).await else {
            return Ok(None);
        };

        let session = Session::new(session_id.to_owned(), data);
        if session.is_expired() {
            self.sessions.invalidate(session_id).await;
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn destroy(&self, session_id: &str) -> Result<(), DomainError> {
        self.sessions.invalidate(session_id).await;
        Ok(())
    }
}
