//! Session store trait

use async_trait::async_trait;

use super::entity::{Session, SessionData};
use crate::domain::DomainError;

/// Server-side session storage
///
/// Failures are reported as `DomainError::Session`.
#[async_trait]
pub trait SessionStore: Send + Sync + std::fmt::Debug {
    /// Stores a new session and returns its identifier
    async fn create(&self, data: SessionData) -> Result<String, DomainError>;

    /// Finds a live session; expired sessions are reported as absent
    async fn find(&self, session_id: &str) -> Result<Option<Session>, DomainError>;

    /// Destroys a session, a no-op if it does not exist
    async fn destroy(&self, session_id: &str) -> Result<(), DomainError>;
}
