//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId, UserProfileUpdate};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Repository trait for user storage
///
/// Implementations enforce email uniqueness on `create` and `update_profile`
/// and report violations as `DomainError::Conflict`. Each write touches only
/// the fields it names, so concurrent writes to one user do not undo each
/// other.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their normalized email (for login)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Overwrite the profile fields present in `changes`
    ///
    /// Values are stored as given; the caller validates and normalizes them.
    async fn update_profile(
        &self,
        id: &UserId,
        changes: &UserProfileUpdate,
    ) -> Result<User, DomainError>;

    /// Append a team to the user's `teams`; a no-op if already a member
    async fn join_team(&self, id: &UserId, team_id: &TeamId) -> Result<User, DomainError>;

    /// List all users
    async fn list(&self) -> Result<Vec<User>, DomainError>;

    /// Count users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
