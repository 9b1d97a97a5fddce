//! In-memory user repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::team::TeamId;
use crate::domain::user::{User, UserId, UserProfileUpdate, UserRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct UserTable {
    users: HashMap<String, User>,
    /// email -> user id
    email_index: HashMap<String, String>,
}

/// In-memory implementation of UserRepository
///
/// Users and the email index share one lock, so the uniqueness check and the
/// insert happen atomically.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.table.read().await.users.get(id.as_str()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let table = self.table.read().await;

        Ok(table
            .email_index
            .get(email)
            .and_then(|id| table.users.get(id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut table = self.table.write().await;
        let id = user.id().as_str().to_string();
        let email = user.email().to_string();

        if table.users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        if table.email_index.contains_key(&email) {
            return Err(DomainError::conflict(format!(
                "Email '{}' already exists",
                email
            )));
        }

        table.email_index.insert(email, id.clone());
        table.users.insert(id, user.clone());

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &UserProfileUpdate,
    ) -> Result<User, DomainError> {
        let mut table = self.table.write().await;
        let UserTable { users, email_index } = &mut *table;

        let user = users
            .get_mut(id.as_str())
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if let Some(new_email) = &changes.email {
            if new_email != user.email() {
                if email_index.contains_key(new_email) {
                    return Err(DomainError::conflict(format!(
                        "Email '{}' already exists",
                        new_email
                    )));
                }

                email_index.remove(user.email());
                email_index.insert(new_email.clone(), id.as_str().to_string());
            }
        }

        user.apply_profile(changes);
        Ok(user.clone())
    }

    async fn join_team(&self, id: &UserId, team_id: &TeamId) -> Result<User, DomainError> {
        let mut table = self.table.write().await;

        let user = table
            .users
            .get_mut(id.as_str())
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        user.join_team(team_id.clone());
        Ok(user.clone())
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let mut users: Vec<User> = self.table.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().as_str().cmp(b.id().as_str()))
        });
        Ok(users)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.table.read().await.users.len())
    }
}
