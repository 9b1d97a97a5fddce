//! Team repository trait

use async_trait::async_trait;

use super::entity::{Team, TeamId};
use crate::domain::project::ProjectId;
use crate::domain::DomainError;

/// Repository for managing teams
#[async_trait]
pub trait TeamRepository: Send + Sync + std::fmt::Debug {
    /// Get a team by ID
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError>;

    /// Create a new team
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Append a project to the team's `projects`; a no-op if already present
    async fn add_project(&self, id: &TeamId, project_id: &ProjectId) -> Result<Team, DomainError>;

    /// Remove a project from the team's `projects`
    async fn remove_project(
        &self,
        id: &TeamId,
        project_id: &ProjectId,
    ) -> Result<Team, DomainError>;

    /// Delete a team by ID
    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError>;

    /// List all teams, oldest first
    async fn list(&self) -> Result<Vec<Team>, DomainError>;

    /// List the teams whose `projects` reference the given project
    async fn list_referencing_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Team>, DomainError>;

    /// Check if a team exists
    async fn exists(&self, id: &TeamId) -> Result<bool, DomainError>;
}
