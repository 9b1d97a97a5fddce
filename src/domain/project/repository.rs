//! Project repository trait

use async_trait::async_trait;

use super::entity::{Project, ProjectId, ProjectUpdate};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Repository for managing projects
#[async_trait]
pub trait ProjectRepository: Send + Sync + std::fmt::Debug {
    /// Get a project by ID
    async fn get(&self, id: &ProjectId) -> Result<Option<Project>, DomainError>;

    /// Create a new project
    async fn create(&self, project: Project) -> Result<Project, DomainError>;

    /// Apply an allow-listed update to the stored project
    ///
    /// Validation failures surface as `DomainError::Validation` and leave the
    /// project unchanged.
    async fn apply_update(
        &self,
        id: &ProjectId,
        update: ProjectUpdate,
    ) -> Result<Project, DomainError>;

    /// Remove a project from this project's sub-project list
    async fn remove_subproject(
        &self,
        id: &ProjectId,
        subproject_id: &ProjectId,
    ) -> Result<Project, DomainError>;

    /// Delete a project by ID
    async fn delete(&self, id: &ProjectId) -> Result<bool, DomainError>;

    /// List all projects, oldest first
    async fn list(&self) -> Result<Vec<Project>, DomainError>;

    /// List the projects whose `teams` contain the given team
    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Project>, DomainError>;

    /// List the projects whose `projects` reference the given project
    async fn list_referencing_subproject(
        &self,
        subproject_id: &ProjectId,
    ) -> Result<Vec<Project>, DomainError>;

    /// Count projects
    async fn count(&self) -> Result<usize, DomainError>;
}
