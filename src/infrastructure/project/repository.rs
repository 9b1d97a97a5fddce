//! Storage-backed project repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::project::{Project, ProjectId, ProjectRepository, ProjectUpdate};
use crate::domain::storage::{Mutation, Storage};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Storage-backed implementation of ProjectRepository
#[derive(Debug)]
pub struct StorageProjectRepository {
    storage: Arc<dyn Storage<Project>>,
}

impl StorageProjectRepository {
    pub fn new(storage: Arc<dyn Storage<Project>>) -> Self {
        Self { storage }
    }

    async fn modify(
        &self,
        id: &ProjectId,
        mutation: Mutation<Project>,
    ) -> Result<Project, DomainError> {
        self.storage.modify(id, mutation).await.map_err(|e| match e {
            DomainError::NotFound { .. } => {
                DomainError::not_found(format!("Project '{}' not found", id))
            }
            other => other,
        })
    }
}

#[async_trait]
impl ProjectRepository for StorageProjectRepository {
    async fn get(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        self.storage.get(id).await
    }

    async fn create(&self, project: Project) -> Result<Project, DomainError> {
        self.storage.create(project).await
    }

    async fn apply_update(
        &self,
        id: &ProjectId,
        update: ProjectUpdate,
    ) -> Result<Project, DomainError> {
        self.modify(
            id,
            Box::new(move |project| {
                project
                    .apply(update)
                    .map_err(|e| DomainError::validation(e.to_string()))
            }),
        )
        .await
    }

    async fn remove_subproject(
        &self,
        id: &ProjectId,
        subproject_id: &ProjectId,
    ) -> Result<Project, DomainError> {
        let subproject_id = subproject_id.clone();
        self.modify(
            id,
            Box::new(move |project| {
                project.remove_subproject(&subproject_id);
                Ok(())
            }),
        )
        .await
    }

    async fn delete(&self, id: &ProjectId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn list(&self) -> Result<Vec<Project>, DomainError> {
        let mut projects = self.storage.list().await?;
        projects.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().as_str().cmp(b.id().as_str()))
        });
        Ok(projects)
    }

    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Project>, DomainError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|project| project.belongs_to_team(team_id))
            .collect())
    }

    async fn list_referencing_subproject(
        &self,
        subproject_id: &ProjectId,
    ) -> Result<Vec<Project>, DomainError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|project| project.projects().contains(subproject_id))
            .collect())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        self.storage.count().await
    }
}
