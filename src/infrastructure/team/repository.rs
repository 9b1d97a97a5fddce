//! Storage-backed team repository implementation

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::project::ProjectId;
use crate::domain::storage::{Mutation, Storage};
use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::DomainError;

/// Storage-backed implementation of TeamRepository
#[derive(Debug)]
pub struct StorageTeamRepository {
    storage: Arc<dyn Storage<Team>>,
}

impl StorageTeamRepository {
    pub fn new(storage: Arc<dyn Storage<Team>>) -> Self {
        Self { storage }
    }

    async fn modify(&self, id: &TeamId, mutation: Mutation<Team>) -> Result<Team, DomainError> {
        self.storage.modify(id, mutation).await.map_err(|e| match e {
            DomainError::NotFound { .. } => {
                DomainError::not_found(format!("Team '{}' not found", id))
            }
            other => other,
        })
    }
}

#[async_trait]
impl TeamRepository for StorageTeamRepository {
    async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        self.storage.get(id).await
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        self.storage.create(team).await
    }

    async fn add_project(&self, id: &TeamId, project_id: &ProjectId) -> Result<Team, DomainError> {
        let project_id = project_id.clone();
        self.modify(
            id,
            Box::new(move |team| {
                team.add_project(project_id);
                Ok(())
            }),
        )
        .await
    }

    async fn remove_project(
        &self,
        id: &TeamId,
        project_id: &ProjectId,
    ) -> Result<Team, DomainError> {
        let project_id = project_id.clone();
        self.modify(
            id,
            Box::new(move |team| {
                team.remove_project(&project_id);
                Ok(())
            }),
        )
        .await
    }

    async fn delete(&self, id: &TeamId) -> Result<bool, DomainError> {
        self.storage.delete(id).await
    }

    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        let mut teams = self.storage.list().await?;
        teams.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().as_str().cmp(b.id().as_str()))
        });
        Ok(teams)
    }

    async fn list_referencing_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<Team>, DomainError> {
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|team| team.has_project(project_id))
            .collect())
    }

    async fn exists(&self, id: &TeamId) -> Result<bool, DomainError> {
        self.storage.exists(id).await
    }
}
