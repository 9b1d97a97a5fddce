//! Project service: creation under a team, updates and deletion with cleanup

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::domain::project::{Project, ProjectId, ProjectRepository, ProjectUpdate};
use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;

/// Request for creating a new project
#[derive(Debug, Clone, Default)]
pub struct CreateProjectRequest {
    pub name: String,
    pub description: Option<String>,
    pub team: Option<TeamId>,
}

/// A project with its team and member references resolved
#[derive(Debug, Clone)]
pub struct PopulatedProject {
    pub project: Project,
    pub teams: Vec<Team>,
    pub members: Vec<User>,
}

/// Project service
///
/// Project and team documents are written separately. Every multi-record
/// operation undoes its earlier writes when a later one fails.
#[derive(Debug)]
pub struct ProjectService {
    projects: Arc<dyn ProjectRepository>,
    teams: Arc<dyn TeamRepository>,
    users: Arc<dyn UserRepository>,
}

impl ProjectService {
    pub fn new(
        projects: Arc<dyn ProjectRepository>,
        teams: Arc<dyn TeamRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            projects,
            teams,
            users,
        }
    }

    /// Create a project, optionally under an existing team
    ///
    /// Returns the project and the updated team when one was given.
    pub async fn create(
        &self,
        request: CreateProjectRequest,
    ) -> Result<(Project, Option<Team>), DomainError> {
        let team = match request.team {
            Some(ref team_id) => Some(
                self.teams
                    .get(team_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found(format!("Team '{}' not found", team_id)))?,
            ),
            None => None,
        };

        let mut project = Project::new(ProjectId::generate(), &request.name)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        if let Some(description) = request.description {
            project = project
                .with_description(description)
                .map_err(|e| DomainError::validation(e.to_string()))?;
        }
        if let Some(ref team) = team {
            project = project.with_team(team.id().clone());
        }

        info!(project_id = %project.id(), name = %project.name(), "Creating project");
        let project = self.projects.create(project).await?;

        let Some(team) = team else {
            return Ok((project, None));
        };

        match self.teams.add_project(team.id(), project.id()).await {
            Ok(team) => Ok((project, Some(team))),
            Err(e) => {
                error!(
                    project_id = %project.id(),
                    error = %e,
                    "Failed to link project to team, removing project"
                );
                if let Err(rollback) = self.projects.delete(project.id()).await {
                    error!(
                        project_id = %project.id(),
                        error = %rollback,
                        "Failed to remove orphaned project"
                    );
                }
                Err(e)
            }
        }
    }

    /// Get a project by ID
    pub async fn get(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        self.projects.get(id).await
    }

    /// List all projects
    pub async fn list(&self) -> Result<Vec<Project>, DomainError> {
        self.projects.list().await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.projects.count().await
    }

    /// List the projects linked to a team
    pub async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Project>, DomainError> {
        self.projects.list_by_team(team_id).await
    }

    /// Get a project with teams and members resolved
    pub async fn get_populated(
        &self,
        id: &ProjectId,
    ) -> Result<Option<PopulatedProject>, DomainError> {
        let Some(project) = self.projects.get(id).await? else {
            return Ok(None);
        };

        let mut teams = Vec::with_capacity(project.teams().len());
        for team_id in project.teams() {
            if let Some(team) = self.teams.get(team_id).await? {
                teams.push(team);
            }
        }

        let mut members = Vec::with_capacity(project.members().len());
        for user_id in project.members() {
            if let Some(user) = self.users.get(user_id).await? {
                members.push(user);
            }
        }

        Ok(Some(PopulatedProject {
            project,
            teams,
            members,
        }))
    }

    /// Apply an allow-listed update
    pub async fn update(
        &self,
        id: &ProjectId,
        update: ProjectUpdate,
    ) -> Result<Project, DomainError> {
        info!(project_id = %id, "Updating project");
        self.projects.apply_update(id, update).await
    }

    /// Delete a project and remove it from every team and parent project
    /// that references it
    pub async fn delete(&self, id: &ProjectId) -> Result<(), DomainError> {
        if self.projects.get(id).await?.is_none() {
            return Err(DomainError::not_found(format!("Project '{}' not found", id)));
        }

        let mut detached: Vec<TeamId> = Vec::new();
        for team in self.teams.list_referencing_project(id).await? {
            let team_id = team.id().clone();
            if let Err(e) = self.teams.remove_project(&team_id, id).await {
                error!(project_id = %id, team_id = %team_id, error = %e, "Failed to detach project");
                self.reattach(id, &detached).await;
                return Err(e);
            }
            detached.push(team_id);
        }

        match self.projects.delete(id).await {
            Ok(_) => {
                info!(project_id = %id, teams = detached.len(), "Deleted project");
                self.detach_from_parents(id).await;
                Ok(())
            }
            Err(e) => {
                error!(project_id = %id, error = %e, "Failed to delete project, restoring teams");
                self.reattach(id, &detached).await;
                Err(e)
            }
        }
    }

    /// Strip a deleted project from other projects' sub-project lists
    ///
    /// Runs after the delete has succeeded. Failures are logged and left as
    /// dangling ids, which populated views skip.
    async fn detach_from_parents(&self, project_id: &ProjectId) {
        let parents = match self.projects.list_referencing_subproject(project_id).await {
            Ok(parents) => parents,
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "Failed to find parent projects");
                return;
            }
        };

        for parent in parents {
            if let Err(e) = self
                .projects
                .remove_subproject(parent.id(), project_id)
                .await
            {
                warn!(
                    project_id = %project_id,
                    parent_id = %parent.id(),
                    error = %e,
                    "Failed to remove sub-project reference"
                );
            }
        }
    }

    async fn reattach(&self, project_id: &ProjectId, team_ids: &[TeamId]) {
        for team_id in team_ids {
            let restored = match self.teams.add_project(team_id, project_id).await {
                Ok(_) | Err(DomainError::NotFound { .. }) => Ok(()),
                Err(e) => Err(e),
            };

            if let Err(e) = restored {
                warn!(
                    project_id = %project_id,
                    team_id = %team_id,
                    error = %e,
                    "Failed to restore project reference"
                );
            }
        }
    }
}
