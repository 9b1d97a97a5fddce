//! Team service for team management

use std::sync::Arc;

use tracing::{error, info};

use crate::domain::project::{Project, ProjectRepository};
use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// Request for creating a new team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub name: String,
}

/// A team with its member and project references resolved
#[derive(Debug, Clone)]
pub struct PopulatedTeam {
    pub team: Team,
    pub members: Vec<User>,
    pub projects: Vec<Project>,
}

/// Team service for managing teams
#[derive(Debug)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    projects: Arc<dyn ProjectRepository>,
    users: Arc<dyn UserRepository>,
}

impl TeamService {
    pub fn new(
        teams: Arc<dyn TeamRepository>,
        projects: Arc<dyn ProjectRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            teams,
            projects,
            users,
        }
    }

    /// Create a team with the creator as its first member
    ///
    /// The team id is appended to the creator's `teams`. If that write fails
    /// the team is removed again.
    pub async fn create(
        &self,
        creator_id: &UserId,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        if self.users.get(creator_id).await?.is_none() {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                creator_id
            )));
        }

        let team = Team::new(TeamId::generate(), &request.name)
            .map_err(|e| DomainError::validation(e.to_string()))?
            .with_member(creator_id.clone());

        info!(team_id = %team.id(), name = %team.name(), "Creating team");
        let team = self.teams.create(team).await?;

        if let Err(e) = self.users.join_team(creator_id, team.id()).await {
            error!(team_id = %team.id(), error = %e, "Failed to link team to creator, removing team");
            if let Err(rollback) = self.teams.delete(team.id()).await {
                error!(team_id = %team.id(), error = %rollback, "Failed to remove orphaned team");
            }
            return Err(e);
        }

        Ok(team)
    }

    /// Get a team by ID
    pub async fn get(&self, id: &TeamId) -> Result<Option<Team>, DomainError> {
        self.teams.get(id).await
    }

    /// Get several teams, skipping ids that no longer resolve
    pub async fn get_many(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError> {
        let mut teams = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(team) = self.teams.get(id).await? {
                teams.push(team);
            }
        }
        Ok(teams)
    }

    /// List all teams
    pub async fn list(&self) -> Result<Vec<Team>, DomainError> {
        self.teams.list().await
    }

    /// Get a team with members and projects resolved
    pub async fn get_populated(&self, id: &TeamId) -> Result<Option<PopulatedTeam>, DomainError> {
        let Some(team) = self.teams.get(id).await? else {
            return Ok(None);
        };

        let mut members = Vec::with_capacity(team.members().len());
        for user_id in team.members() {
            if let Some(user) = self.users.get(user_id).await? {
                members.push(user);
            }
        }

        let mut projects = Vec::with_capacity(team.projects().len());
        for project_id in team.projects() {
            if let Some(project) = self.projects.get(project_id).await? {
                projects.push(project);
            }
        }

        Ok(Some(PopulatedTeam {
            team,
            members,
            projects,
        }))
    }
}
