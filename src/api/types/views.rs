//! Response shapes for users, teams and projects with references resolved

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Project, ProjectId, Team, TeamId, User, UserId};
use crate::infrastructure::project::PopulatedProject;
use crate::infrastructure::team::PopulatedTeam;

/// A user as returned to clients; `T` is either team ids or full teams
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse<T = TeamId> {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub teams: Vec<T>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T> UserResponse<T> {
    fn with_teams(user: &User, teams: Vec<T>) -> Self {
        Self {
            id: user.id().clone(),
            first_name: user.first_name().to_string(),
            last_name: user.last_name().to_string(),
            email: user.email().to_string(),
            teams,
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self::with_teams(user, user.teams().to_vec())
    }
}

impl UserResponse<Team> {
    /// A user with its `teams` resolved
    pub fn populated(user: &User, teams: Vec<Team>) -> Self {
        Self::with_teams(user, teams)
    }
}

/// A team with `members` and `projects` resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedTeamResponse {
    pub id: TeamId,
    pub name: String,
    pub members: Vec<UserResponse>,
    pub projects: Vec<Project>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PopulatedTeam> for PopulatedTeamResponse {
    fn from(populated: PopulatedTeam) -> Self {
        let PopulatedTeam {
            team,
            members,
            projects,
        } = populated;

        Self {
            id: team.id().clone(),
            name: team.name().to_string(),
            members: members.iter().map(UserResponse::from_user).collect(),
            projects,
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        }
    }
}

/// A project with `teams` and `members` resolved
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopulatedProjectResponse {
    pub id: ProjectId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub teams: Vec<Team>,
    pub members: Vec<UserResponse>,
    pub projects: Vec<ProjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PopulatedProject> for PopulatedProjectResponse {
    fn from(populated: PopulatedProject) -> Self {
        let PopulatedProject {
            project,
            teams,
            members,
        } = populated;

        Self {
            id: project.id().clone(),
            name: project.name().to_string(),
            description: project.description().map(str::to_string),
            teams,
            members: members.iter().map(UserResponse::from_user).collect(),
            projects: project.projects().to_vec(),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User::new(UserId::generate(), "Ada", "Lovelace", "ada@example.com", "$argon2id$secret")
    }

    #[test]
    fn test_user_response_has_no_password_hash() {
        let json = serde_json::to_value(UserResponse::from_user(&user())).unwrap();

        assert_eq!(json["firstName"], "Ada");
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_populated_user_embeds_teams() {
        let team = Team::new(TeamId::generate(), "Platform").unwrap();
        let json = serde_json::to_value(UserResponse::populated(&user(), vec![team])).unwrap();

        assert_eq!(json["teams"][0]["name"], "Platform");
    }

    #[test]
    fn test_populated_team_strips_member_hashes() {
        let member = user();
        let team = Team::new(TeamId::generate(), "Platform")
            .unwrap()
            .with_member(member.id().clone());

        let response = PopulatedTeamResponse::from(PopulatedTeam {
            team,
            members: vec![member],
            projects: Vec::new(),
        });
        let json = serde_json::to_value(response).unwrap();

        assert_eq!(json["members"][0]["email"], "ada@example.com");
        assert!(json["members"][0].get("passwordHash").is_none());
    }
}
