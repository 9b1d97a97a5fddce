//! Team entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{validate_team_name, TeamValidationError};
use crate::domain::project::ProjectId;
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Team identifier - a UUID v4 string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamId(String);

impl TeamId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier received from a client or a store
    pub fn parse(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        Uuid::parse_str(&id)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid team id", id)))?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TeamId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TeamId> for String {
    fn from(id: TeamId) -> Self {
        id.0
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for TeamId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Team entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    id: TeamId,
    name: String,
    members: Vec<UserId>,
    projects: Vec<ProjectId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team
    pub fn new(id: TeamId, name: impl Into<String>) -> Result<Self, TeamValidationError> {
        let name = name.into().trim().to_string();
        validate_team_name(&name)?;
        let now = Utc::now();

        Ok(Self {
            id,
            name,
            members: Vec::new(),
            projects: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Add a founding member (builder pattern)
    pub fn with_member(mut self, user_id: UserId) -> Self {
        self.add_member(user_id);
        self
    }

    // Getters

    pub fn id(&self) -> &TeamId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> &[UserId] {
        &self.members
    }

    pub fn projects(&self) -> &[ProjectId] {
        &self.projects
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn has_project(&self, project_id: &ProjectId) -> bool {
        self.projects.contains(project_id)
    }

    // Mutators

    /// Add a member, returns false if already present
    pub fn add_member(&mut self, user_id: UserId) -> bool {
        if self.members.contains(&user_id) {
            return false;
        }
        self.members.push(user_id);
        self.touch();
        true
    }

    /// Reference a project, returns false if already present
    pub fn add_project(&mut self, project_id: ProjectId) -> bool {
        if self.projects.contains(&project_id) {
            return false;
        }
        self.projects.push(project_id);
        self.touch();
        true
    }

    /// Drop a project reference, returns false if it was not present
    pub fn remove_project(&mut self, project_id: &ProjectId) -> bool {
        let before = self.projects.len();
        self.projects.retain(|id| id != project_id);

        if self.projects.len() == before {
            return false;
        }
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Team {
    type Key = TeamId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}
