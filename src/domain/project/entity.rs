//! Project entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    validate_project_description, validate_project_name, ProjectValidationError,
};
use crate::domain::storage::{StorageEntity, StorageKey};
use crate::domain::team::TeamId;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Project identifier - a UUID v4 string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProjectId(String);

impl ProjectId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier received from a client or a store
    pub fn parse(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        Uuid::parse_str(&id).map_err(|_| {
            DomainError::invalid_id(format!("'{}' is not a valid project id", id))
        })?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ProjectId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<ProjectId> for String {
    fn from(id: ProjectId) -> Self {
        id.0
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StorageKey for ProjectId {
    fn as_str(&self) -> &str {
        &self.0
    }
}

/// Project entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    id: ProjectId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    teams: Vec<TeamId>,
    members: Vec<UserId>,
    /// Sub-projects
    projects: Vec<ProjectId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Allow-listed changes accepted from `POST /projects/{id}/update`
///
/// `teams` is not accepted here; team links change only through project
/// creation and deletion.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    pub name: Option<String>,
    /// An empty string clears the description
    pub description: Option<String>,
    pub members: Option<Vec<UserId>>,
    pub projects: Option<Vec<ProjectId>>,
}

impl Project {
    /// Create a new project
    pub fn new(id: ProjectId, name: impl Into<String>) -> Result<Self, ProjectValidationError> {
        let name = name.into().trim().to_string();
        validate_project_name(&name)?;
        let now = Utc::now();

        Ok(Self {
            id,
            name,
            description: None,
            teams: Vec::new(),
            members: Vec::new(),
            projects: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Set description (builder pattern)
    pub fn with_description(
        mut self,
        description: impl Into<String>,
    ) -> Result<Self, ProjectValidationError> {
        self.set_description(Some(description.into()))?;
        Ok(self)
    }

    /// Link to a team (builder pattern)
    pub fn with_team(mut self, team_id: TeamId) -> Self {
        if !self.teams.contains(&team_id) {
            self.teams.push(team_id);
        }
        self
    }

    // Getters

    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn teams(&self) -> &[TeamId] {
        &self.teams
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

    pub fn belongs_to_team(&self, team_id: &TeamId) -> bool {
        self.teams.contains(team_id)
    }

    // Mutators

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ProjectValidationError> {
        let name = name.into().trim().to_string();
        validate_project_name(&name)?;
        self.name = name;
        self.touch();
        Ok(())
    }

    /// Set or clear the description; blank text clears it
    pub fn set_description(
        &mut self,
        description: Option<String>,
    ) -> Result<(), ProjectValidationError> {
        let description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());

        if let Some(ref d) = description {
            validate_project_description(d)?;
        }

        self.description = description;
        self.touch();
        Ok(())
    }

    /// Replace the member list, dropping duplicates
    pub fn set_members(&mut self, members: Vec<UserId>) {
        self.members = dedup(members);
        self.touch();
    }

    /// Replace the sub-project list, dropping duplicates
    pub fn set_projects(&mut self, projects: Vec<ProjectId>) -> Result<(), ProjectValidationError> {
        if projects.contains(&self.id) {
            return Err(ProjectValidationError::SelfReference);
        }
        self.projects = dedup(projects);
        self.touch();
        Ok(())
    }

    /// Drop a sub-project reference, returns false if it was not present
    pub fn remove_subproject(&mut self, project_id: &ProjectId) -> bool {
        let before = self.projects.len();
        self.projects.retain(|id| id != project_id);

        if self.projects.len() == before {
            return false;
        }
        self.touch();
        true
    }

    /// Apply an allow-listed update
    pub fn apply(&mut self, update: ProjectUpdate) -> Result<(), ProjectValidationError> {
        if let Some(name) = update.name {
            self.set_name(name)?;
        }
        if let Some(description) = update.description {
            self.set_description(Some(description))?;
        }
        if let Some(members) = update.members {
            self.set_members(members);
        }
        if let Some(projects) = update.projects {
            self.set_projects(projects)?;
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl StorageEntity for Project {
    type Key = ProjectId;

    fn key(&self) -> &Self::Key {
        &self.id
    }
}

fn dedup<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
