//! Application state for shared services

use std::sync::Arc;

use crate::domain::project::ProjectUpdate;
use crate::domain::session::SessionStore;
use crate::domain::user::{UserProfileUpdate, UserRepository};
use crate::domain::{DomainError, Project, ProjectId, Team, TeamId, User, UserId};
use crate::infrastructure::project::{CreateProjectRequest, PopulatedProject, ProjectService};
use crate::infrastructure::session::SessionCookie;
use crate::infrastructure::team::{CreateTeamRequest, PopulatedTeam, TeamService};
use crate::infrastructure::user::{
    AuthOutcome, PasswordHasher, RegisterUserRequest, RegistrationError, UserService,
};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub team_service: Arc<dyn TeamServiceTrait>,
    pub project_service: Arc<dyn ProjectServiceTrait>,
    pub session_store: Arc<dyn SessionStore>,
    pub session_cookie: SessionCookie,
    pub session_lifetime: chrono::Duration,
}

/// Trait for user service operations
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, RegistrationError>;
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<AuthOutcome, DomainError>;
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;
    async fn list(&self) -> Result<Vec<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn update_profile(
        &self,
        id: &UserId,
        update: UserProfileUpdate,
    ) -> Result<User, DomainError>;
}

/// Trait for team service operations
#[async_trait::async_trait]
pub trait TeamServiceTrait: Send + Sync {
    async fn create(
        &self,
        creator_id: &UserId,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError>;
    async fn get_many(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError>;
    async fn list(&self) -> Result<Vec<Team>, DomainError>;
    async fn get_populated(&self, id: &TeamId) -> Result<Option<PopulatedTeam>, DomainError>;
}

/// Trait for project service operations
#[async_trait::async_trait]
pub trait ProjectServiceTrait: Send + Sync {
    async fn create(
        &self,
        request: CreateProjectRequest,
    ) -> Result<(Project, Option<Team>), DomainError>;
    async fn list(&self) -> Result<Vec<Project>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Project>, DomainError>;
    async fn get_populated(&self, id: &ProjectId)
        -> Result<Option<PopulatedProject>, DomainError>;
    async fn update(&self, id: &ProjectId, update: ProjectUpdate) -> Result<Project, DomainError>;
    async fn delete(&self, id: &ProjectId) -> Result<(), DomainError>;
}

// Implement traits for the actual services

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + ?Sized + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, RegistrationError> {
        UserService::register(self, request).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        UserService::list(self).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }

    async fn update_profile(
        &self,
        id: &UserId,
        update: UserProfileUpdate,
    ) -> Result<User, DomainError> {
        UserService::update_profile(self, id, update).await
    }
}

#[async_trait::async_trait]
impl TeamServiceTrait for TeamService {
    async fn create(
        &self,
        creator_id: &UserId,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        TeamService::create(self, creator_id, request).await
    }

    async fn get_many(&self, ids: &[TeamId]) -> Result<Vec<Team>, DomainError> {
        TeamService::get_many(self, ids).await
    }

    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        TeamService::list(self).await
    }

    async fn get_populated(&self, id: &TeamId) -> Result<Option<PopulatedTeam>, DomainError> {
        TeamService::get_populated(self, id).await
    }
}

#[async_trait::async_trait]
impl ProjectServiceTrait for ProjectService {
    async fn create(
        &self,
        request: CreateProjectRequest,
    ) -> Result<(Project, Option<Team>), DomainError> {
        ProjectService::create(self, request).await
    }

    async fn list(&self) -> Result<Vec<Project>, DomainError> {
        ProjectService::list(self).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        ProjectService::count(self).await
    }

    async fn list_by_team(&self, team_id: &TeamId) -> Result<Vec<Project>, DomainError> {
        ProjectService::list_by_team(self, team_id).await
    }

    async fn get_populated(
        &self,
        id: &ProjectId,
    ) -> Result<Option<PopulatedProject>, DomainError> {
        ProjectService::get_populated(self, id).await
    }

    async fn update(&self, id: &ProjectId, update: ProjectUpdate) -> Result<Project, DomainError> {
        ProjectService::update(self, id, update).await
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), DomainError> {
        ProjectService::delete(self, id).await
    }
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        team_service: Arc<dyn TeamServiceTrait>,
        project_service: Arc<dyn ProjectServiceTrait>,
        session_store: Arc<dyn SessionStore>,
        session_cookie: SessionCookie,
        session_lifetime: chrono::Duration,
    ) -> Self {
        Self {
            user_service,
            team_service,
            project_service,
            session_store,
            session_cookie,
            session_lifetime,
        }
    }
}
