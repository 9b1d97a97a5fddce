//! Project endpoints

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PopulatedProjectResponse};
use crate::domain::project::ProjectUpdate;
use crate::domain::{Project, ProjectId, Team, TeamId};
use crate::infrastructure::project::CreateProjectRequest;

pub const PROJECT_REMOVED_MESSAGE: &str = "Successfully removed!";

pub fn create_projects_router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route("/projects/{project_id}", get(get_project))
        .route("/projects/{project_id}/update", post(update_project))
        .route("/projects/{project_id}/delete", post(delete_project))
        .route("/team-projects/{team_id}", get(list_team_projects))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProjectBody {
    pub name: String,
    pub description: Option<String>,
    /// Team id to create the project under
    pub team: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedProjectResponse {
    pub project: Project,
    pub team: Option<Team>,
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse<T> {
    pub project: T,
}

#[derive(Debug, Serialize)]
pub struct ProjectsResponse {
    pub projects: Vec<Project>,
}

#[derive(Debug, Serialize)]
pub struct RemovedResponse {
    pub message: &'static str,
}

/// POST /projects
pub async fn create_project(
    State(state): State<AppState>,
    Json(body): Json<CreateProjectBody>,
) -> Result<Json<CreatedProjectResponse>, ApiError> {
    let team = body
        .team
        .filter(|id| !id.trim().is_empty())
        .map(TeamId::parse)
        .transpose()?;

    let (project, team) = state
        .project_service
        .create(CreateProjectRequest {
            name: body.name,
            description: body.description,
            team,
        })
        .await?;

    Ok(Json(CreatedProjectResponse { project, team }))
}

/// GET /projects
pub async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<ProjectsResponse>, ApiError> {
    let projects = state.project_service.list().await?;
    Ok(Json(ProjectsResponse { projects }))
}

/// GET /team-projects/{team_id}
pub async fn list_team_projects(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<ProjectsResponse>, ApiError> {
    let team_id = TeamId::parse(team_id)?;
    let projects = state.project_service.list_by_team(&team_id).await?;
    Ok(Json(ProjectsResponse { projects }))
}

/// GET /projects/{project_id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<ProjectResponse<PopulatedProjectResponse>>, ApiError> {
    let project_id = ProjectId::parse(project_id)?;

    let project = state
        .project_service
        .get_populated(&project_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Project '{}' not found", project_id)))?;

    Ok(Json(ProjectResponse {
        project: project.into(),
    }))
}

/// Apply an allow-listed update
///
/// POST /projects/{project_id}/update
pub async fn update_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
    Json(update): Json<ProjectUpdate>,
) -> Result<Json<ProjectResponse<Project>>, ApiError> {
    let project_id = ProjectId::parse(project_id)?;
    let project = state.project_service.update(&project_id, update).await?;
    Ok(Json(ProjectResponse { project }))
}

/// Delete a project and detach it from its teams
///
/// POST /projects/{project_id}/delete
pub async fn delete_project(
    State(state): State<AppState>,
    Path(project_id): Path<String>,
) -> Result<Json<RemovedResponse>, ApiError> {
    let project_id = ProjectId::parse(project_id)?;
    state.project_service.delete(&project_id).await?;

    Ok(Json(RemovedResponse {
        message: PROJECT_REMOVED_MESSAGE,
    }))
}
