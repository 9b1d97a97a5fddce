//! Team endpoints

use axum::{
    extract::{Path, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, PopulatedTeamResponse};
use crate::domain::{Team, TeamId};
use crate::infrastructure::team::CreateTeamRequest;

pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route("/teams", get(list_teams).post(create_team))
        .route("/teams/{team_id}", get(get_team))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTeamBody {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct TeamResponse<T> {
    pub team: T,
}

#[derive(Debug, Serialize)]
pub struct TeamsResponse {
    pub teams: Vec<Team>,
}

/// Create a team with the logged-in user as its first member
///
/// POST /teams
pub async fn create_team(
    State(state): State<AppState>,
    RequireUser { user, .. }: RequireUser,
    Json(body): Json<CreateTeamBody>,
) -> Result<Json<TeamResponse<Team>>, ApiError> {
    let team = state
        .team_service
        .create(user.id(), CreateTeamRequest { name: body.name })
        .await?;

    Ok(Json(TeamResponse { team }))
}

/// GET /teams
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<TeamsResponse>, ApiError> {
    let teams = state.team_service.list().await?;
    Ok(Json(TeamsResponse { teams }))
}

/// GET /teams/{team_id}
pub async fn get_team(
    State(state): State<AppState>,
    Path(team_id): Path<String>,
) -> Result<Json<TeamResponse<PopulatedTeamResponse>>, ApiError> {
    let team_id = TeamId::parse(team_id)?;

    let team = state
        .team_service
        .get_populated(&team_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Team '{}' not found", team_id)))?;

    Ok(Json(TeamResponse { team: team.into() }))
}
