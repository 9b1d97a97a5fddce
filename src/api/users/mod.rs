//! User directory endpoints

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::api::auth::DUPLICATE_USER_MESSAGE;
use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UserResponse};
use crate::domain::user::UserProfileUpdate;

pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/get-users", get(list_users))
        .route("/update-user", post(update_user))
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<UserResponse>,
}

#[derive(Debug, Serialize)]
pub struct SingleUserResponse {
    pub user: UserResponse,
}

/// GET /get-users
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.user_service.list().await?;

    Ok(Json(UsersResponse {
        users: users.iter().map(UserResponse::from_user).collect(),
    }))
}

/// Update the logged-in user's profile
///
/// POST /update-user
///
/// Only `firstName`, `lastName` and `email` are read from the body.
pub async fn update_user(
    State(state): State<AppState>,
    RequireUser { user, .. }: RequireUser,
    Json(update): Json<UserProfileUpdate>,
) -> Result<Json<SingleUserResponse>, ApiError> {
    let user = state
        .user_service
        .update_profile(user.id(), update)
        .await
        .map_err(|e| {
            if e.is_conflict() {
                ApiError::internal(DUPLICATE_USER_MESSAGE)
            } else {
                e.into()
            }
        })?;

    Ok(Json(SingleUserResponse {
        user: UserResponse::from_user(&user),
    }))
}
