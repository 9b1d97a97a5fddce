//! Authentication API endpoints
//!
//! Signup and login bind the user to a new server-side session carried by a
//! signed cookie. Logout destroys it.

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::api::middleware::{clear_session_cookie, start_session, RequireUser, SessionContext};
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json, UserResponse};
use crate::domain::user::UserValidationError;
use crate::domain::{Team, User};
use crate::infrastructure::user::{AuthOutcome, RegisterUserRequest, RegistrationError};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const LOGIN_FAILED_MESSAGE: &str = "Something went wrong with login!";
pub const LOGOUT_SUCCESS_MESSAGE: &str = "Logout successful!";
pub const DATABASE_QUERY_FAILED_MESSAGE: &str = "Something went wrong with database query.";
pub const DUPLICATE_USER_MESSAGE: &str =
    "Username and email need to be unique. Either username or email is already used.";

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/isLoggedIn", get(is_logged_in))
}

/// Signup request; absent fields count as empty
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Login request
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for a successful signup or login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: &'static str,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionUserResponse {
    pub user: UserResponse<Team>,
}

/// Register a new user and log them in
///
/// POST /signup
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<Response, ApiError> {
    let user = state
        .user_service
        .register(RegisterUserRequest {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password: request.password,
        })
        .await
        .map_err(registration_error)?;

    logged_in_response(&state, user).await
}

/// Log in with email and password
///
/// POST /login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let outcome = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await
        .map_err(|e| {
            error!(error = %e, "Credential lookup failed");
            ApiError::internal(DATABASE_QUERY_FAILED_MESSAGE)
        })?;

    match outcome {
        AuthOutcome::Authenticated(user) => logged_in_response(&state, user).await,
        AuthOutcome::Rejected(failure) => Err(ApiError::unauthorized(failure.message())),
    }
}

/// Destroy the current session
///
/// POST /logout
pub async fn logout(
    State(state): State<AppState>,
    RequireUser { session_id, .. }: RequireUser,
) -> Result<impl IntoResponse, ApiError> {
    if let Err(e) = state.session_store.destroy(&session_id).await {
        warn!(error = %e, "Failed to destroy session");
    }

    let cookie = clear_session_cookie(&state)?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse {
            message: LOGOUT_SUCCESS_MESSAGE,
        }),
    ))
}

/// Return the logged-in user with teams populated
///
/// GET /isLoggedIn
pub async fn is_logged_in(
    State(state): State<AppState>,
    context: SessionContext,
) -> Result<Json<SessionUserResponse>, ApiError> {
    let user = context.user.ok_or_else(ApiError::unauthenticated)?;
    let teams = state.team_service.get_many(user.teams()).await?;

    Ok(Json(SessionUserResponse {
        user: UserResponse::populated(&user, teams),
    }))
}

async fn logged_in_response(state: &AppState, user: User) -> Result<Response, ApiError> {
    let cookie = start_session(state, &user).await.map_err(|e| {
        error!(user_id = %user.id(), error = %e, "Failed to bind session");
        ApiError::internal(LOGIN_FAILED_MESSAGE)
    })?;

    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: LOGIN_SUCCESS_MESSAGE,
            user: UserResponse::from_user(&user),
        }),
    )
        .into_response())
}

fn registration_error(err: RegistrationError) -> ApiError {
    match err {
        RegistrationError::Invalid(UserValidationError::MissingFields) => {
            ApiError::unauthorized(UserValidationError::MissingFields.to_string())
        }
        RegistrationError::Invalid(invalid) => ApiError::internal(invalid.to_string()),
        RegistrationError::EmailTaken(_) => ApiError::internal(DUPLICATE_USER_MESSAGE),
        RegistrationError::Failed(e) => e.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use crate::domain::user::{MISSING_FIELDS_MESSAGE, PASSWORD_POLICY_MESSAGE};
    use crate::domain::DomainError;

    #[test]
    fn test_registration_error_mapping() {
        let missing = registration_error(UserValidationError::MissingFields.into());
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.response.message, MISSING_FIELDS_MESSAGE);

        let weak = registration_error(UserValidationError::WeakPassword.into());
        assert_eq!(weak.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(weak.response.message, PASSWORD_POLICY_MESSAGE);

        let taken = registration_error(RegistrationError::EmailTaken("a@b.co".into()));
        assert_eq!(taken.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(taken.response.message, DUPLICATE_USER_MESSAGE);

        let failed = registration_error(RegistrationError::Failed(DomainError::storage("down")));
        assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_ne!(failed.response.message, "down");
    }

    #[test]
    fn test_signup_request_defaults_missing_fields() {
        let request: SignupRequest = serde_json::from_str(r#"{"firstName":"Ada"}"#).unwrap();

        assert_eq!(request.first_name, "Ada");
        assert!(request.password.is_empty());
    }
}
