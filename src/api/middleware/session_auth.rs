//! Session-cookie authentication extractors

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderValue},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::session::SessionData;
use crate::domain::user::User;
use crate::domain::DomainError;

/// Identity bound to the current request, if any
///
/// A cookie that fails verification, points to an unknown or expired
/// session, or names a user that no longer exists yields an anonymous
/// context.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    pub session_id: Option<String>,
    pub user: Option<User>,
}

impl SessionContext {
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl FromRequestParts<AppState> for SessionContext {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(session_id) = state.session_cookie.session_id_from_headers(&parts.headers) else {
            return Ok(Self::anonymous());
        };

        let Some(session) = state.session_store.find(&session_id).await? else {
            debug!("Session cookie refers to no live session");
            return Ok(Self::anonymous());
        };

        let Some(user) = state.user_service.get(&session.data.user_id).await? else {
            debug!(user_id = %session.data.user_id, "Session user no longer exists");
            return Ok(Self::anonymous());
        };

        Ok(Self {
            session_id: Some(session.id),
            user: Some(user),
        })
    }
}

/// Extractor that rejects requests without a bound user
#[derive(Debug, Clone)]
pub struct RequireUser {
    pub user: User,
    pub session_id: String,
}

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match SessionContext::from_request_parts(parts, state).await? {
            SessionContext {
                session_id: Some(session_id),
                user: Some(user),
            } => Ok(Self { user, session_id }),
            _ => Err(ApiError::unauthenticated()),
        }
    }
}

/// Create a session for the user and return the `Set-Cookie` value
pub async fn start_session(state: &AppState, user: &User) -> Result<HeaderValue, DomainError> {
    let data = SessionData::for_user(user.id().clone(), state.session_lifetime);
    let session_id = state.session_store.create(data).await?;

    HeaderValue::from_str(&state.session_cookie.set_cookie(&session_id))
        .map_err(|e| DomainError::session(format!("Invalid session cookie: {}", e)))
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_session_cookie(state: &AppState) -> Result<HeaderValue, DomainError> {
    HeaderValue::from_str(&state.session_cookie.clear_cookie())
        .map_err(|e| DomainError::session(format!("Invalid session cookie: {}", e)))
}
