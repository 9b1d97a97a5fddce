//! API request/response types

pub mod error;
pub mod json;
pub mod views;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType, UNAUTHORIZED_MESSAGE};
pub use json::Json;
pub use views::{PopulatedProjectResponse, PopulatedTeamResponse, UserResponse};
