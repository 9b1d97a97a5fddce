//! Project domain module

mod entity;
mod repository;
mod validation;

pub use entity::{Project, ProjectId, ProjectUpdate};
pub use repository::ProjectRepository;
pub use validation::{validate_project_description, validate_project_name, ProjectValidationError};
