//! Team domain module
//!
//! Teams group users and own projects. A team keeps the ids of its members and
//! of the projects created under it.

mod entity;
mod repository;
mod validation;

pub use entity::{Team, TeamId};
pub use repository::TeamRepository;
pub use validation::{validate_team_name, TeamValidationError};
