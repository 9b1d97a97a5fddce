//! Project infrastructure implementations

mod repository;
mod service;

pub use repository::StorageProjectRepository;
pub use service::{CreateProjectRequest, PopulatedProject, ProjectService};
