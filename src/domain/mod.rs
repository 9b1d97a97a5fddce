//! Domain layer - Core business logic and entities

pub mod error;
pub mod project;
pub mod session;
pub mod storage;
pub mod team;
pub mod user;

pub use error::DomainError;
pub use project::{Project, ProjectId, ProjectRepository, ProjectUpdate};
pub use session::{Session, SessionData, SessionStore};
pub use storage::{Storage, StorageEntity, StorageKey};
pub use team::{Team, TeamId, TeamRepository};
pub use user::{User, UserId, UserProfileUpdate, UserRepository};
