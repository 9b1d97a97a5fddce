//! Infrastructure layer - storage backends, services and runtime plumbing

pub mod logging;
pub mod project;
pub mod session;
pub mod storage;
pub mod team;
pub mod user;
