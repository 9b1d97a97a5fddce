//! User infrastructure module
//!
//! Password hashing with Argon2, the in-memory and PostgreSQL user
//! repositories, and the user service.

mod password;
mod postgres_repository;
mod repository;
mod service;

pub use password::{Argon2Hasher, PasswordHasher};
pub use postgres_repository::PostgresUserRepository;
pub use repository::InMemoryUserRepository;
pub use service::{
    AuthOutcome, LoginFailure, RegisterUserRequest, RegistrationError, UserService,
};
