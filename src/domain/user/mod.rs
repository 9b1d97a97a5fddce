//! User domain
//!
//! User entities, credential validation and the repository trait used by the
//! user directory and the local credential strategy.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, UserProfileUpdate};
pub use repository::UserRepository;
pub use validation::{
    normalize_email, validate_email, validate_name, validate_password, UserValidationError,
    MISSING_FIELDS_MESSAGE, PASSWORD_POLICY_MESSAGE,
};

#[cfg(test)]
pub use repository::mock::MockUserRepository;
