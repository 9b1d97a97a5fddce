//! Project validation

use thiserror::Error;

/// Errors that can occur during project validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectValidationError {
    #[error("Project name cannot be empty")]
    EmptyName,

    #[error("Project name cannot exceed {0} characters")]
    NameTooLong(usize),

    #[error("Project description cannot exceed {0} characters")]
    DescriptionTooLong(usize),

    #[error("A project cannot list itself as a sub-project")]
    SelfReference,
}

const MAX_PROJECT_NAME_LENGTH: usize = 200;
const MAX_PROJECT_DESCRIPTION_LENGTH: usize = 5000;

/// Validate a project name
pub fn validate_project_name(name: &str) -> Result<(), ProjectValidationError> {
    if name.trim().is_empty() {
        return Err(ProjectValidationError::EmptyName);
    }

    if name.chars().count() > MAX_PROJECT_NAME_LENGTH {
        return Err(ProjectValidationError::NameTooLong(MAX_PROJECT_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a project description
pub fn validate_project_description(description: &str) -> Result<(), ProjectValidationError> {
    if description.chars().count() > MAX_PROJECT_DESCRIPTION_LENGTH {
        return Err(ProjectValidationError::DescriptionTooLong(
            MAX_PROJECT_DESCRIPTION_LENGTH,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_project_name() {
        assert!(validate_project_name("Website relaunch").is_ok());
        assert_eq!(
            validate_project_name(" "),
            Err(ProjectValidationError::EmptyName)
        );
        assert!(validate_project_name(&"x".repeat(201)).is_err());
    }

    #[test]
    fn test_validate_project_description() {
        assert!(validate_project_description("").is_ok());
        assert_eq!(
            validate_project_description(&"x".repeat(5001)),
            Err(ProjectValidationError::DescriptionTooLong(5000))
        );
    }
}
