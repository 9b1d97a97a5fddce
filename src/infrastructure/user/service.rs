//! User service for registration, authentication and the user directory

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::user::{
    normalize_email, validate_email, validate_name, validate_password, User, UserId,
    UserProfileUpdate, UserRepository, UserValidationError,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
///
/// Absent fields are passed as empty strings.
#[derive(Debug, Clone, Default)]
pub struct RegisterUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Why a registration was refused
#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error(transparent)]
    Invalid(#[from] UserValidationError),

    #[error("Email '{0}' is already registered")]
    EmailTaken(String),

    #[error(transparent)]
    Failed(DomainError),
}

impl From<DomainError> for RegistrationError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::Conflict { message } => Self::EmailTaken(message),
            other => Self::Failed(other),
        }
    }
}

/// Failure details reported by the local credential strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFailure {
    MissingCredentials,
    IncorrectCredentials,
}

impl LoginFailure {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "Missing credentials",
            Self::IncorrectCredentials => "Incorrect email or password.",
        }
    }
}

/// Result of checking a set of credentials
#[derive(Debug)]
pub enum AuthOutcome {
    Authenticated(User),
    Rejected(LoginFailure),
}

/// User service for authentication and the user directory
pub struct UserService<R: UserRepository + ?Sized, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository + ?Sized, H: PasswordHasher> std::fmt::Debug for UserService<R, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserService")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl<R, H> UserService<R, H>
where
    R: UserRepository + ?Sized,
    H: PasswordHasher + 'static,
{
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, RegistrationError> {
        let first_name = request.first_name.trim();
        let last_name = request.last_name.trim();
        let email = normalize_email(&request.email);

        if first_name.is_empty()
            || last_name.is_empty()
            || email.is_empty()
            || request.password.is_empty()
        {
            return Err(UserValidationError::MissingFields.into());
        }

        validate_password(&request.password)?;
        validate_email(&email)?;
        validate_name("First name", first_name)?;
        validate_name("Last name", last_name)?;

        // The store enforces uniqueness again on create
        if self.repository.email_exists(&email).await? {
            return Err(RegistrationError::EmailTaken(email));
        }

        let password_hash = self.hash_password(request.password).await?;
        let user = User::new(
            UserId::generate(),
            first_name,
            last_name,
            email,
            password_hash,
        );

        let user = self.repository.create(user).await?;
        info!(user_id = %user.id(), "User registered");

        Ok(user)
    }

    /// Check an email and password pair
    ///
    /// Store failures are returned as errors; everything else is an outcome.
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthOutcome, DomainError> {
        let email = normalize_email(email);

        if email.is_empty() || password.is_empty() {
            return Ok(AuthOutcome::Rejected(LoginFailure::MissingCredentials));
        }

        let Some(user) = self.repository.get_by_email(&email).await? else {
            debug!("Login attempt for unknown email");
            return Ok(AuthOutcome::Rejected(LoginFailure::IncorrectCredentials));
        };

        if !self
            .verify_password(password.to_string(), user.password_hash().to_string())
            .await?
        {
            warn!(user_id = %user.id(), "Login rejected: wrong password");
            return Ok(AuthOutcome::Rejected(LoginFailure::IncorrectCredentials));
        }

        info!(user_id = %user.id(), "User authenticated");
        Ok(AuthOutcome::Authenticated(user))
    }

    /// Get a user by ID
    pub async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.repository.get(id).await
    }

    /// List all users
    pub async fn list(&self) -> Result<Vec<User>, DomainError> {
        self.repository.list().await
    }

    /// Count registered users
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Apply allow-listed profile changes
    ///
    /// Only the named fields are written, so team memberships recorded
    /// meanwhile are kept.
    pub async fn update_profile(
        &self,
        id: &UserId,
        update: UserProfileUpdate,
    ) -> Result<User, DomainError> {
        let user = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        if update.is_empty() {
            return Ok(user);
        }

        let mut changes = UserProfileUpdate::default();

        if let Some(first_name) = update.first_name {
            let first_name = first_name.trim();
            validate_name("First name", first_name)
                .map_err(|e| DomainError::validation(e.to_string()))?;
            changes.first_name = Some(first_name.to_string());
        }

        if let Some(last_name) = update.last_name {
            let last_name = last_name.trim();
            validate_name("Last name", last_name)
                .map_err(|e| DomainError::validation(e.to_string()))?;
            changes.last_name = Some(last_name.to_string());
        }

        if let Some(email) = update.email {
            let email = normalize_email(&email);
            validate_email(&email).map_err(|e| DomainError::validation(e.to_string()))?;

            if email != user.email() {
                changes.email = Some(email);
            }
        }

        if changes.is_empty() {
            return Ok(user);
        }

        let user = self.repository.update_profile(id, &changes).await?;
        info!(user_id = %user.id(), "User profile updated");

        Ok(user)
    }

    async fn hash_password(&self, password: String) -> Result<String, DomainError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| DomainError::internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, DomainError> {
        let hasher = Arc::clone(&self.hasher);

        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| DomainError::internal(format!("Password verification task failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::TeamId;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::user::password::{Argon2Hasher, MockPasswordHasher};
    use crate::infrastructure::user::repository::InMemoryUserRepository;

    fn create_service() -> UserService<InMemoryUserRepository, Argon2Hasher> {
        UserService::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(Argon2Hasher::new()),
        )
    }

    fn make_request(email: &str, password: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_user() {
        let service = create_service();

        let user = service
            .register(make_request("  Ada@Example.com ", "Secret123"))
            .await
            .unwrap();

        assert_eq!(user.email(), "ada@example.com");
        assert_eq!(user.first_name(), "Ada");
        assert!(user.password_hash().starts_with("$argon2id$"));
        assert_ne!(user.password_hash(), "Secret123");
    }

    #[tokio::test]
    async fn test_register_missing_fields() {
        let service = create_service();

        for request in [
            RegisterUserRequest {
                first_name: String::new(),
                ..make_request("ada@example.com", "Secret123")
            },
            RegisterUserRequest {
                last_name: "   ".to_string(),
                ..make_request("ada@example.com", "Secret123")
            },
            make_request("", "Secret123"),
            make_request("ada@example.com", ""),
        ] {
            let result = service.register(request).await;
            assert!(matches!(
                result,
                Err(RegistrationError::Invalid(UserValidationError::MissingFields))
            ));
        }

        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_weak_password() {
        let service = create_service();

        let result = service.register(make_request("ada@example.com", "secret")).await;

        assert!(matches!(
            result,
            Err(RegistrationError::Invalid(UserValidationError::WeakPassword))
        ));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_invalid_email() {
        let service = create_service();

        let result = service.register(make_request("not-an-email", "Secret123")).await;

        assert!(matches!(
            result,
            Err(RegistrationError::Invalid(UserValidationError::InvalidEmail))
        ));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_case_insensitive() {
        let service = create_service();

        service
            .register(make_request("ada@example.com", "Secret123"))
            .await
            .unwrap();
        let result = service
            .register(make_request("ADA@example.com", "Other456X"))
            .await;

        assert!(matches!(result, Err(RegistrationError::EmailTaken(_))));
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_register_hasher_failure() {
        let mut hasher = MockPasswordHasher::new();
        hasher
            .expect_hash()
            .returning(|_| Err(DomainError::internal("argon2 exploded")));

        let service = UserService::new(Arc::new(InMemoryUserRepository::new()), Arc::new(hasher));
        let result = service
            .register(make_request("ada@example.com", "Secret123"))
            .await;

        assert!(matches!(
            result,
            Err(RegistrationError::Failed(DomainError::Internal { .. }))
        ));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_authenticate_success() {
        let service = create_service();
        let registered = service
            .register(make_request("ada@example.com", "Secret123"))
            .await
            .unwrap();

        let outcome = service
            .authenticate("ADA@example.com ", "Secret123")
            .await
            .unwrap();

        match outcome {
            AuthOutcome::Authenticated(user) => assert_eq!(user.id(), registered.id()),
            other => panic!("expected authentication, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = create_service();
        service
            .register(make_request("ada@example.com", "Secret123"))
            .await
            .unwrap();

        let outcome = service
            .authenticate("ada@example.com", "Secret124")
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(LoginFailure::IncorrectCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email_skips_verification() {
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_verify().times(0);

        let service = UserService::new(Arc::new(InMemoryUserRepository::new()), Arc::new(hasher));
        let outcome = service
            .authenticate("ghost@example.com", "Secret123")
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(LoginFailure::IncorrectCredentials)
        ));
    }

    #[tokio::test]
    async fn test_authenticate_missing_credentials() {
        let service = create_service();

        let outcome = service.authenticate("", "Secret123").await.unwrap();
        assert!(matches!(
            outcome,
            AuthOutcome::Rejected(LoginFailure::MissingCredentials)
        ));
        assert_eq!(LoginFailure::MissingCredentials.message(), "Missing credentials");
    }

    #[tokio::test]
    async fn test_authenticate_store_failure_is_error() {
        let repository = Arc::new(MockUserRepository::new());
        repository.set_should_fail(true).await;
        let service = UserService::new(repository, Arc::new(Argon2Hasher::new()));

        let result = service.authenticate("ada@example.com", "Secret123").await;
        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_count_reports_store_state() {
        let repository = Arc::new(MockUserRepository::new());
        let service = UserService::new(repository.clone(), Arc::new(Argon2Hasher::new()));

        service
            .register(make_request("ada@example.com", "Secret123"))
            .await
            .unwrap();
        assert_eq!(service.count().await.unwrap(), 1);

        repository.set_should_fail(true).await;
        assert!(matches!(service.count().await, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_update_profile_allow_list() {
        let service = create_service();
        let user = service
            .register(make_request("ada@example.com", "Secret123"))
            .await
            .unwrap();
        let original_hash = user.password_hash().to_string();

        let update: UserProfileUpdate = serde_json::from_value(serde_json::json!({
            "firstName": "Augusta",
            "email": "Countess@Example.com",
            "passwordHash": "pwned",
            "teams": [TeamId::generate().as_str()]
        }))
        .unwrap();

        let updated = service.update_profile(user.id(), update).await.unwrap();

        assert_eq!(updated.first_name(), "Augusta");
        assert_eq!(updated.last_name(), "Lovelace");
        assert_eq!(updated.email(), "countess@example.com");
        assert_eq!(updated.password_hash(), original_hash);
        assert!(updated.teams().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict() {
        let service = create_service();
        service
            .register(make_request("ada@example.com", "Secret123"))
            .await
            .unwrap();
        let grace = service
            .register(make_request("grace@example.com", "Secret123"))
            .await
            .unwrap();

        let result = service
            .update_profile(
                grace.id(),
                UserProfileUpdate {
                    email: Some("ada@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_update_profile_keeps_team_joined_meanwhile() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let service = UserService::new(repository.clone(), Arc::new(Argon2Hasher::new()));
        let user = service
            .register(make_request("ada@example.com", "Secret123"))
            .await
            .unwrap();

        let team_id = TeamId::generate();
        repository.join_team(user.id(), &team_id).await.unwrap();

        let updated = service
            .update_profile(
                user.id(),
                UserProfileUpdate {
                    last_name: Some("Byron".to_string()),
                    email: Some("ADA@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.last_name(), "Byron");
        assert_eq!(updated.email(), "ada@example.com");
        assert_eq!(updated.teams(), &[team_id]);
    }
}
