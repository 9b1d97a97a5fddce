//! User entity and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// User identifier - a UUID v4 string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Parse an identifier received from a client or a store
    pub fn parse(id: impl Into<String>) -> Result<Self, DomainError> {
        let id = id.into();
        Uuid::parse_str(&id)
            .map_err(|_| DomainError::invalid_id(format!("'{}' is not a valid user id", id)))?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registered user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    first_name: String,
    last_name: String,
    /// Stored trimmed and lower-cased
    email: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    teams: Vec<TeamId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Allow-listed profile changes accepted from `POST /update-user`
///
/// Any other field in the request body is dropped during deserialization.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl UserProfileUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.email.is_none()
    }
}

impl User {
    /// Create a new user; the email must already be normalized
    pub fn new(
        id: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            teams: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from persisted columns
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: UserId,
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        teams: Vec<TeamId>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            email,
            password_hash,
            teams,
            created_at,
            updated_at,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn teams(&self) -> &[TeamId] {
        &self.teams
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Mutators

    pub fn set_first_name(&mut self, first_name: impl Into<String>) {
        self.first_name = first_name.into();
        self.touch();
    }

    pub fn set_last_name(&mut self, last_name: impl Into<String>) {
        self.last_name = last_name.into();
        self.touch();
    }

    /// Update the email; the caller normalizes and checks uniqueness
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
        self.touch();
    }

    /// Apply already validated and normalized profile changes
    pub fn apply_profile(&mut self, changes: &UserProfileUpdate) {
        if let Some(first_name) = &changes.first_name {
            self.set_first_name(first_name.clone());
        }
        if let Some(last_name) = &changes.last_name {
            self.set_last_name(last_name.clone());
        }
        if let Some(email) = &changes.email {
            self.set_email(email.clone());
        }
    }

    /// Record team membership, returns false if already a member
    pub fn join_team(&mut self, team_id: TeamId) -> bool {
        if self.teams.contains(&team_id) {
            return false;
        }
        self.teams.push(team_id);
        self.touch();
        true
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user() -> User {
        User::new(
            UserId::generate(),
            "Ada",
            "Lovelace",
            "ada@example.com",
            "$argon2id$hash",
        )
    }

    #[test]
    fn test_user_id_generate_is_uuid() {
        let id = UserId::generate();
        assert!(Uuid::parse_str(id.as_str()).is_ok());
    }

    #[test]
    fn test_user_id_parse_rejects_garbage() {
        let result = UserId::parse("not-a-uuid");
        assert!(matches!(result, Err(DomainError::InvalidId { .. })));
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = create_test_user();
        let json = serde_json::to_value(&user).unwrap();

        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["email"], "ada@example.com");
        assert_eq!(json["id"], user.id().as_str());
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_join_team_is_idempotent() {
        let mut user = create_test_user();
        let team_id = TeamId::generate();

        assert!(user.join_team(team_id.clone()));
        assert!(!user.join_team(team_id.clone()));
        assert_eq!(user.teams(), &[team_id]);
    }

    #[test]
    fn test_setters_touch_updated_at() {
        let mut user = create_test_user();
        let before = user.updated_at();

        std::thread::sleep(std::time::Duration::from_millis(5));
        user.set_last_name("Byron");

        assert_eq!(user.last_name(), "Byron");
        assert!(user.updated_at() > before);
    }

    #[test]
    fn test_profile_update_ignores_unknown_fields() {
        let update: UserProfileUpdate = serde_json::from_value(serde_json::json!({
            "firstName": "Grace",
            "passwordHash": "stolen",
            "teams": ["x"],
            "id": "y"
        }))
        .unwrap();

        assert_eq!(update.first_name.as_deref(), Some("Grace"));
        assert!(update.last_name.is_none());
        assert!(update.email.is_none());
        assert!(!update.is_empty());
    }
}
