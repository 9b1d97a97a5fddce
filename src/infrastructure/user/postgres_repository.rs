//! PostgreSQL user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::domain::team::TeamId;
use crate::domain::user::{User, UserId, UserProfileUpdate, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::storage::classify_sqlx_error;

const USER_COLUMNS: &str =
    "id, first_name, last_name, email, password_hash, teams, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
///
/// Users live in a dedicated `users` table rather than a document table so
/// the password hash is persisted and `email` carries a unique index.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error("Failed to get user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("id", id.as_str()).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("email", email).await
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, first_name, last_name, email, password_hash, teams,
                               created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.first_name())
        .bind(user.last_name())
        .bind(user.email())
        .bind(user.password_hash())
        .bind(teams_to_json(user.teams())?)
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| classify_sqlx_error("Failed to create user", e))?;

        Ok(user)
    }

    async fn update_profile(
        &self,
        id: &UserId,
        changes: &UserProfileUpdate,
    ) -> Result<User, DomainError> {
        let query = format!(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                email = COALESCE($4, email),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.as_str())
            .bind(changes.first_name.as_deref())
            .bind(changes.last_name.as_deref())
            .bind(changes.email.as_deref())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error("Failed to update user", e))?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        row_to_user(&row)
    }

    async fn join_team(&self, id: &UserId, team_id: &TeamId) -> Result<User, DomainError> {
        // Single-statement append; the row lock serializes concurrent joins
        let query = format!(
            r#"
            UPDATE users
            SET teams = CASE WHEN teams @> $2 THEN teams ELSE teams || $2 END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(id.as_str())
            .bind(teams_to_json(std::slice::from_ref(team_id))?)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error("Failed to add team to user", e))?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))?;

        row_to_user(&row)
    }

    async fn list(&self) -> Result<Vec<User>, DomainError> {
        let query = format!("SELECT {} FROM users ORDER BY created_at, id", USER_COLUMNS);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error("Failed to list users", e))?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify_sqlx_error("Failed to count users", e))?;

        Ok(count.max(0) as usize)
    }
}

fn row_to_user(row: &PgRow) -> Result<User, DomainError> {
    let column_error = |e: sqlx::Error| DomainError::storage(format!("Invalid user row: {}", e));

    let id: String = row.try_get("id").map_err(column_error)?;
    let teams: serde_json::Value = row.try_get("teams").map_err(column_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column_error)?;

    let user_id = UserId::parse(id)
        .map_err(|e| DomainError::storage(format!("Invalid user ID in database: {}", e)))?;

    Ok(User::from_parts(
        user_id,
        row.try_get("first_name").map_err(column_error)?,
        row.try_get("last_name").map_err(column_error)?,
        row.try_get("email").map_err(column_error)?,
        row.try_get("password_hash").map_err(column_error)?,
        teams_from_json(teams)?,
        created_at,
        updated_at,
    ))
}

fn teams_to_json(teams: &[TeamId]) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(teams)
        .map_err(|e| DomainError::storage(format!("Failed to serialize teams: {}", e)))
}

fn teams_from_json(value: serde_json::Value) -> Result<Vec<TeamId>, DomainError> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::storage(format!("Invalid teams in database: {}", e)))
}
