//! Teamboard API
//!
//! Users sign up and log in with an email and password and are remembered
//! through a server-side session carried by a signed cookie. Users belong to
//! teams and teams own projects; references between them are kept
//! consistent when projects are created and deleted.

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::str::FromStr;
use std::sync::Arc;

use api::state::AppState;
use config::StorageSettings;
use domain::{Project, ProjectRepository, Team, TeamRepository, UserRepository};
use infrastructure::{
    project::{ProjectService, StorageProjectRepository},
    session::{MokaSessionStore, SessionCookie},
    storage::{run_storage_migrations, PostgresConfig, StorageConfig, StorageFactory, StorageType},
    team::{StorageTeamRepository, TeamService},
    user::{Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService},
};
use tracing::info;

const MAX_SESSIONS: u64 = 100_000;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = storage_config(&config.storage)?;
    info!(backend = ?storage_config.storage_type(), "Storage backend selected");

    let backend = StorageFactory::connect(&storage_config).await?;

    let users: Arc<dyn UserRepository> = match backend.pool() {
        Some(pool) => {
            let applied = run_storage_migrations(pool).await?;
            info!(applied, "PostgreSQL migrations checked");
            Arc::new(PostgresUserRepository::new(pool.clone()))
        }
        None => Arc::new(InMemoryUserRepository::new()),
    };

    let teams: Arc<dyn TeamRepository> = Arc::new(StorageTeamRepository::new(
        StorageFactory::create::<Team>(&backend, "teams"),
    ));
    let projects: Arc<dyn ProjectRepository> = Arc::new(StorageProjectRepository::new(
        StorageFactory::create::<Project>(&backend, "projects"),
    ));

    let user_service = UserService::<dyn UserRepository, Argon2Hasher>::new(
        users.clone(),
        Arc::new(Argon2Hasher::new()),
    );
    let team_service = TeamService::new(teams.clone(), projects.clone(), users.clone());
    let project_service = ProjectService::new(projects, teams, users);

    let session = &config.session;
    let secret = session.resolve_secret()?;
    let max_age_secs = session.max_age_secs();
    let session_store = MokaSessionStore::new(
        std::time::Duration::from_secs(max_age_secs.max(0) as u64),
        MAX_SESSIONS,
    );
    let session_cookie =
        SessionCookie::new(&session.cookie_name, secret, max_age_secs, session.secure);

    Ok(AppState::new(
        Arc::new(user_service),
        Arc::new(team_service),
        Arc::new(project_service),
        Arc::new(session_store),
        session_cookie,
        chrono::Duration::seconds(max_age_secs),
    ))
}

/// Translate the storage settings into a backend configuration
///
/// The PostgreSQL URL falls back to `DATABASE_URL`.
pub fn storage_config(settings: &StorageSettings) -> anyhow::Result<StorageConfig> {
    match StorageType::from_str(&settings.backend)? {
        StorageType::InMemory => Ok(StorageConfig::InMemory),
        StorageType::Postgres => {
            let url = settings
                .database_url
                .clone()
                .or_else(|| std::env::var("DATABASE_URL").ok())
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "storage.database_url or DATABASE_URL is required for the postgres backend"
                    )
                })?;

            Ok(StorageConfig::Postgres(
                PostgresConfig::new(url).with_max_connections(settings.max_connections),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults_to_memory() {
        let config = storage_config(&StorageSettings::default()).unwrap();
        assert_eq!(config.storage_type(), StorageType::InMemory);
    }

    #[test]
    fn test_storage_config_postgres_with_url() {
        let settings = StorageSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://localhost/teamboard_test".to_string()),
            max_connections: 3,
        };

        match storage_config(&settings).unwrap() {
            StorageConfig::Postgres(pg) => {
                assert_eq!(pg.url, "postgres://localhost/teamboard_test");
                assert_eq!(pg.max_connections, 3);
            }
            other => panic!("expected postgres, got {:?}", other),
        }
    }

    #[test]
    fn test_storage_config_rejects_unknown_backend() {
        let settings = StorageSettings {
            backend: "mongodb".to_string(),
            ..Default::default()
        };
        assert!(storage_config(&settings).is_err());
    }

    #[tokio::test]
    async fn test_create_app_state_in_memory() {
        let state = create_app_state().await.unwrap();

        assert!(state.user_service.list().await.unwrap().is_empty());
        assert_eq!(state.session_lifetime, chrono::Duration::hours(24));
    }
}
