//! Storage factory for runtime backend selection

use std::str::FromStr;
use std::sync::Arc;

use sqlx::postgres::PgPool;

use crate::domain::storage::{Storage, StorageEntity};
use crate::domain::DomainError;

use super::in_memory::InMemoryStorage;
use super::postgres::{PostgresConfig, PostgresStorage};

/// Supported storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    InMemory,
    /// PostgreSQL storage
    Postgres,
}

impl FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            other => Err(DomainError::validation(format!(
                "Unknown storage backend '{}'",
                other
            ))),
        }
    }
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// A connected backend that storages for each entity are carved out of
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    Postgres(PgPool),
}

impl StorageBackend {
    /// The connection pool, when backed by PostgreSQL
    pub fn pool(&self) -> Option<&PgPool> {
        match self {
            Self::InMemory => None,
            Self::Postgres(pool) => Some(pool),
        }
    }
}

/// Factory for creating storage instances
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Connects the configured backend
    pub async fn connect(config: &StorageConfig) -> Result<StorageBackend, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(StorageBackend::InMemory),
            StorageConfig::Postgres(pg_config) => {
                Ok(StorageBackend::Postgres(pg_config.connect().await?))
            }
        }
    }

    /// Creates the document storage for one entity type
    pub fn create<E>(backend: &StorageBackend, table_name: &str) -> Arc<dyn Storage<E>>
    where
        E: StorageEntity + 'static,
    {
        match backend {
            StorageBackend::InMemory => Arc::new(InMemoryStorage::<E>::new()),
            StorageBackend::Postgres(pool) => {
                Arc::new(PostgresStorage::<E>::new(pool.clone(), table_name))
            }
        }
    }
}
