//! Migrate command - applies PostgreSQL migrations and exits

use tracing::info;

use crate::infrastructure::storage::{
    run_storage_migrations, PostgresMigrator, StorageConfig,
};

pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap();

    let StorageConfig::Postgres(pg_config) = crate::storage_config(&config.storage)? else {
        anyhow::bail!("Migrations need the postgres storage backend (storage.backend = \"postgres\")");
    };

    let pool = pg_config.connect().await?;
    let applied = run_storage_migrations(&pool).await?;
    let version = PostgresMigrator::new(pool.clone()).current_version().await?;

    info!(applied, version = ?version, "Migrations complete");
    pool.close().await;

    Ok(())
}
