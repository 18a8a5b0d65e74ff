use std::{path::Path, str::FromStr, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{
    query,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions},
};

use crate::domain::PersistedConfig;

pub mod settings;

#[cfg(test)]
pub mod memory;

pub async fn init_pool(db_path: &Path) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    query(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(&pool)
    .await?;

    Ok(pool)
}

/// Durable home of the filter settings.
///
/// `load` returns `Ok(None)` for absent or undecodable data; only storage
/// failures surface as errors.
#[async_trait(?Send)]
pub trait SettingsStore {
    async fn load(&self) -> Result<Option<PersistedConfig>>;
    async fn save(&self, config: &PersistedConfig) -> Result<()>;
}

/// Startup read: any failure falls back to defaults.
pub async fn load_or_default<S: SettingsStore + ?Sized>(store: &S) -> PersistedConfig {
    match store.load().await {
        Ok(Some(config)) => config,
        Ok(None) => {
            tracing::info!(target: "store", "no stored settings; using defaults");
            PersistedConfig::default()
        }
        Err(err) => {
            tracing::warn!(target: "store", error = %err, "failed to read settings; using defaults");
            PersistedConfig::default()
        }
    }
}

/// Best-effort write; failures are logged and never retried.
pub async fn save_best_effort<S: SettingsStore + ?Sized>(store: &S, config: &PersistedConfig) -> bool {
    match store.save(config).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(target: "store", error = %err, "failed to persist settings");
            false
        }
    }
}
