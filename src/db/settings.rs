use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{query, query_as, sqlite::SqlitePool};

use crate::domain::{settings::SETTINGS_KEY, PersistedConfig};

use super::SettingsStore;

#[derive(Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
    key: String,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            key: SETTINGS_KEY.to_string(),
        }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub async fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
        let row: Option<(DateTime<Utc>,)> =
            query_as(r#"SELECT updated_at FROM settings WHERE key = ?1"#)
                .bind(&self.key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(ts,)| ts))
    }
}

#[async_trait(?Send)]
impl SettingsStore for SqliteSettingsStore {
    async fn load(&self) -> Result<Option<PersistedConfig>> {
        let row: Option<(String,)> = query_as(r#"SELECT value FROM settings WHERE key = ?1"#)
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await?;
        let Some((raw,)) = row else {
            return Ok(None);
        };
        match PersistedConfig::from_stored(&raw) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!(
                    target: "store",
                    error = %err,
                    key = %self.key,
                    "stored settings are malformed; ignoring"
                );
                Ok(None)
            }
        }
    }

    async fn save(&self, config: &PersistedConfig) -> Result<()> {
        let raw = config.to_stored()?;
        query(
            r#"INSERT OR REPLACE INTO settings (key, value, updated_at)
                VALUES (?1, ?2, CURRENT_TIMESTAMP)"#,
        )
        .bind(&self.key)
        .bind(raw)
        .execute(&self.pool)
        .await?;
        tracing::debug!(target: "store", key = %self.key, "settings persisted");
        Ok(())
    }
}
