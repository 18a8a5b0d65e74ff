use std::{env, path::PathBuf, time::Duration};

use crate::infrastructure::wait::{DEFAULT_INTERVAL, DEFAULT_TIMEOUT};

use super::env::{
    AppConfig, ConfigError, DirectoryConfig, LoggingConfig, NavigationConfig, SnapshotConfig,
};

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let snapshot_path = env::var("SNAPSHOT_PATH")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("SNAPSHOT_PATH"))?;

        let snapshot = SnapshotConfig {
            path: PathBuf::from(snapshot_path),
            output_path: PathBuf::from(
                env::var("OUTPUT_PATH").unwrap_or_else(|_| "filtered.html".to_string()),
            ),
            poll_interval: parse_u64("WATCH_INTERVAL_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_INTERVAL),
            wait_timeout: parse_u64("WAIT_TIMEOUT_MS")?
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TIMEOUT),
        };

        let directories = DirectoryConfig {
            logs_dir: env::var("LOGS_DIR").unwrap_or_else(|_| "logs".to_string()),
            data_dir: env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            db_filename: env::var("DB_FILENAME").unwrap_or_else(|_| "settings.db".to_string()),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let navigation = NavigationConfig {
            auto_open_first: parse_flag("AUTO_OPEN_FIRST")?.unwrap_or(true),
            highlight_skills: parse_flag("HIGHLIGHT_SKILLS")?.unwrap_or(true),
        };

        Ok(Self {
            snapshot,
            directories,
            logging,
            navigation,
            skip_instance_guard: parse_flag("SKIP_INSTANCE_GUARD")?.unwrap_or(false),
        })
    }
}

fn parse_u64(key: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|v| *v > 0)
            .map(Some)
            .ok_or(ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}

fn parse_flag(key: &'static str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(value) => parse_bool(&value)
            .map(Some)
            .ok_or(ConfigError::Invalid { key, value }),
        Err(_) => Ok(None),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
