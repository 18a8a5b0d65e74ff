use std::{
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    process,
};

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::infrastructure::directories::ResolvedPaths;

const LOCK_FILENAME: &str = ".filter.lock";

/// Exclusive hold on the data directory so two filters never write the same
/// settings and output files.
#[derive(Debug)]
pub struct InstanceGuard {
    file: File,
    path: PathBuf,
}

impl InstanceGuard {
    pub fn acquire(paths: &ResolvedPaths) -> Result<Self> {
        let lock_path = paths.data_dir.join(LOCK_FILENAME);
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&lock_path)
            .with_context(|| format!("failed to open lock file {}", lock_path.display()))?;

        match file.try_lock_exclusive() {
            Ok(()) => {
                write_lock_info(&mut file, process::id())?;
                tracing::info!(
                    target: "lifecycle",
                    pid = process::id(),
                    path = %lock_path.display(),
                    "acquired filter runtime lock"
                );
                Ok(Self {
                    file,
                    path: lock_path,
                })
            }
            Err(err) if err.kind() == ErrorKind::WouldBlock => {
                let holder = read_lock_info(&lock_path)
                    .map(|info| format!("pid {} since {}", info.pid, info.started_at.to_rfc3339()))
                    .unwrap_or_else(|| "unknown process".to_string());
                Err(anyhow!(
                    "another job filter is already using {} ({holder})",
                    paths.data_dir.display()
                ))
            }
            Err(err) => Err(err.into()),
        }
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    target: "lifecycle",
                    path = %self.path.display(),
                    error = %err,
                    "failed to remove lock file on shutdown"
                );
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    pid: u32,
    started_at: DateTime<Utc>,
}

fn write_lock_info(file: &mut File, pid: u32) -> Result<()> {
    let info = LockInfo {
        pid,
        started_at: Utc::now(),
    };
    let payload = serde_json::to_vec(&info)?;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&payload)?;
    file.sync_all()?;
    Ok(())
}

fn read_lock_info(lock_path: &Path) -> Option<LockInfo> {
    let contents = fs::read_to_string(lock_path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(info) => Some(info),
        Err(err) => {
            tracing::warn!(
                target: "lifecycle",
                path = %lock_path.display(),
                error = %err,
                "failed to parse lock file metadata"
            );
            None
        }
    }
}
