use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    time::{Duration, SystemTime},
};

use anyhow::{Context, Result};
use tokio::fs;

use crate::infrastructure::wait::{wait_for, WaitTimeout};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fingerprint {
    modified: Option<SystemTime>,
    len: u64,
}

/// Watches the captured job-list page on disk; every rewrite of the file is
/// a host re-render.
pub struct PageFeed {
    path: PathBuf,
    last: Option<Fingerprint>,
}

impl PageFeed {
    pub fn new(path: PathBuf) -> Self {
        Self { path, last: None }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn wait_until_present(
        &self,
        timeout: Duration,
        interval: Duration,
    ) -> Result<(), WaitTimeout> {
        wait_for(|| self.path.is_file().then_some(()), timeout, interval).await
    }

    /// Returns the page contents when the file changed since the last call.
    pub async fn poll(&mut self) -> Result<Option<String>> {
        let metadata = match fs::metadata(&self.path).await {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to stat {}", self.path.display()))
            }
        };
        let fingerprint = Fingerprint {
            modified: metadata.modified().ok(),
            len: metadata.len(),
        };
        if self.last == Some(fingerprint) {
            return Ok(None);
        }

        let html = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        self.last = Some(fingerprint);
        Ok(Some(html))
    }
}

/// Writes the annotated page next to its destination and renames it into
/// place, so readers never see a partial file.
pub async fn write_annotated(path: &Path, html: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "filtered.html".to_string());
    let staging = path.with_file_name(format!(".{file_name}.tmp"));
    fs::write(&staging, html)
        .await
        .with_context(|| format!("failed to write {}", staging.display()))?;
    fs::rename(&staging, path)
        .await
        .with_context(|| format!("failed to move output into {}", path.display()))?;
    Ok(())
}
