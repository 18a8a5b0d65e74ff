use std::cell::{Cell, RefCell};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::domain::PersistedConfig;

use super::SettingsStore;

/// Store kept in memory, counting writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: RefCell<Option<String>>,
    pub saves: Cell<usize>,
    pub fail_reads: Cell<bool>,
    pub fail_writes: Cell<bool>,
}

impl MemoryStore {
    pub fn with_raw(raw: &str) -> Self {
        let store = Self::default();
        store.raw.replace(Some(raw.to_string()));
        store
    }

    pub fn stored(&self) -> Option<PersistedConfig> {
        self.raw
            .borrow()
            .as_deref()
            .and_then(|raw| PersistedConfig::from_stored(raw).ok())
    }
}

#[async_trait(?Send)]
impl SettingsStore for MemoryStore {
    async fn load(&self) -> Result<Option<PersistedConfig>> {
        if self.fail_reads.get() {
            return Err(anyhow!("storage unavailable"));
        }
        Ok(self.stored())
    }

    async fn save(&self, config: &PersistedConfig) -> Result<()> {
        if self.fail_writes.get() {
            return Err(anyhow!("storage unavailable"));
        }
        self.raw.replace(Some(config.to_stored()?));
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
