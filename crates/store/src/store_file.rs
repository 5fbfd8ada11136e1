//! JSON file-backed state store with atomic writes.

use std::path::{Path, PathBuf};

use {
    async_trait::async_trait,
    tokio::fs,
    tracing::{debug, warn},
};

use crate::{Error, Result, state::BotState, store::StateStore};

/// File-backed store. The whole state lives in a single JSON document.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Atomic write: copy the current file to `.bak`, write to temp, then
    /// rename over the target. The target path always holds a full document.
    async fn atomic_write(&self, state: &BotState) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");

        fs::write(&tmp, json.as_bytes()).await?;

        if fs::try_exists(&self.path).await? {
            let bak = self.path.with_extension("json.bak");
            if let Err(e) = fs::copy(&self.path, &bak).await {
                warn!(path = %bak.display(), error = %e, "failed to back up state file");
            }
        }

        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self) -> Result<BotState> {
        if !fs::try_exists(&self.path).await? {
            debug!(path = %self.path.display(), "state file missing, starting empty");
            return Ok(BotState::default());
        }
        let data = fs::read_to_string(&self.path).await?;
        serde_json::from_str(&data).map_err(|e| {
            Error::external(format!("failed to parse {}", self.path.display()), e)
        })
    }

    async fn save(&self, state: &BotState) -> Result<()> {
        self.atomic_write(state).await?;
        debug!(path = %self.path.display(), "state saved");
        Ok(())
    }
}
