use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::history_store::HistoryStore;
use super::types::ConversationHistory;

/// One JSON file per session under a base directory
pub struct FileHistoryStore {
    base_dir: PathBuf,
    safe_id: Regex,
}

impl FileHistoryStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            safe_id: Regex::new(r"^[A-Za-z0-9_-]{1,128}$")?,
        })
    }

    fn session_path(&self, session_id: &str) -> Result<PathBuf> {
        let file_name = Path::new(session_id)
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid session id: {}", session_id))?;

        if file_name != session_id || !self.safe_id.is_match(file_name) {
            return Err(anyhow::anyhow!("Invalid characters in session id: {}", session_id));
        }

        let full_path = self.base_dir.join(format!("{}.json", file_name));
        if !full_path.starts_with(&self.base_dir) {
            return Err(anyhow::anyhow!("Invalid path: Path traversal detected"));
        }
        Ok(full_path)
    }
}

#[async_trait]
impl HistoryStore for FileHistoryStore {
    async fn get(&self, session_id: &str) -> Result<ConversationHistory> {
        let path = self.session_path(session_id)?;
        if !fs::try_exists(&path).await? {
            return Ok(ConversationHistory::new());
        }
        let content = fs::read_to_string(&path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn put(&self, session_id: &str, history: &ConversationHistory) -> Result<()> {
        let path = self.session_path(session_id)?;
        // Readers only ever see a complete file: write aside, then rename over
        let tmp_path = self
            .base_dir
            .join(format!(".{}.{}.tmp", session_id, uuid::Uuid::new_v4()));
        fs::write(&tmp_path, serde_json::to_string_pretty(history)?).await?;
        if let Err(err) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(err.into());
        }
        tracing::debug!("Saved {} turn(s) to {:?}", history.len(), path);
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<()> {
        let path = self.session_path(session_id)?;
        if fs::try_exists(&path).await? {
            fs::remove_file(&path).await?;
            tracing::debug!("Deleted session file: {:?}", path);
        }
        Ok(())
    }
}
