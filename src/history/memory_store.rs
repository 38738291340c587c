use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;

use super::history_store::HistoryStore;
use super::types::ConversationHistory;

/// Process-local store; histories are lost on restart
#[derive(Default)]
pub struct MemoryHistoryStore {
    sessions: DashMap<String, ConversationHistory>,
}

impl MemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HistoryStore for MemoryHistoryStore {
    async fn get(&self, session_id: &str) -> Result<ConversationHistory> {
        Ok(self
            .sessions
            .get(session_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }

    async fn put(&self, session_id: &str, history: &ConversationHistory) -> Result<()> {
        self.sessions.insert(session_id.to_string(), history.clone());
        Ok(())
    }

    async fn clear(&self, session_id: &str) -> Result<()> {
        self.sessions.remove(session_id);
        Ok(())
    }
}
