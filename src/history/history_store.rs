use anyhow::Result;
use async_trait::async_trait;

use super::types::ConversationHistory;

/// Session-scoped persistence of conversation history.
///
/// The store only loads and saves whole histories; appending and truncation
/// happen on [`ConversationHistory`]. Concurrent requests for the same
/// session are not serialized, so the last `put` wins.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// History for `session_id`, empty if the session has none yet
    async fn get(&self, session_id: &str) -> Result<ConversationHistory>;

    async fn put(&self, session_id: &str, history: &ConversationHistory) -> Result<()>;

    async fn clear(&self, session_id: &str) -> Result<()>;
}
