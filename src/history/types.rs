use serde::{Deserialize, Serialize};

pub const DEFAULT_HISTORY_CAP: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Ai,
}

/// One entry of a conversation as stored in the session and returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>, task: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            task: Some(task.into()),
            lang: Some(lang.into()),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            role: Role::Ai,
            text: text.into(),
            task: None,
            lang: None,
        }
    }
}

/// Chronological, capped list of turns for one session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConversationHistory {
    turns: Vec<ConversationTurn>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Append a user turn and its reply as one update, then keep only the
    /// most recent `cap` turns.
    pub fn record_exchange(&mut self, user: ConversationTurn, ai: ConversationTurn, cap: usize) {
        self.turns.push(user);
        self.turns.push(ai);
        self.truncate_front(cap);
    }

    fn truncate_front(&mut self, cap: usize) {
        if self.turns.len() > cap {
            let excess = self.turns.len() - cap;
            self.turns.drain(..excess);
        }
    }
}
