use thiserror::Error;

use crate::tasks::{PromptTemplate, TaskRegistry};
use super::request::{Attachment, RawChatRequest};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: task")]
    MissingTask,

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("Missing required field: text")]
    MissingMessage,

    #[error("Message must not be empty")]
    EmptyMessage,

    #[error("Missing required field: lang")]
    MissingLanguage,

    #[error("Unsupported content type: {0:?}")]
    UnsupportedContentType(String),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// A request that passed validation, ready for composition
#[derive(Debug, Clone)]
pub struct ValidRequest {
    pub task: String,
    pub template: PromptTemplate,
    /// Trimmed user text
    pub message: String,
    /// Empty when the task's template takes no language
    pub language: String,
    pub attachments: Vec<Attachment>,
}

/// Check a raw request against the registry. Stateless; nothing is retained.
pub fn validate(raw: RawChatRequest, registry: &TaskRegistry) -> Result<ValidRequest, ValidationError> {
    let task = raw
        .task
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(ValidationError::MissingTask)?;

    let template = registry
        .lookup(&task)
        .cloned()
        .ok_or_else(|| ValidationError::UnknownTask(task.clone()))?;

    let message = raw.text.ok_or(ValidationError::MissingMessage)?;
    let message = message.trim().to_string();
    if message.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }

    let language = raw.lang.map(|l| l.trim().to_string()).unwrap_or_default();
    if language.is_empty() && template.requires_language() {
        return Err(ValidationError::MissingLanguage);
    }

    Ok(ValidRequest {
        task,
        template,
        message,
        language,
        attachments: raw.attachments,
    })
}
