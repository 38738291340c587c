use tracing::{debug, info};

use crate::error::ApiError;
use crate::history::{ConversationHistory, ConversationTurn};
use crate::state::AppState;
use super::composer::compose;
use super::request::RawChatRequest;
use super::validator::validate;

/// A completed request/reply round trip
#[derive(Debug, Clone)]
pub struct Exchange {
    pub task: String,
    pub message: String,
    pub language: String,
    pub reply: String,
}

/// Validate, compose and dispatch one request.
///
/// Validation runs before the configuration check so malformed requests are
/// always answered with 400, and nothing reaches the gateway unless valid.
pub async fn run_exchange(state: &AppState, raw: RawChatRequest) -> Result<Exchange, ApiError> {
    let valid = validate(raw, &state.registry)?;
    let gateway = state.gateway.as_ref().ok_or(ApiError::Configuration)?;

    for attachment in &valid.attachments {
        debug!(
            "Attachment {:?}: {} ({} bytes)",
            attachment.file_name.as_deref().unwrap_or("<unnamed>"),
            attachment.mime_type,
            attachment.data.len()
        );
    }
    let parts = compose(&valid.template, &valid.message, &valid.language, valid.attachments);
    debug!(
        "Dispatching task '{}' ({} payload part(s), lang={:?})",
        valid.task,
        parts.len(),
        valid.language
    );

    let reply = gateway.generate(&parts).await?;

    Ok(Exchange {
        task: valid.task,
        message: valid.message,
        language: valid.language,
        reply,
    })
}

/// Stateless variant: reply only, no history
pub async fn process_agent_request(state: &AppState, raw: RawChatRequest) -> Result<String, ApiError> {
    let exchange = run_exchange(state, raw).await?;
    Ok(exchange.reply)
}

/// History-keeping variant: on success the session gains a user turn and an
/// AI turn, truncated to the configured cap. Failed exchanges leave the
/// history untouched.
pub async fn process_chat_request(
    state: &AppState,
    session_id: &str,
    raw: RawChatRequest,
) -> Result<(String, ConversationHistory), ApiError> {
    let exchange = run_exchange(state, raw).await?;

    let mut history = state
        .history
        .get(session_id)
        .await
        .map_err(ApiError::Storage)?;
    history.record_exchange(
        ConversationTurn::user(&exchange.message, &exchange.task, &exchange.language),
        ConversationTurn::ai(&exchange.reply),
        state.history_cap(),
    );
    state
        .history
        .put(session_id, &history)
        .await
        .map_err(ApiError::Storage)?;

    info!("Session {}: history now {} turn(s)", session_id, history.len());
    Ok((exchange.reply, history))
}
