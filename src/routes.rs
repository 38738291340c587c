use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::path::PathBuf;
use tower_http::services::{ServeDir, ServeFile};

use crate::chat::{process_agent_request, process_chat_request, ChatForm};
use crate::error::ApiError;
use crate::session::SessionId;
use crate::state::AppState;

pub fn create_routes(state: AppState) -> Router<AppState> {
    let static_dir = PathBuf::from(&state.config.system.static_dir);

    Router::new()
        // Frontend
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&static_dir))

        .route("/api/health", get(health_check))
        .route("/api/tasks", get(list_tasks))

        .route("/api/chat", post(chat))
        .route("/api/agent", post(agent))
        .route("/api/history", get(get_history).delete(clear_history))
        // Uploads are forwarded as-is, whatever their size
        .layer(DefaultBodyLimit::disable())
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model_configured": state.gateway.is_some()
    }))
}

async fn list_tasks(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "tasks": state.registry.task_ids() }))
}

async fn chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    ChatForm(raw): ChatForm,
) -> Result<Response, ApiError> {
    let session = SessionId::from_headers(&headers, state.cookie_name());
    let (reply, history) = process_chat_request(&state, &session.id, raw).await?;
    Ok(with_session_cookie(
        &state,
        &session,
        Json(json!({ "reply": reply, "history": history })),
    ))
}

async fn agent(State(state): State<AppState>, ChatForm(raw): ChatForm) -> Result<Json<Value>, ApiError> {
    let reply = process_agent_request(&state, raw).await?;
    Ok(Json(json!({ "reply": reply })))
}

async fn get_history(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let session = SessionId::from_headers(&headers, state.cookie_name());
    let history = state.history.get(&session.id).await.map_err(ApiError::Storage)?;
    Ok(with_session_cookie(&state, &session, Json(json!({ "history": history }))))
}

async fn clear_history(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, ApiError> {
    let session = SessionId::from_headers(&headers, state.cookie_name());
    state.history.clear(&session.id).await.map_err(ApiError::Storage)?;
    Ok(with_session_cookie(&state, &session, Json(json!({ "history": [] }))))
}

fn with_session_cookie(state: &AppState, session: &SessionId, body: Json<Value>) -> Response {
    let mut response = body.into_response();
    if let Some((name, value)) = session.set_cookie_header(state.cookie_name()) {
        response.headers_mut().insert(name, value);
    }
    response
}
