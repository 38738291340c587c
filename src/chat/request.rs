use async_trait::async_trait;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::Json;
use serde::Deserialize;
use tracing::debug;

use crate::error::ApiError;
use super::validator::ValidationError;

const DEFAULT_ATTACHMENT_TYPE: &str = "application/octet-stream";

/// Binary blob uploaded alongside a request; consumed once, never stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: Option<String>,
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Chat request exactly as received, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawChatRequest {
    #[serde(default, alias = "message")]
    pub text: Option<String>,
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default, alias = "language")]
    pub lang: Option<String>,
    #[serde(skip)]
    pub attachments: Vec<Attachment>,
}

/// Extracts a [`RawChatRequest`] from either a JSON or a multipart body
#[derive(Debug)]
pub struct ChatForm(pub RawChatRequest);

#[async_trait]
impl<S> FromRequest<S> for ChatForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_ascii_lowercase();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
            Ok(ChatForm(read_multipart(multipart).await?))
        } else if content_type.starts_with("application/json") {
            let Json(raw) = Json::<RawChatRequest>::from_request(req, state)
                .await
                .map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
            Ok(ChatForm(raw))
        } else {
            Err(ValidationError::UnsupportedContentType(content_type).into())
        }
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<RawChatRequest, ValidationError> {
    let mut raw = RawChatRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ValidationError::MalformedBody(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files" | "files[]" | "file" => {
                let file_name = field.file_name().map(str::to_string);
                let mime_type = field
                    .content_type()
                    .filter(|ct| !ct.is_empty())
                    .unwrap_or(DEFAULT_ATTACHMENT_TYPE)
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
                if data.is_empty() && file_name.as_deref().unwrap_or_default().is_empty() {
                    // browsers send an empty part for an untouched file input
                    continue;
                }
                raw.attachments.push(Attachment {
                    file_name,
                    mime_type,
                    data: data.to_vec(),
                });
            }
            "text" | "message" | "task" | "lang" | "language" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ValidationError::MalformedBody(e.body_text()))?;
                match name.as_str() {
                    "text" | "message" => raw.text = Some(value),
                    "task" => raw.task = Some(value),
                    _ => raw.lang = Some(value),
                }
            }
            other => debug!("Ignoring multipart field: {}", other),
        }
    }

    Ok(raw)
}
