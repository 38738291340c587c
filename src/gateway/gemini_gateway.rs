use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use super::gateway_interface::{GatewayError, ModelGateway, PayloadPart};

const API_KEY_HEADER: &str = "x-goog-api-key";

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Gemini `generateContent` REST implementation
pub struct GeminiGateway {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiGateway {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        timeout: Option<Duration>,
    ) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        info!("Initialized GeminiGateway: model={}, base_url={}", model, base_url);
        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl ModelGateway for GeminiGateway {
    async fn generate(&self, parts: &[PayloadPart]) -> Result<String, GatewayError> {
        let body = build_request(parts);
        debug!("Gemini request: {} part(s) to {}", parts.len(), self.endpoint());

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body_text));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| GatewayError::Malformed(format!("unreadable response: {}", err.without_url())))?;

        extract_text(parsed)
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

fn build_request(parts: &[PayloadPart]) -> GenerateContentRequest {
    let parts = parts
        .iter()
        .map(|part| match part {
            PayloadPart::Text(text) => Part::Text { text: text.clone() },
            PayloadPart::Binary { mime_type, data } => Part::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: BASE64_STANDARD.encode(data),
                },
            },
        })
        .collect();

    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
    }
}

fn extract_text(response: GenerateContentResponse) -> Result<String, GatewayError> {
    let text: String = response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(GatewayError::EmptyResponse);
    }
    Ok(text)
}

fn provider_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| {
            let message = envelope.error.message.unwrap_or_default();
            match envelope.error.status {
                Some(status) if !status.is_empty() => format!("{status}: {message}"),
                _ => message,
            }
        })
        .unwrap_or_else(|| body.to_string())
}

fn classify_status(status: StatusCode, body: &str) -> GatewayError {
    let message = provider_message(body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Auth(message),
        StatusCode::TOO_MANY_REQUESTS => GatewayError::QuotaExceeded(message),
        StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => GatewayError::Malformed(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => GatewayError::Timeout,
        _ => GatewayError::Unknown {
            status: Some(status.as_u16()),
            message,
        },
    }
}

fn classify_transport_error(err: reqwest::Error) -> GatewayError {
    // URLs stay out of error text; they end up in logs
    let err = err.without_url();
    if err.is_timeout() {
        GatewayError::Timeout
    } else if err.is_connect() || err.is_request() {
        GatewayError::Network(err.to_string())
    } else {
        GatewayError::Unknown {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}
