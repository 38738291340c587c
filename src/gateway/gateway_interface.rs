use async_trait::async_trait;
use thiserror::Error;

/// One unit of a multi-part generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPart {
    Text(String),
    /// Raw attachment bytes with their declared media type
    Binary { mime_type: String, data: Vec<u8> },
}

impl PayloadPart {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PayloadPart::Text(text) => Some(text),
            PayloadPart::Binary { .. } => None,
        }
    }
}

/// Classified failure of a call to the generative-model API
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("model request timed out")]
    Timeout,

    #[error("model API rejected the credential: {0}")]
    Auth(String),

    #[error("model API quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("model API rejected the payload: {0}")]
    Malformed(String),

    #[error("network failure talking to model API: {0}")]
    Network(String),

    #[error("model API returned no text")]
    EmptyResponse,

    #[error("model API error (status {status:?}): {message}")]
    Unknown { status: Option<u16>, message: String },
}

impl GatewayError {
    /// Short stable label for logs
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Timeout => "timeout",
            GatewayError::Auth(_) => "auth",
            GatewayError::QuotaExceeded(_) => "quota_exceeded",
            GatewayError::Malformed(_) => "malformed",
            GatewayError::Network(_) => "network",
            GatewayError::EmptyResponse => "empty_response",
            GatewayError::Unknown { .. } => "unknown",
        }
    }
}

/// Boundary to the external generative-model API.
/// Implementations are stateless; each call is one generation request.
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Send the ordered payload parts and return the reply text verbatim
    async fn generate(&self, parts: &[PayloadPart]) -> Result<String, GatewayError>;
}
