use async_trait::async_trait;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_language: &str)
    -> Result<String, TranslationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranslationError {
    #[error("translation request failed: {0}")]
    Request(String),
    #[error("translation request timed out")]
    TimedOut,
    #[error("translation service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("invalid translation response: {0}")]
    InvalidResponse(String),
}

impl TranslationError {
    pub fn provider_payload(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::InvalidResponse(body) => Some(body),
            _ => None,
        }
    }
}
