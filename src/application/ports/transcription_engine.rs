use std::io;

use async_trait::async_trait;

use crate::domain::{NormalizedAudioAsset, TranscriptionResult};

#[async_trait]
pub trait TranscriptionEngine: Send + Sync {
    async fn transcribe(
        &self,
        audio: &NormalizedAudioAsset,
        language_hint: Option<&str>,
    ) -> Result<TranscriptionResult, TranscriptionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TranscriptionError {
    #[error("invalid transcription request: {0}")]
    InvalidRequest(String),
    #[error("transcription request failed: {0}")]
    Request(String),
    #[error("transcription request timed out")]
    TimedOut,
    #[error("transcription service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("transcription response has no transcript: {body}")]
    MissingTranscript { body: String },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl TranscriptionError {
    /// Raw body returned by the provider, kept for diagnostics.
    pub fn provider_payload(&self) -> Option<&str> {
        match self {
            Self::Status { body, .. } | Self::MissingTranscript { body } => Some(body),
            _ => None,
        }
    }
}
