use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{NormalizedAudioAsset, TranscriptionResult};

use super::transcription_http::{audio_part, read_transcript, request_error};

pub struct OpenAiWhisperEngine {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    response_format: String,
}

impl OpenAiWhisperEngine {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";
    pub const DEFAULT_MODEL: &'static str = "whisper-1";

    pub fn new(
        api_key: String,
        base_url: Option<String>,
        model: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TranscriptionError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranscriptionError::InvalidRequest(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url
                .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            response_format: "json".to_string(),
        })
    }

    pub fn with_response_format(mut self, response_format: impl Into<String>) -> Self {
        self.response_format = response_format.into();
        self
    }
}

#[async_trait]
impl TranscriptionEngine for OpenAiWhisperEngine {
    async fn transcribe(
        &self,
        audio: &NormalizedAudioAsset,
        language_hint: Option<&str>,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let url = format!("{}/audio/transcriptions", self.base_url);

        let mut form = multipart::Form::new()
            .part("file", audio_part(audio).await?)
            .text("model", self.model.clone())
            .text("response_format", self.response_format.clone());
        if let Some(language) = language_hint {
            form = form.text("language", language.to_string());
        }

        tracing::debug!(
            model = %self.model,
            content_type = audio.content_type,
            size_bytes = audio.size_bytes,
            "Sending audio to OpenAI Whisper API"
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(request_error)?;

        let result = read_transcript(response, &self.response_format, language_hint).await?;

        tracing::info!(
            chars = result.text.len(),
            "OpenAI Whisper transcription completed"
        );

        Ok(result)
    }
}
