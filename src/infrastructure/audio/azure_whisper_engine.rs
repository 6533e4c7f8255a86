use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::domain::{NormalizedAudioAsset, TranscriptionResult};

use super::transcription_http::{audio_part, read_transcript, request_error};

/// Whisper served from an Azure OpenAI deployment.
pub struct AzureWhisperEngine {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl AzureWhisperEngine {
    pub fn new(
        base_url: &str,
        deployment: &str,
        api_key: &str,
        api_version: &str,
        timeout: Duration,
    ) -> Result<Self, TranscriptionError> {
        let endpoint = format!(
            "{}/openai/deployments/{}/audio/transcriptions?api-version={}",
            base_url.trim_end_matches('/'),
            deployment,
            api_version,
        );
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranscriptionError::InvalidRequest(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            endpoint,
            api_key: api_key.to_string(),
        })
    }
}

const RESPONSE_FORMAT: &str = "json";

#[async_trait]
impl TranscriptionEngine for AzureWhisperEngine {
    async fn transcribe(
        &self,
        audio: &NormalizedAudioAsset,
        language_hint: Option<&str>,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let mut form = multipart::Form::new()
            .part("file", audio_part(audio).await?)
            .text("response_format", RESPONSE_FORMAT);
        if let Some(language) = language_hint {
            form = form.text("language", language.to_string());
        }

        tracing::debug!(endpoint = %self.endpoint, "Sending audio to Azure OpenAI Whisper");

        let response = self
            .client
            .post(&self.endpoint)
            .header("api-key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(request_error)?;

        let result = read_transcript(response, RESPONSE_FORMAT, language_hint).await?;

        tracing::info!(
            chars = result.text.len(),
            "Azure OpenAI Whisper transcription completed"
        );

        Ok(result)
    }
}
