use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::{TranscriptionEngine, TranscriptionError};
use crate::presentation::config::{OpenAiSettings, TranscriptionProvider, TranscriptionSettings};

use super::azure_whisper_engine::AzureWhisperEngine;
use super::openai_whisper_engine::OpenAiWhisperEngine;

pub struct TranscriptionEngineFactory;

impl TranscriptionEngineFactory {
    pub fn create(
        settings: &TranscriptionSettings,
        openai: &OpenAiSettings,
    ) -> Result<Arc<dyn TranscriptionEngine>, TranscriptionError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        match settings.provider {
            TranscriptionProvider::OpenAi => {
                let engine = OpenAiWhisperEngine::new(
                    openai.api_key.clone(),
                    Some(openai.base_url.clone()),
                    Some(settings.model.clone()),
                    timeout,
                )?
                .with_response_format(settings.response_format.clone());
                Ok(Arc::new(engine))
            }
            TranscriptionProvider::Azure => {
                let azure = settings.azure.as_ref().ok_or_else(|| {
                    TranscriptionError::InvalidRequest(
                        "Azure settings required for the azure transcription provider".to_string(),
                    )
                })?;
                let api_key = azure.api_key.as_deref().unwrap_or(&openai.api_key);
                let engine = AzureWhisperEngine::new(
                    &azure.endpoint,
                    &azure.deployment,
                    api_key,
                    &azure.api_version,
                    timeout,
                )?;
                Ok(Arc::new(engine))
            }
        }
    }
}
