use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::application::ports::{TranslationError, Translator};

pub fn translation_instruction(target_language: &str) -> String {
    format!(
        "Translate the following text to {}. Maintain all technical terms and proper nouns \
         exactly as they are. Respond only with the translated text, do not add any additional \
         commentary or formatting.",
        target_language
    )
}

/// Translates through an OpenAI-compatible chat completions endpoint.
pub struct OpenAiTranslator {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

impl OpenAiTranslator {
    pub const DEFAULT_MODEL: &'static str = "gpt-4o";

    pub fn new(
        api_key: String,
        base_url: &str,
        model: Option<String>,
        timeout: Duration,
    ) -> Result<Self, TranslationError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TranslationError::Request(format!("http client: {}", e)))?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.unwrap_or_else(|| Self::DEFAULT_MODEL.to_string()),
            temperature: 0.0,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

#[async_trait]
impl Translator for OpenAiTranslator {
    async fn translate(
        &self,
        text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "system",
                    "content": translation_instruction(target_language)
                },
                {
                    "role": "user",
                    "content": text
                }
            ],
            "temperature": self.temperature,
            "stream": false
        });

        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(model = %self.model, target_language, "Sending translation request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::TimedOut
                } else {
                    TranslationError::Request(e.to_string())
                }
            })?;

        let status = response.status();
        let raw = response
            .text()
            .await
            .map_err(|e| TranslationError::Request(format!("body: {}", e)))?;

        if !status.is_success() {
            return Err(TranslationError::Status {
                status: status.as_u16(),
                body: raw,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&raw)
            .map_err(|e| TranslationError::InvalidResponse(format!("{}: {}", e, raw)))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| TranslationError::InvalidResponse(raw.clone()))?;

        tracing::info!(chars = content.len(), "Translation completed");

        Ok(content)
    }
}
