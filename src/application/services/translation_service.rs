use std::sync::Arc;

use serde::Deserialize;

use crate::application::ports::{TranslationError, Translator};
use crate::domain::{TranscriptionResult, TranslationResult};
use crate::infrastructure::observability::sanitize_for_log;

use super::RetryPolicy;

/// What to do when the translation call fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranslationFailurePolicy {
    /// Hand back the transcript unchanged and mark the result degraded.
    #[default]
    FailSoft,
    /// Fail the job.
    FailHard,
}

pub struct TranslationService {
    translator: Arc<dyn Translator>,
    policy: TranslationFailurePolicy,
    retry: RetryPolicy,
}

impl TranslationService {
    pub fn new(translator: Arc<dyn Translator>, policy: TranslationFailurePolicy) -> Self {
        Self {
            translator,
            policy,
            retry: RetryPolicy::single_attempt(),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn policy(&self) -> TranslationFailurePolicy {
        self.policy
    }

    pub async fn translate(
        &self,
        transcript: &TranscriptionResult,
        target_language: &str,
    ) -> Result<TranslationResult, TranslationError> {
        if transcript.text.trim().is_empty() {
            tracing::debug!("Empty transcript, nothing to translate");
            return Ok(TranslationResult::translated(String::new(), target_language));
        }

        let translator = &self.translator;
        let text = transcript.text.as_str();
        let outcome = self
            .retry
            .run("translation", move || translator.translate(text, target_language))
            .await;

        match outcome {
            Ok(translated) => {
                tracing::debug!(
                    target_language,
                    translation = %sanitize_for_log(&translated),
                    "Transcript translated"
                );
                Ok(TranslationResult::translated(translated, target_language))
            }
            Err(e) => match self.policy {
                TranslationFailurePolicy::FailSoft => {
                    tracing::warn!(
                        error = %e,
                        target_language,
                        "Translation failed, passing transcript through"
                    );
                    Ok(TranslationResult::passthrough(
                        transcript.text.clone(),
                        target_language,
                    ))
                }
                TranslationFailurePolicy::FailHard => Err(e),
            },
        }
    }
}
