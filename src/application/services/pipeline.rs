use std::sync::Arc;

use tracing::Instrument;

use crate::application::ports::{
    ConversionError, TranscriptionEngine, TranscriptionError, TranslationError,
};
use crate::domain::{Job, JobId, JobResult, JobStage, RawAudioAsset, SessionKey};
use crate::infrastructure::observability::sanitize_for_log;

use super::{
    DeliveryChannel, DeliveryMessage, FormatNormalizer, JobAssets, RetryPolicy, TranslationService,
};

/// One accepted upload, ready to be processed.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    pub job_id: JobId,
    pub asset: RawAudioAsset,
    pub language_hint: Option<String>,
    pub target_language: String,
    pub session: SessionKey,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid upload: {0}")]
    Validation(String),
    #[error("audio conversion failed: {0}")]
    Conversion(#[from] ConversionError),
    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),
    #[error("translation failed: {0}")]
    Translation(#[from] TranslationError),
}

impl PipelineError {
    /// Stage the job was in when it failed.
    pub fn stage(&self) -> JobStage {
        match self {
            Self::Validation(_) => JobStage::Received,
            Self::Conversion(_) => JobStage::Normalizing,
            Self::Transcription(_) => JobStage::Transcribing,
            Self::Translation(_) => JobStage::Translating,
        }
    }

    pub fn provider_payload(&self) -> Option<&str> {
        match self {
            Self::Transcription(e) => e.provider_payload(),
            Self::Translation(e) => e.provider_payload(),
            Self::Conversion(ConversionError::ToolFailed { stderr, .. }) => Some(stderr),
            _ => None,
        }
    }
}

/// Runs normalize, transcribe, translate and deliver for each job, and
/// removes every file the job created once it finishes either way.
pub struct TranslationPipeline {
    normalizer: Arc<FormatNormalizer>,
    transcriber: Arc<dyn TranscriptionEngine>,
    translation: Arc<TranslationService>,
    delivery: Arc<DeliveryChannel>,
    transcription_retry: RetryPolicy,
}

impl TranslationPipeline {
    pub fn new(
        normalizer: Arc<FormatNormalizer>,
        transcriber: Arc<dyn TranscriptionEngine>,
        translation: Arc<TranslationService>,
        delivery: Arc<DeliveryChannel>,
    ) -> Self {
        Self {
            normalizer,
            transcriber,
            translation,
            delivery,
            transcription_retry: RetryPolicy::single_attempt(),
        }
    }

    pub fn with_transcription_retry(mut self, retry: RetryPolicy) -> Self {
        self.transcription_retry = retry;
        self
    }

    pub async fn process(&self, request: PipelineRequest) -> Result<JobResult, PipelineError> {
        let span = tracing::info_span!(
            "job",
            job_id = %request.job_id,
            session = %request.session,
        );
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: PipelineRequest) -> Result<JobResult, PipelineError> {
        let PipelineRequest {
            job_id,
            asset,
            language_hint,
            target_language,
            session,
        } = request;

        let mut job = Job::new(job_id, session, target_language, language_hint);
        let mut assets = JobAssets::new(job_id);
        assets.track(&asset.path);

        tracing::info!(
            size_bytes = asset.size_bytes,
            mime = %asset.declared_mime_type,
            target_language = %job.target_language,
            "Job received"
        );

        let outcome = self.run_stages(&mut job, &mut assets, &asset).await;

        match outcome {
            Ok(result) => {
                assets.cleanup().await;
                self.deliver(&job, &result);
                tracing::info!(degraded = result.degraded, "Job delivered");
                Ok(result)
            }
            Err(e) => {
                if let Err(transition) = job.fail(e.to_string()) {
                    tracing::error!(error = %transition, "Job state machine violated");
                }
                tracing::error!(stage = %e.stage(), error = %e, "Job failed");
                assets.cleanup().await;
                Err(e)
            }
        }
    }

    async fn run_stages(
        &self,
        job: &mut Job,
        assets: &mut JobAssets,
        asset: &RawAudioAsset,
    ) -> Result<JobResult, PipelineError> {
        if asset.is_empty() {
            return Err(PipelineError::Validation(
                "uploaded audio is empty".to_string(),
            ));
        }

        enter(job, JobStage::Normalizing);
        let normalized = self.normalizer.normalize(asset, assets).await?;

        enter(job, JobStage::Transcribing);
        let transcriber = &self.transcriber;
        let audio = &normalized;
        let hint = job.source_language_hint.as_deref();
        let transcript = self
            .transcription_retry
            .run("transcription", move || transcriber.transcribe(audio, hint))
            .await?;
        tracing::info!(
            chars = transcript.text.len(),
            transcript = %sanitize_for_log(&transcript.text),
            "Transcription completed"
        );

        enter(job, JobStage::Translating);
        let translation = self
            .translation
            .translate(&transcript, &job.target_language)
            .await?;

        enter(job, JobStage::Delivered);
        Ok(JobResult {
            job_id: job.id,
            transcript: transcript.text,
            translation: translation.text,
            target_language: translation.target_language,
            degraded: translation.degraded,
        })
    }

    fn deliver(&self, job: &Job, result: &JobResult) {
        let message = match serde_json::to_string(&DeliveryMessage::from(result)) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize delivery message");
                return;
            }
        };
        let delivered = self.delivery.push(&job.session, message);
        tracing::debug!(delivered, "Delivery push attempted");
    }
}

fn enter(job: &mut Job, next: JobStage) {
    match job.advance(next) {
        Ok(()) => tracing::debug!(stage = %next, "Job stage transition"),
        Err(e) => tracing::error!(error = %e, "Job state machine violated"),
    }
}
