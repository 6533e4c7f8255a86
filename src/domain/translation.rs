use serde::Serialize;

use super::JobId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationResult {
    pub text: String,
    pub target_language: String,
    /// Set when translation failed and the transcript was passed through.
    pub degraded: bool,
}

impl TranslationResult {
    pub fn translated(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_language: target_language.into(),
            degraded: false,
        }
    }

    pub fn passthrough(transcript: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: transcript.into(),
            target_language: target_language.into(),
            degraded: true,
        }
    }
}

/// Final outcome of a delivered job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    #[serde(serialize_with = "serialize_job_id")]
    pub job_id: JobId,
    pub transcript: String,
    pub translation: String,
    pub target_language: String,
    pub degraded: bool,
}

fn serialize_job_id<S: serde::Serializer>(id: &JobId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(id)
}
