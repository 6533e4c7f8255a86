use std::io;
use std::path::Path;
use std::sync::Arc;

use axum::Json;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::TryStreamExt;
use serde::Serialize;
use tracing::Instrument;

use crate::application::services::PipelineRequest;
use crate::domain::{AudioFormat, JobId, JobResult, RawAudioAsset, SessionKey};
use crate::infrastructure::storage::SpoolError;
use crate::presentation::state::AppState;

use super::error::ApiError;

pub const AUDIO_FIELD: &str = "audio";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub job_id: String,
    pub transcript: String,
    pub translation: String,
    pub target_language: String,
    pub degraded: bool,
}

impl From<JobResult> for UploadResponse {
    fn from(result: JobResult) -> Self {
        Self {
            job_id: result.job_id.to_string(),
            transcript: result.transcript,
            translation: result.translation,
            target_language: result.target_language,
            degraded: result.degraded,
        }
    }
}

#[derive(Default)]
struct UploadForm {
    asset: Option<RawAudioAsset>,
    language: Option<String>,
    target_language: Option<String>,
    session_id: Option<String>,
}

/// Declared types accepted at the door. `application/octet-stream` only
/// passes when the file name reveals a known audio format.
pub fn is_acceptable_upload(mime: &str, format: Option<AudioFormat>) -> bool {
    let essence = mime
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    if essence.starts_with("audio/") {
        return true;
    }
    match essence.as_str() {
        "video/webm" | "video/mp4" | "video/mpeg" => true,
        "application/octet-stream" => format.is_some(),
        _ => false,
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let job_id = JobId::new();
    let mut form = UploadForm::default();

    if let Err(rejection) = read_form(&state, &job_id, &mut multipart, &mut form).await {
        if let Some(asset) = form.asset.take() {
            state.spool.discard(&asset.path).await;
        }
        return rejection.into_response();
    }

    let Some(asset) = form.asset else {
        tracing::warn!("Upload request with no audio file");
        return ApiError::bad_request("No audio file uploaded").into_response();
    };

    let request = PipelineRequest {
        job_id,
        asset,
        language_hint: form.language,
        target_language: form
            .target_language
            .unwrap_or_else(|| state.default_target_language.clone()),
        session: SessionKey::from_optional(form.session_id.as_deref()),
    };

    // The job keeps running even if the uploader disconnects, so the
    // result can still reach the session's listener.
    let pipeline = Arc::clone(&state.pipeline);
    let job = tokio::spawn(async move { pipeline.process(request).await }.in_current_span());

    match job.await {
        Ok(Ok(result)) => (StatusCode::OK, Json(UploadResponse::from(result))).into_response(),
        Ok(Err(e)) => ApiError::from_pipeline(&e, state.expose_provider_errors).into_response(),
        Err(e) => {
            tracing::error!(error = %e, job_id = %job_id, "Job task aborted");
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Job aborted unexpectedly")
                .into_response()
        }
    }
}

async fn read_form(
    state: &AppState,
    job_id: &JobId,
    multipart: &mut Multipart,
    form: &mut UploadForm,
) -> Result<(), ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_rejection("Failed to read multipart", e))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            AUDIO_FIELD => {
                if form.asset.is_some() {
                    return Err(ApiError::bad_request("Only one audio file per upload"));
                }
                form.asset = Some(spool_audio(state, job_id, field).await?);
            }
            "language" => form.language = text_value(field).await?,
            "target_language" => form.target_language = text_value(field).await?,
            "session_id" => form.session_id = text_value(field).await?,
            other => tracing::debug!(field = %other, "Ignoring unknown multipart field"),
        }
    }
    Ok(())
}

async fn spool_audio(
    state: &AppState,
    job_id: &JobId,
    field: Field<'_>,
) -> Result<RawAudioAsset, ApiError> {
    let file_name = field.file_name().map(str::to_string);
    let mime = field
        .content_type()
        .unwrap_or("application/octet-stream")
        .to_string();

    let format = file_name
        .as_deref()
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .and_then(AudioFormat::from_extension)
        .or_else(|| AudioFormat::from_mime(&mime));

    if !is_acceptable_upload(&mime, format) {
        tracing::warn!(content_type = %mime, "Unsupported content type");
        return Err(ApiError::new(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            format!("Unsupported content type: {}", mime),
        ));
    }

    tracing::debug!(
        filename = file_name.as_deref().unwrap_or("unknown"),
        content_type = %mime,
        format = ?format,
        "Receiving audio upload"
    );

    let path = state.spool.path_for(job_id, format);
    let stream = field.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            io::Error::new(io::ErrorKind::FileTooLarge, e.body_text())
        } else {
            io::Error::other(e)
        }
    });

    state
        .spool
        .persist(path, &mime, stream)
        .await
        .map_err(|e| match e {
            SpoolError::Interrupted(ref source) if source.kind() == io::ErrorKind::FileTooLarge => {
                tracing::warn!(max_bytes = state.max_upload_bytes, "Upload exceeds size limit");
                ApiError::new(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    format!("Audio upload exceeds {} bytes", state.max_upload_bytes),
                )
            }
            SpoolError::Interrupted(_) => {
                ApiError::bad_request(format!("Failed to read audio upload: {}", e))
            }
            SpoolError::Io(_) => {
                tracing::error!(error = %e, "Failed to store upload");
                ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to store upload")
            }
        })
}

async fn text_value(field: Field<'_>) -> Result<Option<String>, ApiError> {
    let value = field
        .text()
        .await
        .map_err(|e| multipart_rejection("Failed to read form field", e))?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Keeps the status axum assigns, so an oversized body surfaces as 413.
fn multipart_rejection(context: &str, e: MultipartError) -> ApiError {
    ApiError::new(e.status(), format!("{}: {}", context, e.body_text()))
}
