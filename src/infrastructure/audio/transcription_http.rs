use reqwest::multipart;
use serde::Deserialize;

use crate::application::ports::TranscriptionError;
use crate::domain::{NormalizedAudioAsset, TranscriptionResult};

#[derive(Deserialize)]
struct TranscriptionBody {
    text: Option<String>,
    language: Option<String>,
}

/// Streams the audio file from disk as the `file` part. File name and
/// content type always come from the normalized asset.
pub(super) async fn audio_part(
    audio: &NormalizedAudioAsset,
) -> Result<multipart::Part, TranscriptionError> {
    let file = tokio::fs::File::open(&audio.path).await?;
    let length = file.metadata().await?.len();

    multipart::Part::stream_with_length(reqwest::Body::from(file), length)
        .file_name(audio.upload_file_name())
        .mime_str(audio.content_type)
        .map_err(|e| TranscriptionError::InvalidRequest(format!("mime: {}", e)))
}

pub(super) fn request_error(e: reqwest::Error) -> TranscriptionError {
    if e.is_timeout() {
        TranscriptionError::TimedOut
    } else {
        TranscriptionError::Request(e.to_string())
    }
}

fn is_plain_text_format(response_format: &str) -> bool {
    matches!(response_format, "text" | "srt" | "vtt")
}

/// Parses the body as a Whisper JSON object whatever its `Content-Type`.
/// Only the `text`/`srt`/`vtt` formats may fall back to the raw body.
pub(super) async fn read_transcript(
    response: reqwest::Response,
    response_format: &str,
    language_hint: Option<&str>,
) -> Result<TranscriptionResult, TranscriptionError> {
    let status = response.status();
    let body = response.text().await.map_err(request_error)?;

    if !status.is_success() {
        return Err(TranscriptionError::Status {
            status: status.as_u16(),
            body,
        });
    }

    match serde_json::from_str::<TranscriptionBody>(&body) {
        Ok(TranscriptionBody {
            text: Some(text),
            language,
        }) => Ok(TranscriptionResult::new(
            text.trim(),
            language.or_else(|| language_hint.map(str::to_string)),
        )),
        _ if is_plain_text_format(response_format) => Ok(TranscriptionResult::new(
            body.trim(),
            language_hint.map(str::to_string),
        )),
        _ => Err(TranscriptionError::MissingTranscript { body }),
    }
}
