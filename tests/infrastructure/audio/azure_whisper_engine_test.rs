use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::{Multipart, RawQuery, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;

use vaakya::application::ports::{TranscriptionEngine, TranscriptionError};
use vaakya::domain::{AudioFormat, NormalizedAudioAsset};
use vaakya::infrastructure::audio::AzureWhisperEngine;

use crate::support::start_mock_server;

#[derive(Debug, Default, Clone)]
struct CapturedRequest {
    api_key: Option<String>,
    query: Option<String>,
    file_name: Option<String>,
    response_format: Option<String>,
}

type Captured = Arc<Mutex<Option<CapturedRequest>>>;

async fn start_mock_azure_server(
    response_status: u16,
    response_body: &'static str,
) -> (String, tokio::sync::oneshot::Sender<()>, Captured) {
    let captured: Captured = Arc::new(Mutex::new(None));

    let app = Router::new()
        .route(
            "/openai/deployments/my-deployment/audio/transcriptions",
            post(
                move |State(captured): State<Captured>,
                      RawQuery(query): RawQuery,
                      headers: HeaderMap,
                      mut multipart: Multipart| async move {
                    let mut request = CapturedRequest {
                        api_key: headers
                            .get("api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(str::to_string),
                        query,
                        ..Default::default()
                    };
                    while let Some(field) = multipart.next_field().await.unwrap() {
                        let name = field.name().unwrap_or_default().to_string();
                        match name.as_str() {
                            "file" => {
                                request.file_name = field.file_name().map(str::to_string);
                                field.bytes().await.unwrap();
                            }
                            "response_format" => {
                                request.response_format = Some(field.text().await.unwrap());
                            }
                            _ => {
                                field.bytes().await.unwrap();
                            }
                        }
                    }
                    *captured.lock().unwrap() = Some(request);

                    let status = StatusCode::from_u16(response_status).unwrap();
                    (
                        status,
                        [(header::CONTENT_TYPE, "application/json")],
                        response_body,
                    )
                        .into_response()
                },
            ),
        )
        .with_state(Arc::clone(&captured));

    let (base_url, shutdown_tx) = start_mock_server(app).await;
    (base_url, shutdown_tx, captured)
}

fn mp3_asset(dir: &Path) -> NormalizedAudioAsset {
    let path = dir.join("clip.mp3");
    std::fs::write(&path, [0xffu8; 2048]).unwrap();
    NormalizedAudioAsset {
        path,
        format: AudioFormat::Mp3,
        content_type: "audio/mpeg",
        codec: None,
        sample_rate_hz: None,
        channels: None,
        size_bytes: 2048,
        converted: false,
    }
}

fn engine(base_url: &str) -> AzureWhisperEngine {
    AzureWhisperEngine::new(
        base_url,
        "my-deployment",
        "test-key",
        "2024-02-01",
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn given_valid_audio_when_azure_transcribes_then_returns_text_with_api_key_header() {
    let (base_url, shutdown_tx, captured) =
        start_mock_azure_server(200, r#"{"text": "Hello from Azure Whisper"}"#).await;
    let dir = tempfile::tempdir().unwrap();

    let result = engine(&base_url)
        .transcribe(&mp3_asset(dir.path()), None)
        .await
        .unwrap();

    assert_eq!(result.text, "Hello from Azure Whisper");
    let request = captured.lock().unwrap().clone().unwrap();
    assert_eq!(request.api_key.as_deref(), Some("test-key"));
    assert_eq!(request.query.as_deref(), Some("api-version=2024-02-01"));
    assert_eq!(request.file_name.as_deref(), Some("clip.mp3"));
    assert_eq!(request.response_format.as_deref(), Some("json"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_api_returns_error_status_when_transcribing_then_returns_status_error() {
    let body = r#"{"error": {"code": "InvalidRequest", "message": "bad audio"}}"#;
    let (base_url, shutdown_tx, _) = start_mock_azure_server(400, body).await;
    let dir = tempfile::tempdir().unwrap();

    let err = engine(&base_url)
        .transcribe(&mp3_asset(dir.path()), None)
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptionError::Status { status: 400, .. }));
    assert_eq!(err.provider_payload(), Some(body));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_api_returns_empty_text_when_transcribing_then_returns_empty_string() {
    let (base_url, shutdown_tx, _) = start_mock_azure_server(200, r#"{"text": ""}"#).await;
    let dir = tempfile::tempdir().unwrap();

    let result = engine(&base_url)
        .transcribe(&mp3_asset(dir.path()), None)
        .await
        .unwrap();

    assert_eq!(result.text, "");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_api_returns_null_text_when_transcribing_then_missing_transcript() {
    let (base_url, shutdown_tx, _) = start_mock_azure_server(200, r#"{"text": null}"#).await;
    let dir = tempfile::tempdir().unwrap();

    let result = engine(&base_url)
        .transcribe(&mp3_asset(dir.path()), None)
        .await;

    assert!(matches!(
        result,
        Err(TranscriptionError::MissingTranscript { .. })
    ));
    shutdown_tx.send(()).ok();
}
