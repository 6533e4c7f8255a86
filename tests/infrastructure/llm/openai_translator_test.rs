use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use vaakya::application::ports::{TranslationError, Translator};
use vaakya::infrastructure::llm::{OpenAiTranslator, translation_instruction};

use crate::support::start_mock_server;

type Captured = Arc<Mutex<Option<(Option<String>, serde_json::Value)>>>;

async fn start_mock_chat_server(
    status: u16,
    body: &'static str,
) -> (String, tokio::sync::oneshot::Sender<()>, Captured) {
    let captured: Captured = Arc::new(Mutex::new(None));

    let app = Router::new()
        .route(
            "/v1/chat/completions",
            post(
                move |State(captured): State<Captured>,
                      headers: HeaderMap,
                      Json(request): Json<serde_json::Value>| async move {
                    let auth = headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string);
                    *captured.lock().unwrap() = Some((auth, request));
                    (
                        StatusCode::from_u16(status).unwrap(),
                        [(header::CONTENT_TYPE, "application/json")],
                        body,
                    )
                        .into_response()
                },
            ),
        )
        .with_state(Arc::clone(&captured));

    let (base_url, shutdown_tx) = start_mock_server(app).await;
    (format!("{}/v1", base_url), shutdown_tx, captured)
}

fn translator(base_url: &str) -> OpenAiTranslator {
    OpenAiTranslator::new(
        "test-key".to_string(),
        base_url,
        None,
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn given_completion_when_translating_then_returns_trimmed_content() {
    let (base_url, shutdown_tx, captured) = start_mock_chat_server(
        200,
        r#"{"choices": [{"message": {"role": "assistant", "content": " नमस्ते \n"}}]}"#,
    )
    .await;

    let result = translator(&base_url).translate("hello", "Hindi").await.unwrap();

    assert_eq!(result, "नमस्ते");
    let (auth, request) = captured.lock().unwrap().clone().unwrap();
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(request["model"], "gpt-4o");
    assert_eq!(request["stream"], false);
    assert_eq!(request["messages"][0]["role"], "system");
    assert_eq!(
        request["messages"][0]["content"],
        translation_instruction("Hindi")
    );
    assert_eq!(request["messages"][1]["role"], "user");
    assert_eq!(request["messages"][1]["content"], "hello");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_custom_temperature_when_translating_then_sent_in_request() {
    let (base_url, shutdown_tx, captured) = start_mock_chat_server(
        200,
        r#"{"choices": [{"message": {"content": "hola"}}]}"#,
    )
    .await;

    translator(&base_url)
        .with_temperature(0.5)
        .translate("hello", "Spanish")
        .await
        .unwrap();

    let (_, request) = captured.lock().unwrap().clone().unwrap();
    assert_eq!(request["temperature"], 0.5);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_blank_content_when_translating_then_invalid_response() {
    let (base_url, shutdown_tx, _) = start_mock_chat_server(
        200,
        r#"{"choices": [{"message": {"content": "   "}}]}"#,
    )
    .await;

    let result = translator(&base_url).translate("hello", "Hindi").await;

    assert!(matches!(result, Err(TranslationError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_no_choices_when_translating_then_invalid_response_keeps_body() {
    let body = r#"{"choices": []}"#;
    let (base_url, shutdown_tx, _) = start_mock_chat_server(200, body).await;

    let err = translator(&base_url)
        .translate("hello", "Hindi")
        .await
        .unwrap_err();

    assert_eq!(err.provider_payload(), Some(body));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_server_error_when_translating_then_status_error() {
    let (base_url, shutdown_tx, _) =
        start_mock_chat_server(500, r#"{"error": {"message": "overloaded"}}"#).await;

    let result = translator(&base_url).translate("hello", "Hindi").await;

    assert!(matches!(
        result,
        Err(TranslationError::Status { status: 500, .. })
    ));
    shutdown_tx.send(()).ok();
}

#[test]
fn given_target_language_when_building_instruction_then_names_language() {
    let instruction = translation_instruction("Tamil");

    assert!(instruction.starts_with("Translate the following text to Tamil."));
    assert!(instruction.contains("Respond only with the translated text"));
}
