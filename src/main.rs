use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use vaakya::application::services::{
    DeliveryChannel, FormatNormalizer, RetryPolicy, TranslationPipeline, TranslationService,
};
use vaakya::infrastructure::audio::{
    FfmpegConverter, TranscriptionEngineFactory, check_ffmpeg_binary,
};
use vaakya::infrastructure::llm::OpenAiTranslator;
use vaakya::infrastructure::observability::{TracingConfig, init_tracing};
use vaakya::infrastructure::storage::UploadSpool;
use vaakya::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::new(
        environment.as_str(),
        settings.logging.json,
    ));

    let state = build_state(&settings).await?;
    let router = create_router(state);

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    tracing::info!(%addr, environment = %environment, "Listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn build_state(settings: &Settings) -> anyhow::Result<AppState> {
    let ffmpeg = FfmpegConverter::new(
        &settings.normalizer.ffmpeg_path,
        Duration::from_secs(settings.normalizer.timeout_secs),
    );
    if !check_ffmpeg_binary(ffmpeg.binary()).await {
        tracing::warn!(
            ffmpeg = %settings.normalizer.ffmpeg_path,
            "ffmpeg not found; uploads that need conversion will fail"
        );
    }

    let normalizer = FormatNormalizer::new(
        Arc::new(ffmpeg),
        settings.normalizer.target_profile,
        settings.normalizer.min_output_bytes,
    )?;

    let transcriber =
        TranscriptionEngineFactory::create(&settings.transcription, &settings.openai)?;

    let translator = OpenAiTranslator::new(
        settings.openai.api_key.clone(),
        &settings.openai.base_url,
        Some(settings.translation.model.clone()),
        Duration::from_secs(settings.translation.timeout_secs),
    )?
    .with_temperature(settings.translation.temperature);

    let translation = TranslationService::new(
        Arc::new(translator),
        settings.translation.failure_policy,
    )
    .with_retry(RetryPolicy::new(
        settings.translation.max_attempts,
        Duration::from_millis(settings.translation.initial_backoff_ms),
    ));

    let delivery = Arc::new(DeliveryChannel::new());

    let pipeline = TranslationPipeline::new(
        Arc::new(normalizer),
        transcriber,
        Arc::new(translation),
        Arc::clone(&delivery),
    )
    .with_transcription_retry(RetryPolicy::new(
        settings.transcription.max_attempts,
        Duration::from_millis(settings.transcription.initial_backoff_ms),
    ));

    let spool = UploadSpool::new(PathBuf::from(&settings.uploads.dir))?;

    tracing::info!(
        profile = ?settings.normalizer.target_profile,
        translation_policy = ?settings.translation.failure_policy,
        transcription_provider = ?settings.transcription.provider,
        "Pipeline configured"
    );

    Ok(AppState {
        pipeline: Arc::new(pipeline),
        delivery,
        spool: Arc::new(spool),
        default_target_language: settings.translation.default_target_language.clone(),
        max_upload_bytes: settings.uploads.max_upload_bytes,
        expose_provider_errors: settings.errors.expose_provider_errors,
    })
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
