use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File};
use serde::Deserialize;

use crate::application::services::TranslationFailurePolicy;
use crate::domain::TargetProfile;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub openai: OpenAiSettings,
    pub transcription: TranscriptionSettings,
    pub translation: TranslationSettings,
    pub normalizer: NormalizerSettings,
    pub uploads: UploadSettings,
    pub logging: LoggingSettings,
    pub errors: ErrorSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Deserialize)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
}

impl std::fmt::Debug for OpenAiSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiSettings")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionProvider {
    #[serde(rename = "openai")]
    OpenAi,
    Azure,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionSettings {
    pub provider: TranscriptionProvider,
    pub model: String,
    pub response_format: String,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
    pub azure: Option<AzureTranscriptionSettings>,
}

#[derive(Clone, Deserialize)]
pub struct AzureTranscriptionSettings {
    pub endpoint: String,
    pub deployment: String,
    pub api_version: String,
    pub api_key: Option<String>,
}

impl std::fmt::Debug for AzureTranscriptionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureTranscriptionSettings")
            .field("endpoint", &self.endpoint)
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranslationSettings {
    pub model: String,
    pub default_target_language: String,
    pub failure_policy: TranslationFailurePolicy,
    pub temperature: f32,
    pub timeout_secs: u64,
    pub max_attempts: u32,
    pub initial_backoff_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NormalizerSettings {
    pub ffmpeg_path: String,
    pub target_profile: TargetProfile,
    pub min_output_bytes: u64,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadSettings {
    pub dir: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorSettings {
    pub expose_provider_errors: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("OpenAI API key missing; set OPENAI_API_KEY or APP__OPENAI__API_KEY")]
    MissingApiKey,
    #[error("transcription.provider is azure but transcription.azure is not configured")]
    MissingAzureSettings,
}

impl Settings {
    /// Built-in values, overridable by every later source.
    pub fn defaults(environment: Environment) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("openai.api_key", "")?
            .set_default("openai.base_url", "https://api.openai.com/v1")?
            .set_default("transcription.provider", "openai")?
            .set_default("transcription.model", "whisper-1")?
            .set_default("transcription.response_format", "json")?
            .set_default("transcription.timeout_secs", 120)?
            .set_default("transcription.max_attempts", 1)?
            .set_default("transcription.initial_backoff_ms", 500)?
            .set_default("translation.model", "gpt-4o")?
            .set_default("translation.default_target_language", "Hindi")?
            .set_default("translation.failure_policy", "fail_soft")?
            .set_default("translation.temperature", 0.0)?
            .set_default("translation.timeout_secs", 60)?
            .set_default("translation.max_attempts", 1)?
            .set_default("translation.initial_backoff_ms", 500)?
            .set_default("normalizer.ffmpeg_path", "ffmpeg")?
            .set_default("normalizer.target_profile", "wav16k_mono")?
            .set_default("normalizer.min_output_bytes", 1024)?
            .set_default("normalizer.timeout_secs", 120)?
            .set_default("uploads.dir", "uploads")?
            .set_default("uploads.max_upload_bytes", 25 * 1024 * 1024)?
            .set_default("logging.json", false)?
            .set_default(
                "errors.expose_provider_errors",
                environment.exposes_provider_errors(),
            )
    }

    /// Defaults, then `appsettings.toml`, then `appsettings.<env>.toml`,
    /// then `APP__SECTION__KEY` variables. A bare `OPENAI_API_KEY` wins
    /// over everything for the API key.
    pub fn load(environment: Environment) -> Result<Self, SettingsError> {
        let mut builder = Self::defaults(environment)?
            .add_source(File::with_name("appsettings").required(false))
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Ok(api_key) = std::env::var("OPENAI_API_KEY") {
            if !api_key.trim().is_empty() {
                builder = builder.set_override("openai.api_key", api_key)?;
            }
        }

        builder = Self::with_log_format(builder, std::env::var("LOG_FORMAT").ok().as_deref())?;
        Self::from_builder(builder)
    }

    /// `LOG_FORMAT=json` switches the log output to JSON on top of
    /// whatever `logging.json` resolved to.
    pub fn with_log_format(
        builder: ConfigBuilder<DefaultState>,
        log_format: Option<&str>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        match log_format {
            Some(format) if format.trim().eq_ignore_ascii_case("json") => {
                builder.set_override("logging.json", true)
            }
            _ => Ok(builder),
        }
    }

    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        if self.openai.api_key.trim().is_empty() {
            return Err(SettingsError::MissingApiKey);
        }
        if self.transcription.provider == TranscriptionProvider::Azure
            && self.transcription.azure.is_none()
        {
            return Err(SettingsError::MissingAzureSettings);
        }
        Ok(())
    }
}
