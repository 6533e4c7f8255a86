mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AzureTranscriptionSettings, ErrorSettings, LoggingSettings, NormalizerSettings,
    OpenAiSettings, ServerSettings, Settings, SettingsError, TranscriptionProvider,
    TranscriptionSettings, TranslationSettings, UploadSettings,
};
