mod azure_whisper_engine;
mod ffmpeg_converter;
mod openai_whisper_engine;
mod transcription_engine_factory;
mod transcription_http;

pub use azure_whisper_engine::AzureWhisperEngine;
pub use ffmpeg_converter::{FfmpegConverter, check_ffmpeg_binary};
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use transcription_engine_factory::TranscriptionEngineFactory;
