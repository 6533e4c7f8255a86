mod audio_converter;
mod transcription_engine;
mod translator;

pub use audio_converter::{AudioConverter, ConversionError};
pub use transcription_engine::{TranscriptionEngine, TranscriptionError};
pub use translator::{TranslationError, Translator};
