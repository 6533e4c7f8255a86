/// Transcript returned by the speech-to-text service. `text` may be empty
/// for silent clips.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionResult {
    pub text: String,
    pub source_language_hint: Option<String>,
}

impl TranscriptionResult {
    pub fn new(text: impl Into<String>, source_language_hint: Option<String>) -> Self {
        Self {
            text: text.into(),
            source_language_hint,
        }
    }
}
