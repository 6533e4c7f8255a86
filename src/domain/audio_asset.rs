use std::path::PathBuf;

use chrono::{DateTime, Utc};

use super::AudioFormat;

/// An upload as it landed on disk.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAudioAsset {
    pub path: PathBuf,
    pub declared_mime_type: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

impl RawAudioAsset {
    pub fn new(path: PathBuf, declared_mime_type: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path,
            declared_mime_type: declared_mime_type.into(),
            size_bytes,
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size_bytes == 0
    }
}

/// Audio ready to be sent to the transcription service. `path` equals the
/// raw asset's path when no conversion was needed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedAudioAsset {
    pub path: PathBuf,
    pub format: AudioFormat,
    pub content_type: &'static str,
    pub codec: Option<String>,
    pub sample_rate_hz: Option<u32>,
    pub channels: Option<u16>,
    pub size_bytes: u64,
    pub converted: bool,
}

impl NormalizedAudioAsset {
    /// File name sent alongside the audio part; its extension always
    /// agrees with `content_type`.
    pub fn upload_file_name(&self) -> String {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        format!("{}.{}", stem, self.format.extension())
    }
}
