use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::application::ports::{AudioConverter, ConversionError};
use crate::domain::{AudioFormat, NormalizedAudioAsset, ProfileSpec, RawAudioAsset, TargetProfile};

use super::JobAssets;

/// Formats the transcription service takes as uploaded.
pub const ACCEPTED_FORMATS: [AudioFormat; 6] = [
    AudioFormat::Wav,
    AudioFormat::Mp3,
    AudioFormat::M4a,
    AudioFormat::Mp4,
    AudioFormat::Mpeg,
    AudioFormat::Mpga,
];

/// Converted files smaller than this are treated as silent corruption.
pub const DEFAULT_MIN_OUTPUT_BYTES: u64 = 1024;

#[derive(Debug, thiserror::Error)]
pub enum NormalizerSetupError {
    #[error("target profile produces {0:?}, which the transcription service does not accept")]
    ProfileNotAccepted(AudioFormat),
    #[error("minimum converted output size must be greater than zero")]
    ZeroMinimumSize,
}

pub struct FormatNormalizer {
    converter: Arc<dyn AudioConverter>,
    profile: TargetProfile,
    spec: ProfileSpec,
    min_output_bytes: u64,
}

impl FormatNormalizer {
    pub fn new(
        converter: Arc<dyn AudioConverter>,
        profile: TargetProfile,
        min_output_bytes: u64,
    ) -> Result<Self, NormalizerSetupError> {
        let spec = profile.spec();
        if !Self::accepts(spec.format) {
            return Err(NormalizerSetupError::ProfileNotAccepted(spec.format));
        }
        if min_output_bytes == 0 {
            return Err(NormalizerSetupError::ZeroMinimumSize);
        }
        Ok(Self {
            converter,
            profile,
            spec,
            min_output_bytes,
        })
    }

    pub fn accepts(format: AudioFormat) -> bool {
        ACCEPTED_FORMATS.contains(&format)
    }

    pub fn profile(&self) -> TargetProfile {
        self.profile
    }

    pub fn output_path_for(&self, raw: &RawAudioAsset) -> PathBuf {
        let stem = raw
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio");
        raw.path
            .with_file_name(format!("{}.normalized.{}", stem, self.spec.format.extension()))
    }

    /// Returns the raw asset untouched when its format is already accepted;
    /// otherwise converts it with the configured profile. The converted file
    /// is registered with `assets` before the codec tool runs so a partial
    /// output is cleaned up too.
    pub async fn normalize(
        &self,
        raw: &RawAudioAsset,
        assets: &mut JobAssets,
    ) -> Result<NormalizedAudioAsset, ConversionError> {
        let detected = AudioFormat::detect(&raw.path, &raw.declared_mime_type);

        if let Some(format) = detected.filter(|f| Self::accepts(*f)) {
            tracing::debug!(format = ?format, "Audio already in an accepted format");
            return Ok(NormalizedAudioAsset {
                path: raw.path.clone(),
                format,
                content_type: format.mime(),
                codec: None,
                sample_rate_hz: None,
                channels: None,
                size_bytes: raw.size_bytes,
                converted: false,
            });
        }

        let output = self.output_path_for(raw);
        assets.track(&output);

        tracing::debug!(
            input = %raw.path.display(),
            output = %output.display(),
            detected = ?detected,
            profile = ?self.profile,
            "Converting audio"
        );
        let started = Instant::now();

        self.converter.convert(&raw.path, &output, &self.spec).await?;

        let size_bytes = match tokio::fs::metadata(&output).await {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => 0,
            Err(e) => return Err(ConversionError::Io(e)),
        };

        if size_bytes < self.min_output_bytes {
            return Err(ConversionError::OutputTooSmall {
                size_bytes,
                min_bytes: self.min_output_bytes,
            });
        }

        tracing::info!(
            size_bytes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Audio conversion completed"
        );

        Ok(NormalizedAudioAsset {
            path: output,
            format: self.spec.format,
            content_type: self.spec.format.mime(),
            codec: Some(self.spec.codec.to_string()),
            sample_rate_hz: Some(self.spec.sample_rate_hz),
            channels: Some(self.spec.channels),
            size_bytes,
            converted: true,
        })
    }
}
