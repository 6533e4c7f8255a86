use std::path::Path;

use serde::Deserialize;

/// Audio container formats the service knows how to name and label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Wav,
    Mp3,
    M4a,
    Mp4,
    Mpeg,
    Mpga,
    Webm,
    Ogg,
    Flac,
    Aac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 10] = [
        AudioFormat::Wav,
        AudioFormat::Mp3,
        AudioFormat::M4a,
        AudioFormat::Mp4,
        AudioFormat::Mpeg,
        AudioFormat::Mpga,
        AudioFormat::Webm,
        AudioFormat::Ogg,
        AudioFormat::Flac,
        AudioFormat::Aac,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
            Self::M4a => "m4a",
            Self::Mp4 => "mp4",
            Self::Mpeg => "mpeg",
            Self::Mpga => "mpga",
            Self::Webm => "webm",
            Self::Ogg => "ogg",
            Self::Flac => "flac",
            Self::Aac => "aac",
        }
    }

    /// Canonical content type sent to remote services for this format.
    pub fn mime(&self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
            Self::M4a => "audio/mp4",
            Self::Mp4 => "video/mp4",
            Self::Mpeg => "video/mpeg",
            Self::Mpga => "audio/mpga",
            Self::Webm => "audio/webm",
            Self::Ogg => "audio/ogg",
            Self::Flac => "audio/flac",
            Self::Aac => "audio/aac",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        Self::ALL.into_iter().find(|f| f.extension() == ext)
    }

    /// Parses a MIME type, ignoring parameters such as `;codecs=opus`.
    pub fn from_mime(mime: &str) -> Option<Self> {
        let essence = mime
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "audio/wav" | "audio/x-wav" | "audio/wave" | "audio/vnd.wave" => Some(Self::Wav),
            "audio/mpeg" | "audio/mp3" => Some(Self::Mp3),
            "audio/mp4" | "audio/m4a" | "audio/x-m4a" => Some(Self::M4a),
            "video/mp4" => Some(Self::Mp4),
            "video/mpeg" => Some(Self::Mpeg),
            "audio/mpga" => Some(Self::Mpga),
            "audio/webm" | "video/webm" => Some(Self::Webm),
            "audio/ogg" | "audio/opus" => Some(Self::Ogg),
            "audio/flac" | "audio/x-flac" => Some(Self::Flac),
            "audio/aac" | "audio/x-aac" => Some(Self::Aac),
            _ => None,
        }
    }

    /// File extension wins over the declared MIME type; browsers routinely
    /// declare `application/octet-stream` or a container-level type.
    pub fn detect(path: &Path, declared_mime: &str) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .or_else(|| Self::from_mime(declared_mime))
    }
}

/// Re-encoding profile applied to audio the transcription service does not
/// accept as uploaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum TargetProfile {
    /// Mono 16 kHz 16-bit PCM wav.
    #[default]
    #[serde(rename = "wav16k_mono")]
    Wav16kMono,
    /// Mono 44.1 kHz mp3 at 128 kbps.
    #[serde(rename = "mp3_128k")]
    Mp3128k,
}

/// Fully resolved output parameters for a [`TargetProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSpec {
    pub format: AudioFormat,
    pub codec: &'static str,
    pub sample_rate_hz: u32,
    pub channels: u16,
    pub bitrate_kbps: Option<u32>,
}

impl TargetProfile {
    pub fn spec(&self) -> ProfileSpec {
        match self {
            Self::Wav16kMono => ProfileSpec {
                format: AudioFormat::Wav,
                codec: "pcm_s16le",
                sample_rate_hz: 16_000,
                channels: 1,
                bitrate_kbps: None,
            },
            Self::Mp3128k => ProfileSpec {
                format: AudioFormat::Mp3,
                codec: "libmp3lame",
                sample_rate_hz: 44_100,
                channels: 1,
                bitrate_kbps: Some(128),
            },
        }
    }

    pub fn content_type(&self) -> &'static str {
        self.spec().format.mime()
    }
}

impl ProfileSpec {
    /// Encoder arguments placed between the input and output paths.
    pub fn encoder_args(&self) -> Vec<String> {
        let mut args = vec![
            "-vn".to_string(),
            "-acodec".to_string(),
            self.codec.to_string(),
            "-ar".to_string(),
            self.sample_rate_hz.to_string(),
            "-ac".to_string(),
            self.channels.to_string(),
        ];
        if let Some(kbps) = self.bitrate_kbps {
            args.push("-b:a".to_string());
            args.push(format!("{}k", kbps));
        }
        args.push("-f".to_string());
        args.push(self.format.extension().to_string());
        args
    }
}
