use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::{AudioConverter, ConversionError};
use crate::domain::ProfileSpec;
use crate::infrastructure::observability::strip_paths;

const MAX_STDERR_CHARS: usize = 2000;

/// Runs `ffmpeg` once per conversion. The child is killed if the timeout
/// fires or the calling future is dropped.
pub struct FfmpegConverter {
    binary: PathBuf,
    timeout: Duration,
}

impl FfmpegConverter {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for FfmpegConverter {
    fn default() -> Self {
        Self::new("ffmpeg", Self::DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl AudioConverter for FfmpegConverter {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        profile: &ProfileSpec,
    ) -> Result<(), ConversionError> {
        let mut command = Command::new(&self.binary);
        command
            .args(["-hide_banner", "-nostdin", "-loglevel", "error", "-y", "-i"])
            .arg(input)
            .args(profile.encoder_args())
            .arg(output)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| {
            ConversionError::Spawn(format!("{}: {}", self.binary.display(), e))
        })?;

        let result = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout.as_secs(), "ffmpeg timed out, killed");
                return Err(ConversionError::TimedOut(self.timeout));
            }
        };

        if !result.status.success() {
            let stderr = strip_paths(&String::from_utf8_lossy(&result.stderr), &[input, output]);
            return Err(ConversionError::ToolFailed {
                code: result.status.code(),
                stderr: tail(stderr.trim(), MAX_STDERR_CHARS),
            });
        }

        Ok(())
    }
}

fn tail(text: &str, max_chars: usize) -> String {
    let count = text.chars().count();
    if count <= max_chars {
        return text.to_string();
    }
    text.chars().skip(count - max_chars).collect()
}

/// Returns true when `binary -version` runs successfully.
pub async fn check_ffmpeg_binary(binary: &Path) -> bool {
    Command::new(binary)
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}
