use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::io::AsyncWriteExt;

use crate::domain::{AudioFormat, JobId, RawAudioAsset};

#[derive(Debug, thiserror::Error)]
pub enum SpoolError {
    #[error("upload interrupted: {0}")]
    Interrupted(io::Error),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Writes incoming uploads straight to disk, one file per job.
pub struct UploadSpool {
    dir: PathBuf,
}

impl UploadSpool {
    pub fn new(dir: PathBuf) -> Result<Self, SpoolError> {
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `<dir>/<job_id>.<ext>`; uploads of unknown format get `.upload`.
    pub fn path_for(&self, job_id: &JobId, format: Option<AudioFormat>) -> PathBuf {
        let ext = format.map(|f| f.extension()).unwrap_or("upload");
        self.dir.join(format!("{}.{}", job_id, ext))
    }

    /// Streams chunks to `path`. A partially written file is removed when
    /// the stream fails.
    pub async fn persist<S>(
        &self,
        path: PathBuf,
        declared_mime_type: &str,
        stream: S,
    ) -> Result<RawAudioAsset, SpoolError>
    where
        S: Stream<Item = Result<Bytes, io::Error>>,
    {
        let mut stream = std::pin::pin!(stream);
        let mut file = tokio::fs::File::create(&path).await?;
        let mut total_bytes: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let outcome = match chunk {
                Ok(bytes) => {
                    total_bytes += bytes.len() as u64;
                    file.write_all(&bytes).await.map_err(SpoolError::Io)
                }
                Err(e) => Err(SpoolError::Interrupted(e)),
            };
            if let Err(e) = outcome {
                drop(file);
                self.discard(&path).await;
                return Err(e);
            }
        }

        if let Err(e) = file.flush().await {
            drop(file);
            self.discard(&path).await;
            return Err(SpoolError::Io(e));
        }

        tracing::debug!(path = %path.display(), bytes = total_bytes, "Upload spooled");

        Ok(RawAudioAsset::new(path, declared_mime_type, total_bytes))
    }

    pub async fn discard(&self, path: &Path) {
        match tokio::fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to discard upload");
            }
        }
    }
}
