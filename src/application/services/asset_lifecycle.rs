use std::io;
use std::path::{Path, PathBuf};

use crate::domain::JobId;

/// A job asset that could not be removed. Logged, never escalated.
#[derive(Debug, thiserror::Error)]
#[error("failed to delete {}: {source}", path.display())]
pub struct CleanupWarning {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Owns every on-disk artifact of one job.
///
/// Each tracked path is deleted at most once: by [`JobAssets::cleanup`] when
/// the job reaches a terminal stage, or on drop if the job future was
/// cancelled before getting there. A path that is already gone is not an
/// error.
#[derive(Debug)]
pub struct JobAssets {
    job_id: JobId,
    paths: Vec<PathBuf>,
}

impl JobAssets {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            paths: Vec::new(),
        }
    }

    /// Registers a path for deletion. Registering the same path twice is a
    /// no-op, so a normalizer that hands back the raw upload unchanged does
    /// not cause a double delete.
    pub fn track(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if !self.paths.iter().any(|p| p == path) {
            self.paths.push(path.to_path_buf());
        }
    }

    pub fn tracked(&self) -> &[PathBuf] {
        &self.paths
    }

    pub async fn cleanup(&mut self) -> Vec<CleanupWarning> {
        let mut warnings = Vec::new();
        for path in std::mem::take(&mut self.paths) {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => {
                    tracing::debug!(job_id = %self.job_id, path = %path.display(), "Job asset removed");
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(job_id = %self.job_id, path = %path.display(), "Job asset already gone");
                }
                Err(e) => {
                    let warning = CleanupWarning { path, source: e };
                    tracing::warn!(job_id = %self.job_id, warning = %warning, "Job asset cleanup failed");
                    warnings.push(warning);
                }
            }
        }
        warnings
    }
}

impl Drop for JobAssets {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!(job_id = %self.job_id, path = %path.display(), "Job asset removed on drop");
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        job_id = %self.job_id,
                        path = %path.display(),
                        error = %e,
                        "Job asset cleanup on drop failed"
                    );
                }
            }
        }
    }
}
