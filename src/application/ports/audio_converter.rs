use std::io;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::ProfileSpec;

/// External codec tool. Implementations report whether the process itself
/// succeeded; validating the produced file is the caller's job.
#[async_trait]
pub trait AudioConverter: Send + Sync {
    async fn convert(
        &self,
        input: &Path,
        output: &Path,
        profile: &ProfileSpec,
    ) -> Result<(), ConversionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("codec tool could not be started: {0}")]
    Spawn(String),
    #[error("codec tool exited with status {code:?}: {stderr}")]
    ToolFailed { code: Option<i32>, stderr: String },
    #[error("converted output is {size_bytes} bytes, below the {min_bytes} byte minimum")]
    OutputTooSmall { size_bytes: u64, min_bytes: u64 },
    #[error("codec tool timed out after {0:?}")]
    TimedOut(Duration),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
