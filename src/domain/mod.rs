mod audio_asset;
mod audio_format;
mod job;
mod job_id;
mod job_stage;
mod session_key;
mod transcription;
mod translation;

pub use audio_asset::{NormalizedAudioAsset, RawAudioAsset};
pub use audio_format::{AudioFormat, ProfileSpec, TargetProfile};
pub use job::{Job, JobFailure, JobTransitionError};
pub use job_id::JobId;
pub use job_stage::JobStage;
pub use session_key::SessionKey;
pub use transcription::TranscriptionResult;
pub use translation::{JobResult, TranslationResult};
