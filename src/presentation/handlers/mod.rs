mod error;
mod health;
mod listen;
mod upload;

pub use error::{ApiError, ErrorResponse};
pub use health::health_handler;
pub use listen::{ListenParams, listen_handler};
pub use upload::{AUDIO_FIELD, UploadResponse, is_acceptable_upload, upload_handler};
