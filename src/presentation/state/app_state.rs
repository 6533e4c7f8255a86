use std::sync::Arc;

use crate::application::services::{DeliveryChannel, TranslationPipeline};
use crate::infrastructure::storage::UploadSpool;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<TranslationPipeline>,
    pub delivery: Arc<DeliveryChannel>,
    pub spool: Arc<UploadSpool>,
    pub default_target_language: String,
    pub max_upload_bytes: usize,
    pub expose_provider_errors: bool,
}
