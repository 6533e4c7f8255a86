mod asset_lifecycle;
mod delivery_channel;
mod format_normalizer;
mod pipeline;
mod retry;
mod translation_service;

pub use asset_lifecycle::{CleanupWarning, JobAssets};
pub use delivery_channel::{DeliveryChannel, DeliveryMessage, ListenerId, ListenerSender};
pub use format_normalizer::{
    ACCEPTED_FORMATS, DEFAULT_MIN_OUTPUT_BYTES, FormatNormalizer, NormalizerSetupError,
};
pub use pipeline::{PipelineError, PipelineRequest, TranslationPipeline};
pub use retry::{RetryPolicy, Transient};
pub use translation_service::{TranslationFailurePolicy, TranslationService};
