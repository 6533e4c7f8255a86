#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::{Notify, oneshot};

use vaakya::application::ports::{
    AudioConverter, ConversionError, TranscriptionEngine, TranscriptionError, TranslationError,
    Translator,
};
use vaakya::application::services::{
    DEFAULT_MIN_OUTPUT_BYTES, DeliveryChannel, FormatNormalizer, TranslationFailurePolicy,
    TranslationPipeline, TranslationService,
};
use vaakya::domain::{
    NormalizedAudioAsset, ProfileSpec, RawAudioAsset, TargetProfile, TranscriptionResult,
};

pub fn build_wav(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
    let num_samples = samples.len() as u32;
    let byte_rate = sample_rate * 2;
    let data_size = num_samples * 2;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&1u16.to_le_bytes()); // mono
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&2u16.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes());
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        wav.extend_from_slice(&s.to_le_bytes());
    }
    wav
}

/// Two seconds of 16 kHz mono silence.
pub fn silent_wav() -> Vec<u8> {
    build_wav(16_000, &vec![0i16; 32_000])
}

pub fn write_asset(dir: &Path, name: &str, mime: &str, bytes: &[u8]) -> RawAudioAsset {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    RawAudioAsset::new(path, mime, bytes.len() as u64)
}

pub fn files_in(dir: &Path) -> Vec<PathBuf> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}

#[derive(Clone, Copy)]
pub enum ConverterBehavior {
    /// Exit successfully after writing this many bytes.
    Write(usize),
    /// Exit successfully without producing a file.
    NoOutput,
    /// Report a failed process.
    Fail,
}

pub struct MockConverter {
    pub behavior: ConverterBehavior,
    pub calls: AtomicUsize,
    pub outputs: Mutex<Vec<PathBuf>>,
}

impl MockConverter {
    pub fn new(behavior: ConverterBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            outputs: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AudioConverter for MockConverter {
    async fn convert(
        &self,
        _input: &Path,
        output: &Path,
        _profile: &ProfileSpec,
    ) -> Result<(), ConversionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outputs.lock().unwrap().push(output.to_path_buf());
        match self.behavior {
            ConverterBehavior::Write(size) => {
                tokio::fs::write(output, vec![0u8; size]).await?;
                Ok(())
            }
            ConverterBehavior::NoOutput => Ok(()),
            ConverterBehavior::Fail => Err(ConversionError::ToolFailed {
                code: Some(1),
                stderr: "Invalid data found when processing input".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SeenAudio {
    pub path: PathBuf,
    pub existed: bool,
    pub content_type: &'static str,
    pub file_name: String,
    pub language_hint: Option<String>,
}

pub enum TranscriberReply {
    Text(String),
    Status(u16, String),
    Missing(String),
}

/// Holds a transcription call open: `entered` fires once the call starts and
/// the call returns only after `release` is notified.
#[derive(Clone, Default)]
pub struct TranscriberGate {
    pub entered: Arc<Notify>,
    pub release: Arc<Notify>,
}

pub struct MockTranscriber {
    pub reply: TranscriberReply,
    pub calls: AtomicUsize,
    pub seen: Mutex<Vec<SeenAudio>>,
    pub gate: Option<TranscriberGate>,
}

impl MockTranscriber {
    pub fn returning(text: &str) -> Arc<Self> {
        Self::with_reply(TranscriberReply::Text(text.to_string()))
    }

    pub fn with_reply(reply: TranscriberReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            gate: None,
        })
    }

    pub fn gated(text: &str) -> (Arc<Self>, TranscriberGate) {
        let gate = TranscriberGate::default();
        let transcriber = Arc::new(Self {
            reply: TranscriberReply::Text(text.to_string()),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
            gate: Some(gate.clone()),
        });
        (transcriber, gate)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_seen(&self) -> SeenAudio {
        self.seen.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait::async_trait]
impl TranscriptionEngine for MockTranscriber {
    async fn transcribe(
        &self,
        audio: &NormalizedAudioAsset,
        language_hint: Option<&str>,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(SeenAudio {
            path: audio.path.clone(),
            existed: audio.path.exists(),
            content_type: audio.content_type,
            file_name: audio.upload_file_name(),
            language_hint: language_hint.map(str::to_string),
        });
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
        match &self.reply {
            TranscriberReply::Text(text) => Ok(TranscriptionResult::new(
                text.clone(),
                language_hint.map(str::to_string),
            )),
            TranscriberReply::Status(status, body) => Err(TranscriptionError::Status {
                status: *status,
                body: body.clone(),
            }),
            TranscriberReply::Missing(body) => {
                Err(TranscriptionError::MissingTranscript { body: body.clone() })
            }
        }
    }
}

pub struct MockTranslator {
    /// `None` makes every call fail with a network error.
    pub reply: Option<String>,
    /// Calls that fail with a 503 before `reply` is returned.
    pub transient_failures: usize,
    pub calls: AtomicUsize,
    pub targets: Mutex<Vec<String>>,
}

impl MockTranslator {
    pub fn returning(text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            transient_failures: 0,
            calls: AtomicUsize::new(0),
            targets: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            transient_failures: 0,
            calls: AtomicUsize::new(0),
            targets: Mutex::new(Vec::new()),
        })
    }

    pub fn flaky(failures: usize, text: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Some(text.to_string()),
            transient_failures: failures,
            calls: AtomicUsize::new(0),
            targets: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        _text: &str,
        target_language: &str,
    ) -> Result<String, TranslationError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.targets
            .lock()
            .unwrap()
            .push(target_language.to_string());
        if call < self.transient_failures {
            return Err(TranslationError::Status {
                status: 503,
                body: "overloaded".to_string(),
            });
        }
        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(TranslationError::Request("connection refused".to_string())),
        }
    }
}

pub struct PipelineFixture {
    pub pipeline: Arc<TranslationPipeline>,
    pub delivery: Arc<DeliveryChannel>,
    pub converter: Arc<MockConverter>,
    pub transcriber: Arc<MockTranscriber>,
    pub translator: Arc<MockTranslator>,
}

pub fn pipeline_fixture(
    converter: Arc<MockConverter>,
    transcriber: Arc<MockTranscriber>,
    translator: Arc<MockTranslator>,
    policy: TranslationFailurePolicy,
) -> PipelineFixture {
    let normalizer = FormatNormalizer::new(
        converter.clone(),
        TargetProfile::Wav16kMono,
        DEFAULT_MIN_OUTPUT_BYTES,
    )
    .unwrap();
    let translation = TranslationService::new(translator.clone(), policy);
    let delivery = Arc::new(DeliveryChannel::new());
    let pipeline = TranslationPipeline::new(
        Arc::new(normalizer),
        transcriber.clone(),
        Arc::new(translation),
        Arc::clone(&delivery),
    );
    PipelineFixture {
        pipeline: Arc::new(pipeline),
        delivery,
        converter,
        transcriber,
        translator,
    }
}

/// Serves `app` on an ephemeral local port until the sender fires.
pub async fn start_mock_server(app: Router) -> (String, oneshot::Sender<()>) {
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            })
            .await
            .ok();
    });

    (base_url, shutdown_tx)
}
