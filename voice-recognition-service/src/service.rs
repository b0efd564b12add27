use async_trait::async_trait;
use kliniq_types::Language;
use logger_redacted::PiiRedactor;
use tracing::{debug, info, warn};

use crate::config::SpeechConfig;
use crate::error::{VoiceError, VoiceResult};
use crate::providers::{create_provider, SpeechProvider};
use crate::transcription::{TranscriptionRequest, TranscriptionResult};

/// Speech-to-text seam consumed by the transcript cache
#[async_trait]
pub trait SpeechClient: Send + Sync {
    async fn transcribe(&self, audio_url: &str, language: Language) -> VoiceResult<TranscriptionResult>;
}

/// Speech recognition service for voice messages
pub struct VoiceService {
    provider: Box<dyn SpeechProvider>,
    redactor: PiiRedactor,
}

impl VoiceService {
    /// Create a new speech recognition service
    pub fn new(config: SpeechConfig) -> VoiceResult<Self> {
        let provider = create_provider(&config)?;
        info!(provider = provider.name(), timeout_secs = config.timeout_secs, "Speech client ready");
        Ok(Self::with_provider(provider))
    }

    pub fn with_provider(provider: Box<dyn SpeechProvider>) -> Self {
        Self {
            provider,
            redactor: PiiRedactor::default(),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }
}

#[async_trait]
impl SpeechClient for VoiceService {
    async fn transcribe(&self, audio_url: &str, language: Language) -> VoiceResult<TranscriptionResult> {
        if audio_url.trim().is_empty() {
            return Err(VoiceError::Transcription("No audio_url provided".to_string()));
        }

        let request = TranscriptionRequest {
            audio_url: audio_url.to_string(),
            language,
        };

        match self.provider.transcribe(&request).await {
            Ok(result) => {
                debug!(
                    language = %result.language,
                    model = result.model.as_deref().unwrap_or("unknown"),
                    text = %self.redactor.preview(&result.text, 80),
                    "Transcription complete"
                );
                Ok(result)
            }
            Err(e) => {
                warn!(language = %language, error = %e, "Transcription failed");
                Err(e)
            }
        }
    }
}
