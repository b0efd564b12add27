use async_trait::async_trait;

use crate::error::{VoiceError, VoiceResult};
use crate::providers::SpeechProvider;
use crate::transcription::{TranscriptionRequest, TranscriptionResult};

pub struct DisabledProvider;

#[async_trait]
impl SpeechProvider for DisabledProvider {
    async fn transcribe(&self, _request: &TranscriptionRequest) -> VoiceResult<TranscriptionResult> {
        Err(VoiceError::Disabled)
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
