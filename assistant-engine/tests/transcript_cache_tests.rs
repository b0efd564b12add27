use assistant_engine::{
    MemoryStore, TranscriptCacheManager, TranscriptError, TranscriptOrigin, TranscriptRequest, VoiceMessage,
    VoiceMessageStore,
};
use async_trait::async_trait;
use inference_service::{InferenceError, TranslationError, TranslationResult, Translator};
use kliniq_types::Language;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;
use voice_recognition_service::{SpeechClient, TranscriptionResult, VoiceError, VoiceResult};

#[derive(Default)]
struct FakeSpeech {
    calls: AtomicUsize,
    languages: Mutex<Vec<Language>>,
    fail: bool,
    delay: Option<Duration>,
}

#[async_trait]
impl SpeechClient for FakeSpeech {
    async fn transcribe(&self, _audio_url: &str, language: Language) -> VoiceResult<TranscriptionResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.languages.lock().unwrap().push(language);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(VoiceError::Status { status: 503 });
        }
        Ok(TranscriptionResult {
            text: format!("spoken in {}", language.code()),
            language,
            model: Some("asr-test".to_string()),
        })
    }
}

#[derive(Default)]
struct FakeTranslator {
    calls: AtomicUsize,
    failing: HashSet<Language>,
}

#[async_trait]
impl Translator for FakeTranslator {
    async fn translate(&self, text: &str, _from: Language, to: Language) -> TranslationResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&to) {
            return Err(TranslationError::Inference(InferenceError::Timeout));
        }
        Ok(format!("[{}] {}", to.code(), text))
    }
}

struct Harness {
    store: MemoryStore,
    speech: Arc<FakeSpeech>,
    translator: Arc<FakeTranslator>,
    manager: TranscriptCacheManager,
}

impl Harness {
    fn new(speech: FakeSpeech, translator: FakeTranslator, concurrent: bool) -> Self {
        let store = MemoryStore::new();
        let speech = Arc::new(speech);
        let translator = Arc::new(translator);
        let manager = TranscriptCacheManager::new(
            Arc::new(store.clone()),
            speech.clone(),
            translator.clone(),
            concurrent,
        );
        Self {
            store,
            speech,
            translator,
            manager,
        }
    }

    fn voice_message(&self) -> Uuid {
        let message = VoiceMessage::new(Uuid::new_v4(), "https://storage.kliniq.ng/voice/abc.webm");
        let id = message.id;
        self.store.insert_voice_message(message);
        id
    }

    fn speech_calls(&self) -> usize {
        self.speech.calls.load(Ordering::SeqCst)
    }

    fn translation_calls(&self) -> usize {
        self.translator.calls.load(Ordering::SeqCst)
    }

    async fn stored(&self, id: Uuid) -> VoiceMessage {
        self.store.voice_message(id).await.unwrap().unwrap()
    }
}

fn view(message_id: Uuid, language: Language) -> TranscriptRequest {
    TranscriptRequest {
        message_id,
        view_language: language,
        override_language: None,
    }
}

#[tokio::test]
async fn test_first_request_defaults_to_english_and_fills_every_language() {
    let harness = Harness::new(FakeSpeech::default(), FakeTranslator::default(), false);
    let id = harness.voice_message();

    let yoruba = harness.manager.get_transcript(view(id, Language::Yoruba)).await.unwrap();

    assert_eq!(yoruba.text, "[yoruba] spoken in english");
    assert_eq!(yoruba.original_language, Some(Language::English));
    assert!(yoruba.translated);
    assert!(!yoruba.cached);
    assert_eq!(harness.speech_calls(), 1);
    assert_eq!(*harness.speech.languages.lock().unwrap(), vec![Language::English]);
    assert_eq!(harness.translation_calls(), 3);

    let stored = harness.stored(id).await;
    assert_eq!(stored.transcripts.len(), 4);
    assert_eq!(stored.transcripts[&Language::English].origin, TranscriptOrigin::Transcribed);

    // Viewing the original afterwards is a pure cache hit
    let english = harness.manager.get_transcript(view(id, Language::English)).await.unwrap();
    assert_eq!(english.text, "spoken in english");
    assert!(english.cached);
    assert!(!english.translated);
    assert_eq!(harness.speech_calls(), 1);
    assert_eq!(harness.translation_calls(), 3);
}

#[tokio::test]
async fn test_cached_language_is_never_refetched() {
    let harness = Harness::new(FakeSpeech::default(), FakeTranslator::default(), true);
    let id = harness.voice_message();

    for _ in 0..3 {
        harness.manager.get_transcript(view(id, Language::Hausa)).await.unwrap();
    }

    assert_eq!(harness.speech_calls(), 1);
    assert_eq!(harness.translation_calls(), 3);
}

#[tokio::test]
async fn test_override_clears_every_language_and_rekeys_origin() {
    let harness = Harness::new(FakeSpeech::default(), FakeTranslator::default(), true);
    let id = harness.voice_message();
    harness.manager.get_transcript(view(id, Language::Igbo)).await.unwrap();

    let corrected = harness
        .manager
        .get_transcript(TranscriptRequest {
            message_id: id,
            view_language: Language::English,
            override_language: Some(Language::Hausa),
        })
        .await
        .unwrap();

    assert_eq!(corrected.text, "[english] spoken in hausa");
    assert_eq!(corrected.original_language, Some(Language::Hausa));
    assert_eq!(*harness.speech.languages.lock().unwrap(), vec![Language::English, Language::Hausa]);
    assert_eq!(harness.translation_calls(), 6);

    let stored = harness.stored(id).await;
    assert_eq!(stored.transcripts[&Language::Hausa].text, "spoken in hausa");
    assert!(stored
        .transcripts
        .values()
        .all(|entry| !entry.text.contains("spoken in english")));
}

#[tokio::test]
async fn test_override_is_persisted_when_speech_fails() {
    let failing = FakeSpeech {
        fail: true,
        ..Default::default()
    };
    let harness = Harness::new(failing, FakeTranslator::default(), true);
    let id = harness.voice_message();

    let mut message = harness.stored(id).await;
    message.original_language = Some(Language::English);
    message.transcripts.insert(
        Language::English,
        assistant_engine::TranscriptEntry {
            text: "old guess".to_string(),
            origin: TranscriptOrigin::Transcribed,
        },
    );
    harness.store.save_voice_message(&message).await.unwrap();

    let err = harness
        .manager
        .get_transcript(TranscriptRequest {
            message_id: id,
            view_language: Language::English,
            override_language: Some(Language::Yoruba),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, TranscriptError::Speech(VoiceError::Status { status: 503 })));
    let stored = harness.stored(id).await;
    assert_eq!(stored.original_language, Some(Language::Yoruba));
    assert!(stored.transcripts.is_empty());
    assert_eq!(harness.translation_calls(), 0);
}

#[tokio::test]
async fn test_failed_translation_falls_back_to_origin_text() {
    let translator = FakeTranslator {
        failing: HashSet::from([Language::Igbo]),
        ..Default::default()
    };
    let harness = Harness::new(FakeSpeech::default(), translator, true);
    let id = harness.voice_message();

    let igbo = harness.manager.get_transcript(view(id, Language::Igbo)).await.unwrap();
    assert_eq!(igbo.text, "spoken in english");
    assert_eq!(igbo.fallback_languages, vec![Language::Igbo]);

    let stored = harness.stored(id).await;
    assert_eq!(stored.transcripts.len(), 4);
    assert_eq!(stored.transcripts[&Language::Igbo].origin, TranscriptOrigin::Fallback);
    assert_eq!(stored.transcripts[&Language::Yoruba].origin, TranscriptOrigin::Translated);
    assert_eq!(stored.transcripts[&Language::Yoruba].text, "[yoruba] spoken in english");
}

#[tokio::test]
async fn test_concurrent_viewers_share_one_population() {
    let slow = FakeSpeech {
        delay: Some(Duration::from_millis(50)),
        ..Default::default()
    };
    let harness = Harness::new(slow, FakeTranslator::default(), true);
    let id = harness.voice_message();

    let (hausa, yoruba) = tokio::join!(
        harness.manager.get_transcript(view(id, Language::Hausa)),
        harness.manager.get_transcript(view(id, Language::Yoruba)),
    );

    let (hausa, yoruba) = (hausa.unwrap(), yoruba.unwrap());
    assert_eq!(hausa.text, "[hausa] spoken in english");
    assert_eq!(yoruba.text, "[yoruba] spoken in english");
    // Whoever waited on the lock was served from the cache
    assert_ne!(hausa.cached, yoruba.cached);
    assert_eq!(harness.speech_calls(), 1);
    assert_eq!(harness.translation_calls(), 3);
}

#[tokio::test]
async fn test_message_errors() {
    let harness = Harness::new(FakeSpeech::default(), FakeTranslator::default(), true);

    let err = harness
        .manager
        .get_transcript(view(Uuid::new_v4(), Language::English))
        .await
        .unwrap_err();
    assert!(matches!(err, TranscriptError::MessageNotFound(_)));

    let mut text_only = VoiceMessage::new(Uuid::new_v4(), "");
    text_only.attachment_url = None;
    let id = text_only.id;
    harness.store.insert_voice_message(text_only);

    let err = harness.manager.get_transcript(view(id, Language::English)).await.unwrap_err();
    assert!(matches!(err, TranscriptError::NoAudioAttachment(message_id) if message_id == id));
    assert_eq!(harness.speech_calls(), 0);
}
