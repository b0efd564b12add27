use assistant_engine::{
    ActionFailure, AssistantConfig, AssistantError, ChatOrchestrator, ChatStore, ChatTopic, ChatTurnRequest,
    MemoryStore, TriageSource, TurnRole, FALLBACK_REPLY,
};
use async_trait::async_trait;
use inference_service::{
    ChatRole, Generation, GenerationRequest, InferenceClient, InferenceError, InferenceResult, Usage,
};
use kliniq_types::Language;
use mockall::mock;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

mock! {
    Inference {}

    #[async_trait]
    impl InferenceClient for Inference {
        async fn generate(&self, request: GenerationRequest) -> InferenceResult<Generation>;
    }
}

fn generation(text: &str) -> Generation {
    Generation {
        text: text.to_string(),
        usage: Usage {
            prompt_tokens: 120,
            completion_tokens: 30,
            total_tokens: 150,
        },
        model: Some("kliniq-chat".to_string()),
    }
}

/// Replies in order and records every request
fn scripted(replies: &[&str]) -> (MockInference, Arc<Mutex<Vec<GenerationRequest>>>) {
    let mut queue: VecDeque<String> = replies.iter().map(|r| r.to_string()).collect();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let recorder = seen.clone();

    let mut client = MockInference::new();
    client.expect_generate().returning(move |request| {
        recorder.lock().unwrap().push(request);
        Ok(generation(&queue.pop_front().unwrap_or_default()))
    });
    (client, seen)
}

fn turn(patient_id: Uuid, session_id: Option<Uuid>, message: &str) -> ChatTurnRequest {
    ChatTurnRequest {
        patient_id,
        session_id,
        message: message.to_string(),
        topic: ChatTopic::General,
        domain_context: None,
    }
}

fn orchestrator(store: &MemoryStore, client: MockInference) -> ChatOrchestrator {
    ChatOrchestrator::new(Arc::new(store.clone()), Arc::new(client), AssistantConfig::default())
}

#[tokio::test]
async fn test_reply_without_action_blocks_is_returned_unmodified() {
    let store = MemoryStore::new();
    let patient = store.insert_patient(Uuid::new_v4(), Some(Language::Yoruba));
    let reply = "Of course. Paste the text and tell me which language you need.";
    let (client, _) = scripted(&[reply]);

    let response = orchestrator(&store, client)
        .handle_turn(turn(patient.patient_id, None, "Can you translate this for me?"))
        .await
        .unwrap();

    assert_eq!(response.reply, reply);
    assert!(response.action_results.is_empty());
    assert!(!response.degraded);
    assert_eq!(response.usage.map(|u| u.total_tokens), Some(150));

    let session = store.chat_session(response.session_id).await.unwrap().unwrap();
    assert_eq!(session.language, Language::Yoruba);
    assert_eq!(session.title.as_deref(), Some("Can you translate this for me?"));
    assert_eq!(session.turns.len(), 2);
    assert!(session.turns.turns()[1].action_calls.is_none());
}

#[tokio::test]
async fn test_two_valid_blocks_and_one_malformed() {
    let store = MemoryStore::new();
    let patient = store.insert_patient(Uuid::new_v4(), None);
    store.link_hospital(patient.patient_id, Uuid::new_v4());

    let raw = "This needs attention today. Please call 112 if the pain gets worse.\n\
<TOOL_CALL>\n{\"tool\": \"create_triage\", \"parameters\": {\"symptoms\": \"chest tightness\", \"urgency_level\": \"high\"}}\n</TOOL_CALL>\n\
<TOOL_CALL>{\"tool\": \"request_appointment\", \"parameters\": </TOOL_CALL>\n\
<TOOL_CALL>{\"tool\": \"request_appointment\", \"parameters\": {\"reason\": \"chest tightness\", \"urgency\": \"urgent\", \"department\": \"Cardiology\"}}</TOOL_CALL>";
    let (client, _) = scripted(&[raw]);

    let response = orchestrator(&store, client)
        .handle_turn(turn(patient.patient_id, None, "My chest feels tight"))
        .await
        .unwrap();

    assert_eq!(response.action_results.len(), 2);
    assert!(response.action_results.iter().all(|r| r.success));
    assert!(!response.reply.contains("TOOL_CALL"));
    assert_eq!(
        response.reply,
        "This needs attention today. Please call 112 if the pain gets worse.\n\n\
✅ Triage case created (urgency: high)\n\
✅ Appointment request submitted (urgency: urgent, department: Cardiology)"
    );

    let requests = store.appointment_requests_for(patient.patient_id);
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].department, "Cardiology");
    assert_eq!(store.triage_cases_for(patient.patient_id).len(), 1);

    let session = store.chat_session(response.session_id).await.unwrap().unwrap();
    let assistant_turn = &session.turns.turns()[1];
    assert_eq!(assistant_turn.action_calls.as_ref().map(Vec::len), Some(2));
    assert_eq!(assistant_turn.action_results.as_ref().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_appointment_without_hospital_link_keeps_reply() {
    let store = MemoryStore::new();
    let patient = store.insert_patient(Uuid::new_v4(), None);
    let raw = "I can help with that.\n<TOOL_CALL>{\"tool\": \"request_appointment\", \"parameters\": {\"reason\": \"checkup\", \"urgency\": \"low\"}}</TOOL_CALL>";
    let (client, _) = scripted(&[raw]);

    let response = orchestrator(&store, client)
        .handle_turn(turn(patient.patient_id, None, "Book me a checkup"))
        .await
        .unwrap();

    assert_eq!(response.reply, "I can help with that.");
    assert_eq!(response.action_results.len(), 1);
    assert!(!response.action_results[0].success);
    assert_eq!(response.action_results[0].failure, Some(ActionFailure::NoLinkedHospital));
    assert!(store.appointment_requests_for(patient.patient_id).is_empty());

    // The failed result is still kept for audit
    let session = store.chat_session(response.session_id).await.unwrap().unwrap();
    let results = session.turns.turns()[1].action_results.clone().unwrap();
    assert!(!results[0].success);
}

#[tokio::test]
async fn test_triage_calls_merge_per_patient() {
    let store = MemoryStore::new();
    let first = store.insert_patient(Uuid::new_v4(), Some(Language::Hausa));
    let second = store.insert_patient(Uuid::new_v4(), None);
    let (client, _) = scripted(&[
        "Noted.<TOOL_CALL>{\"tool\": \"create_triage\", \"parameters\": {\"symptoms\": \"fever\", \"urgency_level\": \"low\"}}</TOOL_CALL>",
        "Updated.<TOOL_CALL>{\"tool\": \"create_triage\", \"parameters\": {\"symptoms\": \"fever and vomiting\", \"urgency_level\": \"medium\"}}</TOOL_CALL>",
        "Noted.<TOOL_CALL>{\"tool\": \"create_triage\", \"parameters\": {\"symptoms\": \"rash\"}}</TOOL_CALL>",
    ]);
    let orchestrator = orchestrator(&store, client);

    let opened = orchestrator
        .handle_turn(turn(first.patient_id, None, "I have a fever"))
        .await
        .unwrap();
    let merged = orchestrator
        .handle_turn(turn(first.patient_id, Some(opened.session_id), "Now I am vomiting too"))
        .await
        .unwrap();
    let other = orchestrator
        .handle_turn(turn(second.patient_id, None, "I have a rash"))
        .await
        .unwrap();

    assert_eq!(opened.action_results[0].referenced_id, merged.action_results[0].referenced_id);
    assert_ne!(opened.action_results[0].referenced_id, other.action_results[0].referenced_id);
    assert!(merged.reply.ends_with("✅ Triage case updated with new symptoms (urgency: medium)"));

    let cases = store.triage_cases_for(first.patient_id);
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].symptoms, "fever and vomiting");
    assert_eq!(cases[0].source, TriageSource::AdHoc);
    assert_eq!(cases[0].language, Language::Hausa);
    assert_eq!(store.triage_cases_for(second.patient_id).len(), 1);
}

#[tokio::test]
async fn test_inference_failure_sends_fallback_and_persists_turn() {
    let store = MemoryStore::new();
    let patient = store.insert_patient(Uuid::new_v4(), None);
    let mut client = MockInference::new();
    client.expect_generate().times(1).returning(|_| Err(InferenceError::Timeout));

    let response = orchestrator(&store, client)
        .handle_turn(turn(patient.patient_id, None, "Hello?"))
        .await
        .unwrap();

    assert_eq!(response.reply, FALLBACK_REPLY);
    assert!(response.degraded);
    assert!(response.usage.is_none());
    assert!(response.action_results.is_empty());

    let session = store.chat_session(response.session_id).await.unwrap().unwrap();
    assert_eq!(session.turns.turns()[1].content, FALLBACK_REPLY);
}

#[tokio::test]
async fn test_history_window_and_title() {
    let store = MemoryStore::new();
    let patient = store.insert_patient(Uuid::new_v4(), Some(Language::Igbo));
    let (client, seen) = scripted(&["one", "two", "three"]);
    let config = AssistantConfig {
        history_window: 3,
        title_max_chars: 10,
        ..AssistantConfig::default()
    };
    let orchestrator = ChatOrchestrator::new(Arc::new(store.clone()), Arc::new(client), config);

    let first = orchestrator
        .handle_turn(turn(patient.patient_id, None, "My knee has been swelling for a week"))
        .await
        .unwrap();
    for message in ["It hurts at night", "Should I rest it?"] {
        orchestrator
            .handle_turn(turn(patient.patient_id, Some(first.session_id), message))
            .await
            .unwrap();
    }

    let requests = seen.lock().unwrap();
    assert_eq!(requests[0].messages.len(), 2);
    // system + the two most recent prior turns + the new message
    let last = &requests[2].messages;
    assert_eq!(last.len(), 4);
    assert_eq!(last[0].role, ChatRole::System);
    assert!(last[0].content.contains("PREFERRED LANGUAGE: Igbo"));
    assert_eq!(last[1].content, "It hurts at night");
    assert_eq!(last[2].content, "two");
    assert_eq!(last[3].content, "Should I rest it?");
    drop(requests);

    let session = store.chat_session(first.session_id).await.unwrap().unwrap();
    assert_eq!(session.title.as_deref(), Some("My knee ha..."));
    assert_eq!(session.turns.len(), 6);
    assert_eq!(session.turns.turns()[5].role, TurnRole::Assistant);
}

#[tokio::test]
async fn test_session_of_another_patient_is_rejected() {
    let store = MemoryStore::new();
    let owner = store.insert_patient(Uuid::new_v4(), None);
    let intruder = store.insert_patient(Uuid::new_v4(), None);
    let (client, _) = scripted(&["Hello"]);
    let orchestrator = orchestrator(&store, client);

    let opened = orchestrator
        .handle_turn(turn(owner.patient_id, None, "Hi"))
        .await
        .unwrap();

    let err = orchestrator
        .handle_turn(turn(intruder.patient_id, Some(opened.session_id), "Hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::SessionNotFound(id) if id == opened.session_id));

    let err = orchestrator
        .handle_turn(turn(owner.patient_id, Some(Uuid::new_v4()), "Hi"))
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::SessionNotFound(_)));
}

#[tokio::test]
async fn test_unknown_patient_and_empty_message() {
    let store = MemoryStore::new();
    let mut client = MockInference::new();
    client.expect_generate().never();
    let orchestrator = orchestrator(&store, client);

    let err = orchestrator
        .handle_turn(turn(Uuid::new_v4(), None, "Hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::PatientNotFound(_)));

    let err = orchestrator
        .handle_turn(turn(Uuid::new_v4(), None, "   "))
        .await
        .unwrap_err();
    assert!(matches!(err, AssistantError::EmptyMessage));
}
