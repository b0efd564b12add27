use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use kliniq_types::Language;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use super::{CareActions, ChatStore, ChatTransaction, StoreResult, VoiceMessageStore};
use crate::models::{AppointmentRequest, ChatSession, HospitalLink, PatientProfile, TriageCase, VoiceMessage};

#[derive(Default)]
struct Tables {
    patients: DashMap<Uuid, PatientProfile>,
    hospital_links: DashMap<Uuid, Vec<HospitalLink>>,
    appointment_requests: DashMap<Uuid, AppointmentRequest>,
    triage_cases: DashMap<Uuid, TriageCase>,
    sessions: DashMap<Uuid, ChatSession>,
    voice_messages: DashMap<Uuid, VoiceMessage>,
    // Held by a transaction from its first triage lookup until commit or drop
    patient_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

/// In-memory store for development and tests
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_patient(&self, patient_id: Uuid, preferred_language: Option<Language>) -> PatientProfile {
        let profile = PatientProfile {
            patient_id,
            preferred_language,
        };
        self.tables.patients.insert(patient_id, profile.clone());
        profile
    }

    pub fn link_hospital(&self, patient_id: Uuid, hospital_id: Uuid) -> HospitalLink {
        let link = HospitalLink {
            id: Uuid::new_v4(),
            patient_id,
            hospital_id,
            linked_at: Utc::now(),
        };
        self.tables
            .hospital_links
            .entry(patient_id)
            .or_default()
            .push(link.clone());
        link
    }

    pub fn insert_voice_message(&self, message: VoiceMessage) {
        self.tables.voice_messages.insert(message.id, message);
    }

    pub fn appointment_requests_for(&self, patient_id: Uuid) -> Vec<AppointmentRequest> {
        self.tables
            .appointment_requests
            .iter()
            .filter(|entry| entry.patient_id == patient_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn triage_cases_for(&self, patient_id: Uuid) -> Vec<TriageCase> {
        self.tables
            .triage_cases
            .iter()
            .filter(|entry| entry.patient_id == patient_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn committed_active_adhoc(&self, patient_id: Uuid) -> Option<TriageCase> {
        self.tables
            .triage_cases
            .iter()
            .filter(|entry| entry.patient_id == patient_id && entry.is_active_ad_hoc())
            .map(|entry| entry.value().clone())
            .min_by_key(|case| case.created_at)
    }
}

#[async_trait]
impl ChatStore for MemoryStore {
    async fn patient_profile(&self, patient_id: Uuid) -> StoreResult<Option<PatientProfile>> {
        Ok(self.tables.patients.get(&patient_id).map(|p| p.value().clone()))
    }

    async fn chat_session(&self, session_id: Uuid) -> StoreResult<Option<ChatSession>> {
        Ok(self.tables.sessions.get(&session_id).map(|s| s.value().clone()))
    }

    async fn begin(&self) -> StoreResult<Box<dyn ChatTransaction>> {
        Ok(Box::new(MemoryTransaction {
            store: self.clone(),
            appointment_requests: Vec::new(),
            triage_cases: HashMap::new(),
            session: None,
            patient_guards: HashMap::new(),
        }))
    }
}

#[async_trait]
impl VoiceMessageStore for MemoryStore {
    async fn voice_message(&self, message_id: Uuid) -> StoreResult<Option<VoiceMessage>> {
        Ok(self.tables.voice_messages.get(&message_id).map(|m| m.value().clone()))
    }

    async fn save_voice_message(&self, message: &VoiceMessage) -> StoreResult<()> {
        self.tables.voice_messages.insert(message.id, message.clone());
        Ok(())
    }
}

/// Writes are staged and become visible on commit
struct MemoryTransaction {
    store: MemoryStore,
    appointment_requests: Vec<AppointmentRequest>,
    triage_cases: HashMap<Uuid, TriageCase>,
    session: Option<ChatSession>,
    patient_guards: HashMap<Uuid, OwnedMutexGuard<()>>,
}

impl MemoryTransaction {
    /// Serialize triage work per patient until this transaction ends
    async fn lock_patient(&mut self, patient_id: Uuid) {
        if self.patient_guards.contains_key(&patient_id) {
            return;
        }
        let lock = self
            .store
            .tables
            .patient_locks
            .entry(patient_id)
            .or_default()
            .clone();
        let guard = lock.lock_owned().await;
        self.patient_guards.insert(patient_id, guard);
    }
}

#[async_trait]
impl CareActions for MemoryTransaction {
    async fn first_hospital_link(&mut self, patient_id: Uuid) -> StoreResult<Option<HospitalLink>> {
        Ok(self
            .store
            .tables
            .hospital_links
            .get(&patient_id)
            .and_then(|links| links.iter().min_by_key(|l| l.linked_at).cloned()))
    }

    async fn create_appointment_request(&mut self, request: &AppointmentRequest) -> StoreResult<()> {
        self.appointment_requests.push(request.clone());
        Ok(())
    }

    async fn active_adhoc_triage(&mut self, patient_id: Uuid) -> StoreResult<Option<TriageCase>> {
        self.lock_patient(patient_id).await;
        let staged = self
            .triage_cases
            .values()
            .find(|case| case.patient_id == patient_id && case.is_active_ad_hoc())
            .cloned();
        Ok(staged.or_else(|| self.store.committed_active_adhoc(patient_id)))
    }

    async fn save_triage_case(&mut self, case: &TriageCase) -> StoreResult<()> {
        self.triage_cases.insert(case.id, case.clone());
        Ok(())
    }
}

#[async_trait]
impl ChatTransaction for MemoryTransaction {
    async fn replace_session(&mut self, session: &ChatSession) -> StoreResult<()> {
        self.session = Some(session.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction {
            store,
            appointment_requests,
            triage_cases,
            session,
            patient_guards,
        } = *self;

        for request in appointment_requests {
            store.tables.appointment_requests.insert(request.id, request);
        }
        for (id, case) in triage_cases {
            store.tables.triage_cases.insert(id, case);
        }
        if let Some(session) = session {
            store.tables.sessions.insert(session.id, session);
        }
        drop(patient_guards);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionCall, ActionDispatcher, CREATE_TRIAGE};
    use crate::models::{TriageSource, TriageUrgency};
    use serde_json::json;
    use std::time::Duration;

    fn triage(patient_id: Uuid) -> TriageCase {
        let now = Utc::now();
        TriageCase {
            id: Uuid::new_v4(),
            patient_id,
            symptoms: "cough".into(),
            urgency_level: TriageUrgency::Low,
            notes: None,
            source: TriageSource::AdHoc,
            active: true,
            language: Language::Hausa,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_uncommitted_writes_are_discarded() {
        let store = MemoryStore::new();
        let patient_id = Uuid::new_v4();

        let mut tx = store.begin().await.unwrap();
        tx.save_triage_case(&triage(patient_id)).await.unwrap();
        assert!(tx.active_adhoc_triage(patient_id).await.unwrap().is_some());
        drop(tx);

        assert!(store.triage_cases_for(patient_id).is_empty());
    }

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryStore::new();
        let patient_id = Uuid::new_v4();
        let session = ChatSession::new(patient_id, Language::Igbo);

        let mut tx = store.begin().await.unwrap();
        tx.save_triage_case(&triage(patient_id)).await.unwrap();
        tx.replace_session(&session).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(store.triage_cases_for(patient_id).len(), 1);
        assert_eq!(store.chat_session(session.id).await.unwrap(), Some(session));
    }

    #[tokio::test]
    async fn test_first_hospital_link_is_earliest() {
        let store = MemoryStore::new();
        let patient_id = Uuid::new_v4();
        let first = store.link_hospital(patient_id, Uuid::new_v4());
        store.link_hospital(patient_id, Uuid::new_v4());

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.first_hospital_link(patient_id).await.unwrap(), Some(first));
        assert_eq!(tx.first_hospital_link(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_turns_share_one_adhoc_case() {
        let store = MemoryStore::new();
        let patient = store.insert_patient(Uuid::new_v4(), Some(Language::Yoruba));
        let call = ActionCall {
            name: CREATE_TRIAGE.to_string(),
            parameters: json!({ "symptoms": "fever" }).as_object().cloned().unwrap(),
        };

        let mut first = store.begin().await.unwrap();
        ActionDispatcher::new()
            .dispatch_all(&mut *first, &patient, std::slice::from_ref(&call))
            .await
            .unwrap();

        let second = tokio::spawn({
            let store = store.clone();
            let patient = patient.clone();
            async move {
                let mut tx = store.begin().await.unwrap();
                ActionDispatcher::new()
                    .dispatch_all(&mut *tx, &patient, &[call])
                    .await
                    .unwrap();
                tx.commit().await.unwrap();
            }
        });

        // The second turn waits for the first to finish
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!second.is_finished());

        first.commit().await.unwrap();
        second.await.unwrap();

        let active: Vec<TriageCase> = store
            .triage_cases_for(patient.patient_id)
            .into_iter()
            .filter(TriageCase::is_active_ad_hoc)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].symptoms, "fever");
    }

    #[tokio::test]
    async fn test_dropped_transaction_releases_patient() {
        let store = MemoryStore::new();
        let patient_id = Uuid::new_v4();

        let mut abandoned = store.begin().await.unwrap();
        abandoned.active_adhoc_triage(patient_id).await.unwrap();
        drop(abandoned);

        let mut next = store.begin().await.unwrap();
        let lookup = tokio::time::timeout(Duration::from_secs(1), next.active_adhoc_triage(patient_id)).await;
        assert!(matches!(lookup, Ok(Ok(None))));
    }
}
