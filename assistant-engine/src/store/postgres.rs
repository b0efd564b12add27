use async_trait::async_trait;
use database_layer::DatabasePool;
use kliniq_types::Language;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{Postgres, Row, Transaction};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

use super::{CareActions, ChatStore, ChatTransaction, StoreError, StoreResult, VoiceMessageStore};
use crate::models::{
    AppointmentRequest, ChatSession, ChatTurn, HospitalLink, PatientProfile, TranscriptEntry, TriageCase, TurnLog,
    VoiceMessage,
};

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    db: DatabasePool,
}

impl PgStore {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }
}

/// Transaction-scoped lock serializing ad-hoc triage work per patient
const ADVISORY_PATIENT_LOCK: &str = "SELECT pg_advisory_xact_lock(hashtext($1))";

fn parse_code<T>(value: &str) -> StoreResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| StoreError::Corrupt(e.to_string()))
}

fn parse_optional_language(value: Option<String>) -> StoreResult<Option<Language>> {
    value.as_deref().map(parse_code).transpose()
}

fn session_from_row(row: &PgRow) -> StoreResult<ChatSession> {
    let language: String = row.try_get("language")?;
    let turns: Json<Vec<ChatTurn>> = row.try_get("turns")?;

    Ok(ChatSession {
        id: row.try_get("id")?,
        patient_id: row.try_get("patient_id")?,
        language: parse_code(&language)?,
        title: row.try_get("title")?,
        turns: TurnLog::new(turns.0),
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn triage_from_row(row: &PgRow) -> StoreResult<TriageCase> {
    let urgency_level: String = row.try_get("urgency_level")?;
    let source: String = row.try_get("source")?;
    let language: String = row.try_get("language")?;

    Ok(TriageCase {
        id: row.try_get("id")?,
        patient_id: row.try_get("patient_id")?,
        symptoms: row.try_get("symptoms")?,
        urgency_level: parse_code(&urgency_level)?,
        notes: row.try_get("notes")?,
        source: parse_code(&source)?,
        active: row.try_get("active")?,
        language: parse_code(&language)?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[async_trait]
impl ChatStore for PgStore {
    async fn patient_profile(&self, patient_id: Uuid) -> StoreResult<Option<PatientProfile>> {
        let row = sqlx::query("SELECT id, preferred_language FROM patients WHERE id = $1")
            .bind(patient_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(|row| -> StoreResult<PatientProfile> {
            Ok(PatientProfile {
                patient_id: row.try_get("id")?,
                preferred_language: parse_optional_language(row.try_get("preferred_language")?)?,
            })
        })
        .transpose()
    }

    async fn chat_session(&self, session_id: Uuid) -> StoreResult<Option<ChatSession>> {
        let row = sqlx::query(
            r#"
            SELECT id, patient_id, language, title, turns, active, created_at, updated_at
            FROM chat_sessions
            WHERE id = $1
            "#,
        )
        .bind(session_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(session_from_row).transpose()
    }

    async fn begin(&self) -> StoreResult<Box<dyn ChatTransaction>> {
        let tx = self.db.begin().await?;
        Ok(Box::new(PgChatTransaction { tx }))
    }

    async fn is_healthy(&self) -> bool {
        self.db.is_healthy().await
    }
}

#[async_trait]
impl VoiceMessageStore for PgStore {
    async fn voice_message(&self, message_id: Uuid) -> StoreResult<Option<VoiceMessage>> {
        let row = sqlx::query(
            r#"
            SELECT id, conversation_id, attachment_url, original_language, transcripts
            FROM voice_messages
            WHERE id = $1
            "#,
        )
        .bind(message_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.map(|row| -> StoreResult<VoiceMessage> {
            let transcripts: Json<BTreeMap<Language, TranscriptEntry>> = row.try_get("transcripts")?;
            Ok(VoiceMessage {
                id: row.try_get("id")?,
                conversation_id: row.try_get("conversation_id")?,
                attachment_url: row.try_get("attachment_url")?,
                original_language: parse_optional_language(row.try_get("original_language")?)?,
                transcripts: transcripts.0,
            })
        })
        .transpose()
    }

    async fn save_voice_message(&self, message: &VoiceMessage) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE voice_messages
            SET original_language = $2, transcripts = $3, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(message.id)
        .bind(message.original_language.map(|l| l.code()))
        .bind(Json(&message.transcripts))
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Corrupt(format!("voice message {} disappeared", message.id)));
        }
        Ok(())
    }
}

struct PgChatTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CareActions for PgChatTransaction {
    async fn first_hospital_link(&mut self, patient_id: Uuid) -> StoreResult<Option<HospitalLink>> {
        let row = sqlx::query(
            r#"
            SELECT id, patient_id, hospital_id, linked_at
            FROM patient_hospitals
            WHERE patient_id = $1
            ORDER BY linked_at ASC
            LIMIT 1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(|row| -> StoreResult<HospitalLink> {
            Ok(HospitalLink {
                id: row.try_get("id")?,
                patient_id: row.try_get("patient_id")?,
                hospital_id: row.try_get("hospital_id")?,
                linked_at: row.try_get("linked_at")?,
            })
        })
        .transpose()
    }

    async fn create_appointment_request(&mut self, request: &AppointmentRequest) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO appointment_requests
                (id, patient_id, patient_hospital_id, hospital_id, reason, urgency, department,
                 appointment_type, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(request.id)
        .bind(request.patient_id)
        .bind(request.patient_hospital_id)
        .bind(request.hospital_id)
        .bind(&request.reason)
        .bind(request.urgency.as_str())
        .bind(&request.department)
        .bind(request.appointment_type.as_str())
        .bind(request.status.as_str())
        .bind(request.created_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn active_adhoc_triage(&mut self, patient_id: Uuid) -> StoreResult<Option<TriageCase>> {
        // Held until commit or rollback; covers the case where no row exists yet
        sqlx::query(ADVISORY_PATIENT_LOCK)
            .bind(patient_id.to_string())
            .execute(&mut *self.tx)
            .await?;

        let row = sqlx::query(
            r#"
            SELECT id, patient_id, symptoms, urgency_level, notes, source, active, language, created_at, updated_at
            FROM triage_cases
            WHERE patient_id = $1 AND source = 'ad_hoc' AND active
            ORDER BY created_at ASC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&mut *self.tx)
        .await?;

        row.as_ref().map(triage_from_row).transpose()
    }

    async fn save_triage_case(&mut self, case: &TriageCase) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO triage_cases
                (id, patient_id, symptoms, urgency_level, notes, source, active, language, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                symptoms = EXCLUDED.symptoms,
                urgency_level = EXCLUDED.urgency_level,
                notes = EXCLUDED.notes,
                active = EXCLUDED.active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(case.id)
        .bind(case.patient_id)
        .bind(&case.symptoms)
        .bind(case.urgency_level.as_str())
        .bind(&case.notes)
        .bind(case.source.as_str())
        .bind(case.active)
        .bind(case.language.code())
        .bind(case.created_at)
        .bind(case.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ChatTransaction for PgChatTransaction {
    async fn replace_session(&mut self, session: &ChatSession) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO chat_sessions (id, patient_id, language, title, turns, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                turns = EXCLUDED.turns,
                active = EXCLUDED.active,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(session.id)
        .bind(session.patient_id)
        .bind(session.language.code())
        .bind(&session.title)
        .bind(Json(session.turns.turns()))
        .bind(session.active)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&mut *self.tx)
        .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TriageSource, TriageUrgency};

    #[test]
    fn test_stored_codes_parse() {
        assert_eq!(parse_code::<TriageSource>("ad_hoc").unwrap(), TriageSource::AdHoc);
        assert_eq!(parse_code::<TriageUrgency>("high").unwrap(), TriageUrgency::High);
        assert_eq!(parse_optional_language(None).unwrap(), None);
        assert_eq!(
            parse_optional_language(Some("hausa".to_string())).unwrap(),
            Some(Language::Hausa)
        );
    }

    #[test]
    fn test_unknown_stored_code_is_corrupt() {
        let err = parse_optional_language(Some("klingon".to_string())).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
        assert!(matches!(parse_code::<TriageUrgency>("extreme"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_transcript_map_json_uses_language_codes() {
        let mut transcripts = BTreeMap::new();
        transcripts.insert(
            Language::Yoruba,
            TranscriptEntry {
                text: "ori mi n dun mi".to_string(),
                origin: crate::models::TranscriptOrigin::Translated,
            },
        );

        let value = serde_json::to_value(&transcripts).unwrap();
        assert_eq!(value["yoruba"]["origin"], "translated");

        let back: BTreeMap<Language, TranscriptEntry> = serde_json::from_value(value).unwrap();
        assert_eq!(back, transcripts);
    }
}
