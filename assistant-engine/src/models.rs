use chrono::{DateTime, Utc};
use kliniq_types::Language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use uuid::Uuid;

use crate::actions::{ActionCall, ActionResult};

/// The parts of a patient record the assistant reads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub patient_id: Uuid,
    pub preferred_language: Option<Language>,
}

impl PatientProfile {
    /// Preferred language, English when unset
    pub fn language(&self) -> Language {
        self.preferred_language.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalLink {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub hospital_id: Uuid,
    pub linked_at: DateTime<Utc>,
}

/// Declares a text-backed enum with lenient parsing for stored codes
macro_rules! text_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $code:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($code => Ok($name::$variant),)+
                    other => Err(format!("invalid {}: {}", stringify!($name), other)),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

text_enum!(AppointmentUrgency {
    Low => "low",
    Normal => "normal",
    Urgent => "urgent",
});

text_enum!(AppointmentType {
    InPerson => "in_person",
    Video => "video",
});

text_enum!(RequestStatus {
    Pending => "pending",
    Approved => "approved",
    Declined => "declined",
});

text_enum!(TriageUrgency {
    Low => "low",
    Medium => "medium",
    High => "high",
});

text_enum!(
    /// How a triage case was opened
    TriageSource {
        AdHoc => "ad_hoc",
        Submitted => "submitted",
    }
);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub patient_hospital_id: Uuid,
    pub hospital_id: Uuid,
    pub reason: String,
    pub urgency: AppointmentUrgency,
    pub department: String,
    pub appointment_type: AppointmentType,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageCase {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub symptoms: String,
    pub urgency_level: TriageUrgency,
    pub notes: Option<String>,
    pub source: TriageSource,
    pub active: bool,
    pub language: Language,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TriageCase {
    pub fn is_active_ad_hoc(&self) -> bool {
        self.active && self.source == TriageSource::AdHoc
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One entry of a session's turn log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_calls: Option<Vec<ActionCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_results: Option<Vec<ActionResult>>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
            timestamp,
            action_calls: None,
            action_results: None,
        }
    }

    pub fn assistant(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
            timestamp,
            action_calls: None,
            action_results: None,
        }
    }

    /// Attach the audit pair; empty call lists are not recorded
    pub fn with_actions(mut self, calls: Vec<ActionCall>, results: Vec<ActionResult>) -> Self {
        if !calls.is_empty() {
            self.action_calls = Some(calls);
            self.action_results = Some(results);
        }
        self
    }
}

/// Append-only, ordered turn log.
///
/// Never mutated in place: [`TurnLog::extended`] builds the replacement that
/// is then written whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnLog(Vec<ChatTurn>);

impl TurnLog {
    pub fn new(turns: Vec<ChatTurn>) -> Self {
        Self(turns)
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The most recent `n` turns, oldest first
    pub fn recent(&self, n: usize) -> &[ChatTurn] {
        let start = self.0.len().saturating_sub(n);
        self.0.get(start..).unwrap_or_default()
    }

    pub fn extended(&self, turns: impl IntoIterator<Item = ChatTurn>) -> TurnLog {
        let mut next = self.0.clone();
        next.extend(turns);
        TurnLog(next)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub language: Language,
    pub title: Option<String>,
    pub turns: TurnLog,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(patient_id: Uuid, language: Language) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            patient_id,
            language,
            title: None,
            turns: TurnLog::default(),
            active: true,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Where a cached transcript came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptOrigin {
    /// Speech recognition output in the spoken language
    Transcribed,
    Translated,
    /// Translation failed; the text is the untranslated origin transcript
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub text: String,
    pub origin: TranscriptOrigin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceMessage {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub attachment_url: Option<String>,
    /// Spoken language; `None` until the first transcription
    pub original_language: Option<Language>,
    pub transcripts: BTreeMap<Language, TranscriptEntry>,
}

impl VoiceMessage {
    pub fn new(conversation_id: Uuid, attachment_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            conversation_id,
            attachment_url: Some(attachment_url.into()),
            original_language: None,
            transcripts: BTreeMap::new(),
        }
    }

    pub fn fallback_languages(&self) -> Vec<Language> {
        self.transcripts
            .iter()
            .filter(|(_, entry)| entry.origin == TranscriptOrigin::Fallback)
            .map(|(language, _)| *language)
            .collect()
    }
}
