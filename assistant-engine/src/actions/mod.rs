//! Action calls embedded in model replies
//!
//! The model asks for side effects by writing blocks such as
//!
//! ```text
//! <TOOL_CALL>
//! {"tool": "create_triage", "parameters": {"symptoms": "fever for 3 days", "urgency_level": "medium"}}
//! </TOOL_CALL>
//! ```
//!
//! [`extract_action_calls`] pulls them out of the reply, [`ActionDispatcher`]
//! executes them in order of appearance.

pub mod dispatcher;
pub mod extractor;

pub use dispatcher::*;
pub use extractor::*;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub const REQUEST_APPOINTMENT: &str = "request_appointment";
pub const CREATE_TRIAGE: &str = "create_triage";

/// A parsed action block, kept verbatim in the turn log for audit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionCall {
    pub name: String,
    pub parameters: Map<String, Value>,
}

/// Supported actions, selected by name
#[derive(Debug, Clone, PartialEq)]
pub enum AssistantAction<'a> {
    RequestAppointment(&'a Map<String, Value>),
    CreateTriage(&'a Map<String, Value>),
    Unknown { name: &'a str },
}

impl<'a> From<&'a ActionCall> for AssistantAction<'a> {
    fn from(call: &'a ActionCall) -> Self {
        match call.name.as_str() {
            REQUEST_APPOINTMENT => AssistantAction::RequestAppointment(&call.parameters),
            CREATE_TRIAGE => AssistantAction::CreateTriage(&call.parameters),
            name => AssistantAction::Unknown { name },
        }
    }
}

/// Why an action did not take effect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionFailure {
    UnknownAction,
    MissingParameter { parameter: String },
    NoLinkedHospital,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResult {
    pub action: String,
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub referenced_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<ActionFailure>,
}

impl ActionResult {
    pub fn succeeded(action: &str, message: impl Into<String>, referenced_id: Uuid) -> Self {
        Self {
            action: action.to_string(),
            success: true,
            message: message.into(),
            referenced_id: Some(referenced_id),
            failure: None,
        }
    }

    pub fn failed(action: &str, message: impl Into<String>, failure: ActionFailure) -> Self {
        Self {
            action: action.to_string(),
            success: false,
            message: message.into(),
            referenced_id: None,
            failure: Some(failure),
        }
    }
}

/// Append one line per successful action to the visible reply
pub fn annotate_reply(reply: &str, results: &[ActionResult]) -> String {
    let notes: Vec<String> = results
        .iter()
        .filter(|r| r.success)
        .map(|r| format!("✅ {}", r.message))
        .collect();

    if notes.is_empty() {
        return reply.to_string();
    }
    if reply.is_empty() {
        return notes.join("\n");
    }
    format!("{}\n\n{}", reply, notes.join("\n"))
}
