//! System directive and message sequence sent to the model for a chat turn

use inference_service::ChatMessage;
use kliniq_types::Language;
use serde::{Deserialize, Serialize};

use crate::models::{ChatTurn, TurnRole};

/// Conversation topic selecting the system directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatTopic {
    #[default]
    General,
    Triage,
    Appointment,
}

const GENERAL_PROMPT: &str = "\
You are Kliniq AI, a healthcare assistant for patients in Nigeria. Help patients understand their \
health, their medications and their care plan, in plain and warm language.

## WHAT YOU DO:
- Explain conditions, symptoms and treatments in simple terms
- Use the patient information below (doctor notes, upcoming visits) when it is relevant
- Help the patient request appointments and record symptoms for triage

## RULES:
- Do not diagnose. Recommend a healthcare professional for any diagnosis.
- For emergency signs such as chest pain, trouble breathing, heavy bleeding or very high fever, \
tell the patient to call 112 at once and request an urgent appointment.
- Say so when you do not know something.
- When you cite a doctor note, give the doctor's name and the date.";

const TRIAGE_PROMPT: &str = "\
You are the Kliniq AI triage assistant. Assess the patient's symptoms and decide how urgent they are.

## HOW TO TRIAGE:
- Ask about onset, duration and severity when they are unclear
- Treat chest pain, trouble breathing, heavy bleeding, confusion and very high fever as emergencies: \
tell the patient to call 112 now
- Classify urgency as low, medium or high and explain the next step in one or two sentences
- Do not diagnose";

const APPOINTMENT_PROMPT: &str = "\
You are the Kliniq AI appointment assistant. Help the patient work out which kind of visit they need \
and request it for them.

## HOW TO HELP:
- Find out the reason for the visit and how soon it is needed
- Suggest a department when the reason makes it clear, otherwise use General Practice
- Patients can only request appointments at hospitals they are linked to
- Urgent symptoms need an urgent request and advice to call 112";

const ACTION_PROTOCOL_INTRO: &str = "\
## ACTIONS:
You can act for the patient by adding an action block to your reply, next to your normal message:

<TOOL_CALL>
{\"tool\": \"action_name\", \"parameters\": {...}}
</TOOL_CALL>

The block is removed before the patient sees your reply and is carried out automatically.";

const REQUEST_APPOINTMENT_DOC: &str = "\
### request_appointment
Request a visit at the patient's hospital. Use it when the patient asks for an appointment or \
their symptoms need a doctor.
- reason (required): why the visit is needed
- urgency (required): \"low\", \"normal\" or \"urgent\"
- department (optional): for example \"General Practice\", \"Cardiology\" or \"Emergency\"

<TOOL_CALL>
{\"tool\": \"request_appointment\", \"parameters\": {\"reason\": \"Headaches for three days with nausea\", \"urgency\": \"normal\", \"department\": \"General Practice\"}}
</TOOL_CALL>";

const CREATE_TRIAGE_DOC: &str = "\
### create_triage
Record the patient's symptoms for clinical review. Use it when the patient describes symptoms. \
Calling it again during the same conversation updates the open case.
- symptoms (required): what the patient reports
- urgency_level (required): \"low\", \"medium\" or \"high\"
- notes (optional): observations or advice given

<TOOL_CALL>
{\"tool\": \"create_triage\", \"parameters\": {\"symptoms\": \"Chest pain and shortness of breath for one hour\", \"urgency_level\": \"high\", \"notes\": \"Told to call 112\"}}
</TOOL_CALL>";

impl ChatTopic {
    fn base_prompt(&self) -> &'static str {
        match self {
            ChatTopic::General => GENERAL_PROMPT,
            ChatTopic::Triage => TRIAGE_PROMPT,
            ChatTopic::Appointment => APPOINTMENT_PROMPT,
        }
    }

    fn documented_actions(&self) -> &'static [&'static str] {
        match self {
            ChatTopic::General => &[REQUEST_APPOINTMENT_DOC, CREATE_TRIAGE_DOC],
            ChatTopic::Triage => &[CREATE_TRIAGE_DOC],
            ChatTopic::Appointment => &[REQUEST_APPOINTMENT_DOC],
        }
    }
}

/// Restricts replies to the preferred language and English.
///
/// Only a prompt instruction; replies are not checked for compliance.
pub fn language_directive(language: Language) -> String {
    match language {
        Language::English => "## PATIENT'S PREFERRED LANGUAGE: English\n\
            Reply in English only. Never use another language."
            .to_string(),
        other => {
            let name = other.display_name();
            format!(
                "## PATIENT'S PREFERRED LANGUAGE: {name}\n\
                 Reply in {name} when the patient writes in {name} and in English when they write in English. \
                 Never use any language other than {name} or English."
            )
        }
    }
}

/// Full system directive for a topic
pub fn system_prompt(topic: ChatTopic, language: Language, domain_context: Option<&str>) -> String {
    let mut sections = vec![topic.base_prompt().to_string()];

    sections.push(ACTION_PROTOCOL_INTRO.to_string());
    sections.extend(topic.documented_actions().iter().map(|doc| doc.to_string()));

    if let Some(context) = domain_context.map(str::trim).filter(|c| !c.is_empty()) {
        sections.push(format!("## PATIENT INFORMATION:\n{}", context));
    }

    sections.push(language_directive(language));
    sections.join("\n\n")
}

/// Inputs for one model call
#[derive(Debug, Clone)]
pub struct TurnContext<'a> {
    pub topic: ChatTopic,
    pub language: Language,
    pub domain_context: Option<&'a str>,
    /// Most recent prior turns, oldest first
    pub history: &'a [ChatTurn],
    pub user_message: &'a str,
}

/// System message, then the history window, then the new user message
pub fn assemble_messages(context: &TurnContext<'_>) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(context.history.len() + 2);
    messages.push(ChatMessage::system(system_prompt(
        context.topic,
        context.language,
        context.domain_context,
    )));
    messages.extend(context.history.iter().map(|turn| match turn.role {
        TurnRole::User => ChatMessage::user(turn.content.clone()),
        TurnRole::Assistant => ChatMessage::assistant(turn.content.clone()),
    }));
    messages.push(ChatMessage::user(context.user_message));
    messages
}
