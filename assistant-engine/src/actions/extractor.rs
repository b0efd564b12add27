use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use super::ActionCall;

lazy_static! {
    static ref ACTION_BLOCK: Regex =
        Regex::new(r"(?s)<TOOL_CALL>(.*?)</TOOL_CALL>").expect("action block pattern");
    static ref EXCESS_BLANK_LINES: Regex = Regex::new(r"\n{3,}").expect("blank line pattern");
}

/// Result of scanning a model reply
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Well-formed calls in order of appearance
    pub calls: Vec<ActionCall>,
    /// Reply with every block removed
    pub cleaned_text: String,
    /// Blocks that failed to parse and were dropped
    pub dropped: usize,
}

/// Extract every action block from `raw`.
///
/// Malformed blocks are dropped and counted, never reported as errors. A reply
/// without blocks is returned byte-for-byte.
pub fn extract_action_calls(raw: &str) -> Extraction {
    let mut calls = Vec::new();
    let mut dropped = 0;

    for captures in ACTION_BLOCK.captures_iter(raw) {
        match captures.get(1).and_then(|inner| parse_block(inner.as_str())) {
            Some(call) => calls.push(call),
            None => dropped += 1,
        }
    }

    if calls.is_empty() && dropped == 0 {
        return Extraction {
            calls,
            cleaned_text: raw.to_string(),
            dropped,
        };
    }

    let stripped = ACTION_BLOCK.replace_all(raw, "");
    let cleaned_text = EXCESS_BLANK_LINES
        .replace_all(&stripped, "\n\n")
        .trim()
        .to_string();

    Extraction {
        calls,
        cleaned_text,
        dropped,
    }
}

fn parse_block(inner: &str) -> Option<ActionCall> {
    let value: Value = serde_json::from_str(inner.trim()).ok()?;
    let object = value.as_object()?;

    let name = object
        .get("tool")
        .or_else(|| object.get("name"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())?;

    let parameters = match object.get("parameters") {
        None | Some(Value::Null) => Map::new(),
        Some(Value::Object(map)) => map.clone(),
        Some(_) => return None,
    };

    Some(ActionCall {
        name: name.to_string(),
        parameters,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reply_without_blocks_is_unmodified() {
        let raw = "  Of course! Send me the text and I'll translate it.\n\n\n\nAnything else?  ";
        let extraction = extract_action_calls(raw);
        assert!(extraction.calls.is_empty());
        assert_eq!(extraction.dropped, 0);
        assert_eq!(extraction.cleaned_text, raw);
    }

    #[test]
    fn test_two_valid_blocks_and_one_malformed() {
        let raw = r#"I have noted your symptoms.
<TOOL_CALL>
{"tool": "create_triage", "parameters": {"symptoms": "chest pain", "urgency_level": "high"}}
</TOOL_CALL>
<TOOL_CALL>{"tool": "request_appointment", "parameters": {"reason": "chest pain" </TOOL_CALL>


Please call 112 now.
<TOOL_CALL>{"name": "request_appointment", "parameters": {"reason": "chest pain", "urgency": "urgent"}}</TOOL_CALL>"#;

        let extraction = extract_action_calls(raw);

        assert_eq!(extraction.calls.len(), 2);
        assert_eq!(extraction.dropped, 1);
        assert_eq!(extraction.calls[0].name, "create_triage");
        assert_eq!(extraction.calls[1].name, "request_appointment");
        assert_eq!(extraction.calls[1].parameters["urgency"], "urgent");
        assert!(!extraction.cleaned_text.contains("TOOL_CALL"));
        assert_eq!(
            extraction.cleaned_text,
            "I have noted your symptoms.\n\nPlease call 112 now."
        );
    }

    #[test]
    fn test_tool_key_wins_over_name() {
        let raw = r#"<TOOL_CALL>{"tool": "create_triage", "name": "request_appointment"}</TOOL_CALL>"#;
        let extraction = extract_action_calls(raw);
        assert_eq!(extraction.calls[0].name, "create_triage");
        assert!(extraction.calls[0].parameters.is_empty());
        assert_eq!(extraction.cleaned_text, "");
    }

    #[test]
    fn test_non_object_parameters_are_malformed() {
        let raw = r#"ok <TOOL_CALL>{"tool": "create_triage", "parameters": "fever"}</TOOL_CALL>"#;
        let extraction = extract_action_calls(raw);
        assert!(extraction.calls.is_empty());
        assert_eq!(extraction.dropped, 1);
        assert_eq!(extraction.cleaned_text, "ok");
    }

    #[test]
    fn test_block_without_name_is_dropped() {
        let raw = r#"<TOOL_CALL>{"parameters": {}}</TOOL_CALL>Hello"#;
        let extraction = extract_action_calls(raw);
        assert!(extraction.calls.is_empty());
        assert_eq!(extraction.dropped, 1);
        assert_eq!(extraction.cleaned_text, "Hello");
    }
}
