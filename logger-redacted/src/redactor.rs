use base64::{engine::general_purpose, Engine as _};
use lazy_static::lazy_static;
use regex::Regex;
use sha2::{Digest, Sha256};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("email pattern");
    // Nigerian mobile numbers: +234 / 234 / 0 prefix followed by a 7xx, 8xx or 9xx operator code
    static ref NG_PHONE_REGEX: Regex =
        Regex::new(r"(?:\+234|\b234|\b0)[-.\s]?[789][01]\d[-.\s]?\d{3}[-.\s]?\d{4}\b").expect("phone pattern");
    static ref INTL_PHONE_REGEX: Regex =
        Regex::new(r"\+\d{1,3}[-.\s]?\(?\d{2,4}\)?[-.\s]?\d{3,4}[-.\s]?\d{3,4}\b").expect("intl phone pattern");
    static ref PATIENT_NUMBER_REGEX: Regex =
        Regex::new(r"\bKLQ-[A-Za-z0-9]{4,}\b").expect("patient number pattern");
}

/// PII redaction configuration
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub redact_emails: bool,
    pub redact_phones: bool,
    pub redact_patient_numbers: bool,
    /// Replace values with a short stable hash so log lines can still be correlated
    pub hash_for_correlation: bool,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            redact_emails: true,
            redact_phones: true,
            redact_patient_numbers: true,
            hash_for_correlation: true,
        }
    }
}

/// PII redactor for patient-authored and model-generated text
#[derive(Debug, Clone, Default)]
pub struct PiiRedactor {
    config: RedactionConfig,
    disabled: bool,
}

impl PiiRedactor {
    pub fn new(config: RedactionConfig) -> Self {
        Self {
            config,
            disabled: false,
        }
    }

    /// A redactor that passes text through untouched (local debugging only)
    pub fn passthrough() -> Self {
        Self {
            config: RedactionConfig::default(),
            disabled: true,
        }
    }

    pub fn redact(&self, text: &str) -> String {
        if self.disabled {
            return text.to_string();
        }

        let mut result = text.to_string();

        if self.config.redact_emails {
            result = self.replace(&EMAIL_REGEX, &result, "EMAIL", "***@***");
        }

        if self.config.redact_phones {
            result = self.replace(&NG_PHONE_REGEX, &result, "PHONE", "***-****-****");
            result = self.replace(&INTL_PHONE_REGEX, &result, "PHONE", "***-****-****");
        }

        if self.config.redact_patient_numbers {
            result = self.replace(&PATIENT_NUMBER_REGEX, &result, "PATIENT", "KLQ-****");
        }

        result
    }

    /// Redacted, bounded preview of free text suitable for a log field.
    ///
    /// Truncation counts characters, not bytes, so Yoruba/Hausa/Igbo diacritics
    /// are never split.
    pub fn preview(&self, text: &str, max_chars: usize) -> String {
        let redacted = self.redact(text);
        let total = redacted.chars().count();
        if total <= max_chars {
            return redacted;
        }
        let head: String = redacted.chars().take(max_chars).collect();
        format!("{}... ({} chars)", head, total)
    }

    fn replace(&self, pattern: &Regex, text: &str, label: &str, mask: &str) -> String {
        pattern
            .replace_all(text, |caps: &regex::Captures| {
                if self.config.hash_for_correlation {
                    format!("{}[{}]", label, hash_value(&caps[0]))
                } else {
                    mask.to_string()
                }
            })
            .to_string()
    }
}

fn hash_value(value: &str) -> String {
    let digest = Sha256::digest(value.as_bytes());
    general_purpose::STANDARD_NO_PAD.encode(&digest[..6])
}
