//! Chat input grammar.
//!
//! Accepted form: `Patient: <id>, the patient said: I have <symptom>[, <symptom>...]`

use regex::Regex;
use std::sync::LazyLock;

/// Reply shown when input does not follow the grammar.
pub const FORMAT_HINT: &str = "Please follow the pattern: \
     Patient: <id>, the patient said: I have <symptom>, <symptom>, ...";

static INPUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)^\s*Patient:\s*(?P<id>[^,]+?)\s*,\s*the patient said:\s*"?(?i:I have)\b(?P<symptoms>.*?)"?\s*$"#,
    )
    .unwrap()
});

/// Result of parsing one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedInput {
    Parsed {
        patient_id: String,
        symptoms: Vec<String>,
    },
    Malformed,
}

impl ParsedInput {
    pub fn is_malformed(&self) -> bool {
        matches!(self, ParsedInput::Malformed)
    }
}

/// Parse a chat message into a patient id and its ordered symptom list.
pub fn parse_input(text: &str) -> ParsedInput {
    let Some(caps) = INPUT_PATTERN.captures(text) else {
        return ParsedInput::Malformed;
    };

    let patient_id = caps["id"].trim();
    if patient_id.is_empty() {
        return ParsedInput::Malformed;
    }

    ParsedInput::Parsed {
        patient_id: patient_id.to_string(),
        symptoms: split_symptoms(&caps["symptoms"]),
    }
}

fn split_symptoms(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches(['.', '?', '!']).trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
