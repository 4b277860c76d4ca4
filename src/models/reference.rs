//! Decoder for the EPO reference naming convention.
//!
//! References look like `T190123EP1`: a decision-type letter, a two-digit
//! year, a four-digit serial, a language/publication letter code and a
//! running number. Every function here is total: a reference that does not
//! follow the convention falls back instead of failing.

use lazy_static::lazy_static;
use regex::Regex;

use super::{DecisionType, Language};

lazy_static! {
    // FP1, EP12, DP3 ... anywhere in the reference
    static ref KNOWN_LANGUAGE_CODE: Regex = Regex::new(r"(FP\d+|EP\d+|DP\d+)").unwrap();

    // Letter code directly before the trailing number
    static ref TRAILING_LANGUAGE_CODE: Regex = Regex::new(r"([A-Z]{1,2})\d+$").unwrap();

    // Type letter, year, serial, optional extra digits, letter code, number
    static ref CASE_NUMBER: Regex = Regex::new(r"^([GJTDW])(\d{2})(\d{4})\d*[A-Z]+\d+").unwrap();
}

/// Everything the convention encodes about a decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedReference {
    pub language: Language,
    pub decision_type: DecisionType,
    pub case_number: String,
}

/// Decode a reference into language, decision type and formatted case number
pub fn decode(reference: &str) -> DecodedReference {
    DecodedReference {
        language: language_from_reference(reference),
        decision_type: decision_type_from_reference(reference),
        case_number: format_case_number(reference),
    }
}

/// Whether the reference carries one of the FP/EP/DP language codes
pub fn has_known_language_code(reference: &str) -> bool {
    KNOWN_LANGUAGE_CODE.is_match(reference)
}

/// Language from the trailing letter code, e.g. `EP` in `T190123EP1`
pub fn language_from_reference(reference: &str) -> Language {
    TRAILING_LANGUAGE_CODE
        .captures(reference)
        .and_then(|caps| caps.get(1))
        .map(|code| Language::from_reference_code(code.as_str()))
        .unwrap_or(Language::Unknown)
}

/// Decision type from the leading character of the reference
pub fn decision_type_from_reference(reference: &str) -> DecisionType {
    reference
        .get(..1)
        .map(DecisionType::from_code)
        .unwrap_or(DecisionType::Unknown)
}

/// Format `T190123EP1` as `T 123/19`; non-matching references pass through
pub fn format_case_number(reference: &str) -> String {
    let Some(caps) = CASE_NUMBER.captures(reference) else {
        return reference.to_string();
    };

    let decision_type = &caps[1];
    let year = &caps[2];
    let serial = caps[3].trim_start_matches('0');
    let serial = if serial.is_empty() { "0" } else { serial };

    format!("{} {}/{}", decision_type, serial, year)
}
