//! Symptom Extractor
//!
//! Pulls known symptom keywords out of a free-text description with a fixed
//! keyword pattern. No model is involved.

use std::sync::LazyLock;

use regex::Regex;

/// Keywords recognized in patient descriptions, matched as whole words.
pub const SYMPTOM_KEYWORDS: &[&str] = &[
    "headache",
    "fever",
    "cough",
    "fatigue",
    "nausea",
    "dizziness",
    "pain",
    "swelling",
    "rash",
    "chills",
    "sore throat",
    "shortness of breath",
    "vomiting",
    "diarrhea",
    "muscle aches",
    "joint pain",
    "loss of taste or smell",
    "painful",
    "severe",
    "mild",
    "chronic",
];

static SYMPTOM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = SYMPTOM_KEYWORDS.iter().map(|k| regex::escape(k)).collect();
    Regex::new(&format!(r"\b({})\b", alternatives.join("|")))
        .expect("symptom keyword pattern is valid")
});

/// Distinct symptom keywords in `text`, in order of first appearance.
pub fn extract_symptoms(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut found: Vec<String> = Vec::new();

    for m in SYMPTOM_PATTERN.find_iter(&lowered) {
        let keyword = m.as_str();
        if !found.iter().any(|f| f == keyword) {
            found.push(keyword.to_string());
        }
    }

    found
}
