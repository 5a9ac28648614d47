use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

use crate::Utterance;

static SPEAKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*([^:]+):\s*(.*)$").expect("speaker regex"));

// Names are runs of capitalized words; only the "patient" marker is case-insensitive.
static PATIENT_SPEAKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i:patient)\s+([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)")
        .expect("patient speaker regex")
});

static PATIENT_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"\b(?i:patient(?:'s)?)\s+(?:(?i:name\s+is)\s+)?",
        r"([A-Z][\w'-]*(?:\s+[A-Z][\w'-]*)*)",
    ))
    .expect("patient mention regex")
});

/// Split a raw transcript into speaker-tagged utterances.
///
/// Every `Speaker: text` line opens a new utterance. Indented or otherwise
/// unlabelled lines continue the utterance before them, so a statement that
/// wraps over several lines stays whole. Unlabelled lines that show up before
/// the first speaker cannot be attributed and are skipped with a warning.
pub fn parse_transcript(transcript: &str) -> Vec<Utterance> {
    let mut utterances = Vec::new();
    let mut current: Option<Utterance> = None;

    for (idx, raw) in transcript.lines().enumerate() {
        let line_number = idx as u32 + 1;
        let stripped = raw.trim();
        if stripped.is_empty() {
            continue;
        }

        if let Some(cap) = SPEAKER_LINE.captures(stripped) {
            if let Some(done) = current.take() {
                push_utterance(&mut utterances, done);
            }
            current = Some(Utterance {
                speaker: cap[1].trim().to_string(),
                text: cap[2].trim().to_string(),
                line: line_number,
            });
            continue;
        }

        match current.as_mut() {
            Some(utterance) => {
                if !utterance.text.is_empty() {
                    utterance.text.push(' ');
                }
                utterance.text.push_str(stripped);
            }
            None => warn!(line = line_number, "skipping line without a speaker label"),
        }
    }

    if let Some(done) = current.take() {
        push_utterance(&mut utterances, done);
    }

    utterances
}

fn push_utterance(utterances: &mut Vec<Utterance>, utterance: Utterance) {
    if utterance.text.is_empty() {
        warn!(
            line = utterance.line,
            speaker = %utterance.speaker,
            "dropping utterance with no text"
        );
        return;
    }
    utterances.push(utterance);
}

/// Look for the patient's name, first in speaker labels such as
/// `Patient Jane Doe:` and then in phrases like "the patient's name is ...".
pub fn guess_patient_name(utterances: &[Utterance]) -> Option<String> {
    for utterance in utterances {
        if let Some(cap) = PATIENT_SPEAKER.captures(&utterance.speaker) {
            return Some(cap[1].to_string());
        }
        if let Some(cap) = PATIENT_MENTION.captures(&utterance.text) {
            return Some(cap[1].to_string());
        }
    }
    None
}
