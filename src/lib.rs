use std::fmt;
use std::path::Path;
use tracing::info;

pub mod classifier;
pub mod error;
pub mod note;
pub mod transcriptparser;

pub use classifier::{Classifier, KeywordConfig, UnmatchedPolicy};
pub use error::{NoteError, Result};
pub use note::SoapNote;
pub use transcriptparser::{guess_patient_name, parse_transcript};

/// One speaker turn from the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
    /// 1-based line the turn starts on.
    pub line: u32,
}

impl Utterance {
    /// Lowercase speaker label with punctuation collapsed to single spaces.
    pub fn normalized_speaker(&self) -> String {
        let lower = self.speaker.to_lowercase();
        lower
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Subjective,
    Objective,
    Assessment,
    Plan,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Subjective,
        Section::Objective,
        Section::Assessment,
        Section::Plan,
    ];

    pub fn heading(self) -> &'static str {
        match self {
            Section::Subjective => "Subjective",
            Section::Objective => "Objective",
            Section::Assessment => "Assessment",
            Section::Plan => "Plan",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Build a SOAP note from raw transcript text.
///
/// `patient_name` overrides whatever name can be found in the transcript.
/// A blank transcript, or one with no attributable utterances, is an error.
pub fn generate_soap_note(
    transcript: &str,
    classifier: &Classifier,
    patient_name: Option<&str>,
) -> Result<SoapNote> {
    if transcript.trim().is_empty() {
        return Err(NoteError::EmptyTranscript);
    }

    let utterances = parse_transcript(transcript);
    if utterances.is_empty() {
        return Err(NoteError::EmptyTranscript);
    }

    let mut note = SoapNote {
        patient_name: patient_name
            .map(str::to_string)
            .or_else(|| guess_patient_name(&utterances)),
        ..SoapNote::default()
    };

    for utterance in &utterances {
        if let Some(section) = classifier.classify(utterance) {
            note.add(section, &utterance.text);
        }
    }

    info!(
        utterances = utterances.len(),
        subjective = note.subjective.len(),
        objective = note.objective.len(),
        assessment = note.assessment.len(),
        plan = note.plan.len(),
        "generated SOAP note"
    );

    Ok(note)
}

/// Read a transcript file, distinguishing a missing file from other I/O failures.
pub fn load_transcript(path: &Path) -> Result<String> {
    read_text(path)
}

pub(crate) fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            NoteError::NotFound(path.to_path_buf())
        } else {
            NoteError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utterance(speaker: &str) -> Utterance {
        Utterance {
            speaker: speaker.to_string(),
            text: String::new(),
            line: 1,
        }
    }

    #[test]
    fn normalized_speaker_strips_punctuation() {
        assert_eq!(utterance("Dentist Dr. Lee").normalized_speaker(), "dentist dr lee");
        assert_eq!(utterance("  RDH--Kim ").normalized_speaker(), "rdh kim");
        assert_eq!(utterance("...").normalized_speaker(), "");
    }

    #[test]
    fn generate_rejects_blank_transcript() {
        let classifier = Classifier::default();
        let err = generate_soap_note(" \n\n ", &classifier, None).unwrap_err();
        assert!(matches!(err, NoteError::EmptyTranscript));
    }

    #[test]
    fn generate_rejects_transcript_without_speakers() {
        let classifier = Classifier::default();
        let err = generate_soap_note("just some notes\nwith no labels", &classifier, None)
            .unwrap_err();
        assert!(matches!(err, NoteError::EmptyTranscript));
    }

    #[test]
    fn generate_prefers_explicit_patient_name() {
        let classifier = Classifier::default();
        let note = generate_soap_note(
            "Patient Jane Doe: My gums bleed.",
            &classifier,
            Some("J. Doe"),
        )
        .unwrap();
        assert_eq!(note.patient_name.as_deref(), Some("J. Doe"));
        assert_eq!(note.subjective, vec!["My gums bleed."]);
    }
}
