use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

use crate::error::{NoteError, Result};
use crate::{Section, Utterance};

const PATIENT_ALIASES: &[&str] = &["patient", "pt", "client"];

const CLINICIAN_ALIASES: &[&str] = &[
    "dentist",
    "doctor",
    "dr",
    "hygienist",
    "assistant",
    "da",
    "rdh",
];

// Table entries are regex fragments matched from the start of a word, so
// stems like "diagnos" still catch "diagnosis" while "issue" skips "tissue".
const PLAN_KEYWORDS: &[&str] = &[
    "schedule",
    "follow up",
    "follow-up",
    r"plan(?:s|ned|ning)?\b",
    "next visit",
    "next time",
    "recommend",
    "will ",
    "prescribe",
    "apply",
    "perform",
];

const ASSESSMENT_KEYWORDS: &[&str] = &[
    "assessment",
    "diagnos",
    "decay",
    "caries",
    "periodontal",
    "gingivitis",
    "condition",
    "issue",
    "finding",
    "lesion",
    "inflam",
];

const OBJECTIVE_KEYWORDS: &[&str] = &[
    "radiograph",
    "x-ray",
    "probe",
    "measurement",
    "score",
    "observ",
    "vitals",
    "chart",
    "pocket",
    "plaque",
    "calculus",
];

const SYMPTOM_KEYWORDS: &[&str] = &[
    "pain",
    "hurt",
    "ache",
    "toothache",
    "sensitiv",
    "swell",
    "bleed",
    "discomfort",
    "throb",
    "sore",
    "tender",
];

/// Probing depths and similar readings, e.g. "5mm" or "4.5 mm".
const MEASUREMENT_PATTERN: &str = r"(?i)\b\d+(?:\.\d+)?\s?mm\b";

/// What happens to an utterance that no rule claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum UnmatchedPolicy {
    /// File it under Subjective.
    #[default]
    Subjective,
    /// Leave it out of the note.
    Discard,
}

/// Extra keywords appended to the built-in tables, loaded from JSON.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct KeywordConfig {
    pub subjective: Vec<String>,
    pub objective: Vec<String>,
    pub assessment: Vec<String>,
    pub plan: Vec<String>,
}

impl KeywordConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = crate::read_text(path)?;
        serde_json::from_str(&content).map_err(|source| NoteError::Keywords {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug)]
enum Matcher {
    /// Normalized speaker label starts with one of these.
    SpeakerPrefix(Vec<String>),
    /// Normalized speaker label contains one of these as a whole word.
    SpeakerWord(Vec<String>),
    /// Lowercased text matches the regex.
    Pattern(Regex),
}

impl Matcher {
    fn matches(&self, speaker: &str, text_lower: &str) -> bool {
        match self {
            Matcher::SpeakerPrefix(aliases) => {
                aliases.iter().any(|alias| speaker.starts_with(alias.as_str()))
            }
            Matcher::SpeakerWord(aliases) => speaker
                .split_whitespace()
                .any(|word| aliases.iter().any(|alias| alias == word)),
            Matcher::Pattern(re) => re.is_match(text_lower),
        }
    }
}

#[derive(Debug)]
struct Rule {
    matcher: Matcher,
    section: Section,
}

/// Ordered rule set mapping utterances to SOAP sections. The first rule that
/// matches decides; utterances no rule claims go through the unmatched policy.
#[derive(Debug)]
pub struct Classifier {
    rules: Vec<Rule>,
    unmatched: UnmatchedPolicy,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(&KeywordConfig::default(), UnmatchedPolicy::default())
    }
}

impl Classifier {
    pub fn new(extra: &KeywordConfig, unmatched: UnmatchedPolicy) -> Self {
        let measurement = Regex::new(MEASUREMENT_PATTERN).expect("measurement regex");

        let rules = vec![
            Rule {
                matcher: Matcher::SpeakerPrefix(alias_list(PATIENT_ALIASES)),
                section: Section::Subjective,
            },
            Rule {
                matcher: Matcher::Pattern(keyword_regex(PLAN_KEYWORDS, &extra.plan)),
                section: Section::Plan,
            },
            Rule {
                matcher: Matcher::Pattern(keyword_regex(
                    ASSESSMENT_KEYWORDS,
                    &extra.assessment,
                )),
                section: Section::Assessment,
            },
            Rule {
                matcher: Matcher::Pattern(keyword_regex(OBJECTIVE_KEYWORDS, &extra.objective)),
                section: Section::Objective,
            },
            Rule {
                matcher: Matcher::Pattern(measurement),
                section: Section::Objective,
            },
            Rule {
                matcher: Matcher::Pattern(keyword_regex(SYMPTOM_KEYWORDS, &extra.subjective)),
                section: Section::Subjective,
            },
            Rule {
                matcher: Matcher::SpeakerWord(alias_list(CLINICIAN_ALIASES)),
                section: Section::Objective,
            },
        ];

        Self { rules, unmatched }
    }

    /// Section for this utterance, or `None` when it is discarded.
    pub fn classify(&self, utterance: &Utterance) -> Option<Section> {
        let speaker = utterance.normalized_speaker();
        let text_lower = utterance.text.to_lowercase();

        let matched = self
            .rules
            .iter()
            .find(|rule| rule.matcher.matches(&speaker, &text_lower))
            .map(|rule| rule.section);

        match (matched, self.unmatched) {
            (Some(section), _) => {
                debug!(line = utterance.line, %section, "classified utterance");
                Some(section)
            }
            (None, UnmatchedPolicy::Subjective) => {
                debug!(line = utterance.line, "no rule matched, defaulting to Subjective");
                Some(Section::Subjective)
            }
            (None, UnmatchedPolicy::Discard) => {
                debug!(line = utterance.line, "no rule matched, discarding");
                None
            }
        }
    }
}

fn alias_list(builtin: &[&str]) -> Vec<String> {
    builtin.iter().map(|s| s.to_string()).collect()
}

/// One `\b(?:...)` alternation over a built-in table plus user keywords.
/// User keywords are literal text, escaped before joining.
fn keyword_regex(builtin: &[&str], extra: &[String]) -> Regex {
    let alternation = builtin
        .iter()
        .map(|s| s.to_string())
        .chain(
            extra
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .map(|s| regex::escape(&s)),
        )
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b(?:{alternation})")).expect("keyword regex")
}
