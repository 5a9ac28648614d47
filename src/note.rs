use serde::Serialize;

use crate::Section;

const EMPTY_SECTION: &str = "- _No information captured._";

/// Structured clinical note. Each list keeps transcript order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SoapNote {
    pub patient_name: Option<String>,
    pub subjective: Vec<String>,
    pub objective: Vec<String>,
    pub assessment: Vec<String>,
    pub plan: Vec<String>,
}

impl SoapNote {
    pub fn section(&self, section: Section) -> &[String] {
        match section {
            Section::Subjective => &self.subjective,
            Section::Objective => &self.objective,
            Section::Assessment => &self.assessment,
            Section::Plan => &self.plan,
        }
    }

    fn section_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Subjective => &mut self.subjective,
            Section::Objective => &mut self.objective,
            Section::Assessment => &mut self.assessment,
            Section::Plan => &mut self.plan,
        }
    }

    /// Append a statement, ignoring blanks and repeats within the section.
    pub fn add(&mut self, section: Section, statement: &str) {
        let statement = statement.trim();
        if statement.is_empty() {
            return;
        }
        let store = self.section_mut(section);
        if !store.iter().any(|s| s == statement) {
            store.push(statement.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.section(*s).is_empty())
    }

    pub fn to_markdown(&self) -> String {
        let mut lines = vec!["# SOAP Note".to_string()];
        if let Some(name) = &self.patient_name {
            lines.push(format!("**Patient:** {name}"));
            lines.push(String::new());
        }
        for section in Section::ALL {
            lines.push(format!("## {}", section.heading()));
            let items = self.section(section);
            if items.is_empty() {
                lines.push(EMPTY_SECTION.to_string());
            } else {
                lines.extend(items.iter().map(|item| format!("- {item}")));
            }
            lines.push(String::new());
        }
        lines.join("\n").trim().to_string()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_skips_blank_and_duplicate() {
        let mut note = SoapNote::default();
        note.add(Section::Plan, "  Recall in six months. ");
        note.add(Section::Plan, "Recall in six months.");
        note.add(Section::Plan, "   ");
        assert_eq!(note.plan, vec!["Recall in six months."]);
    }

    #[test]
    fn default_note_is_empty() {
        let mut note = SoapNote::default();
        assert!(note.is_empty());
        note.add(Section::Objective, "BP 120/80");
        assert!(!note.is_empty());
    }

    #[test]
    fn markdown_with_patient_and_placeholders() {
        let mut note = SoapNote {
            patient_name: Some("Jane Doe".to_string()),
            ..SoapNote::default()
        };
        note.add(Section::Subjective, "Sensitivity on the upper left.");
        note.add(Section::Plan, "Fluoride varnish today.");

        let expected = "\
# SOAP Note
**Patient:** Jane Doe

## Subjective
- Sensitivity on the upper left.

## Objective
- _No information captured._

## Assessment
- _No information captured._

## Plan
- Fluoride varnish today.";
        assert_eq!(note.to_markdown(), expected);
    }

    #[test]
    fn markdown_without_patient_starts_with_subjective() {
        let note = SoapNote::default();
        let md = note.to_markdown();
        assert!(md.starts_with("# SOAP Note\n## Subjective\n"));
        assert!(md.ends_with("## Plan\n- _No information captured._"));
    }

    #[test]
    fn json_uses_snake_case_fields() {
        let mut note = SoapNote::default();
        note.add(Section::Assessment, "Gingivitis.");
        let value: serde_json::Value = serde_json::from_str(&note.to_json().unwrap()).unwrap();
        assert_eq!(value["patient_name"], serde_json::Value::Null);
        assert_eq!(value["assessment"][0], "Gingivitis.");
        assert_eq!(value["plan"].as_array().unwrap().len(), 0);
    }
}
