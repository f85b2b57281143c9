//! Case form: the lead-capture fields populated from the dialogue.
//!
//! The form is a projection of the answers, never edited directly. It is
//! what the bridge hands to the CRM endpoint on submit.

use crate::catalog::subject_presets;
use crate::model::{Answers, StepKey};

/// Fields required by the Web-to-Case submission contract.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub subject: String,
    pub description: String,
}

impl CaseForm {
    /// Builds the form from the answers collected so far.
    ///
    /// The subject falls back to the intent's first preset until the visitor
    /// picks one. The description joins the visitor's text, the service
    /// focus and a provenance line naming `assistant`, separated by blank lines.
    pub fn from_answers(answers: &Answers, assistant: &str) -> Self {
        let field = |key| answers.get(key).unwrap_or_default().to_string();
        let intent = answers.filled(StepKey::Intent);

        let subject = match answers.filled(StepKey::Subject) {
            Some(subject) => subject.to_string(),
            None if intent.is_some() => subject_presets(answers)[0].to_string(),
            None => String::new(),
        };

        let mut parts = Vec::new();
        if let Some(description) = answers.filled(StepKey::Description) {
            parts.push(description.to_string());
        }
        if let Some(intent) = intent {
            parts.push(format!("Service Focus: {intent}"));
        }
        if !parts.is_empty() {
            parts.push(format!("Source: {assistant} Assistant"));
        }

        Self {
            name: field(StepKey::Name),
            email: field(StepKey::Email),
            phone: field(StepKey::Phone),
            subject,
            description: parts.join("\n\n"),
        }
    }
}

/// The multi-line recap shown once every step is answered.
pub fn summary(answers: &Answers) -> String {
    let or_dash = |key| answers.filled(key).unwrap_or("-");
    let phone = answers
        .filled(StepKey::Phone)
        .map(|p| format!(" | {p}"))
        .unwrap_or_default();

    [
        format!("Service Focus: {}", or_dash(StepKey::Intent)),
        format!(
            "Contact: {} | {}{phone}",
            or_dash(StepKey::Name),
            or_dash(StepKey::Email)
        ),
        format!("Subject: {}", or_dash(StepKey::Subject)),
        format!("Description: {}", or_dash(StepKey::Description)),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_answers() -> Answers {
        let mut answers = Answers::new();
        answers.insert(StepKey::Intent, "Integration");
        answers.insert(StepKey::Name, "Ada Lovelace");
        answers.insert(StepKey::Email, "ada@example.com");
        answers.insert(StepKey::Phone, "");
        answers.insert(StepKey::Subject, "Data migration and sync planning");
        answers.insert(StepKey::Description, "Move 2M accounts from legacy CRM by June.");
        answers
    }

    #[test]
    fn empty_answers_give_empty_form() {
        assert_eq!(CaseForm::from_answers(&Answers::new(), "AuraVoice"), CaseForm::default());
    }

    #[test]
    fn description_joins_parts_with_blank_lines() {
        let form = CaseForm::from_answers(&full_answers(), "AuraVoice");

        assert_eq!(
            form.description,
            "Move 2M accounts from legacy CRM by June.\n\n\
             Service Focus: Integration\n\n\
             Source: AuraVoice Assistant"
        );
        assert_eq!(form.phone, "");
        assert_eq!(form.subject, "Data migration and sync planning");
    }

    #[test]
    fn subject_falls_back_to_intent_preset() {
        let mut answers = Answers::new();
        answers.insert(StepKey::Intent, "Support Issue");

        let form = CaseForm::from_answers(&answers, "AuraVoice");

        assert_eq!(form.subject, "Production support issue in Salesforce");
        assert_eq!(
            form.description,
            "Service Focus: Support Issue\n\nSource: AuraVoice Assistant"
        );
    }

    #[test]
    fn name_alone_has_no_description() {
        let mut answers = Answers::new();
        answers.insert(StepKey::Name, "Ada");

        let form = CaseForm::from_answers(&answers, "AuraVoice");

        assert_eq!(form.name, "Ada");
        assert!(form.description.is_empty());
        assert!(form.subject.is_empty());
    }

    #[test]
    fn summary_lists_every_field() {
        let mut answers = full_answers();
        answers.insert(StepKey::Phone, "+1 555 010 2030");

        assert_eq!(
            summary(&answers),
            "Service Focus: Integration\n\
             Contact: Ada Lovelace | ada@example.com | +1 555 010 2030\n\
             Subject: Data migration and sync planning\n\
             Description: Move 2M accounts from legacy CRM by June."
        );
    }

    #[test]
    fn summary_dashes_missing_values() {
        let text = summary(&full_answers());
        assert!(text.contains("Contact: Ada Lovelace | ada@example.com\n"));

        let empty = summary(&Answers::new());
        assert!(empty.starts_with("Service Focus: -\nContact: - | -\n"));
    }
}
