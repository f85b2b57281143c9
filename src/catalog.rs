//! Step catalog: the fixed question sequence of the case bot.
//!
//! Six steps, always in this order: service focus, contact name, email,
//! phone (optional), case subject, case description. Each step knows how
//! to phrase itself, which quick replies to offer, how to normalize a raw
//! reply and whether the result is acceptable.
//!
//! Prompts and choices may depend on earlier answers (the subject step
//! echoes the chosen intent and offers intent-specific presets), so both
//! are evaluated against the live [`Answers`] every time a step is shown.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::engine::command;
use crate::model::{Answers, Choice, StepKey};
use crate::page::PageContext;

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+()\-.\s0-9]{7,}$").expect("valid phone pattern"));

/// The closed set of service focus areas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    Implementation,
    SupportIssue,
    AiWorkflow,
    Integration,
    Other,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Implementation,
        Intent::SupportIssue,
        Intent::AiWorkflow,
        Intent::Integration,
        Intent::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Implementation => "Salesforce Implementation",
            Self::SupportIssue => "Support Issue",
            Self::AiWorkflow => "AI Workflow",
            Self::Integration => "Integration",
            Self::Other => "Other",
        }
    }

    /// Exact label match. Free-text intents are not in the closed set.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|i| i.label() == label)
    }

    /// Suggested case subjects for this focus area.
    pub fn subject_presets(self) -> [&'static str; 3] {
        match self {
            Self::Implementation => [
                "Salesforce implementation roadmap discussion",
                "New Salesforce org setup planning",
                "Salesforce cloud rollout support",
            ],
            Self::SupportIssue => [
                "Production support issue in Salesforce",
                "Critical bug triage request",
                "User adoption and support assistance",
            ],
            Self::AiWorkflow => [
                "AI workflow enablement in Salesforce",
                "Einstein automation use case discussion",
                "AI-led process optimization request",
            ],
            Self::Integration => [
                "Salesforce integration architecture support",
                "Data migration and sync planning",
                "API and middleware integration request",
            ],
            Self::Other => [
                "Salesforce consulting request",
                "Business process transformation support",
                "General discussion with AuraQubes",
            ],
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Subject presets for whatever intent was answered, `Other` when unrecognized.
pub fn subject_presets(answers: &Answers) -> [&'static str; 3] {
    answers
        .get(StepKey::Intent)
        .and_then(Intent::from_label)
        .unwrap_or(Intent::Other)
        .subject_presets()
}

/// The five intents as plain choices.
pub fn intent_choices() -> Vec<Choice> {
    Intent::ALL.iter().map(|i| Choice::plain(i.label())).collect()
}

/// Maps free text onto the closed intent set.
///
/// Case-insensitive substring rules, first match wins. Text matching no
/// rule is kept as typed; empty text becomes `Other`.
pub fn normalize_intent(raw: &str) -> String {
    const RULES: &[(&[&str], Intent)] = &[
        (&["implement"], Intent::Implementation),
        (&["support", "issue", "bug"], Intent::SupportIssue),
        (&["ai", "einstein", "agent"], Intent::AiWorkflow),
        (&["integrat", "migrat", "api"], Intent::Integration),
    ];

    let raw = raw.trim();
    let lower = raw.to_lowercase();
    for (needles, intent) in RULES {
        if needles.iter().any(|n| lower.contains(n)) {
            return intent.label().to_string();
        }
    }
    if raw.is_empty() {
        Intent::Other.label().to_string()
    } else {
        raw.to_string()
    }
}

/// Step prompt: fixed text or a projection of the current answers.
pub enum Prompt {
    Fixed(String),
    Derived(fn(&Answers) -> String),
}

/// Step quick replies: none, a fixed list, or a projection of the current answers.
pub enum Choices {
    None,
    Fixed(Vec<Choice>),
    Derived(fn(&Answers) -> Vec<Choice>),
}

type Normalize = fn(&str, &Answers) -> String;
type Validate = fn(&str, &Answers) -> Result<(), &'static str>;

/// One question in the sequence.
pub struct StepDefinition {
    pub key: StepKey,

    /// Short name used in "going back" messages.
    pub label: &'static str,

    pub placeholder: &'static str,

    prompt: Prompt,
    choices: Choices,
    normalize: Option<Normalize>,
    validate: Validate,
}

impl StepDefinition {
    pub fn prompt(&self, answers: &Answers) -> String {
        match &self.prompt {
            Prompt::Fixed(text) => text.clone(),
            Prompt::Derived(f) => f(answers),
        }
    }

    /// Quick replies for this visit. Never cached.
    pub fn choices(&self, answers: &Answers) -> Vec<Choice> {
        match &self.choices {
            Choices::None => Vec::new(),
            Choices::Fixed(choices) => choices.clone(),
            Choices::Derived(f) => f(answers),
        }
    }

    /// Normalizes an already-trimmed reply. Steps without a normalizer keep it as is.
    pub fn normalize(&self, raw: &str, answers: &Answers) -> String {
        match self.normalize {
            Some(f) => f(raw, answers),
            None => raw.to_string(),
        }
    }

    /// `Ok` or the message to show the visitor.
    pub fn validate(&self, value: &str, answers: &Answers) -> Result<(), &'static str> {
        (self.validate)(value, answers)
    }
}

/// The ordered step sequence for one page.
pub struct Catalog {
    steps: Vec<StepDefinition>,
}

impl Catalog {
    /// Builds the six steps. The page supplies the first prompt's intro and
    /// the one-click default intent.
    pub fn new(page: &PageContext) -> Self {
        let mut intent_choices_with_default = vec![Choice::new(
            format!("Use {}", page.intent),
            command::USE_PAGE_CONTEXT,
        )];
        intent_choices_with_default.extend(intent_choices());

        let steps = vec![
            StepDefinition {
                key: StepKey::Intent,
                label: "service focus",
                placeholder: "Choose a focus area or type custom...",
                prompt: Prompt::Fixed(format!("What do you need help with today? {}", page.intro)),
                choices: Choices::Fixed(intent_choices_with_default),
                normalize: Some(|raw, _| normalize_intent(raw)),
                validate: |v, _| {
                    at_least(v, 3, "Please select one focus area so I can tailor your case details.")
                },
            },
            StepDefinition {
                key: StepKey::Name,
                label: "contact name",
                placeholder: "Enter your full name...",
                prompt: Prompt::Fixed("Great. What is your full name?".into()),
                choices: Choices::None,
                normalize: None,
                validate: |v, _| at_least(v, 2, "Please enter a valid name."),
            },
            StepDefinition {
                key: StepKey::Email,
                label: "email",
                placeholder: "name@company.com",
                prompt: Prompt::Fixed("What is your work email address?".into()),
                choices: Choices::None,
                normalize: None,
                validate: |v, _| {
                    if EMAIL.is_match(v) {
                        Ok(())
                    } else {
                        Err("Please enter a valid email address.")
                    }
                },
            },
            StepDefinition {
                key: StepKey::Phone,
                label: "phone",
                placeholder: "Phone number or type skip",
                prompt: Prompt::Fixed(
                    "What is your phone number? You can also choose \"Skip Phone\".".into(),
                ),
                choices: Choices::Fixed(vec![Choice::new("Skip Phone", command::SKIP_PHONE)]),
                normalize: Some(|raw, _| {
                    if raw.eq_ignore_ascii_case("skip") {
                        String::new()
                    } else {
                        raw.to_string()
                    }
                }),
                validate: |v, _| {
                    if v.is_empty() || PHONE.is_match(v) {
                        Ok(())
                    } else {
                        Err("Use a valid phone number, or type \"skip\".")
                    }
                },
            },
            StepDefinition {
                key: StepKey::Subject,
                label: "case subject",
                placeholder: "Add a short case subject...",
                prompt: Prompt::Derived(|answers| {
                    let intent = answers.filled(StepKey::Intent).unwrap_or("this request");
                    format!("What should be the case subject for \"{intent}\"?")
                }),
                choices: Choices::Derived(|answers| {
                    subject_presets(answers).into_iter().map(Choice::plain).collect()
                }),
                normalize: None,
                validate: |v, _| {
                    if (4..=80).contains(&text_len(v)) {
                        Ok(())
                    } else {
                        Err("Subject should be between 4 and 80 characters.")
                    }
                },
            },
            StepDefinition {
                key: StepKey::Description,
                label: "case description",
                placeholder: "Describe your requirement...",
                prompt: Prompt::Fixed(
                    "Describe the requirement in detail. Include business impact and expected timeline if possible."
                        .into(),
                ),
                choices: Choices::None,
                normalize: None,
                validate: |v, _| {
                    at_least(
                        v,
                        12,
                        "Please add more detail so we can prioritize your case correctly.",
                    )
                },
            },
        ];

        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn get(&self, index: usize) -> Option<&StepDefinition> {
        self.steps.get(index)
    }
}

/// Length in UTF-16 code units, the unit browser form limits count in.
fn text_len(value: &str) -> usize {
    value.encode_utf16().count()
}

fn at_least(value: &str, min: usize, message: &'static str) -> Result<(), &'static str> {
    if text_len(value) >= min {
        Ok(())
    } else {
        Err(message)
    }
}
