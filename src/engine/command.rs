//! Reserved replies: a closed command vocabulary checked before step answers.

/// Value of the "Create Case Now" quick action.
pub const SUBMIT_CASE: &str = "__submit_case__";

/// Value of the "Use {page intent}" quick action.
pub const USE_PAGE_CONTEXT: &str = "__use_page_context__";

/// Value of the "Skip Phone" quick action.
pub const SKIP_PHONE: &str = "__skip_phone__";

/// A control reply that bypasses ordinary step processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Submit,
    UsePageContext,
    SkipPhone,
    Back,
    Restart,
}

/// Checked in order; the first case-insensitive exact match wins.
const COMMANDS: &[(&str, Command)] = &[
    (SUBMIT_CASE, Command::Submit),
    (USE_PAGE_CONTEXT, Command::UsePageContext),
    (SKIP_PHONE, Command::SkipPhone),
    ("back", Command::Back),
    ("restart", Command::Restart),
    ("reset", Command::Restart),
];

impl Command {
    /// Matches a trimmed reply against the reserved vocabulary.
    pub fn parse(text: &str) -> Option<Self> {
        COMMANDS
            .iter()
            .find(|(token, _)| token.eq_ignore_ascii_case(text))
            .map(|(_, command)| *command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_case_insensitively() {
        assert_eq!(Command::parse("BACK"), Some(Command::Back));
        assert_eq!(Command::parse("Reset"), Some(Command::Restart));
        assert_eq!(Command::parse("restart"), Some(Command::Restart));
        assert_eq!(Command::parse("__SKIP_PHONE__"), Some(Command::SkipPhone));
        assert_eq!(Command::parse(SUBMIT_CASE), Some(Command::Submit));
        assert_eq!(Command::parse(USE_PAGE_CONTEXT), Some(Command::UsePageContext));
    }

    #[test]
    fn ordinary_text_is_not_a_command() {
        for text in ["go back", "backwards", "submit", "skip", ""] {
            assert_eq!(Command::parse(text), None, "text: {text:?}");
        }
    }
}
