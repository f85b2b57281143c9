//! Page context: which page the visitor is on, and what that implies.
//!
//! The page seeds two things only: the greeting text and the default
//! intent offered on the first step. It is resolved once, before the
//! engine is built, through a chain:
//!
//! 1. `--page <id>`: explicit per-session override
//! 2. `CASEBOT_PAGE` env var: process level
//! 3. `page` in `~/.casebot/config.toml`
//! 4. `index.html`

use std::env;

use crate::catalog::Intent;

/// Page used when nothing else names one.
pub const DEFAULT_PAGE: &str = "index.html";

const DEFAULT_INTRO: &str = "I can help you create a complete Salesforce case in less than a minute.";

/// Known pages: id, default intent, greeting intro.
const PAGES: &[(&str, Intent, &str)] = &[
    (
        "index.html",
        Intent::Implementation,
        "You are on the home page, so I can quickly build a Salesforce implementation + AI discovery case.",
    ),
    (
        "services.html",
        Intent::Implementation,
        "From services, I can capture scope and implementation timeline requirements.",
    ),
    (
        "ai-initiatives.html",
        Intent::AiWorkflow,
        "From Salesforce AI, I can capture your AI use case and expected business impact.",
    ),
    (
        "clients.html",
        Intent::Integration,
        "From client outcomes, I can capture integration and transformation goals for your team.",
    ),
    (
        "about.html",
        Intent::Implementation,
        "From about page, I can help route your implementation request to the co-founders.",
    ),
    (
        "contact.html",
        Intent::Implementation,
        "I can help you submit a complete Salesforce case faster than filling every field manually.",
    ),
];

/// What the bot knows about the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContext {
    /// Normalized page id (e.g. `services.html`).
    pub id: String,

    /// Intent offered as the one-click answer to the first step.
    pub intent: Intent,

    /// Sentence appended to the greeting and the first prompt.
    pub intro: &'static str,
}

impl PageContext {
    /// Looks up a page id. Unknown pages get the default entry but keep their id.
    pub fn lookup(page: &str) -> Self {
        let id = normalize_page_id(page);
        let (intent, intro) = PAGES
            .iter()
            .find(|(known, _, _)| *known == id)
            .map_or((Intent::Implementation, DEFAULT_INTRO), |(_, intent, intro)| {
                (*intent, *intro)
            });
        Self { id, intent, intro }
    }
}

/// All known pages, in table order.
pub fn known_pages() -> impl Iterator<Item = PageContext> {
    PAGES.iter().map(|(id, _, _)| PageContext::lookup(id))
}

/// Reduces a path or URL path to its last segment, lowercased.
///
/// An empty segment (e.g. `/`) means the home page.
pub fn normalize_page_id(raw: &str) -> String {
    let path = raw.split(['?', '#']).next().unwrap_or_default();
    let segment = path.trim().rsplit('/').next().unwrap_or_default();
    if segment.is_empty() {
        DEFAULT_PAGE.to_string()
    } else {
        segment.to_lowercase()
    }
}

/// Resolve the page id from the tiered resolution chain.
pub fn resolve_page(explicit: Option<&str>, configured: Option<&str>) -> String {
    let from_env = env::var("CASEBOT_PAGE").ok();
    resolve_page_from(explicit, from_env.as_deref(), configured)
}

fn resolve_page_from(
    explicit: Option<&str>,
    from_env: Option<&str>,
    configured: Option<&str>,
) -> String {
    [explicit, from_env, configured]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .map_or_else(|| DEFAULT_PAGE.to_string(), normalize_page_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_page_uses_its_entry() {
        let page = PageContext::lookup("ai-initiatives.html");
        assert_eq!(page.intent, Intent::AiWorkflow);
        assert!(page.intro.starts_with("From Salesforce AI"));
    }

    #[test]
    fn unknown_page_falls_back_to_default() {
        let page = PageContext::lookup("pricing.html");
        assert_eq!(page.id, "pricing.html");
        assert_eq!(page.intent, Intent::Implementation);
        assert_eq!(page.intro, DEFAULT_INTRO);
    }

    #[test]
    fn normalizes_paths() {
        assert_eq!(normalize_page_id("/site/Services.HTML"), "services.html");
        assert_eq!(normalize_page_id("/"), "index.html");
        assert_eq!(normalize_page_id(""), "index.html");
        assert_eq!(normalize_page_id("/contact.html?case=created"), "contact.html");
    }

    #[test]
    fn explicit_wins() {
        let page = resolve_page_from(Some("clients.html"), Some("about.html"), Some("contact.html"));
        assert_eq!(page, "clients.html");
    }

    #[test]
    fn env_beats_config() {
        let page = resolve_page_from(None, Some("about.html"), Some("contact.html"));
        assert_eq!(page, "about.html");
    }

    #[test]
    fn blank_sources_are_skipped() {
        let page = resolve_page_from(Some("  "), None, None);
        assert_eq!(page, DEFAULT_PAGE);
    }

    #[test]
    fn lists_every_known_page() {
        assert_eq!(known_pages().count(), PAGES.len());
    }
}
