//! Output formatting for CLI display.

use std::fmt::Write;

use jiff::Timestamp;

use crate::model::DraftRecord;
use crate::page::PageContext;

/// One line per page: id, default intent, intro.
pub(super) fn format_pages(pages: impl IntoIterator<Item = PageContext>) -> String {
    let mut out = String::new();
    for page in pages {
        let _ = writeln!(out, "{:<20} [{}]  {}", page.id, page.intent, page.intro);
    }
    out
}

/// The draft as pretty JSON followed by its page and age.
pub(super) fn format_draft(record: &DraftRecord, now: Timestamp) -> serde_json::Result<String> {
    let json = serde_json::to_string_pretty(record)?;
    Ok(format!(
        "{json}\npage: {}  age: {}",
        record.page,
        format_age(record.age_ms(now))
    ))
}

/// Compact age: `45s`, `12m`, `3h 05m`.
fn format_age(ms: i64) -> String {
    let secs = ms.max(0) / 1000;
    match secs {
        0..60 => format!("{secs}s"),
        60..3600 => format!("{}m", secs / 60),
        _ => format!("{}h {:02}m", secs / 3600, secs % 3600 / 60),
    }
}
