//! View: read-only projections of engine state for the presenter.

use std::fmt;

/// Widget status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Widget closed.
    Idle,
    Collecting,
    Ready,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "Idle",
            Self::Collecting => "Collecting",
            Self::Ready => "Ready",
        })
    }
}

/// How far through the steps the visitor is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub step_index: usize,
    pub completed: usize,
    pub total: usize,
    pub ready: bool,
}

impl Progress {
    /// `round(100 * completed / total)`, halves rounding up.
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (200 * self.completed + self.total) / (2 * self.total)
    }

    /// "Step 3 of 6", or "All 6 steps complete" once ready.
    pub fn label(&self) -> String {
        if self.ready {
            format!("All {} steps complete", self.total)
        } else {
            format!(
                "Step {} of {}",
                (self.step_index + 1).min(self.total),
                self.total
            )
        }
    }
}

/// Everything the presenter needs to draw the widget chrome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub status: Status,
    pub progress: Progress,
    pub placeholder: &'static str,
    pub can_go_back: bool,
    pub can_submit: bool,
}
